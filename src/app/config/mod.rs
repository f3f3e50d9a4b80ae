pub mod appearance;
pub mod config;
pub mod layout;
pub mod logging;
pub mod preview;
pub mod source;

pub use config::Config;
pub use logging::LoggingConfig;
