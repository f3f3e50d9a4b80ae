// Module declarations
mod app;
mod entry;
mod gfx;
mod scroller;
mod settings;
mod source;
mod text;
mod ui;

use app::cli::Args;
use app::config::Config;
use app::{
    App,
    main_loop::AppMainLoop,
    terminal::{TerminalGuard, init_terminal},
};
use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // Parse command line arguments
    let args = Args::parse();

    // Handle --generate-config option
    if let Some(path) = &args.generate_config {
        let config_path = if path.is_dir() || path.to_str() == Some(".") {
            path.join("config.toml")
        } else {
            path.clone()
        };
        Config::generate_default(config_path)?;
        return Ok(());
    }

    // Determine config path for logging and reloads
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => Config::default_config_path()?,
    };
    let config_existed = config_path.exists();

    // Load config first for logger initialization
    let (config, config_warnings) = Config::load(Some(config_path.clone()))?;

    let logging_enabled = config.logging.enabled;
    if logging_enabled {
        app::logging::ensure_log_directory(&config.logging)?;
        app::logging::init_logger(&config.logging)?;
        app::logging::log_startup_info(&config.logging);
        app::logging::log_config_loading(&config_path, !config_existed);

        for warning in &config_warnings {
            log::warn!("{}", warning);
        }
    }

    // Create app now that logger is initialized; this starts the first fetch
    let app = App::new(config, config_path, args.username.clone(), config_warnings);

    let result = match &args.snapshot {
        Some(path) => tokio::task::block_in_place(|| app.run_snapshot(path, args.frames)),
        None => {
            let terminal = init_terminal()?;
            let _guard = TerminalGuard;
            app.run(terminal).await
        }
    };

    if logging_enabled {
        app::logging::log_shutdown_info();
    }

    result
}
