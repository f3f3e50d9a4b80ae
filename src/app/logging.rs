use crate::app::config::LoggingConfig;
use flexi_logger::{Cleanup, Criterion, FileSpec, FlexiLoggerError, Logger, Naming};
use std::path::{Path, PathBuf};

const LOG_BASENAME: &str = "malscroll";

/// Initialize the file logger
pub fn init_logger(config: &LoggingConfig) -> Result<(), FlexiLoggerError> {
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug.max(config.level_filter())
    } else {
        config.level_filter()
    };

    let mut logger = Logger::try_with_str(level.as_str().to_lowercase())?
        .log_to_file(
            FileSpec::default()
                .directory(log_directory(config))
                .basename(LOG_BASENAME)
                .suppress_timestamp(),
        )
        .format_for_files(custom_log_format)
        .use_utc();

    if config.append_to_file {
        logger = logger.append();
    }

    if config.rotate_logs {
        logger = logger.rotate(
            Criterion::Size(config.rotation_size_mb.max(1) * 1024 * 1024),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(config.keep_log_files as usize),
        );
    }

    if config.log_to_console {
        logger = logger.log_to_stdout();
    }

    logger.start()?;
    log::info!("Logger initialized with level: {}", level);
    log::info!("Log file location: {}", log_file_path(config).display());

    Ok(())
}

/// Platform data directory for logs, unless the config names one
pub fn log_directory(config: &LoggingConfig) -> PathBuf {
    if let Some(custom) = &config.custom_log_path {
        return custom.clone();
    }

    #[cfg(target_os = "macos")]
    return dirs::data_dir()
        .map(|d| d.join("Logs/malscroll"))
        .unwrap_or_else(|| PathBuf::from("malscroll-logs"));

    #[cfg(not(target_os = "macos"))]
    return dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".local/share")))
        .map(|d| d.join("malscroll/logs"))
        .unwrap_or_else(|| PathBuf::from("malscroll-logs"));
}

pub fn log_file_path(config: &LoggingConfig) -> PathBuf {
    log_directory(config).join(format!("{}.log", LOG_BASENAME))
}

fn custom_log_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} [{}] [{}] {}",
        now.now().format("%Y-%m-%d %H:%M:%S%.3f"),
        record.level(),
        record.module_path().unwrap_or("unknown"),
        record.args()
    )
}

pub fn ensure_log_directory(config: &LoggingConfig) -> color_eyre::Result<()> {
    let log_dir = log_directory(config);
    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir)?;
    }
    Ok(())
}

pub fn log_startup_info(config: &LoggingConfig) {
    log::info!("=== malscroll starting ===");
    log::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    log::info!("OS: {} ({})", std::env::consts::OS, std::env::consts::ARCH);
    log::info!("Log file: {}", log_file_path(config).display());
}

pub fn log_shutdown_info() {
    log::info!("=== malscroll shutting down ===");
}

pub fn log_config_loading(config_path: &Path, created: bool) {
    if created {
        log::info!("Created default config file at: {}", config_path.display());
    } else {
        log::info!("Loaded config file from: {}", config_path.display());
    }
}

/// Log user interactions for debugging
pub fn log_user_interaction(action: &str, context: Option<&str>) {
    match context {
        Some(ctx) => log::debug!("User action: {} - {}", action, ctx),
        None => log::debug!("User action: {}", action),
    }
}
