// core/src/utils/logging.rs
use log::LevelFilter;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("logger already initialised: {0}")]
    AlreadySet(#[from] log::SetLoggerError),
}

/// Maps a config level string to a filter. Unknown strings fall back to info.
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

/// Installs the global logger. Records go to `log_path` when given, stderr otherwise.
pub fn init(level: LevelFilter, log_path: Option<&Path>) -> Result<(), LoggingError> {
    let dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} - {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                message
            ))
        })
        .level(level);

    let dispatch = match log_path {
        Some(path) => {
            let file = fern::log_file(path).map_err(|source| LoggingError::Open {
                path: path.display().to_string(),
                source,
            })?;
            dispatch.chain(file)
        }
        None => dispatch.chain(std::io::stderr()),
    };

    dispatch.apply()?;
    Ok(())
}
