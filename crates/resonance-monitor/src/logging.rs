//! Logging setup.

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Console output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn from_flag(json: bool) -> Self {
        if json {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Split a log file path into the rolling appender's directory and prefix.
pub fn log_file_parts(path: &Path) -> (PathBuf, String) {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let prefix = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "resonance.log".to_string());
    (dir, prefix)
}

/// Setup logging with the given level.
///
/// `RUST_LOG` overrides `level`. With `file` set, a daily-rotated plain-text
/// copy is written as well; keep the returned guard alive until exit or
/// buffered lines are lost.
pub fn setup_logging(
    level: &str,
    format: LogFormat,
    file: Option<&Path>,
) -> Result<Option<WorkerGuard>, TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console = match format {
        LogFormat::Json => fmt::layer().json().boxed(),
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
    };

    let (file_layer, guard) = match file {
        Some(path) => {
            let (dir, prefix) = log_file_parts(path);
            let appender = tracing_appender::rolling::daily(dir, prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_parts() {
        let (dir, prefix) = log_file_parts(Path::new("logs/resonance.log"));
        assert_eq!(dir, PathBuf::from("logs"));
        assert_eq!(prefix, "resonance.log");

        let (dir, prefix) = log_file_parts(Path::new("watch.log"));
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(prefix, "watch.log");
    }

    #[test]
    fn test_setup_once() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("test.log");

        let first = setup_logging("debug", LogFormat::Pretty, Some(&file));
        assert!(first.is_ok());
        assert!(first.unwrap().is_some());

        // A second global subscriber is refused, not a panic
        assert!(setup_logging("info", LogFormat::Json, None).is_err());
    }
}
