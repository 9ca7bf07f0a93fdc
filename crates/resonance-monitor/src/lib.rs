//! Logging setup.

mod logging;

pub use logging::{log_file_parts, setup_logging, LogFormat};
