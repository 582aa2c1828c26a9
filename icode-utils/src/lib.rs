//! i-Code Utilities - Shared Ambient Helpers
//!
//! This crate provides the pieces every i-Code measure tool needs but
//! none of them owns: logging initialisation, layered configuration
//! loading and path normalisation for analyser-reported file names.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod config;
pub mod file;
pub mod logging;

/// Re-export commonly used utilities
pub use config::{load_config, merge_configs, ConfigBuilder};
pub use file::{normalize_path, normalize_report_path, relative_key};
pub use logging::{init_logging, LogLevel, LoggerConfig};

/// Result type used throughout the i-Code utilities
pub type Result<T> = std::result::Result<T, UtilError>;

/// Error types for utility operations
#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Path operation error
    #[error("Path operation error: {0}")]
    PathOperation(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Directory and file names skipped when indexing a project
pub fn default_exclusion_patterns() -> Vec<String> {
    [
        // Version control
        "**/.git/**",
        "**/.svn/**",
        "**/.hg/**",
        // Build artifacts
        "**/target/**",
        "**/build/**",
        "**/dist/**",
        // IDE and editor files
        "**/.vscode/**",
        "**/.idea/**",
        "**/*.swp",
        "**/*~",
        // Package managers
        "**/node_modules/**",
    ]
    .iter()
    .map(|p| (*p).to_string())
    .collect()
}
