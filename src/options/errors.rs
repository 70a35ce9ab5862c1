use std::path::PathBuf;

use thiserror::Error;

/// Fatal construction-time configuration problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The host did not provide a usable container to render into.
    #[error("Waveform container is missing or has no size ({width}x{height})")]
    MissingContainer {
        /// Reported container width.
        width: f32,
        /// Reported container height.
        height: f32,
    },
    /// An option value cannot be rendered.
    #[error("Invalid option `{key}`: {reason}")]
    InvalidOption {
        /// Option key.
        key: &'static str,
        /// Human readable reason.
        reason: String,
    },
}

/// Errors that may occur while loading or saving options files.
#[derive(Debug, Error)]
pub enum OptionsIoError {
    /// Failed to create the options directory.
    #[error("Unable to create options directory {path}: {source}")]
    CreateDir {
        /// Directory path that failed to create.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to read an options file.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to write an options file.
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Path that failed to write.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to parse TOML.
    #[error("Invalid options at {path}: {source}")]
    ParseToml {
        /// TOML file path.
        path: PathBuf,
        /// TOML parse error.
        source: toml::de::Error,
    },
    /// Failed to serialize options to TOML.
    #[error("Failed to serialize options to TOML at {path}: {source}")]
    SerializeToml {
        /// TOML file path.
        path: PathBuf,
        /// TOML serialization error.
        source: toml::ser::Error,
    },
    /// Parsed options failed validation.
    #[error("Options at {path} are invalid: {source}")]
    Invalid {
        /// TOML file path.
        path: PathBuf,
        /// Validation failure.
        source: ConfigError,
    },
    /// No usable config directory found.
    #[error("No suitable config directory found")]
    NoConfigDir,
}
