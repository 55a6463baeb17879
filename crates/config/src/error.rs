//! Error types for settings load/save.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or persisting settings.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading or writing the settings file.
	#[error("I/O error on {path}: {error}")]
	Io {
		/// Path to the file that failed.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The settings file is not valid TOML.
	#[error("settings parse error: {0}")]
	Parse(#[from] toml::de::Error),

	/// Settings could not be serialized back to TOML.
	#[error("settings serialize error: {0}")]
	Serialize(#[from] toml::ser::Error),
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
