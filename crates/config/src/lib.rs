//! Persisted settings for the rampart runtime.
//!
//! The only runtime state that survives a server restart is one boolean per
//! feature: whether it should be enabled automatically at startup. Settings
//! live in a flat TOML file:
//!
//! ```toml
//! [features.trade-watch]
//! auto-enable = true
//!
//! [features.wave-guard]
//! auto-enable = false
//! ```
//!
//! A missing file is not an error; it yields default (empty) settings so a
//! fresh server starts with every feature off.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

mod error;

pub use error::{ConfigError, Result};

/// Per-feature persisted settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FeatureSettings {
	/// Enable this feature automatically at process start.
	pub auto_enable: bool,
}

/// The full persisted settings document.
///
/// Keys under `features` are feature names as registered in the component
/// index. Unknown names are preserved round-trip so a settings file written
/// by a newer build is not silently stripped by an older one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Settings {
	/// Settings keyed by feature name.
	pub features: BTreeMap<String, FeatureSettings>,
}

impl Settings {
	/// Loads settings from `path`.
	///
	/// A missing file yields [`Settings::default`]; any other I/O failure or
	/// a malformed document is an error.
	pub fn load(path: &Path) -> Result<Self> {
		let text = match std::fs::read_to_string(path) {
			Ok(text) => text,
			Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
				return Ok(Self::default());
			}
			Err(error) => {
				return Err(ConfigError::Io {
					path: path.to_path_buf(),
					error,
				});
			}
		};
		Ok(toml::from_str(&text)?)
	}

	/// Serializes settings and writes them to `path`.
	pub fn save(&self, path: &Path) -> Result<()> {
		let text = toml::to_string_pretty(self)?;
		std::fs::write(path, text).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})
	}

	/// Returns the auto-enable flag for `feature`, defaulting to `false` for
	/// features with no recorded settings.
	pub fn auto_enable(&self, feature: &str) -> bool {
		self.features
			.get(feature)
			.map(|f| f.auto_enable)
			.unwrap_or(false)
	}

	/// Sets the auto-enable flag for `feature`, creating its entry if needed.
	pub fn set_auto_enable(&mut self, feature: &str, on: bool) {
		self.features.entry(feature.to_string()).or_default().auto_enable = on;
	}
}
