//! Error types for the admin surface.

use rampart_config::ConfigError;
use thiserror::Error;

/// Errors surfaced to the admin command layer.
///
/// Direct, definition-based lifecycle calls stay silent (`Option`/`bool`);
/// the by-name surface reports why a command did nothing so the admin layer
/// can print it.
#[derive(Debug, Error)]
pub enum AdminError {
	/// No component with this name exists.
	#[error("unknown feature: {0}")]
	UnknownFeature(String),

	/// The name resolves to a service, which admins do not manage directly.
	#[error("'{0}' is a service; it is managed by the features that need it")]
	NotAFeature(&'static str),

	/// Disable was requested for a feature that is not enabled.
	#[error("feature is not enabled: {0}")]
	NotEnabled(&'static str),

	/// Enable was requested but the instance could not be created.
	#[error("could not enable feature: {0}")]
	EnableFailed(&'static str),

	/// The auto-enable flag changed but could not be persisted.
	#[error(transparent)]
	Persist(#[from] ConfigError),
}
