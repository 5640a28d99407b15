//! Error types for weasis-launcher.

use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Result type for weasis-launcher operations.
pub type LaunchResult<T> = Result<T, LaunchError>;

/// Error type for weasis-launcher operations.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The manifest reference has no scheme separator.
    #[error("Cannot get a valid manifest URL: {0}")]
    InvalidManifestReference(String),

    /// A connector setting required by a collaborator is missing.
    #[error("Missing connector setting: {0}")]
    MissingSetting(String),

    /// Configuration parse error.
    #[error("Failed to parse configuration: {0}")]
    ConfigParseError(String),

    /// Deserialization error.
    #[error("Deserialization error: {0}")]
    DeserializationError(#[from] toml::de::Error),

    /// A string could not be turned into an HTTP header value.
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    /// The request body could not be read.
    #[error("Failed to read request body: {0}")]
    Body(String),

    /// The URI does not carry a launch descriptor.
    #[error("Invalid launch URI: {0}")]
    InvalidLaunchUri(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
