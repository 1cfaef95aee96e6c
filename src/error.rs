//! Error types for dsnsync
//!
//! This module defines the error hierarchy used throughout the crate.
//! We use `thiserror` for library-style errors with clear error chains.
//!
//! Note that the codec and sync layers are deliberately infallible: a
//! malformed connection string degrades to default-valued fields instead of
//! producing an error. Errors only exist at the payload, profile-store, and
//! CLI layers.

use std::io;

/// Main error type for the dsnsync application
#[derive(Debug, thiserror::Error)]
pub enum DsnSyncError {
    /// Payload construction errors
    #[error("Payload error: {0}")]
    Payload(#[from] PayloadError),

    /// Profile store errors
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Payload construction errors
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    /// Event format outside the allowed enum
    #[error("Invalid event format '{0}' (expected 'namespace' or 'access')")]
    InvalidFormat(String),
}

/// Profile store loading/saving errors
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// Home directory not found
    #[error("Could not determine home directory")]
    NoHomeDir,

    /// Failed to read or write the profiles file
    #[error("Profile file error: {0}")]
    Io(#[from] io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse profiles: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("Failed to serialize profiles: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Profile not found by name
    #[error("Profile '{0}' not found")]
    ProfileNotFound(String),
}

/// Specialized Result type for dsnsync operations
pub type Result<T> = std::result::Result<T, DsnSyncError>;

/// Specialized Result type for payload operations
pub type PayloadResult<T> = std::result::Result<T, PayloadError>;

/// Specialized Result type for profile-store operations
pub type ProfileResult<T> = std::result::Result<T, ProfileError>;
