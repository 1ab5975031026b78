//! Error types for lumitree

use thiserror::Error;

/// Main error type for lumitree
#[derive(Error, Debug)]
pub enum LumitreeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Tracking error: {0}")]
    Tracking(#[from] TrackingError),

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration value: {field} - {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, message: &str) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Hand tracking errors (detector, transport, helper process)
#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("Hand tracking unavailable: {0}")]
    Unavailable(String),

    #[error("MediaPipe receiver error: {0}")]
    MpReceiver(String),

    #[error("MediaPipe parse error: {0}")]
    MpParse(String),

    #[error("MediaPipe subprocess error: {0}")]
    MpSubprocess(String),

    #[error("Expected at least {expected} hand landmarks, got {got}")]
    TooFewLandmarks { expected: usize, got: usize },
}

/// Memory panel image errors
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Image not found: {0}")]
    NotFound(String),

    #[error("Failed to decode image {url}: {message}")]
    Decode { url: String, message: String },

    #[error("Unsupported resource handle: {0}")]
    UnsupportedUrl(String),

    #[error("Image load task failed: {0}")]
    Task(String),
}

/// Renderer errors
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Renderer not ready: {0}")]
    NotReady(String),

    #[error("Frame submission failed: {0}")]
    Submit(String),
}

/// Result type alias for lumitree operations
pub type Result<T> = std::result::Result<T, LumitreeError>;
