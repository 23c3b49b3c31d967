//! Error types for report layout

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid page geometry: {0}")]
    InvalidGeometry(String),

    #[error("Rendering page {page} failed: {message}")]
    Render { page: usize, message: String },
}

pub type Result<T> = std::result::Result<T, ReportError>;
