//! Unified error type for document composition.
//!
//! Every failure surfaces to the caller of `render`/`save` through this enum.
//! Nothing is caught or retried inside the crate.
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for docx-compose operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A style referenced by name does not exist in the document
    #[error("Style not found: '{0}'")]
    MissingStyle(String),

    /// A picture file does not exist
    #[error("Image not found: {}", .0.display())]
    MissingImage(PathBuf),

    /// A picture file exists but cannot be decoded
    #[error("Cannot read image {}: {reason}", path.display())]
    UnreadableImage { path: PathBuf, reason: String },

    /// The template is not a usable WordprocessingML package
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(String),

    /// Configuration could not be parsed or holds an invalid value
    #[error("Configuration error: {0}")]
    Config(String),

    /// `save` was called without a target and without a template path
    #[error("No output path: pass a target or configure a template")]
    NoTarget,
}

/// Result type for docx-compose operations.
pub type Result<T> = std::result::Result<T, Error>;
