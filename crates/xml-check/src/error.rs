//! Error types for xml-check

/// Failures that stop a pass without being a diagnostic about the document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to record diagnostic: {0}")]
    Log(#[from] xml_error_log::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
