//! Error types for xml-error-log

/// Precondition violations reported by the log and its record types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A severity name or numeric code that is not one of the four levels.
    #[error("Invalid argument: unrecognized severity {0:?}")]
    InvalidArgument(String),

    /// `get` called with an index outside `[0, size)`.
    #[error("Index {index} out of range for log of size {size}")]
    OutOfRange { index: i64, size: usize },

    /// Storage for a new record could not be allocated.
    #[error("Out of memory while appending to the error log")]
    OutOfMemory,
}

pub type Result<T> = std::result::Result<T, Error>;
