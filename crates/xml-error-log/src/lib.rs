//! Ordered log of XML parsing and validation diagnostics.
//!
//! A parsing or validation pass appends one [`DiagnosticRecord`] per problem
//! it finds, in document order. Consumers then ask the [`ErrorLog`] how many
//! problems of each [`Severity`] there are, read individual records, or
//! render the whole log as a text or JSON report.
//!
//! # Overview
//!
//! - [`ErrorLog`]: append-only, index-addressable sequence with O(1) counts
//! - [`DiagnosticRecord`]: immutable record (code, severity, message, position, category)
//! - [`Severity`]: `Info < Warning < Error < Fatal`
//! - [`catalog`]: metadata for the standard XML error codes
//!
//! # Example
//!
//! ```rust
//! use xml_error_log::{DiagnosticRecord, ErrorLog, Severity};
//!
//! let mut log = ErrorLog::new();
//! log.add(DiagnosticRecord::from_code(1009, 3, 5, "expected </model>")).unwrap();
//!
//! assert!(log.has_errors());
//! assert_eq!(
//!     log.report(),
//!     "Error (1009) at line 3, column 5: XML tag mismatch: expected </model>\n"
//! );
//! ```

pub mod catalog;
pub mod diagnostic;
pub mod error;
pub mod log;

// Re-export main types
pub use catalog::{ErrorCodeInfo, get_error_info};
pub use diagnostic::{Category, DiagnosticRecord, RawDiagnostic, Severity};
pub use error::{Error, Result};
pub use log::ErrorLog;
