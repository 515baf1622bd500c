//! XML well-formedness checking that reports through [`xml_error_log`].
//!
//! A check pass walks one document with [`quick-xml`](quick_xml) and appends
//! a [`DiagnosticRecord`](xml_error_log::DiagnosticRecord) to the caller's
//! [`ErrorLog`](xml_error_log::ErrorLog) for every problem it finds, using
//! the standard XML error codes from the log's catalog. Unlike a plain
//! parser it keeps going after recoverable problems (mismatched tags,
//! extra root elements) so one pass reports as much as possible.
//!
//! # Example
//!
//! ```rust
//! use xml_check::{check_str, CheckOptions};
//! use xml_error_log::ErrorLog;
//!
//! let mut log = ErrorLog::new();
//! let options = CheckOptions::default().without_declaration_check();
//! check_str("<a><b></c></a>", &options, &mut log).unwrap();
//!
//! assert!(log.has_errors());
//! assert!(log.contains(1009));
//! ```

pub mod checker;
pub mod error;
pub mod options;
pub mod position;

pub use checker::{CheckOutcome, check_file, check_str};
pub use error::{Error, Result};
pub use options::{CheckOptions, DEFAULT_MAX_ERRORS};
