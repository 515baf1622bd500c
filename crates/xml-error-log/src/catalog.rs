//! Error code catalog and lookup.
//!
//! This module maps the numeric XML error codes (like `1009` for a tag
//! mismatch) to their metadata: a symbolic name, a short title, the default
//! severity and the category.

use crate::diagnostic::{Category, Severity};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Code used when a producer reports an id the catalog does not know.
pub const UNKNOWN_ERROR: u32 = 0;

/// Metadata for an error code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorCodeInfo {
    /// Symbolic name (e.g., "XMLTagMismatch")
    pub name: String,

    /// Short title, used as the record message
    pub title: String,

    /// Severity a record with this code gets by default
    pub severity: Severity,

    /// Classification tag
    pub category: Category,
}

/// Global error catalog, loaded lazily from JSON embedded at compile time.
///
/// # Panics
///
/// Panics if the embedded JSON is invalid. This can only happen if someone
/// edits `error_catalog.json` by hand incorrectly.
pub static ERROR_CATALOG: Lazy<HashMap<u32, ErrorCodeInfo>> = Lazy::new(|| {
    let json_data = include_str!("../error_catalog.json");
    serde_json::from_str(json_data).expect("Invalid error catalog JSON - this is a bug in xml-error-log")
});

/// Look up error code information.
///
/// Returns `None` if the error code is not found in the catalog.
///
/// # Example
///
/// ```
/// use xml_error_log::catalog::get_error_info;
///
/// let info = get_error_info(1024).unwrap();
/// assert_eq!(info.name, "XMLUnexpectedEOF");
/// ```
pub fn get_error_info(code: u32) -> Option<&'static ErrorCodeInfo> {
    ERROR_CATALOG.get(&code)
}

/// Metadata for [`UNKNOWN_ERROR`].
pub fn unknown_error() -> &'static ErrorCodeInfo {
    ERROR_CATALOG
        .get(&UNKNOWN_ERROR)
        .expect("error catalog is missing code 0 - this is a bug in xml-error-log")
}

/// Get the symbolic name of an error code.
///
/// ```
/// use xml_error_log::catalog::get_name;
///
/// assert_eq!(get_name(1001), Some("MissingXMLDecl"));
/// assert_eq!(get_name(9999), None);
/// ```
pub fn get_name(code: u32) -> Option<&'static str> {
    ERROR_CATALOG.get(&code).map(|info| info.name.as_str())
}
