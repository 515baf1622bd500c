//! Core diagnostic record types.
//!
//! This module defines the structures a parsing or validation pass reports
//! into an [`ErrorLog`](crate::ErrorLog): the [`Severity`] scale, the
//! [`Category`] tag and the immutable [`DiagnosticRecord`] itself.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How serious a diagnostic is.
///
/// Levels are ordered by increasing impact, so `Severity::Error > Severity::Warning`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, not a problem
    Info,
    /// A problem that does not make the document invalid
    Warning,
    /// The document is invalid, but the pass could continue
    Error,
    /// The pass could not continue past this point
    Fatal,
}

impl Severity {
    /// All levels, lowest first.
    pub const ALL: [Severity; 4] = [
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Fatal,
    ];

    /// Position of this level in [`Severity::ALL`].
    pub fn index(self) -> usize {
        match self {
            Severity::Info => 0,
            Severity::Warning => 1,
            Severity::Error => 2,
            Severity::Fatal => 3,
        }
    }

    /// Display name used in text reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
            Severity::Fatal => "Fatal",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u32> for Severity {
    type Error = Error;

    fn try_from(code: u32) -> Result<Self> {
        match code {
            0 => Ok(Severity::Info),
            1 => Ok(Severity::Warning),
            2 => Ok(Severity::Error),
            3 => Ok(Severity::Fatal),
            other => Err(Error::InvalidArgument(other.to_string())),
        }
    }
}

impl FromStr for Severity {
    type Err = Error;

    /// Parse a severity name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self> {
        Severity::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidArgument(s.to_string()))
    }
}

/// Classification tag for a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Category {
    /// A bug or inconsistency inside the producer
    Internal,
    /// Operating system or environment problem (unreadable file, ...)
    System,
    /// XML syntax and well-formedness
    Xml,
    /// Schema or vocabulary rules on top of well-formed XML
    Schema,
    /// Producer-specific tag
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Internal => "internal",
            Category::System => "system",
            Category::Xml => "xml",
            Category::Schema => "schema",
            Category::Other(tag) => tag,
        }
    }
}

impl From<String> for Category {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "internal" => Category::Internal,
            "system" => Category::System,
            "xml" => Category::Xml,
            "schema" => Category::Schema,
            _ => Category::Other(tag),
        }
    }
}

impl From<&str> for Category {
    fn from(tag: &str) -> Self {
        Category::from(tag.to_string())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reported problem.
///
/// Records are immutable once they are in a log: fields are private and
/// only readable through accessors. The consuming `at`/`with_category`
/// methods exist for the producer to finish a record before adding it.
///
/// Positions are 1-based; `0` means the line or column is unknown.
///
/// # Example
///
/// ```
/// use xml_error_log::{DiagnosticRecord, Severity};
///
/// let record = DiagnosticRecord::new(1009, Severity::Error, "Mismatched end tag")
///     .at(3, 7);
/// assert_eq!(
///     record.to_string(),
///     "Error (1009) at line 3, column 7: Mismatched end tag"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiagnosticRecord {
    id: u32,
    severity: Severity,
    message: String,
    line: u32,
    column: u32,
    category: Category,
}

impl DiagnosticRecord {
    /// Create a record at an unknown position in the `xml` category.
    pub fn new(id: u32, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            id,
            severity,
            message: message.into(),
            line: 0,
            column: 0,
            category: Category::Xml,
        }
    }

    /// Create a record whose severity, category and title come from the
    /// error code catalog.
    ///
    /// A non-empty `detail` is appended to the catalog title. Codes missing
    /// from the catalog take the metadata of code 0 but keep their own id.
    ///
    /// ```
    /// use xml_error_log::{Category, DiagnosticRecord, Severity};
    ///
    /// let record = DiagnosticRecord::from_code(1010, 4, 12, "attribute 'id'");
    /// assert_eq!(record.severity(), Severity::Error);
    /// assert_eq!(record.category(), &Category::Xml);
    /// assert_eq!(record.message(), "Duplicate XML attribute: attribute 'id'");
    /// ```
    pub fn from_code(id: u32, line: u32, column: u32, detail: &str) -> Self {
        let info = crate::catalog::get_error_info(id).unwrap_or_else(crate::catalog::unknown_error);

        let message = if detail.is_empty() {
            info.title.clone()
        } else {
            format!("{}: {}", info.title, detail)
        };

        Self {
            id,
            severity: info.severity,
            message,
            line,
            column,
            category: info.category.clone(),
        }
    }

    /// Set the source position.
    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    /// Set the classification tag.
    pub fn with_category(mut self, category: impl Into<Category>) -> Self {
        self.category = category.into();
        self
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Render this record as a JSON value.
    ///
    /// `name` is the catalog name of the code, or `null` for codes outside
    /// the catalog.
    ///
    /// ```
    /// use xml_error_log::{DiagnosticRecord, Severity};
    ///
    /// let json = DiagnosticRecord::new(1001, Severity::Warning, "Missing XML declaration")
    ///     .to_json();
    /// assert_eq!(json["severity"], "warning");
    /// assert_eq!(json["category"], "xml");
    /// assert_eq!(json["name"], "MissingXMLDecl");
    /// ```
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;

        json!({
            "id": self.id,
            "name": crate::catalog::get_name(self.id),
            "severity": self.severity,
            "message": self.message,
            "line": self.line,
            "column": self.column,
            "category": self.category.as_str(),
        })
    }
}

impl fmt::Display for DiagnosticRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) at line {}, column {}: {}",
            self.severity, self.id, self.line, self.column, self.message
        )
    }
}

/// A diagnostic as delivered by a producer that reports severities as
/// numeric codes.
///
/// Converting into a [`DiagnosticRecord`] checks the severity code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDiagnostic {
    pub id: u32,
    pub severity: u32,
    pub message: String,
    pub line: u32,
    pub column: u32,
    pub category: Category,
}

impl TryFrom<RawDiagnostic> for DiagnosticRecord {
    type Error = Error;

    fn try_from(raw: RawDiagnostic) -> Result<Self> {
        let severity = Severity::try_from(raw.severity)?;
        Ok(DiagnosticRecord {
            id: raw.id,
            severity,
            message: raw.message,
            line: raw.line,
            column: raw.column,
            category: raw.category,
        })
    }
}
