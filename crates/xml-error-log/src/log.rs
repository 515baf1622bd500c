//! The error log itself.

use crate::diagnostic::{DiagnosticRecord, RawDiagnostic, Severity};
use crate::error::{Error, Result};
use std::fmt;

/// Ordered collection of diagnostics from one parsing or validation pass.
///
/// The log is append-only until [`clear`](ErrorLog::clear) resets it.
/// Insertion order is the document traversal order of the producer and is
/// preserved by every operation. Per-severity counters are kept up to date
/// on every mutation, so the count queries are O(1).
///
/// Mutation needs `&mut self`. Wrap the log in a `Mutex` if several threads
/// must append to it.
///
/// # Example
///
/// ```
/// use xml_error_log::{DiagnosticRecord, ErrorLog, Severity};
///
/// let mut log = ErrorLog::new();
/// log.add(DiagnosticRecord::new(1001, Severity::Warning, "Missing XML declaration")).unwrap();
/// log.add(DiagnosticRecord::new(1009, Severity::Error, "XML tag mismatch").at(4, 3)).unwrap();
///
/// assert_eq!(log.size(), 2);
/// assert_eq!(log.error_count(Severity::Error), 1);
/// assert_eq!(log.get(1).unwrap().line(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorLog {
    records: Vec<DiagnosticRecord>,
    counts: [usize; 4],
}

impl ErrorLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            counts: [0; 4],
        }
    }

    /// Append a record to the end of the log.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if storage for the record cannot be
    /// allocated. The log is unchanged in that case.
    pub fn add(&mut self, record: DiagnosticRecord) -> Result<()> {
        self.records.try_reserve(1).map_err(|_| Error::OutOfMemory)?;
        self.counts[record.severity().index()] += 1;
        self.records.push(record);
        Ok(())
    }

    /// Append a record delivered with a numeric severity code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the severity code is not one of
    /// the four levels; nothing is appended.
    pub fn add_raw(&mut self, raw: RawDiagnostic) -> Result<()> {
        let record = DiagnosticRecord::try_from(raw)?;
        self.add(record)
    }

    /// Append several records in order, stopping at the first failure.
    ///
    /// Records appended before a failure stay in the log.
    pub fn extend_from<I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = DiagnosticRecord>,
    {
        for record in records {
            self.add(record)?;
        }
        Ok(())
    }

    /// Total number of records.
    pub fn size(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records whose severity is at least `min_severity`.
    pub fn error_count(&self, min_severity: Severity) -> usize {
        self.counts[min_severity.index()..].iter().sum()
    }

    /// Number of records at [`Severity::Error`] or above.
    pub fn error_count_default(&self) -> usize {
        self.error_count(Severity::Error)
    }

    /// Whether the pass that filled this log found the document invalid.
    pub fn has_errors(&self) -> bool {
        self.error_count_default() > 0
    }

    /// Number of records with exactly the given severity.
    pub fn count_with_severity(&self, severity: Severity) -> usize {
        self.counts[severity.index()]
    }

    /// Read-only view of the record at a 0-based index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] when `index` is negative or not less
    /// than [`size`](ErrorLog::size).
    pub fn get(&self, index: i64) -> Result<&DiagnosticRecord> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.records.get(i))
            .ok_or(Error::OutOfRange {
                index,
                size: self.records.len(),
            })
    }

    /// Whether any record carries the given error code.
    pub fn contains(&self, id: u32) -> bool {
        self.records.iter().any(|record| record.id() == id)
    }

    /// Iterate over the records in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, DiagnosticRecord> {
        self.records.iter()
    }

    /// Remove every record and reset the counters.
    pub fn clear(&mut self) {
        self.records.clear();
        self.counts = [0; 4];
    }

    /// Snapshot copy of all records in insertion order.
    pub fn to_list(&self) -> Vec<DiagnosticRecord> {
        self.records.clone()
    }

    /// Text report: one line per record, in insertion order.
    pub fn report(&self) -> String {
        self.to_string()
    }

    /// Render the log as a JSON value.
    ///
    /// ```
    /// use xml_error_log::{DiagnosticRecord, ErrorLog, Severity};
    ///
    /// let mut log = ErrorLog::new();
    /// log.add(DiagnosticRecord::new(1035, Severity::Error, "XML content is empty")).unwrap();
    ///
    /// let json = log.to_json();
    /// assert_eq!(json["records"][0]["id"], 1035);
    /// assert_eq!(json["summary"]["error"], 1);
    /// assert_eq!(json["valid"], false);
    /// ```
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;

        let records: Vec<_> = self.records.iter().map(|r| r.to_json()).collect();

        let mut summary = serde_json::Map::new();
        for level in Severity::ALL {
            summary.insert(
                level.as_str().to_lowercase(),
                json!(self.count_with_severity(level)),
            );
        }

        json!({
            "records": records,
            "summary": summary,
            "valid": !self.has_errors(),
        })
    }
}

impl fmt::Display for ErrorLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in &self.records {
            writeln!(f, "{}", record)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ErrorLog {
    type Item = &'a DiagnosticRecord;
    type IntoIter = std::slice::Iter<'a, DiagnosticRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
