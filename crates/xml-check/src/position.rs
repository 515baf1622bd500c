//! Byte offset to line/column conversion.

/// Index of line starts in a document, for O(log n) position lookups.
///
/// Lines and columns are 1-based; columns count characters, not bytes.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    source: &'a str,
    /// Byte offsets of each newline character
    line_breaks: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let line_breaks = source
            .char_indices()
            .filter_map(|(idx, ch)| if ch == '\n' { Some(idx) } else { None })
            .collect();

        Self {
            source,
            line_breaks,
        }
    }

    /// Convert a byte offset to a 1-based `(line, column)` pair.
    ///
    /// Offsets past the end of the source are clamped to the end. An offset
    /// that falls inside a multi-byte character counts that character.
    pub fn position(&self, offset: usize) -> (u32, u32) {
        let offset = offset.min(self.source.len());

        // A newline belongs to the line it terminates
        let row = match self.line_breaks.binary_search(&offset) {
            Ok(idx) | Err(idx) => idx,
        };

        let line_start = if row == 0 {
            0
        } else {
            self.line_breaks[row - 1] + 1
        };

        let column = match self.source.get(line_start..offset) {
            Some(prefix) => prefix.chars().count(),
            None => String::from_utf8_lossy(&self.source.as_bytes()[line_start..offset])
                .chars()
                .count(),
        };

        (to_u32(row + 1), to_u32(column + 1))
    }

    /// Position just past the last character.
    pub fn end(&self) -> (u32, u32) {
        self.position(self.source.len())
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
