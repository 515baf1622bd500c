//! Options controlling a check pass.

/// Default limit on records appended by one pass.
pub const DEFAULT_MAX_ERRORS: usize = 100;

/// Options for [`check_str`](crate::check_str) and [`check_file`](crate::check_file).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    /// Report a missing XML declaration (1001) or encoding (1002).
    pub check_declaration: bool,

    /// Stop a pass after this many records. `None` means no limit.
    pub max_errors: Option<usize>,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            check_declaration: true,
            max_errors: Some(DEFAULT_MAX_ERRORS),
        }
    }
}

impl CheckOptions {
    pub fn without_declaration_check(mut self) -> Self {
        self.check_declaration = false;
        self
    }

    /// Set the record limit; `0` removes it.
    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = if max_errors == 0 { None } else { Some(max_errors) };
        self
    }
}
