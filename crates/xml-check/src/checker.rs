//! Well-formedness pass that reports problems into an [`ErrorLog`].

use crate::position::LineIndex;
use crate::{CheckOptions, Result};
use quick_xml::Reader;
use quick_xml::escape::{EscapeError, resolve_predefined_entity};
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use std::collections::HashSet;
use std::io;
use std::path::Path;
use tracing::{debug, trace};
use xml_error_log::{Category, DiagnosticRecord, ErrorLog, Severity};

const UNKNOWN_ERROR: u32 = xml_error_log::catalog::UNKNOWN_ERROR;
const FILE_UNREADABLE: u32 = 2;
const MISSING_XML_DECL: u32 = 1001;
const MISSING_XML_ENCODING: u32 = 1002;
const INVALID_CHAR_IN_XML: u32 = 1005;
const BADLY_FORMED_XML: u32 = 1006;
const UNCLOSED_XML_TOKEN: u32 = 1007;
const XML_TAG_MISMATCH: u32 = 1009;
const DUPLICATE_XML_ATTRIBUTE: u32 = 1010;
const UNDEFINED_XML_ENTITY: u32 = 1011;
const BAD_UTF8_CONTENT: u32 = 1017;
const BAD_XML_ATTRIBUTE: u32 = 1020;
const BAD_XML_DECL_LOCATION: u32 = 1023;
const XML_UNEXPECTED_EOF: u32 = 1024;
const BAD_XML_DOCUMENT_STRUCTURE: u32 = 1028;
const INVALID_AFTER_XML_CONTENT: u32 = 1029;
const XML_CONTENT_EMPTY: u32 = 1035;

/// Summary of one pass, beyond the records it appended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Records appended, not counting the truncation notice.
    pub recorded: usize,

    /// The record limit was reached and the pass stopped early.
    pub truncated: bool,

    /// A fatal problem ended the pass before the end of the input.
    pub stopped: bool,
}

/// Check one XML document, appending a record per problem in document order.
///
/// Records already in `log` are kept; call [`ErrorLog::clear`] first to start
/// a fresh pass.
///
/// # Example
///
/// ```rust
/// use xml_check::{check_str, CheckOptions};
/// use xml_error_log::{ErrorLog, Severity};
///
/// let mut log = ErrorLog::new();
/// check_str("<model><species/></model>", &CheckOptions::default(), &mut log).unwrap();
///
/// // Only the missing declaration warning
/// assert_eq!(log.size(), 1);
/// assert_eq!(log.error_count(Severity::Error), 0);
/// ```
///
/// # Errors
///
/// Problems in the document are records, not errors. An error is returned
/// only if the log itself rejects a record.
pub fn check_str(content: &str, options: &CheckOptions, log: &mut ErrorLog) -> Result<CheckOutcome> {
    let mut checker = Checker::new(content, options.clone(), log);
    checker.run()?;
    Ok(checker.outcome)
}

/// Read and check a file.
///
/// A file that cannot be read becomes a `XMLFileUnreadable` (2) record, or
/// `XMLBadUTF8Content` (1017) if it is not valid UTF-8.
pub fn check_file(path: &Path, options: &CheckOptions, log: &mut ErrorLog) -> Result<CheckOutcome> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            debug!(path = %path.display(), "checking file");
            check_str(&content, options, log)
        }
        Err(err) => {
            debug!(path = %path.display(), error = %err, "could not read input");
            let code = if err.kind() == io::ErrorKind::InvalidData {
                BAD_UTF8_CONTENT
            } else {
                FILE_UNREADABLE
            };
            let detail = format!("{}: {}", path.display(), err);
            log.add(DiagnosticRecord::from_code(code, 0, 0, &detail))?;
            Ok(CheckOutcome {
                recorded: 1,
                truncated: false,
                stopped: true,
            })
        }
    }
}

/// An element whose end tag has not been seen yet.
struct OpenElement {
    name: String,
    /// Byte offset of the `<` of its start tag.
    offset: usize,
}

/// Internal pass state.
struct Checker<'a, 'l> {
    /// The source content being checked.
    source: &'a str,

    /// The quick-xml reader.
    reader: Reader<&'a [u8]>,

    lines: LineIndex<'a>,

    options: CheckOptions,

    log: &'l mut ErrorLog,

    /// Elements opened but not yet closed, innermost last.
    stack: Vec<OpenElement>,

    seen_decl: bool,

    /// General entities declared in the DOCTYPE internal subset.
    entities: HashSet<String>,

    /// A root element has started.
    root_seen: bool,

    outcome: CheckOutcome,
}

impl<'a, 'l> Checker<'a, 'l> {
    fn new(source: &'a str, options: CheckOptions, log: &'l mut ErrorLog) -> Self {
        let mut reader = Reader::from_str(source);
        // End tags are matched here so a mismatch is a record, not the end of the pass
        reader.config_mut().check_end_names = false;
        reader.config_mut().allow_unmatched_ends = true;
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;

        Self {
            source,
            reader,
            lines: LineIndex::new(source),
            options,
            log,
            stack: Vec::new(),
            seen_decl: false,
            entities: HashSet::new(),
            root_seen: false,
            outcome: CheckOutcome::default(),
        }
    }

    fn run(&mut self) -> Result<()> {
        debug!(bytes = self.source.len(), "starting well-formedness pass");
        let bom_len = if self.source.starts_with('\u{feff}') {
            '\u{feff}'.len_utf8()
        } else {
            0
        };

        loop {
            let event_start = self.reader.buffer_position() as usize;

            match self.reader.read_event() {
                Ok(Event::Decl(decl)) => self.handle_decl(&decl, event_start, bom_len)?,
                Ok(Event::Start(e)) => self.handle_start(&e, event_start, true)?,
                Ok(Event::Empty(e)) => self.handle_start(&e, event_start, false)?,
                Ok(Event::End(e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    self.handle_end(name, event_start)?;
                }
                Ok(Event::Text(e)) => self.handle_text(&e, event_start)?,
                Ok(Event::DocType(e)) => {
                    let declared = declared_entities(&String::from_utf8_lossy(&e));
                    debug!(count = declared.len(), "entities declared in DOCTYPE");
                    self.entities.extend(declared);
                }
                Ok(Event::CData(_)) => {
                    if self.stack.is_empty() {
                        self.report_outside_root(event_start, "CDATA section")?;
                    }
                }
                Ok(Event::Eof) => {
                    self.handle_eof()?;
                    break;
                }
                Ok(_) => {
                    // Comments and processing instructions are not checked
                }
                Err(e) => {
                    let offset = self.reader.error_position() as usize;
                    self.report(BADLY_FORMED_XML, offset, &e.to_string())?;
                    self.outcome.stopped = true;
                    break;
                }
            }

            if self.outcome.truncated {
                break;
            }
        }

        debug!(
            recorded = self.outcome.recorded,
            truncated = self.outcome.truncated,
            stopped = self.outcome.stopped,
            "finished well-formedness pass"
        );
        Ok(())
    }

    fn handle_decl(&mut self, decl: &BytesDecl<'_>, event_start: usize, bom_len: usize) -> Result<()> {
        if event_start > bom_len || self.seen_decl {
            self.report(BAD_XML_DECL_LOCATION, event_start, "")?;
        }
        self.seen_decl = true;

        if self.options.check_declaration && decl.encoding().is_none() {
            self.report(MISSING_XML_ENCODING, event_start, "")?;
        }
        Ok(())
    }

    fn handle_start(&mut self, e: &BytesStart<'_>, event_start: usize, opens: bool) -> Result<()> {
        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();

        if !self.root_seen {
            if self.options.check_declaration && !self.seen_decl {
                self.report(MISSING_XML_DECL, 0, "")?;
            }
            self.root_seen = true;
        } else if self.stack.is_empty() {
            self.report(
                BAD_XML_DOCUMENT_STRUCTURE,
                event_start,
                &format!("second root element <{}>", name),
            )?;
        }

        self.check_attributes(e, event_start)?;

        if opens {
            self.stack.push(OpenElement {
                name,
                offset: event_start,
            });
        }
        Ok(())
    }

    fn check_attributes(&mut self, e: &BytesStart<'_>, event_start: usize) -> Result<()> {
        for attr in e.attributes() {
            if let Err(err) = attr {
                let code = if matches!(err, AttrError::Duplicated(..)) {
                    DUPLICATE_XML_ATTRIBUTE
                } else {
                    BAD_XML_ATTRIBUTE
                };
                // Positions in AttrError are relative to the byte after '<'
                let offset = event_start + 1 + attr_error_position(&err);
                self.report(code, offset, &attr_error_detail(&err, e))?;
                // The iterator state is unreliable after a malformed attribute
                break;
            }
        }
        Ok(())
    }

    fn handle_end(&mut self, name: String, event_start: usize) -> Result<()> {
        match self.stack.pop() {
            None => self.report(
                XML_TAG_MISMATCH,
                event_start,
                &format!("unexpected closing tag </{}>", name),
            ),
            Some(open) if open.name != name => self.report(
                XML_TAG_MISMATCH,
                event_start,
                &format!("expected </{}>, found </{}>", open.name, name),
            ),
            Some(_) => Ok(()),
        }
    }

    fn handle_text(&mut self, e: &BytesText<'_>, event_start: usize) -> Result<()> {
        let leading = e
            .iter()
            .take_while(|b| b.is_ascii_whitespace())
            .count();

        let raw = String::from_utf8_lossy(e);
        let is_blank = raw.trim_start_matches('\u{feff}').trim().is_empty();
        if self.stack.is_empty() && !is_blank {
            self.report_outside_root(event_start + leading, "text")?;
        }

        let entities = &self.entities;
        let unescaped = e.unescape_with(|name| {
            resolve_predefined_entity(name).or_else(|| entities.contains(name).then_some(""))
        });
        if let Err(quick_xml::Error::Escape(err)) = unescaped {
            let (code, detail) = match err {
                EscapeError::UnrecognizedEntity(_, name) => {
                    (UNDEFINED_XML_ENTITY, format!("&{};", name))
                }
                EscapeError::UnterminatedEntity(_) => (
                    UNCLOSED_XML_TOKEN,
                    "entity reference is missing `;`".to_string(),
                ),
                EscapeError::InvalidCharRef(reason) => (INVALID_CHAR_IN_XML, reason.to_string()),
            };
            self.report(code, event_start + leading, &detail)?;
        }
        Ok(())
    }

    fn report_outside_root(&mut self, offset: usize, what: &str) -> Result<()> {
        if self.root_seen {
            self.report(INVALID_AFTER_XML_CONTENT, offset, "")
        } else {
            self.report(
                BAD_XML_DOCUMENT_STRUCTURE,
                offset,
                &format!("{} before root element", what),
            )
        }
    }

    fn handle_eof(&mut self) -> Result<()> {
        let innermost = self
            .stack
            .last()
            .map(|open| (open.name.clone(), open.offset));

        if let Some((name, offset)) = innermost {
            self.report(
                XML_UNEXPECTED_EOF,
                offset,
                &format!("expected closing tag </{}>", name),
            )?;
        }

        if !self.root_seen {
            self.report(XML_CONTENT_EMPTY, self.source.len(), "")?;
        }
        Ok(())
    }

    /// Append a catalog record at a byte offset, honoring the record limit.
    fn report(&mut self, code: u32, offset: usize, detail: &str) -> Result<()> {
        if self.outcome.truncated {
            return Ok(());
        }

        if let Some(max) = self.options.max_errors {
            if self.outcome.recorded >= max {
                debug!(max, "diagnostic limit reached");
                let notice = DiagnosticRecord::new(
                    UNKNOWN_ERROR,
                    Severity::Info,
                    format!("Too many diagnostics; stopped after {}", max),
                )
                .with_category(Category::Internal);
                self.log.add(notice)?;
                self.outcome.truncated = true;
                return Ok(());
            }
        }

        let (line, column) = self.lines.position(offset);
        let record = DiagnosticRecord::from_code(code, line, column, detail);
        trace!(code, line, column, severity = %record.severity(), "recorded diagnostic");
        self.log.add(record)?;
        self.outcome.recorded += 1;
        Ok(())
    }
}

fn attr_error_position(err: &AttrError) -> usize {
    match *err {
        AttrError::ExpectedEq(pos)
        | AttrError::ExpectedValue(pos)
        | AttrError::UnquotedValue(pos)
        | AttrError::ExpectedQuote(pos, _)
        | AttrError::Duplicated(pos, _) => pos,
    }
}

/// Message detail for a malformed attribute, naming the attribute where the
/// error carries its position.
fn attr_error_detail(err: &AttrError, tag: &BytesStart<'_>) -> String {
    let name_at = |pos: usize| {
        let rest = tag.get(pos..).unwrap_or_default();
        let end = rest
            .iter()
            .position(|b| *b == b'=' || b.is_ascii_whitespace())
            .unwrap_or(rest.len());
        String::from_utf8_lossy(&rest[..end]).into_owned()
    };

    match *err {
        AttrError::ExpectedEq(_) => "attribute name must be followed by `=`".to_string(),
        AttrError::ExpectedValue(_) => "attribute has no value".to_string(),
        AttrError::UnquotedValue(_) => "attribute value must be quoted".to_string(),
        AttrError::ExpectedQuote(_, quote) => {
            format!("missing closing {} in attribute value", quote as char)
        }
        AttrError::Duplicated(pos, _) => format!("attribute `{}` repeated", name_at(pos)),
    }
}

/// Names of the general entities declared by `<!ENTITY` in a DOCTYPE body.
///
/// Parameter entities (`<!ENTITY % name ...>`) are skipped since they cannot
/// be referenced from content.
fn declared_entities(doctype: &str) -> Vec<String> {
    doctype
        .split("<!ENTITY")
        .skip(1)
        .filter_map(|decl| {
            let decl = decl.trim_start();
            if decl.starts_with('%') {
                return None;
            }
            let name: String = decl
                .chars()
                .take_while(|c| !c.is_whitespace() && *c != '"' && *c != '\'')
                .collect();
            (!name.is_empty()).then_some(name)
        })
        .collect()
}
