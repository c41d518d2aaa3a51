// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fast entity scanner using SIMD-accelerated byte searching
//!
//! Splits a STEP file into `;`-terminated statements without tokenizing
//! them, locates the DATA section, and reads the HEADER records.

use crate::tokenizer::parse_record;
use ifc_checker_model::{AttributeValue, Error, ModelMetadata, Result};
use memchr::{memchr, memchr3, memmem};

const MAGIC: &str = "ISO-10303-21;";

/// A data section record located by the scanner, not yet tokenized
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawEntity<'a> {
    /// Instance number
    pub id: u32,
    /// Type keyword as spelled in the file
    pub type_name: &'a str,
    /// Full record text, `#id=...;`
    pub text: &'a str,
}

/// Iterator over `;`-terminated statements
///
/// Semicolons inside strings and `/* */` comments do not end a statement.
struct Statements<'a> {
    content: &'a str,
    pos: usize,
}

impl<'a> Statements<'a> {
    fn new(content: &'a str, pos: usize) -> Self {
        Self { content, pos }
    }

    /// Skip whitespace and comments
    fn skip_trivia(&mut self) {
        let bytes = self.content.as_bytes();
        loop {
            while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if bytes[self.pos..].starts_with(b"/*") {
                self.pos = match memmem::find(&bytes[self.pos + 2..], b"*/") {
                    Some(offset) => self.pos + 2 + offset + 2,
                    None => bytes.len(),
                };
                continue;
            }
            return;
        }
    }

    /// Find the end of the statement starting at `pos` (one past its `;`)
    fn statement_end(&self) -> Option<usize> {
        let bytes = self.content.as_bytes();
        let mut pos = self.pos;
        let mut in_string = false;

        while pos < bytes.len() {
            let offset = if in_string {
                memchr(b'\'', &bytes[pos..])?
            } else {
                memchr3(b'\'', b';', b'/', &bytes[pos..])?
            };
            pos += offset;

            match bytes[pos] {
                b'\'' => {
                    // Escaped quote ''
                    if in_string && bytes.get(pos + 1) == Some(&b'\'') {
                        pos += 2;
                        continue;
                    }
                    in_string = !in_string;
                    pos += 1;
                }
                b';' => return Some(pos + 1),
                _ => {
                    if bytes.get(pos + 1) == Some(&b'*') {
                        pos += 2 + memmem::find(&bytes[pos + 2..], b"*/")? + 2;
                    } else {
                        pos += 1;
                    }
                }
            }
        }

        None
    }
}

impl<'a> Iterator for Statements<'a> {
    type Item = Result<&'a str>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_trivia();
        if self.pos >= self.content.len() {
            return None;
        }

        match self.statement_end() {
            Some(end) => {
                let statement = &self.content[self.pos..end];
                self.pos = end;
                Some(Ok(statement))
            }
            None => {
                let excerpt: String = self.content[self.pos..].chars().take(40).collect();
                self.pos = self.content.len();
                Some(Err(Error::format(format!(
                    "unterminated record near '{}'",
                    excerpt
                ))))
            }
        }
    }
}

/// Check whether `statement` is the keyword `name` followed by `;` or `(`
fn is_keyword(statement: &str, name: &str) -> bool {
    statement
        .strip_prefix(name)
        .map(|rest| {
            let rest = rest.trim_start();
            rest.starts_with(';') || rest.starts_with('(')
        })
        .unwrap_or(false)
}

/// Offset just past the `ISO-10303-21;` line
fn body_start(content: &str) -> Result<usize> {
    let trimmed = content.trim_start_matches('\u{feff}').trim_start();
    if !trimmed.starts_with(MAGIC) {
        return Err(Error::format("missing ISO-10303-21 header line"));
    }
    Ok(content.len() - trimmed.len() + MAGIC.len())
}

/// Locate the first byte after the `DATA;` statement
pub fn data_section_start(content: &str) -> Result<usize> {
    let mut statements = Statements::new(content, body_start(content)?);
    while let Some(statement) = statements.next() {
        if is_keyword(statement?, "DATA") {
            return Ok(statements.pos);
        }
    }
    Err(Error::format("missing DATA section"))
}

/// Fast entity scanner for the DATA section
///
/// Reads only the instance number and type keyword of each record; the
/// attribute list is left to the tokenizer.
pub struct EntityScanner<'a> {
    statements: Statements<'a>,
    done: bool,
}

impl<'a> EntityScanner<'a> {
    /// Create a scanner positioned at the start of the DATA section
    pub fn new(content: &'a str) -> Result<Self> {
        let pos = data_section_start(content)?;
        Ok(Self {
            statements: Statements::new(content, pos),
            done: false,
        })
    }

    /// Split `#id = TYPE(...)` into its instance number and type keyword
    fn split_record(statement: &'a str) -> Result<RawEntity<'a>> {
        let bytes = statement.as_bytes();
        let malformed = || {
            let excerpt: String = statement.chars().take(40).collect();
            Error::format(format!("malformed record '{}'", excerpt))
        };

        if bytes.first() != Some(&b'#') {
            return Err(malformed());
        }

        let mut pos = 1;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        let id: u32 = statement[1..pos].parse().map_err(|_| malformed())?;

        // Skip whitespace and =
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if bytes.get(pos) != Some(&b'=') {
            return Err(malformed());
        }
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }

        // Parse type name
        let type_start = pos;
        while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_') {
            pos += 1;
        }
        if pos == type_start {
            return Err(malformed());
        }

        Ok(RawEntity {
            id,
            type_name: &statement[type_start..pos],
            text: statement,
        })
    }
}

impl<'a> Iterator for EntityScanner<'a> {
    type Item = Result<RawEntity<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let statement = match self.statements.next() {
            Some(Ok(statement)) => statement,
            Some(Err(e)) => {
                self.done = true;
                return Some(Err(e));
            }
            None => {
                log::debug!("DATA section is not closed by ENDSEC");
                self.done = true;
                return None;
            }
        };

        if is_keyword(statement, "ENDSEC") {
            self.done = true;
            return None;
        }

        let raw = Self::split_record(statement);
        if raw.is_err() {
            self.done = true;
        }
        Some(raw)
    }
}

/// Parse the header section to extract metadata
///
/// Header records that cannot be tokenized are ignored; a missing
/// FILE_SCHEMA leaves the schema version empty.
pub fn parse_header(content: &str) -> ModelMetadata {
    let mut info = ModelMetadata::default();
    let Ok(start) = body_start(content) else {
        return info;
    };

    let mut in_header = false;
    for statement in Statements::new(content, start) {
        let Ok(statement) = statement else {
            break;
        };
        if is_keyword(statement, "HEADER") {
            in_header = true;
            continue;
        }
        if is_keyword(statement, "ENDSEC") || is_keyword(statement, "DATA") {
            break;
        }
        if !in_header {
            continue;
        }

        let Some((name, params)) = parse_record(statement) else {
            log::debug!("skipping unreadable header record");
            continue;
        };

        match name.as_str() {
            "FILE_DESCRIPTION" => {
                info.file_description = params.first().and_then(first_string);
            }
            "FILE_NAME" => {
                // FILE_NAME(name, time_stamp, (author), (organization),
                //           preprocessor_version, originating_system, authorization)
                let text = |i: usize| params.get(i).and_then(first_string);
                info.file_name = text(0);
                info.timestamp = text(1);
                info.author = text(2);
                info.organization = text(3);
                info.preprocessor_version = text(4);
                info.originating_system = text(5);
            }
            "FILE_SCHEMA" => {
                if let Some(schema) = params.first().and_then(first_string) {
                    info.schema_version = schema;
                }
            }
            _ => {}
        }
    }

    info
}

/// First non-empty string of a header parameter (a string or a list of them)
fn first_string(value: &AttributeValue) -> Option<String> {
    match value {
        AttributeValue::String(s) if !s.is_empty() => Some(s.clone()),
        AttributeValue::List(items) => items.iter().find_map(first_string),
        _ => None,
    }
}
