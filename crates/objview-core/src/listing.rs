//! Parsing of `objdump -d -l` output into displayable rows.
//!
//! Lines of the form `path/to/file.c:42` (optionally followed by
//! ` (discriminator N)`) are location markers. They are not shown; every
//! row after a marker is attributed to that source location until the next
//! marker appears.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A source file position a disassembly row was generated from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One displayable line of the listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub text: String,
    /// Location in effect when this row was emitted
    pub location: Option<SourceLocation>,
}

/// Parsed objdump listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    rows: Vec<Row>,
}

fn location_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\S.+):([0-9]+)( \(discriminator [0-9]+\))?$")
            .expect("location pattern is a valid regex")
    })
}

/// Try to read a line as a location marker
fn parse_location(line: &str) -> Option<SourceLocation> {
    let caps = location_pattern().captures(line)?;
    let line_no = caps[2].parse::<u32>().ok()?;
    Some(SourceLocation {
        file: caps[1].to_string(),
        line: line_no,
    })
}

impl Listing {
    /// Parse raw objdump text
    pub fn parse(text: &str) -> Self {
        let text = text.replace('\r', "");
        let mut rows = Vec::new();
        let mut location: Option<SourceLocation> = None;

        for line in text.split('\n') {
            if let Some(marker) = parse_location(line) {
                location = Some(marker);
                continue;
            }
            rows.push(Row {
                text: line.to_string(),
                location: location.clone(),
            });
        }

        tracing::debug!(
            "Parsed listing: {} rows, {} with locations",
            rows.len(),
            rows.iter().filter(|r| r.location.is_some()).count()
        );

        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Location attributed to a row, if any
    pub fn location(&self, index: usize) -> Option<&SourceLocation> {
        self.rows.get(index).and_then(|r| r.location.as_ref())
    }

    /// Iterate over `(row index, location)` for rows that have one
    pub fn locations(&self) -> impl Iterator<Item = (usize, &SourceLocation)> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.location.as_ref().map(|loc| (i, loc)))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
