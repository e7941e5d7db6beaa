//! Single-line decoding.
//!
//! A header line is `* <timestamp> <tag> <param>...`, a detail line is
//! `| <key> <value>...`. Anything else is a protocol violation.

use crate::{ProtocolError, Record, TagTable, Timestamp, DETAIL_SIGIL, HEADER_SIGIL};

/// A decoded input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    /// A header. `None` when its tag is not in the dispatch table.
    Header(Option<Record>),
    /// A detail for whatever record is currently open.
    Detail { key: String, values: Vec<String> },
}

/// Stateless line decoder backed by a [`TagTable`].
#[derive(Debug, Clone)]
pub struct EventDecoder {
    tags: TagTable,
}

impl EventDecoder {
    pub fn new(tags: TagTable) -> Self {
        Self { tags }
    }

    pub fn tags(&self) -> &TagTable {
        &self.tags
    }

    /// Decode one line. `line_no` is 1-based and only used for diagnostics.
    pub fn decode(&self, line_no: usize, raw: &str) -> Result<Line, ProtocolError> {
        let raw = raw.trim_end_matches(['\r', '\n']);
        let mut chars = raw.chars();
        match chars.next() {
            Some(HEADER_SIGIL) => self.decode_header(line_no, chars.as_str()),
            Some(DETAIL_SIGIL) => decode_detail(line_no, chars.as_str()),
            _ => Err(ProtocolError::Violation {
                line: line_no,
                content: raw.to_string(),
            }),
        }
    }

    fn decode_header(&self, line_no: usize, rest: &str) -> Result<Line, ProtocolError> {
        let mut words = rest.split_whitespace();
        let stamp = words.next().ok_or_else(|| ProtocolError::MalformedHeader {
            line: line_no,
            reason: "missing timestamp".into(),
        })?;
        let tag = words.next().ok_or_else(|| ProtocolError::MalformedHeader {
            line: line_no,
            reason: "missing tag".into(),
        })?;

        // Filtered tags are not parsed any further, their timestamps included.
        let Some(kind) = self.tags.lookup(tag) else {
            tracing::trace!(line = line_no, tag, "Filtered header");
            return Ok(Line::Header(None));
        };

        let time = Timestamp::parse(stamp).map_err(|e| ProtocolError::MalformedHeader {
            line: line_no,
            reason: e.to_string(),
        })?;
        let params = words.map(str::to_string).collect();
        Ok(Line::Header(Some(Record::new(line_no, time, kind, tag, params))))
    }
}

impl Default for EventDecoder {
    fn default() -> Self {
        Self::new(TagTable::standard())
    }
}

fn decode_detail(line_no: usize, rest: &str) -> Result<Line, ProtocolError> {
    let mut words = rest.split_whitespace();
    let key = words
        .next()
        .ok_or(ProtocolError::MalformedDetail { line: line_no })?;
    Ok(Line::Detail {
        key: key.to_string(),
        values: words.map(str::to_string).collect(),
    })
}
