//! Record assembly: groups detail lines under the header that opened them.
//!
//! State machine:
//! - `Idle`: nothing open yet; stray detail lines are dropped
//! - `Open`: a recognised record is accumulating details
//! - `Filtered`: the last header was filtered; its details are dropped
//!
//! A new header or the end of input closes the open record and hands it
//! back to the caller. Once handed back a record is never touched again.

use crate::{EventDecoder, Line, ProtocolError, Record};

#[derive(Debug)]
enum Current {
    Idle,
    Open(Record),
    Filtered,
}

/// Turns a stream of lines into completed [`Record`]s.
#[derive(Debug)]
pub struct RecordAssembler {
    decoder: EventDecoder,
    current: Current,
    line_no: usize,
    filtered: u64,
}

impl RecordAssembler {
    pub fn new(decoder: EventDecoder) -> Self {
        Self {
            decoder,
            current: Current::Idle,
            line_no: 0,
            filtered: 0,
        }
    }

    /// Feed the next input line.
    ///
    /// Returns the record closed by this line, if any: only a header can
    /// close one.
    pub fn push(&mut self, raw: &str) -> Result<Option<Record>, ProtocolError> {
        self.line_no += 1;
        match self.decoder.decode(self.line_no, raw)? {
            Line::Header(next) => {
                let next = match next {
                    Some(record) => Current::Open(record),
                    None => {
                        self.filtered += 1;
                        Current::Filtered
                    }
                };
                Ok(self.close_with(next))
            }
            Line::Detail { key, values } => {
                self.merge_detail(key, values);
                Ok(None)
            }
        }
    }

    /// Signal end of input, returning the still-open record if any.
    pub fn finish(&mut self) -> Option<Record> {
        self.close_with(Current::Idle)
    }

    /// Lines consumed so far.
    pub fn lines_seen(&self) -> usize {
        self.line_no
    }

    /// Headers dropped because their tag is not recognised.
    pub fn filtered(&self) -> u64 {
        self.filtered
    }

    /// Whether a recognised record is currently accumulating details.
    pub fn is_open(&self) -> bool {
        matches!(self.current, Current::Open(_))
    }

    fn close_with(&mut self, next: Current) -> Option<Record> {
        match std::mem::replace(&mut self.current, next) {
            Current::Open(record) => Some(record),
            Current::Idle | Current::Filtered => None,
        }
    }

    fn merge_detail(&mut self, key: String, values: Vec<String>) {
        match &mut self.current {
            Current::Open(record) => {
                if let Some(old) = record.insert_detail(&key, values) {
                    tracing::warn!(
                        line = self.line_no,
                        record = %record,
                        key = %key,
                        replaced = ?old,
                        "Duplicate detail key, keeping the last value"
                    );
                }
            }
            Current::Filtered => {}
            Current::Idle => {
                tracing::debug!(line = self.line_no, key = %key, "Detail line before any header");
            }
        }
    }
}

impl Default for RecordAssembler {
    fn default() -> Self {
        Self::new(EventDecoder::default())
    }
}
