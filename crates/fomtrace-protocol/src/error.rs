use thiserror::Error;

/// Errors raised while decoding trace lines.
///
/// All of them are fatal: the dump is assumed well-formed and the decoder
/// never tries to resynchronise on garbage.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("line {line}: expected '*' or '|' as first character, got {content:?}")]
    Violation { line: usize, content: String },

    #[error("line {line}: malformed header: {reason}")]
    MalformedHeader { line: usize, reason: String },

    #[error("line {line}: detail line without a key")]
    MalformedDetail { line: usize },

    #[error("invalid timestamp '{value}': {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}
