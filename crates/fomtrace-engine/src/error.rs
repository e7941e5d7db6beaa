use fomtrace_canvas::CanvasError;
use fomtrace_protocol::ProtocolError;
use fomtrace_state::StateError;
use thiserror::Error;

use crate::ConfigError;

/// Fatal errors of a rendering run.
///
/// Capacity problems never show up here: they are logged and the affected
/// shape is skipped.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("line {line}: {tag} field '{field}' is malformed: {value:?}")]
    MalformedField {
        line: usize,
        tag: String,
        field: &'static str,
        value: String,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Canvas(#[from] CanvasError),

    #[error("line {line}: failed to read trace input: {source}")]
    Input {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: not valid UTF-8: {source}")]
    Encoding {
        line: usize,
        #[source]
        source: std::str::Utf8Error,
    },
}
