//! fomtrace protocol - trace line decoding and record assembly
//!
//! Turns the line-oriented dump of a FOM runtime's event log into typed
//! [`Record`]s: a `*` header line opens a record, the `|` detail lines
//! that follow it fill in its key/value map.

pub mod assembler;
pub mod constants;
pub mod decoder;
pub mod error;
pub mod timestamp;
pub mod types;

pub use assembler::RecordAssembler;
pub use constants::*;
pub use decoder::{EventDecoder, Line};
pub use error::*;
pub use timestamp::Timestamp;
pub use types::*;
