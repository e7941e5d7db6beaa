//! fomtrace engine - renders a FOM execution trace as a timeline image
//!
//! The [`TraceDriver`] feeds input lines through the record assembler and
//! hands every completed record to the [`Renderer`], which updates the
//! per-pass [`EngineState`] and paints the matching shapes.

pub mod colour;
pub mod config;
pub mod driver;
pub mod error;
pub mod layout;
pub mod render;
pub mod summary;

pub use config::{ConfigError, TraceConfig};
pub use driver::{render_trace, TraceDriver};
pub use error::EngineError;
pub use layout::{Column, Layout};
pub use render::{EngineState, Renderer};
pub use summary::TraceSummary;
