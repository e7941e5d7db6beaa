//! fomtrace canvas - the drawing surface the timeline is painted on
//!
//! [`DrawingSurface`] is the narrow primitive API (rectangle, line, text,
//! save); [`SvgSurface`] writes SVG, [`RecordingSurface`] keeps shapes in
//! memory. [`Canvas`] sits on top of either and adds vertical culling and
//! greedy label placement.

pub mod canvas;
pub mod error;
pub mod shape;
pub mod surface;
pub mod svg;

pub use canvas::{Canvas, TEXT_CELL_WIDTH, TEXT_ROW_HEIGHT};
pub use error::*;
pub use shape::{Point, Rgb, Shape, Stroke};
pub use surface::{DrawingSurface, RecordingSurface};
pub use svg::SvgSurface;
