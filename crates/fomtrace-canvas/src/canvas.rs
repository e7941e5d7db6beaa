//! Culling and label placement on top of a [`DrawingSurface`].
//!
//! Labels are placed greedily: each one takes the first free row of a
//! coarse grid at or below where it was asked to go, and earlier
//! placements are never revisited. The layout therefore depends on call
//! order, and callers draw in trace order to keep it reproducible.

use std::collections::HashSet;

use crate::{CanvasError, DrawingSurface, Point, Rgb, Stroke};

/// Default width of a label grid cell, px.
pub const TEXT_CELL_WIDTH: f64 = 60.0;

/// Default height of a label row, px. Displaced labels move down by this much.
pub const TEXT_ROW_HEIGHT: f64 = 12.0;

const CONNECTOR: Rgb = Rgb::percent(60, 60, 60);

pub struct Canvas<S> {
    surface: S,
    width: f64,
    height: f64,
    cell_width: f64,
    row_height: f64,
    occupied: HashSet<(i64, i64)>,
    drawn: u64,
    culled: u64,
}

impl<S: DrawingSurface> Canvas<S> {
    pub fn new(surface: S, width: f64, height: f64) -> Self {
        Self {
            surface,
            width,
            height,
            cell_width: TEXT_CELL_WIDTH,
            row_height: TEXT_ROW_HEIGHT,
            occupied: HashSet::new(),
            drawn: 0,
            culled: 0,
        }
    }

    /// Override the label grid. Non-positive sizes keep the defaults.
    pub fn with_text_grid(mut self, cell_width: f64, row_height: f64) -> Self {
        if cell_width > 0.0 {
            self.cell_width = cell_width;
        }
        if row_height > 0.0 {
            self.row_height = row_height;
        }
        self
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Primitives handed to the surface.
    pub fn drawn(&self) -> u64 {
        self.drawn
    }

    /// Primitives dropped for lying entirely above or below the image.
    pub fn culled(&self) -> u64 {
        self.culled
    }

    /// Draw a rectangle. A negative height is flipped.
    pub fn draw_rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: Rgb) {
        let (top, height) = if height < 0.0 { (y + height, -height) } else { (y, height) };
        if self.outside(top, top + height) {
            self.culled += 1;
            return;
        }
        self.drawn += 1;
        self.surface.rectangle(x, top, width, height, fill);
    }

    pub fn draw_line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        if self.outside(from.y.min(to.y), from.y.max(to.y)) {
            self.culled += 1;
            return;
        }
        self.drawn += 1;
        self.surface.line(from, to, stroke);
    }

    /// Place a label at `at` or, if that grid cell is taken, at the first
    /// free row below it, joined to `at` by a thin connector.
    ///
    /// Returns where the label ended up. Off-image labels still claim
    /// their cell.
    pub fn draw_text(&mut self, content: &str, at: Point) -> Point {
        if !(at.x.is_finite() && at.y.is_finite()) {
            self.culled += 1;
            return at;
        }
        // Step whole rows so huge coordinates cannot stall on float rounding.
        let (col, first_row) = self.cell(at);
        let mut row = first_row;
        while self.occupied.contains(&(col, row)) {
            match row.checked_add(1) {
                Some(next) => row = next,
                None => {
                    self.culled += 1;
                    return at;
                }
            }
        }
        self.occupied.insert((col, row));
        let placed = Point::new(
            at.x,
            at.y + row.saturating_sub(first_row) as f64 * self.row_height,
        );

        if self.outside(placed.y, placed.y) {
            self.culled += 1;
        } else {
            self.drawn += 1;
            self.surface.text(content, placed);
        }
        if placed != at {
            self.draw_line(at, placed, &Stroke::solid(CONNECTOR, 0.5));
        }
        placed
    }

    /// Save the surface and hand it back.
    pub fn finish(mut self) -> Result<S, CanvasError> {
        self.surface.save()?;
        Ok(self.surface)
    }

    fn cell(&self, p: Point) -> (i64, i64) {
        (
            (p.x / self.cell_width).floor() as i64,
            (p.y / self.row_height).floor() as i64,
        )
    }

    /// Whether `[top, bottom]` misses the image rows `0..height` entirely.
    fn outside(&self, top: f64, bottom: f64) -> bool {
        bottom < 0.0 || top >= self.height
    }
}
