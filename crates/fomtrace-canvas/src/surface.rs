use crate::{CanvasError, Point, Rgb, Shape, Stroke};

/// Primitive drawing API the timeline is rendered through.
///
/// Implementations draw what they are told; culling and label placement
/// happen in [`crate::Canvas`].
pub trait DrawingSurface {
    fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64, fill: Rgb);

    fn line(&mut self, from: Point, to: Point, stroke: &Stroke);

    fn text(&mut self, content: &str, at: Point);

    /// Persist whatever was drawn.
    fn save(&mut self) -> Result<(), CanvasError>;
}

/// Keeps every shape in memory. Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub shapes: Vec<Shape>,
    pub saved: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rects(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(|s| matches!(s, Shape::Rect { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(|s| matches!(s, Shape::Line { .. }))
    }

    /// Text content in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Text { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DrawingSurface for RecordingSurface {
    fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64, fill: Rgb) {
        self.shapes.push(Shape::Rect { x, y, width, height, fill });
    }

    fn line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        self.shapes.push(Shape::Line { from, to, stroke: stroke.clone() });
    }

    fn text(&mut self, content: &str, at: Point) {
        self.shapes.push(Shape::Text { content: content.to_string(), at });
    }

    fn save(&mut self) -> Result<(), CanvasError> {
        self.saved = true;
        Ok(())
    }
}
