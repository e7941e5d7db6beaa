use std::fmt;

/// A point in image pixels; y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Colour as red/green/blue percentages (0..=100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::percent(0, 0, 0);

    /// Components above 100 are clamped.
    pub const fn percent(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: if r > 100 { 100 } else { r },
            g: if g > 100 { 100 } else { g },
            b: if b > 100 { 100 } else { b },
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}%,{}%,{}%)", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub colour: Rgb,
    pub width: f64,
    /// SVG dash pattern, e.g. `"20,10,5,5,5,10"`.
    pub dash: Option<String>,
}

impl Stroke {
    pub fn solid(colour: Rgb, width: f64) -> Self {
        Self { colour, width, dash: None }
    }

    pub fn dashed(mut self, pattern: &str) -> Self {
        self.dash = Some(pattern.to_string());
        self
    }
}

/// One primitive handed to a surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Rgb,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Text {
        content: String,
        at: Point,
    },
}
