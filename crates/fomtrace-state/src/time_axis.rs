//! Time to vertical pixel mapping.
//!
//! Time runs top to bottom. The visible window starts at `start` and spans
//! `visible_us` microseconds over `height` pixels. Positions outside the
//! window are still computed; callers cull.

use fomtrace_protocol::Timestamp;

use crate::StateError;

/// A horizontal gridline: the instant it marks and where it lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gridline {
    pub time: Timestamp,
    pub y: f64,
}

#[derive(Debug, Clone)]
pub struct TimeAxis {
    start: Option<Timestamp>,
    anchored: bool,
    height: f64,
    visible_us: i64,
    step_us: i64,
}

impl TimeAxis {
    /// Create an axis `height` pixels tall showing `visible_us` microseconds,
    /// with a gridline every `step_us` microseconds.
    pub fn new(height: f64, visible_us: i64, step_us: i64) -> Result<Self, StateError> {
        if !(height.is_finite() && height > 0.0) {
            return Err(StateError::InvalidAxis(format!("height must be positive, got {height}")));
        }
        if visible_us <= 0 {
            return Err(StateError::InvalidAxis(format!(
                "visible duration must be positive, got {visible_us}us"
            )));
        }
        if step_us <= 0 {
            return Err(StateError::InvalidAxis(format!(
                "gridline step must be positive, got {step_us}us"
            )));
        }
        Ok(Self {
            start: None,
            anchored: false,
            height,
            visible_us,
            step_us,
        })
    }

    /// Pin the window start instead of taking it from the first record.
    pub fn with_start(mut self, start: Timestamp) -> Self {
        self.start = Some(start);
        self
    }

    /// Called with every record's time before it is drawn.
    ///
    /// The first call seeds the start (unless one was configured) and
    /// returns `true` so the caller can lay out gridlines once. Later calls
    /// return `false` and change nothing.
    pub fn anchor(&mut self, first: Timestamp) -> bool {
        if self.anchored {
            return false;
        }
        self.start.get_or_insert(first);
        self.anchored = true;
        true
    }

    pub fn start(&self) -> Option<Timestamp> {
        self.start
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn visible_micros(&self) -> i64 {
        self.visible_us
    }

    /// Vertical pixel for `time`. Unclamped; an axis without a start maps
    /// everything to the top edge.
    pub fn position(&self, time: Timestamp) -> f64 {
        match self.start {
            Some(start) => self.height * time.micros_since(start) as f64 / self.visible_us as f64,
            None => 0.0,
        }
    }

    /// Whether `y` falls inside the image.
    pub fn is_visible(&self, y: f64) -> bool {
        (0.0..self.height).contains(&y)
    }

    /// Gridlines from the start through the end of the window, inclusive.
    pub fn gridlines(&self) -> Vec<Gridline> {
        let Some(start) = self.start else {
            return Vec::new();
        };
        let mut lines = Vec::new();
        let mut offset = 0i64;
        while offset <= self.visible_us {
            if let Some(time) = start.checked_add_micros(offset) {
                lines.push(Gridline { time, y: self.position(time) });
            }
            offset = match offset.checked_add(self.step_us) {
                Some(next) => next,
                None => break,
            };
        }
        lines
    }
}
