//! Horizontal geometry of the timeline image.
//!
//! ```text
//! | margin | locality 0 | locality 1 | ... | margin | io column |
//! ```
//!
//! Each locality holds `max_tasks` task lanes side by side; each task lane
//! is split into [`COLUMNS`] narrow columns (label, spare, phase, state).
//! The io column holds `io_lanes` thin bars.

/// Sub-columns per task lane.
pub const COLUMNS: usize = 4;

/// A sub-column within a task lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// Task and phase labels, plus the lifetime marker just left of it.
    Label,
    Phase,
    State,
}

impl Column {
    pub fn index(&self) -> usize {
        match self {
            Self::Label => 0,
            Self::Phase => 2,
            Self::State => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    width: f64,
    height: f64,
    margin: f64,
    loc_width: f64,
    loc_margin: f64,
    lane_width: f64,
    column_margin: f64,
    column_width: f64,
    io_start: f64,
    io_lane_width: f64,
}

impl Layout {
    pub fn new(width: f64, height: f64, localities: usize, max_tasks: usize, io_lanes: usize) -> Self {
        let margin = width * 0.01;
        let io_width = width * 0.05;
        let loc_width = (width - 2.0 * margin - io_width) / localities.max(1) as f64;
        let loc_margin = loc_width * 0.02;
        let lane_width = (loc_width - 2.0 * loc_margin) / max_tasks.max(1) as f64;
        let column_margin = lane_width * 0.10;
        let column_width = (lane_width - 2.0 * column_margin) / COLUMNS as f64;
        Self {
            width,
            height,
            margin,
            loc_width,
            loc_margin,
            lane_width,
            column_margin,
            column_width,
            io_start: width - io_width,
            io_lane_width: io_width / io_lanes.max(1) as f64,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Left edge of a locality stripe.
    pub fn locality_x(&self, group: usize) -> f64 {
        self.margin + self.loc_width * group as f64
    }

    /// Left edge of `column` in task lane `lane` of locality `group`.
    pub fn column_x(&self, group: usize, lane: usize, column: Column) -> f64 {
        self.locality_x(group)
            + self.loc_margin
            + self.lane_width * lane as f64
            + self.column_margin
            + self.column_width * column.index() as f64
    }

    pub fn column_width(&self) -> f64 {
        self.column_width
    }

    /// Left edge of the io column.
    pub fn io_start(&self) -> f64 {
        self.io_start
    }

    pub fn io_x(&self, lane: usize) -> f64 {
        self.io_start + self.io_lane_width * lane as f64
    }

    pub fn io_lane_width(&self) -> f64 {
        self.io_lane_width
    }
}
