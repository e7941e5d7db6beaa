//! Per-record rendering policy.
//!
//! [`Renderer`] holds the fixed policy (geometry, thresholds);
//! [`EngineState`] holds everything one pass mutates. Each record kind has
//! its own handler, chosen by a single `match` on [`RecordKind`]. State is
//! updated for every record whether or not its shapes end up on screen.

use fomtrace_canvas::{Canvas, DrawingSurface, Point, Rgb, Stroke};
use fomtrace_protocol::{Record, RecordKind, Timestamp};
use fomtrace_state::{IoLanes, Task, TaskLanes, TaskRegistry, TaskState, TimeAxis};

use crate::colour::{phase_colour, state_colour, AXIS, IO_BAR, QUEUE_WAIT};
use crate::{Column, EngineError, Layout, TraceConfig, TraceSummary};

/// Param holding the task label in a `task-descr` record.
const DESCR_LABEL_PARAM: usize = 5;

/// Param holding the new state in a `task-state` record.
const STATE_PARAM: usize = 2;

/// Param holding the wait duration in a `queue-wait-duration` record.
const QUEUE_WAIT_DURATION_PARAM: usize = 0;
const QUEUE_WAIT_LABEL_PARAM: usize = 1;

/// Params of an `io-end` record.
const IO_ID_PARAM: usize = 0;
const IO_DURATION_PARAM: usize = 2;

const GRIDLINE_DASH: &str = "20,10,5,5,5,10";

/// Everything a single rendering pass owns and mutates.
pub struct EngineState<S> {
    pub axis: TimeAxis,
    pub registry: TaskRegistry,
    pub task_lanes: TaskLanes,
    pub io_lanes: IoLanes,
    pub canvas: Canvas<S>,
    io_in_flight: u64,
    counters: TraceSummary,
}

impl<S: DrawingSurface> EngineState<S> {
    pub fn new(config: &TraceConfig, surface: S) -> Result<Self, EngineError> {
        config.validate()?;
        let mut axis = TimeAxis::new(f64::from(config.height), config.visible_micros(), config.step_micros())?;
        if let Some(start) = config.start_time()? {
            axis = axis.with_start(start);
        }
        Ok(Self {
            axis,
            registry: TaskRegistry::new(),
            task_lanes: TaskLanes::new(config.localities, config.max_tasks_per_group()),
            io_lanes: IoLanes::new(config.io_lanes),
            canvas: Canvas::new(surface, f64::from(config.width), f64::from(config.height)),
            io_in_flight: 0,
            counters: TraceSummary::default(),
        })
    }

    /// I/O operations launched and not yet completed.
    pub fn io_in_flight(&self) -> u64 {
        self.io_in_flight
    }

    /// Counters so far, combined with the registry and canvas totals.
    pub fn summary(&self) -> TraceSummary {
        TraceSummary {
            tasks_created: self.registry.created(),
            tasks_finished: self.registry.finished(),
            tasks_live: self.registry.live(),
            tasks_peak_live: self.registry.peak_live(),
            address_reuses: self.registry.displaced(),
            shapes_drawn: self.canvas.drawn(),
            shapes_culled: self.canvas.culled(),
            ..self.counters.clone()
        }
    }
}

#[derive(Debug, Clone)]
pub struct Renderer {
    layout: Layout,
    localities: usize,
    queue_threshold_us: f64,
}

impl Renderer {
    pub fn new(config: &TraceConfig) -> Self {
        Self {
            layout: Layout::new(
                f64::from(config.width),
                f64::from(config.height),
                config.localities,
                config.max_tasks_per_group(),
                config.io_lanes,
            ),
            localities: config.localities,
            queue_threshold_us: config.queue_wait_threshold_us,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Locality separators and headings. Drawn once, before any record.
    pub fn draw_frame<S: DrawingSurface>(&self, state: &mut EngineState<S>) {
        let stroke = Stroke::solid(AXIS, 10.0);
        for group in 0..self.localities {
            let x = self.layout.locality_x(group);
            state
                .canvas
                .draw_line(Point::new(x, 0.0), Point::new(x, self.layout.height()), &stroke);
            state
                .canvas
                .draw_text(&format!("locality {group}"), Point::new(x + 10.0, 20.0));
        }
        state.canvas.draw_text("io", Point::new(self.layout.io_start(), 20.0));
    }

    /// Apply one completed record.
    pub fn render<S: DrawingSurface>(&self, record: &Record, state: &mut EngineState<S>) -> Result<(), EngineError> {
        if state.axis.anchor(record.time) {
            self.draw_gridlines(state);
        }
        *state.counters.records.entry(record.kind).or_insert(0) += 1;

        match record.kind {
            RecordKind::TaskDescr => self.task_descr(record, state),
            RecordKind::TaskState => self.task_state(record, state),
            RecordKind::TaskPhase => self.task_phase(record, state),
            RecordKind::QueueWait => self.queue_wait(record, state),
            RecordKind::IoLaunch => {
                self.io_launch(state);
                Ok(())
            }
            RecordKind::IoEnd => self.io_end(record, state),
        }
    }

    fn draw_gridlines<S: DrawingSurface>(&self, state: &mut EngineState<S>) {
        let stroke = Stroke::solid(AXIS, 1.0).dashed(GRIDLINE_DASH);
        let visible: Vec<_> = state
            .axis
            .gridlines()
            .into_iter()
            .filter(|line| state.axis.is_visible(line.y))
            .collect();
        for line in visible {
            let label = line.time.to_string();
            state
                .canvas
                .draw_line(Point::new(0.0, line.y), Point::new(self.layout.width(), line.y), &stroke);
            state.canvas.draw_text(&label, Point::new(0.0, line.y - 10.0));
            for group in 0..self.localities {
                let x = self.layout.locality_x(group) + 10.0;
                state.canvas.draw_text(&label, Point::new(x, line.y - 10.0));
            }
        }
    }

    // -----------------------------------------------------------------------
    // Tasks
    // -----------------------------------------------------------------------

    fn task_descr<S: DrawingSurface>(&self, record: &Record, state: &mut EngineState<S>) -> Result<(), EngineError> {
        let Some(address) = record.fom() else {
            tracing::debug!(%record, "Task description without an address");
            return Ok(());
        };
        let Some(group) = self.group_of(record, state)? else {
            tracing::debug!(%record, address, "Task description without a usable locality");
            return Ok(());
        };
        let label = record
            .param(DESCR_LABEL_PARAM)
            .or_else(|| record.last_param())
            .unwrap_or_default();

        // A reused address means the old task's end was never seen.
        if let Some(old) = state.registry.lookup(address) {
            if let Some(lane) = old.lane {
                state.task_lanes.release(old.group, lane, address);
            }
        }

        let lane = match state.task_lanes.allocate(group, address) {
            Ok(lane) => Some(lane),
            Err(e) => {
                tracing::warn!(%record, address, error = %e, "Task not drawn");
                state.counters.tasks_without_lane += 1;
                None
            }
        };
        state
            .registry
            .create(Task::new(address, label, group, record.time).with_lane(lane));

        if let Some(lane) = lane {
            let at = Point::new(
                self.layout.column_x(group, lane, Column::Label),
                state.axis.position(record.time),
            );
            state.canvas.draw_text(&format!("{label}{address}"), at);
        }
        Ok(())
    }

    fn task_phase<S: DrawingSurface>(&self, record: &Record, state: &mut EngineState<S>) -> Result<(), EngineError> {
        let (Some(address), Some(phase)) = (record.fom(), record.last_param()) else {
            tracing::debug!(%record, "Phase transition without address or phase");
            return Ok(());
        };
        let Some(task) = state.registry.lookup(address) else {
            tracing::debug!(%record, address, "Phase transition for unknown task");
            return Ok(());
        };
        let (group, lane) = (task.group, task.lane);
        let Some(change) = state.registry.phase_transition(address, phase, record.time) else {
            return Ok(());
        };
        state.counters.phase_transitions += 1;

        if let Some(lane) = lane {
            self.fill_column(state, group, lane, Column::Phase, change.since, record.time, phase_colour(&change.previous));
            let at = Point::new(
                self.layout.column_x(group, lane, Column::Label),
                state.axis.position(change.since),
            );
            state.canvas.draw_text(&change.previous, at);
        }
        Ok(())
    }

    fn task_state<S: DrawingSurface>(&self, record: &Record, state: &mut EngineState<S>) -> Result<(), EngineError> {
        let (Some(address), Some(name)) = (
            record.fom(),
            record.param(STATE_PARAM).or_else(|| record.last_param()),
        ) else {
            tracing::debug!(%record, "State transition without address or state");
            return Ok(());
        };
        let Some(task) = state.registry.lookup(address) else {
            tracing::debug!(%record, address, "State transition for unknown task");
            return Ok(());
        };
        let (group, lane) = (task.group, task.lane);
        let Some(change) = state
            .registry
            .state_transition(address, TaskState::from_name(name), record.time)
        else {
            return Ok(());
        };
        state.counters.state_transitions += 1;

        if let Some(lane) = lane {
            self.fill_column(state, group, lane, Column::State, change.since, record.time, state_colour(&change.previous));
        }

        if let Some(done) = change.finished {
            if let Some(lane) = done.lane {
                let x = self.layout.column_x(group, lane, Column::Label) - 5.0;
                let top = state.axis.position(done.created);
                let bottom = state.axis.position(record.time);
                state
                    .canvas
                    .draw_line(Point::new(x, top), Point::new(x, bottom), &Stroke::solid(AXIS, 3.0));
                let at = Point::new(self.layout.column_x(group, lane, Column::Label), top);
                state.canvas.draw_text(&done.label, at);
                state.task_lanes.release(group, lane, address);
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn fill_column<S: DrawingSurface>(
        &self,
        state: &mut EngineState<S>,
        group: usize,
        lane: usize,
        column: Column,
        from: Timestamp,
        to: Timestamp,
        fill: Rgb,
    ) {
        let top = state.axis.position(from);
        let bottom = state.axis.position(to);
        state.canvas.draw_rect(
            self.layout.column_x(group, lane, column),
            top,
            self.layout.column_width(),
            bottom - top,
            fill,
        );
    }

    // -----------------------------------------------------------------------
    // Queue waits
    // -----------------------------------------------------------------------

    fn queue_wait<S: DrawingSurface>(&self, record: &Record, state: &mut EngineState<S>) -> Result<(), EngineError> {
        // Waits without a locality come from the background queue; not drawn.
        if record.locality().is_none() {
            state.counters.queue_waits_without_locality += 1;
            return Ok(());
        }
        let Some(group) = self.group_of(record, state)? else {
            return Ok(());
        };
        let nanos = parse_duration(record, QUEUE_WAIT_DURATION_PARAM, "duration")?;
        let micros = nanos / 1000.0;
        if micros < self.queue_threshold_us {
            state.counters.queue_waits_below_threshold += 1;
            return Ok(());
        }
        let start = shift_back(record, micros, "duration")?;

        let x = self.layout.locality_x(group) + 10.0;
        let top = state.axis.position(start);
        let bottom = state.axis.position(record.time);
        state
            .canvas
            .draw_line(Point::new(x, top), Point::new(x, bottom), &Stroke::solid(QUEUE_WAIT, 5.0));
        if let Some(label) = record.param(QUEUE_WAIT_LABEL_PARAM) {
            state.canvas.draw_text(label, Point::new(x + 10.0, top));
        }
        state.counters.queue_waits_drawn += 1;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // I/O
    // -----------------------------------------------------------------------

    fn io_launch<S: DrawingSurface>(&self, state: &mut EngineState<S>) {
        state.io_in_flight += 1;
        state.counters.io_launched += 1;
        state.counters.io_peak_in_flight = state.counters.io_peak_in_flight.max(state.io_in_flight);
    }

    fn io_end<S: DrawingSurface>(&self, record: &Record, state: &mut EngineState<S>) -> Result<(), EngineError> {
        let raw_id = record.param(IO_ID_PARAM).unwrap_or_default();
        let id: u64 = strip_suffix(raw_id)
            .parse()
            .map_err(|_| malformed(record, "id", raw_id))?;
        let seconds = parse_duration(record, IO_DURATION_PARAM, "duration")?;
        let micros = seconds * 1_000_000.0;
        let launch = shift_back(record, micros, "duration")?;

        state.io_in_flight = state.io_in_flight.saturating_sub(1);
        state.counters.io_completed += 1;

        let lane = match state.io_lanes.allocate(id, launch, record.time) {
            Ok(lane) => lane,
            Err(e) => {
                tracing::warn!(%record, id, error = %e, "I/O operation dropped");
                state.counters.io_dropped += 1;
                return Ok(());
            }
        };

        let x = self.layout.io_x(lane);
        let top = state.axis.position(launch);
        let bottom = state.axis.position(record.time);
        state
            .canvas
            .draw_rect(x, top, self.layout.io_lane_width(), bottom - top, IO_BAR);
        state.canvas.draw_text(&id.to_string(), Point::new(x, top));
        state
            .canvas
            .draw_text(&format!("{id}: {:.3}ms", micros / 1000.0), Point::new(x, bottom));
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Field helpers
    // -----------------------------------------------------------------------

    /// Locality of a record; `None` when absent or out of range.
    fn group_of<S>(&self, record: &Record, state: &mut EngineState<S>) -> Result<Option<usize>, EngineError> {
        let Some(raw) = record.locality() else {
            return Ok(None);
        };
        let group: usize = raw.parse().map_err(|_| malformed(record, "locality", raw))?;
        if self.localities == 1 {
            return Ok(Some(0));
        }
        if group >= self.localities {
            tracing::warn!(%record, group, localities = self.localities, "Locality out of range");
            state.counters.locality_out_of_range += 1;
            return Ok(None);
        }
        Ok(Some(group))
    }
}

/// Drop the one-character unit or separator the runtime appends to numbers.
fn strip_suffix(raw: &str) -> &str {
    let mut chars = raw.chars();
    chars.next_back();
    chars.as_str()
}

/// Non-negative number from param `idx` with its suffix removed.
fn parse_duration(record: &Record, idx: usize, field: &'static str) -> Result<f64, EngineError> {
    let raw = record.param(idx).unwrap_or_default();
    match strip_suffix(raw).parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(malformed(record, field, raw)),
    }
}

/// The record's time minus `micros`.
fn shift_back(record: &Record, micros: f64, field: &'static str) -> Result<Timestamp, EngineError> {
    let micros = micros.round();
    if micros > i64::MAX as f64 {
        return Err(malformed(record, field, &micros.to_string()));
    }
    record
        .time
        .checked_sub_micros(micros as i64)
        .ok_or_else(|| malformed(record, field, &micros.to_string()))
}

fn malformed(record: &Record, field: &'static str, value: &str) -> EngineError {
    EngineError::MalformedField {
        line: record.line,
        tag: record.tag.clone(),
        field,
        value: value.to_string(),
    }
}
