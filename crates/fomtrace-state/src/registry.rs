//! Registry of live tasks (FOMs), keyed by the address the runtime gave them.
//!
//! The runtime reuses addresses once a FOM is freed, so a second
//! `create` for a live address displaces the old entry instead of failing.

use std::collections::HashMap;
use std::fmt;

use fomtrace_protocol::{Timestamp, TERMINAL_STATE};

/// Scheduling state of a task.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskState {
    Init,
    Ready,
    Running,
    Waiting,
    Finished,
    Other(String),
}

impl TaskState {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Init" => Self::Init,
            "Ready" => Self::Ready,
            "Running" => Self::Running,
            "Waiting" => Self::Waiting,
            TERMINAL_STATE => Self::Finished,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Init => "Init",
            Self::Ready => "Ready",
            Self::Running => "Running",
            Self::Waiting => "Waiting",
            Self::Finished => TERMINAL_STATE,
            Self::Other(name) => name,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase a task is in before its first phase transition.
pub const INITIAL_PHASE: &str = "init";

/// A live task and the times of its last transitions.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub address: String,
    /// Human label from the creating record (usually the FOM type).
    pub label: String,
    /// Locality index. Fixed for the task's life.
    pub group: usize,
    /// Lane within the locality; `None` when the locality was full.
    pub lane: Option<usize>,
    pub created: Timestamp,
    pub phase: String,
    pub phase_since: Timestamp,
    pub state: TaskState,
    pub state_since: Timestamp,
}

impl Task {
    /// A freshly created task: `Ready`, in the initial phase.
    pub fn new(address: &str, label: &str, group: usize, created: Timestamp) -> Self {
        Self {
            address: address.to_string(),
            label: label.to_string(),
            group,
            lane: None,
            created,
            phase: INITIAL_PHASE.to_string(),
            phase_since: created,
            state: TaskState::Ready,
            state_since: created,
        }
    }

    pub fn with_lane(mut self, lane: Option<usize>) -> Self {
        self.lane = lane;
        self
    }
}

/// What a phase transition replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseChange {
    pub previous: String,
    pub since: Timestamp,
}

/// What a state transition replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct StateChange {
    pub previous: TaskState,
    pub since: Timestamp,
    /// The task, removed from the registry, when the new state is terminal.
    pub finished: Option<Task>,
}

#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: HashMap<String, Task>,
    created: u64,
    finished: u64,
    displaced: u64,
    peak_live: usize,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `task`. Returns the entry it displaced if its address was
    /// still live.
    pub fn create(&mut self, task: Task) -> Option<Task> {
        self.created += 1;
        let displaced = self.tasks.insert(task.address.clone(), task);
        if let Some(old) = &displaced {
            self.displaced += 1;
            tracing::warn!(
                address = %old.address,
                created = %old.created,
                "Address reused while task still live, treating as a new task"
            );
        }
        self.peak_live = self.peak_live.max(self.tasks.len());
        displaced
    }

    /// Move a live task to `phase`. No-op for unknown addresses.
    pub fn phase_transition(&mut self, address: &str, phase: &str, time: Timestamp) -> Option<PhaseChange> {
        let task = self.tasks.get_mut(address)?;
        let previous = std::mem::replace(&mut task.phase, phase.to_string());
        let since = std::mem::replace(&mut task.phase_since, time);
        Some(PhaseChange { previous, since })
    }

    /// Move a live task to `state`. No-op for unknown addresses.
    ///
    /// A terminal state removes the task; it comes back in
    /// [`StateChange::finished`] so the caller can free its lane.
    pub fn state_transition(&mut self, address: &str, state: TaskState, time: Timestamp) -> Option<StateChange> {
        let task = self.tasks.get_mut(address)?;
        let terminal = state.is_terminal();
        let previous = std::mem::replace(&mut task.state, state);
        let since = std::mem::replace(&mut task.state_since, time);
        let finished = if terminal {
            self.finished += 1;
            self.tasks.remove(address)
        } else {
            None
        };
        Some(StateChange { previous, since, finished })
    }

    pub fn lookup(&self, address: &str) -> Option<&Task> {
        self.tasks.get(address)
    }

    /// Always `created() - finished() - displaced()`.
    pub fn live(&self) -> usize {
        self.tasks.len()
    }

    pub fn peak_live(&self) -> usize {
        self.peak_live
    }

    pub fn created(&self) -> u64 {
        self.created
    }

    pub fn finished(&self) -> u64 {
        self.finished
    }

    /// Tasks dropped because their address was reused before they finished.
    pub fn displaced(&self) -> u64 {
        self.displaced
    }

    /// Live tasks in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }
}
