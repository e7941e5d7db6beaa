//! Lane allocation.
//!
//! Two independent pools, both first-fit by lowest free index:
//! - [`TaskLanes`]: one fixed-size pool per locality, a lane is held from
//!   task creation until its terminal state
//! - [`IoLanes`]: one global pool; a lane may only be reused by an interval
//!   that starts strictly after the previous occupant ended, since I/O
//!   completions arrive out of launch order

use fomtrace_protocol::Timestamp;

use crate::StateError;

// ---------------------------------------------------------------------------
// Task lanes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TaskLanes {
    capacity: usize,
    /// groups[g][lane] = address of the task holding the lane
    groups: Vec<Vec<Option<String>>>,
}

impl TaskLanes {
    pub fn new(groups: usize, capacity: usize) -> Self {
        Self {
            capacity,
            groups: vec![vec![None; capacity]; groups],
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn groups(&self) -> usize {
        self.groups.len()
    }

    /// Give `address` the lowest free lane in `group`.
    pub fn allocate(&mut self, group: usize, address: &str) -> Result<usize, StateError> {
        let groups = self.groups.len();
        let capacity = self.capacity;
        let lanes = self
            .groups
            .get_mut(group)
            .ok_or(StateError::UnknownGroup { group, groups })?;
        let lane = lanes
            .iter()
            .position(Option::is_none)
            .ok_or(StateError::CapacityExceeded { group, capacity })?;
        lanes[lane] = Some(address.to_string());
        Ok(lane)
    }

    /// Free `lane` in `group` if `address` holds it.
    ///
    /// Returns `false` and leaves the lane alone when someone else (or
    /// nobody) holds it.
    pub fn release(&mut self, group: usize, lane: usize, address: &str) -> bool {
        let Some(slot) = self.groups.get_mut(group).and_then(|g| g.get_mut(lane)) else {
            return false;
        };
        if slot.as_deref() != Some(address) {
            tracing::warn!(
                group,
                lane,
                address,
                holder = ?slot,
                "Lane release by a task that does not hold it"
            );
            return false;
        }
        *slot = None;
        true
    }

    pub fn occupant(&self, group: usize, lane: usize) -> Option<&str> {
        self.groups.get(group)?.get(lane)?.as_deref()
    }

    /// Number of lanes taken in `group`.
    pub fn occupied(&self, group: usize) -> usize {
        self.groups
            .get(group)
            .map_or(0, |lanes| lanes.iter().filter(|l| l.is_some()).count())
    }
}

// ---------------------------------------------------------------------------
// I/O lanes
// ---------------------------------------------------------------------------

/// The interval most recently placed in an I/O lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoInterval {
    pub id: u64,
    pub start: Timestamp,
    pub end: Timestamp,
}

#[derive(Debug, Clone)]
pub struct IoLanes {
    lanes: Vec<Option<IoInterval>>,
}

impl IoLanes {
    pub fn new(capacity: usize) -> Self {
        Self { lanes: vec![None; capacity] }
    }

    pub fn capacity(&self) -> usize {
        self.lanes.len()
    }

    /// Place operation `id` spanning `[start, end]` in the lowest lane whose
    /// last occupant ended strictly before `start`.
    ///
    /// Every interval placed in a lane starts after the previous one ended,
    /// so checking the latest occupant is enough to rule out overlap.
    pub fn allocate(&mut self, id: u64, start: Timestamp, end: Timestamp) -> Result<usize, StateError> {
        let lane = self
            .lanes
            .iter()
            .position(|slot| slot.map_or(true, |prev| prev.end < start))
            .ok_or(StateError::IoLanesExhausted { capacity: self.lanes.len() })?;
        self.lanes[lane] = Some(IoInterval { id, start, end });
        Ok(lane)
    }

    pub fn occupant(&self, lane: usize) -> Option<&IoInterval> {
        self.lanes.get(lane)?.as_ref()
    }
}
