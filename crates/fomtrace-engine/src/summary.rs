use std::collections::BTreeMap;

use fomtrace_protocol::RecordKind;
use serde::Serialize;

/// Totals for one rendering run, printed by `fomtrace --summary`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TraceSummary {
    pub lines: usize,
    /// Records rendered, by kind.
    pub records: BTreeMap<RecordKind, u64>,
    pub filtered_headers: u64,

    pub tasks_created: u64,
    pub tasks_finished: u64,
    /// `tasks_created - tasks_finished - address_reuses`: a reused address
    /// displaces the live task it names.
    pub tasks_live: usize,
    pub tasks_peak_live: usize,
    /// Tasks tracked without a lane because their locality was full.
    pub tasks_without_lane: u64,
    pub address_reuses: u64,
    /// Records naming a locality past the configured count.
    pub locality_out_of_range: u64,
    pub phase_transitions: u64,
    pub state_transitions: u64,

    pub queue_waits_drawn: u64,
    pub queue_waits_below_threshold: u64,
    pub queue_waits_without_locality: u64,

    pub io_launched: u64,
    pub io_completed: u64,
    pub io_dropped: u64,
    pub io_peak_in_flight: u64,

    pub shapes_drawn: u64,
    pub shapes_culled: u64,
}

impl TraceSummary {
    pub fn records_of(&self, kind: RecordKind) -> u64 {
        self.records.get(&kind).copied().unwrap_or(0)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
