use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Timestamp, DETAIL_FOM, DETAIL_LOCALITY};

// ---------------------------------------------------------------------------
// Record kinds and the tag dispatch table
// ---------------------------------------------------------------------------

/// The kinds of record the renderer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordKind {
    /// A task (FOM) was created.
    TaskDescr,
    /// A task changed scheduling state.
    TaskState,
    /// A task moved to another phase of its state machine.
    TaskPhase,
    /// A locality reported how long a task sat in its run queue.
    QueueWait,
    /// An I/O operation was launched.
    IoLaunch,
    /// An I/O operation completed.
    IoEnd,
}

impl RecordKind {
    pub const ALL: [RecordKind; 6] = [
        RecordKind::TaskDescr,
        RecordKind::TaskState,
        RecordKind::TaskPhase,
        RecordKind::QueueWait,
        RecordKind::IoLaunch,
        RecordKind::IoEnd,
    ];

    /// Canonical tag for this kind.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::TaskDescr => "task-descr",
            Self::TaskState => "task-state",
            Self::TaskPhase => "task-phase",
            Self::QueueWait => "queue-wait-duration",
            Self::IoLaunch => "io-launch",
            Self::IoEnd => "io-end",
        }
    }

    /// Tag the runtime itself prints for this kind.
    pub fn runtime_tag(&self) -> &'static str {
        match self {
            Self::TaskDescr => "fom-descr",
            Self::TaskState => "fom-state",
            Self::TaskPhase => "fom-phase",
            Self::QueueWait => "loc-forq-duration",
            Self::IoLaunch => "stob-io-launch",
            Self::IoEnd => "stob-io-end",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Maps header tags to record kinds. Built once, consulted for every header.
///
/// Tags absent from the table are filtered out silently.
#[derive(Debug, Clone, Default)]
pub struct TagTable {
    tags: HashMap<String, RecordKind>,
}

impl TagTable {
    /// An empty table: every header is filtered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical tags plus the runtime's own spellings.
    pub fn standard() -> Self {
        let mut table = Self::new();
        for kind in RecordKind::ALL {
            table.register(kind.tag(), kind);
            table.register(kind.runtime_tag(), kind);
        }
        table
    }

    /// Route `tag` to `kind`, replacing any earlier mapping.
    pub fn register(&mut self, tag: &str, kind: RecordKind) {
        self.tags.insert(tag.to_string(), kind);
    }

    pub fn lookup(&self, tag: &str) -> Option<RecordKind> {
        self.tags.get(tag).copied()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One logical event: a header line plus the detail lines that followed it.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// 1-based input line of the header.
    pub line: usize,
    pub time: Timestamp,
    pub kind: RecordKind,
    /// Tag exactly as it appeared in the input.
    pub tag: String,
    pub params: Vec<String>,
    details: BTreeMap<String, Vec<String>>,
}

impl Record {
    pub fn new(
        line: usize,
        time: Timestamp,
        kind: RecordKind,
        tag: impl Into<String>,
        params: Vec<String>,
    ) -> Self {
        Self {
            line,
            time,
            kind,
            tag: tag.into(),
            params,
            details: BTreeMap::new(),
        }
    }

    /// Builder form of [`Record::insert_detail`].
    pub fn with_detail(mut self, key: &str, values: &[&str]) -> Self {
        self.insert_detail(key, values.iter().map(|v| v.to_string()).collect());
        self
    }

    /// Store a detail, returning the values it replaced.
    pub fn insert_detail(&mut self, key: &str, values: Vec<String>) -> Option<Vec<String>> {
        self.details.insert(key.to_string(), values)
    }

    /// First value of a detail.
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn param(&self, idx: usize) -> Option<&str> {
        self.params.get(idx).map(String::as_str)
    }

    pub fn last_param(&self) -> Option<&str> {
        self.params.last().map(String::as_str)
    }

    /// Address of the task this record is about.
    pub fn fom(&self) -> Option<&str> {
        self.detail(DETAIL_FOM)
    }

    /// Raw locality detail, unparsed.
    pub fn locality(&self) -> Option<&str> {
        self.detail(DETAIL_LOCALITY)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (line {})", self.time, self.tag, self.line)
    }
}
