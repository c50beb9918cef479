use crate::event::EventFilter;
use crate::translation_table::CompactSchedFormat;
use serde::{Deserialize, Serialize};

/// Monotonically increasing, non-zero. Zero signals Setup failure.
pub type ConfigId = u64;

/// External input: what a tracing client asks the muxer for. The union of
/// kernel events, atrace categories/apps, and sizing/format hints.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FtraceConfig {
    /// Each entry is either `group/name`, `group/*`, or a bare `name`.
    pub events: Vec<String>,
    pub atrace_categories: Vec<String>,
    pub atrace_apps: Vec<String>,
    /// Requested per-CPU buffer size in KiB. Zero means "use the default".
    pub buffer_size_kb: usize,
    pub symbolize_ksyms: bool,
    pub compact_sched_hints: CompactSchedHints,
}

/// Opaque pass-through hints for the compact-sched encoder factory.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CompactSchedHints {
    pub enabled: bool,
}

impl FtraceConfig {
    /// An atrace invocation is only needed if the request names at least
    /// one category or app.
    pub fn requires_atrace(&self) -> bool {
        !self.atrace_categories.is_empty() || !self.atrace_apps.is_empty()
    }
}

/// Per-config record: created by Setup, destroyed by Remove, immutable
/// after creation.
#[derive(Clone, Debug)]
pub struct FtraceDataSourceConfig {
    pub event_filter: EventFilter,
    pub compact_sched_config: CompactSchedFormat,
    pub atrace_apps: Vec<String>,
    pub atrace_categories: Vec<String>,
    pub symbolize_ksyms: bool,
}
