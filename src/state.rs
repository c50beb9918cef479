use crate::event::EventFilter;
use crate::procfs::FtraceClock;
use serde::Serialize;

/// Process-local singleton state: what the muxer has actually told the
/// kernel and atrace, as distinct from what any one config requested (an
/// enable can fail; the invariant is "exactly what is on").
#[derive(Clone, Debug)]
pub struct GlobalState {
    pub ftrace_events: EventFilter,
    pub atrace_on: bool,
    pub atrace_apps: Vec<String>,
    pub atrace_categories: Vec<String>,
    pub cpu_buffer_size_pages: usize,
    pub ftrace_clock: FtraceClock,
}

impl Default for GlobalState {
    fn default() -> GlobalState {
        GlobalState {
            ftrace_events: EventFilter::new(),
            atrace_on: false,
            atrace_apps: Vec::new(),
            atrace_categories: Vec::new(),
            cpu_buffer_size_pages: 1,
            ftrace_clock: FtraceClock::Unspecified,
        }
    }
}

/// A JSON-serializable snapshot of `GlobalState`, for diagnostics/logging
/// (the muxer doesn't serialize `GlobalState` itself since `EventFilter`'s
/// internal representation isn't meant to be part of any wire contract).
#[derive(Serialize)]
pub struct GlobalStateSnapshot {
    pub ftrace_clock: FtraceClock,
    pub cpu_buffer_size_pages: usize,
    pub atrace_on: bool,
    pub atrace_apps: Vec<String>,
    pub atrace_categories: Vec<String>,
    pub enabled_event_ids: Vec<u32>,
}

impl GlobalState {
    pub fn snapshot(&self) -> GlobalStateSnapshot {
        GlobalStateSnapshot {
            ftrace_clock: self.ftrace_clock,
            cpu_buffer_size_pages: self.cpu_buffer_size_pages,
            atrace_on: self.atrace_on,
            atrace_apps: self.atrace_apps.clone(),
            atrace_categories: self.atrace_categories.clone(),
            enabled_event_ids: self.ftrace_events.enumerate().collect(),
        }
    }
}
