use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The synthetic group ftrace events that are always enabled in the kernel
/// belong to. Never written to procfs.
pub const SYNTHETIC_GROUP: &str = "ftrace";

/// Identifies one kernel ftrace event. Equality and ordering are
/// lexicographic on `(group, name)`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct GroupAndName {
    pub group: String,
    pub name: String,
}

impl GroupAndName {
    pub fn new<G: Into<String>, N: Into<String>>(group: G, name: N) -> GroupAndName {
        GroupAndName {
            group: group.into(),
            name: name.into(),
        }
    }

    /// An event specifier with no known group, resolved later by name.
    pub fn unqualified<N: Into<String>>(name: N) -> GroupAndName {
        GroupAndName::new("", name)
    }

    pub fn is_synthetic(&self) -> bool {
        self.group == SYNTHETIC_GROUP
    }
}

/// A concrete ftrace event as owned by the translation table. The muxer
/// treats this as opaque beyond its identity and numeric id.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub group_and_name: GroupAndName,
    pub ftrace_event_id: u32,
}

impl Event {
    pub fn new(group: &str, name: &str, ftrace_event_id: u32) -> Event {
        Event {
            group_and_name: GroupAndName::new(group, name),
            ftrace_event_id,
        }
    }

    pub fn group(&self) -> &str {
        &self.group_and_name.group
    }

    pub fn name(&self) -> &str {
        &self.group_and_name.name
    }

    pub fn is_synthetic(&self) -> bool {
        self.group_and_name.is_synthetic()
    }
}

/// A set of numeric event ids. Kept as a sorted set rather than a per-event
/// refcount: the muxer recomputes the union from all live configs on every
/// Remove instead of tracking references (see design notes).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct EventFilter {
    ids: BTreeSet<u32>,
}

impl EventFilter {
    pub fn new() -> EventFilter {
        EventFilter::default()
    }

    pub fn add(&mut self, id: u32) {
        self.ids.insert(id);
    }

    pub fn disable(&mut self, id: u32) {
        self.ids.remove(&id);
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    pub fn union_from(&mut self, other: &EventFilter) {
        self.ids.extend(other.ids.iter().copied());
    }

    pub fn enumerate(&self) -> impl Iterator<Item = u32> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl std::iter::FromIterator<u32> for EventFilter {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        EventFilter {
            ids: iter.into_iter().collect(),
        }
    }
}
