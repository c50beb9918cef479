use crate::event::{Event, GroupAndName};
use std::collections::HashMap;

/// Opaque pass-through configuration for the compact-sched encoder. The
/// muxer never inspects this; it only plumbs it through to the caller.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CompactSchedFormat {
    pub enabled: bool,
}

/// Name/id lookup and group enumeration over the kernel's event catalog.
/// Owned and populated by whatever embeds the muxer; the muxer treats it as
/// an opaque provider (see external interfaces).
pub trait TranslationTable {
    /// Name-only lookup. May be ambiguous across groups; implementations
    /// return any match or none. Does not create new entries.
    fn get_event_by_name(&self, name: &str) -> Option<Event>;

    fn get_event_by_id(&self, id: u32) -> Option<Event>;

    fn get_events_by_group(&self, group: &str) -> Option<Vec<Event>>;

    /// Allows generic passthrough when the caller supplied a `group/name`
    /// the table didn't already know about.
    fn get_or_create_event(&mut self, group_and_name: &GroupAndName) -> Option<Event>;

    fn compact_sched_format(&self) -> CompactSchedFormat;
}

/// A simple in-memory translation table seeded from a static list of
/// `(group, name)` pairs, each assigned a numeric id in insertion order.
/// Sufficient for tests and for small deployments that don't embed a
/// generated kernel-ABI table.
pub struct InMemoryTranslationTable {
    by_id: HashMap<u32, Event>,
    by_name: HashMap<String, Vec<u32>>,
    by_group: HashMap<String, Vec<u32>>,
    next_id: u32,
    compact_sched: CompactSchedFormat,
}

impl InMemoryTranslationTable {
    pub fn new() -> InMemoryTranslationTable {
        InMemoryTranslationTable {
            by_id: HashMap::new(),
            by_name: HashMap::new(),
            by_group: HashMap::new(),
            next_id: 1,
            compact_sched: CompactSchedFormat::default(),
        }
    }

    /// Builds a table pre-populated with `(group, name)` pairs, as a host
    /// would do from a generated kernel-ABI listing.
    pub fn from_pairs<I>(pairs: I) -> InMemoryTranslationTable
    where
        I: IntoIterator<Item = (&'static str, &'static str)>,
    {
        let mut table = InMemoryTranslationTable::new();
        for (group, name) in pairs {
            table.insert(group, name);
        }
        table
    }

    pub fn insert(&mut self, group: &str, name: &str) -> Event {
        if let Some(existing) = self.find(group, name) {
            return existing;
        }
        let id = self.next_id;
        self.next_id += 1;
        let event = Event::new(group, name, id);
        self.by_id.insert(id, event.clone());
        self.by_name
            .entry(name.to_string())
            .or_insert_with(Vec::new)
            .push(id);
        self.by_group
            .entry(group.to_string())
            .or_insert_with(Vec::new)
            .push(id);
        event
    }

    fn find(&self, group: &str, name: &str) -> Option<Event> {
        self.by_group.get(group).and_then(|ids| {
            ids.iter()
                .map(|id| &self.by_id[id])
                .find(|e| e.name() == name)
                .cloned()
        })
    }
}

impl Default for InMemoryTranslationTable {
    fn default() -> Self {
        InMemoryTranslationTable::new()
    }
}

impl TranslationTable for InMemoryTranslationTable {
    fn get_event_by_name(&self, name: &str) -> Option<Event> {
        self.by_name
            .get(name)
            .and_then(|ids| ids.first())
            .and_then(|id| self.by_id.get(id))
            .cloned()
    }

    fn get_event_by_id(&self, id: u32) -> Option<Event> {
        self.by_id.get(&id).cloned()
    }

    fn get_events_by_group(&self, group: &str) -> Option<Vec<Event>> {
        self.by_group.get(group).map(|ids| {
            let mut events: Vec<Event> = ids.iter().map(|id| self.by_id[id].clone()).collect();
            events.sort_by(|a, b| a.name().cmp(b.name()));
            events
        })
    }

    fn get_or_create_event(&mut self, group_and_name: &GroupAndName) -> Option<Event> {
        Some(self.insert(&group_and_name.group, &group_and_name.name))
    }

    fn compact_sched_format(&self) -> CompactSchedFormat {
        self.compact_sched.clone()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn insert_is_idempotent() {
        let mut table = InMemoryTranslationTable::new();
        let a = table.insert("sched", "sched_switch");
        let b = table.insert("sched", "sched_switch");
        assert_eq!(a.ftrace_event_id, b.ftrace_event_id);
    }

    #[test]
    fn lookup_by_name_and_group() {
        let table = InMemoryTranslationTable::from_pairs(vec![
            ("sched", "sched_switch"),
            ("sched", "sched_waking"),
            ("power", "cpu_idle"),
        ]);
        assert!(table.get_event_by_name("sched_switch").is_some());
        assert_eq!(table.get_events_by_group("sched").unwrap().len(), 2);
        assert!(table.get_events_by_group("nonexistent").is_none());
    }
}
