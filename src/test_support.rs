//! Mock implementations of the external-collaborator traits (§6), used to
//! drive the registry through the concrete scenarios in the spec without
//! touching a real kernel or spawning a real `atrace`.
#![cfg(test)]

use crate::atrace::AtraceHelper;
use crate::event::{Event, GroupAndName};
use crate::procfs::Procfs;
use crate::translation_table::{CompactSchedFormat, TranslationTable};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;

pub struct MockTranslationTable {
    events: HashMap<(String, String), u32>,
    next_id: u32,
    compact_sched_enabled: bool,
}

impl MockTranslationTable {
    pub fn new() -> MockTranslationTable {
        MockTranslationTable {
            events: HashMap::new(),
            next_id: 1,
            compact_sched_enabled: true,
        }
    }

    pub fn insert(&mut self, group: &str, name: &str) -> u32 {
        let key = (group.to_string(), name.to_string());
        if let Some(id) = self.events.get(&key) {
            return *id;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.events.insert(key, id);
        id
    }
}

impl TranslationTable for MockTranslationTable {
    fn get_event_by_name(&self, name: &str) -> Option<Event> {
        self.events
            .iter()
            .find(|((_, n), _)| n == name)
            .map(|((g, n), id)| Event::new(g, n, *id))
    }

    fn get_event_by_id(&self, id: u32) -> Option<Event> {
        self.events
            .iter()
            .find(|(_, v)| **v == id)
            .map(|((g, n), id)| Event::new(g, n, *id))
    }

    fn get_events_by_group(&self, group: &str) -> Option<Vec<Event>> {
        let events: Vec<Event> = self
            .events
            .iter()
            .filter(|((g, _), _)| g == group)
            .map(|((g, n), id)| Event::new(g, n, *id))
            .collect();
        if events.is_empty() {
            None
        } else {
            Some(events)
        }
    }

    fn get_or_create_event(&mut self, group_and_name: &GroupAndName) -> Option<Event> {
        let id = self.insert(&group_and_name.group, &group_and_name.name);
        Some(Event::new(&group_and_name.group, &group_and_name.name, id))
    }

    fn compact_sched_format(&self) -> CompactSchedFormat {
        CompactSchedFormat {
            enabled: self.compact_sched_enabled,
        }
    }
}

#[derive(Default)]
pub struct MockProcfs {
    inner: RefCell<MockProcfsState>,
}

#[derive(Default)]
struct MockProcfsState {
    tracing_on: bool,
    buffer_pages: usize,
    enabled_events: std::collections::BTreeSet<(String, String)>,
    clock: String,
    available_clocks: Vec<String>,
    group_events: HashMap<String, Vec<String>>,
    fail_enable: std::collections::BTreeSet<(String, String)>,
    fail_writes: bool,
}

impl MockProcfs {
    pub fn new() -> MockProcfs {
        let mock = MockProcfs::default();
        mock.inner.borrow_mut().clock = "boot".to_string();
        mock.inner.borrow_mut().available_clocks =
            vec!["local".to_string(), "boot".to_string(), "global".to_string()];
        mock
    }

    pub fn set_tracing_on(&self, on: bool) {
        self.inner.borrow_mut().tracing_on = on;
    }

    pub fn set_available_clocks(&self, clocks: Vec<&str>) {
        self.inner.borrow_mut().available_clocks = clocks.into_iter().map(str::to_string).collect();
    }

    pub fn set_group_events(&self, group: &str, names: Vec<&str>) {
        self.inner
            .borrow_mut()
            .group_events
            .insert(group.to_string(), names.into_iter().map(str::to_string).collect());
    }

    pub fn enabled_events(&self) -> Vec<(String, String)> {
        self.inner.borrow().enabled_events.iter().cloned().collect()
    }

    pub fn buffer_pages(&self) -> usize {
        self.inner.borrow().buffer_pages
    }

    pub fn is_on(&self) -> bool {
        self.inner.borrow().tracing_on
    }

    pub fn fail_enabling(&self, group: &str, name: &str) {
        self.inner
            .borrow_mut()
            .fail_enable
            .insert((group.to_string(), name.to_string()));
    }

    pub fn fail_all_writes(&self) {
        self.inner.borrow_mut().fail_writes = true;
    }
}

impl Procfs for MockProcfs {
    fn is_tracing_enabled(&self) -> io::Result<bool> {
        Ok(self.inner.borrow().tracing_on)
    }

    fn enable_tracing(&self) -> io::Result<()> {
        if self.inner.borrow().fail_writes {
            return Err(io::Error::new(io::ErrorKind::Other, "mock write failure"));
        }
        self.inner.borrow_mut().tracing_on = true;
        Ok(())
    }

    fn disable_tracing(&self) -> io::Result<()> {
        self.inner.borrow_mut().tracing_on = false;
        Ok(())
    }

    fn set_cpu_buffer_size_in_pages(&self, pages: usize) -> io::Result<()> {
        if self.inner.borrow().fail_writes {
            return Err(io::Error::new(io::ErrorKind::Other, "mock write failure"));
        }
        self.inner.borrow_mut().buffer_pages = pages;
        Ok(())
    }

    fn disable_all_events(&self) -> io::Result<()> {
        self.inner.borrow_mut().enabled_events.clear();
        Ok(())
    }

    fn clear_trace(&self) -> io::Result<()> {
        Ok(())
    }

    fn get_clock(&self) -> io::Result<String> {
        Ok(self.inner.borrow().clock.clone())
    }

    fn available_clocks(&self) -> io::Result<Vec<String>> {
        Ok(self.inner.borrow().available_clocks.clone())
    }

    fn set_clock(&self, clock: &str) -> io::Result<()> {
        if self.inner.borrow().fail_writes {
            return Err(io::Error::new(io::ErrorKind::Other, "mock write failure"));
        }
        self.inner.borrow_mut().clock = clock.to_string();
        Ok(())
    }

    fn enable_event(&self, group: &str, name: &str) -> io::Result<()> {
        let key = (group.to_string(), name.to_string());
        if self.inner.borrow().fail_enable.contains(&key) {
            return Err(io::Error::new(io::ErrorKind::Other, "mock enable failure"));
        }
        self.inner.borrow_mut().enabled_events.insert(key);
        Ok(())
    }

    fn disable_event(&self, group: &str, name: &str) -> io::Result<()> {
        self.inner
            .borrow_mut()
            .enabled_events
            .remove(&(group.to_string(), name.to_string()));
        Ok(())
    }

    fn get_event_names_for_group(&self, group: &str) -> io::Result<Vec<String>> {
        self.inner
            .borrow()
            .group_events
            .get(group)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such group"))
    }
}

#[derive(Default)]
pub struct MockAtrace {
    inner: RefCell<MockAtraceState>,
}

#[derive(Default)]
struct MockAtraceState {
    invocations: Vec<Vec<String>>,
    fail_next: bool,
    legacy: bool,
}

impl MockAtrace {
    pub fn new() -> MockAtrace {
        MockAtrace::default()
    }

    pub fn legacy() -> MockAtrace {
        let a = MockAtrace::default();
        a.inner.borrow_mut().legacy = true;
        a
    }

    pub fn fail_next(&self) {
        self.inner.borrow_mut().fail_next = true;
    }

    pub fn invocations(&self) -> Vec<Vec<String>> {
        self.inner.borrow().invocations.clone()
    }
}

impl AtraceHelper for MockAtrace {
    fn run_atrace(&self, argv: &[String]) -> bool {
        let mut state = self.inner.borrow_mut();
        state.invocations.push(argv.to_vec());
        if state.fail_next {
            state.fail_next = false;
            return false;
        }
        true
    }

    fn is_old_atrace(&self) -> bool {
        self.inner.borrow().legacy
    }
}
