use crate::atrace::{self, AtraceHelper};
use crate::buffer::compute_cpu_buffer_size_in_pages;
use crate::categories::VendorCategories;
use crate::clock::setup_clock;
use crate::config::{ConfigId, FtraceConfig, FtraceDataSourceConfig};
use crate::event::EventFilter;
use crate::event_resolver::get_ftrace_events;
use crate::flags::MuxerFlags;
use crate::log::LogLevel::{LogDebug, LogWarn};
use crate::procfs::Procfs;
use crate::state::{GlobalState, GlobalStateSnapshot};
use crate::translation_table::TranslationTable;
use std::collections::{BTreeMap, BTreeSet};

/// Reconciles N concurrent `FtraceConfig` requests onto the single shared
/// kernel ftrace facility and atrace helper. See module-level docs in
/// `lib.rs` for the full lifecycle.
///
/// Naturally a process-wide singleton (because the kernel's ftrace is),
/// but modeled as an explicitly-constructed object owned by the host
/// rather than ambient global state (design notes §9).
pub struct FtraceConfigMuxer {
    procfs: Box<dyn Procfs>,
    table: Box<dyn TranslationTable>,
    atrace: Box<dyn AtraceHelper>,
    flags: MuxerFlags,
    vendor_categories: Option<VendorCategories>,

    configs: BTreeMap<ConfigId, FtraceDataSourceConfig>,
    active: BTreeSet<ConfigId>,
    last_id: ConfigId,
    state: GlobalState,
}

impl FtraceConfigMuxer {
    pub fn new(
        procfs: Box<dyn Procfs>,
        table: Box<dyn TranslationTable>,
        atrace: Box<dyn AtraceHelper>,
        flags: MuxerFlags,
    ) -> FtraceConfigMuxer {
        FtraceConfigMuxer {
            procfs,
            table,
            atrace,
            flags,
            vendor_categories: None,
            configs: BTreeMap::new(),
            active: BTreeSet::new(),
            last_id: 0,
            state: GlobalState::default(),
        }
    }

    pub fn register_vendor_categories(&mut self, vendor: VendorCategories) {
        self.vendor_categories = Some(vendor);
    }

    pub fn snapshot(&self) -> GlobalStateSnapshot {
        self.state.snapshot()
    }

    pub fn config(&self, id: ConfigId) -> Option<&FtraceDataSourceConfig> {
        self.configs.get(&id)
    }

    /// Detects a third party toggling `tracing_on` behind the muxer's
    /// back. Only meaningful on the legacy-atrace-unaware path; legacy
    /// atrace owns tracing_on itself so the guard doesn't apply to it.
    fn tracing_interfered_with(&self) -> bool {
        if self.flags.legacy_atrace {
            return false;
        }
        match self.procfs.is_tracing_enabled() {
            Ok(on) => on,
            Err(e) => {
                log!(LogWarn, "failed to read tracing_on: {}", e);
                false
            }
        }
    }

    /// `SetupConfig(request) -> ConfigId` (§4.2.1).
    pub fn setup_config(&mut self, request: &FtraceConfig) -> ConfigId {
        if self.configs.is_empty() {
            if self.tracing_interfered_with() {
                log!(LogWarn, "tracing_on already set with no live configs, refusing setup");
                return 0;
            }
            self.state.ftrace_clock = setup_clock(self.procfs.as_ref());
            let pages = compute_cpu_buffer_size_in_pages(request.buffer_size_kb);
            if let Err(e) = self.procfs.set_cpu_buffer_size_in_pages(pages) {
                log!(LogWarn, "failed to set cpu buffer size: {}", e);
            }
            self.state.cpu_buffer_size_pages = pages;
        } else if !self.active.is_empty() {
            match self.procfs.is_tracing_enabled() {
                Ok(false) if !self.flags.legacy_atrace => {
                    log!(LogWarn, "tracing_on unexpectedly off during a live session, refusing setup");
                    return 0;
                }
                Err(e) => {
                    log!(LogWarn, "failed to read tracing_on: {}", e);
                }
                _ => {}
            }
        }

        if request.requires_atrace() && self.flags.legacy_atrace && !self.configs.is_empty() {
            log!(LogWarn, "legacy atrace cannot multiplex, refusing setup");
            return 0;
        }

        let resolved = get_ftrace_events(
            request,
            self.table.as_ref(),
            self.procfs.as_ref(),
            self.vendor_categories.as_ref(),
        );

        if request.requires_atrace() {
            if let Some((apps, categories)) = atrace::update_atrace(
                self.atrace.as_ref(),
                self.state.atrace_on,
                &self.state.atrace_apps,
                &self.state.atrace_categories,
                &request.atrace_apps,
                &request.atrace_categories,
            ) {
                self.state.atrace_apps = apps;
                self.state.atrace_categories = categories;
                self.state.atrace_on = true;
            } else if !self.state.atrace_on {
                log!(LogWarn, "failed to start atrace");
            }
        }

        let mut filter = EventFilter::new();
        for group_and_name in &resolved {
            let event = match self.table.get_or_create_event(group_and_name) {
                Some(event) => event,
                None => {
                    log!(
                        LogDebug,
                        "unknown event {}/{}, skipping",
                        group_and_name.group,
                        group_and_name.name
                    );
                    continue;
                }
            };

            if self.state.ftrace_events.contains(event.ftrace_event_id) || event.is_synthetic() {
                filter.add(event.ftrace_event_id);
                continue;
            }

            match self.procfs.enable_event(event.group(), event.name()) {
                Ok(()) => {
                    self.state.ftrace_events.add(event.ftrace_event_id);
                    filter.add(event.ftrace_event_id);
                }
                Err(e) => {
                    log!(LogWarn, "failed to enable {}/{}: {}", event.group(), event.name(), e);
                }
            }
        }

        self.last_id += 1;
        let id = self.last_id;
        self.configs.insert(
            id,
            FtraceDataSourceConfig {
                event_filter: filter,
                compact_sched_config: if request.compact_sched_hints.enabled {
                    self.table.compact_sched_format()
                } else {
                    Default::default()
                },
                atrace_apps: request.atrace_apps.clone(),
                atrace_categories: request.atrace_categories.clone(),
                symbolize_ksyms: request.symbolize_ksyms,
            },
        );
        id
    }

    /// `ActivateConfig(id) -> bool` (§4.2.2).
    pub fn activate_config(&mut self, id: ConfigId) -> bool {
        if id == 0 || !self.configs.contains_key(&id) {
            return false;
        }

        if self.active.is_empty() {
            if self.tracing_interfered_with() {
                log!(LogWarn, "tracing_on already set, refusing activate");
                return false;
            }
            if let Err(e) = self.procfs.enable_tracing() {
                log!(LogWarn, "failed to enable tracing: {}", e);
                return false;
            }
        }

        self.active.insert(id);
        true
    }

    /// `RemoveConfig(id) -> bool` (§4.2.3).
    pub fn remove_config(&mut self, id: ConfigId) -> bool {
        if self.configs.remove(&id).is_none() {
            return false;
        }

        let mut expected_events = EventFilter::new();
        let mut expected_apps: BTreeSet<String> = BTreeSet::new();
        let mut expected_categories: BTreeSet<String> = BTreeSet::new();
        for config in self.configs.values() {
            expected_events.union_from(&config.event_filter);
            expected_apps.extend(config.atrace_apps.iter().cloned());
            expected_categories.extend(config.atrace_categories.iter().cloned());
        }

        // We can only turn off what we previously turned on successfully.
        let current_apps: BTreeSet<String> = self.state.atrace_apps.iter().cloned().collect();
        let current_categories: BTreeSet<String> =
            self.state.atrace_categories.iter().cloned().collect();
        let expected_apps: Vec<String> = expected_apps.intersection(&current_apps).cloned().collect();
        let expected_categories: Vec<String> = expected_categories
            .intersection(&current_categories)
            .cloned()
            .collect();

        let surplus: Vec<u32> = self
            .state
            .ftrace_events
            .enumerate()
            .filter(|id| !expected_events.contains(*id))
            .collect();
        for event_id in surplus {
            let event = match self.table.get_event_by_id(event_id) {
                Some(e) => e,
                None => {
                    log!(LogWarn, "event id {} vanished from translation table", event_id);
                    continue;
                }
            };
            if event.is_synthetic() {
                self.state.ftrace_events.disable(event_id);
                continue;
            }
            match self.procfs.disable_event(event.group(), event.name()) {
                Ok(()) => self.state.ftrace_events.disable(event_id),
                Err(e) => {
                    log!(LogWarn, "failed to disable {}/{}: {}", event.group(), event.name(), e);
                }
            }
        }

        self.active.remove(&id);
        if self.active.is_empty() {
            if let Err(e) = self.procfs.disable_tracing() {
                log!(LogWarn, "failed to disable tracing: {}", e);
            }
        }

        if self.configs.is_empty() {
            if let Err(e) = self.procfs.set_cpu_buffer_size_in_pages(1) {
                log!(LogWarn, "failed to shrink cpu buffer: {}", e);
            }
            self.state.cpu_buffer_size_pages = 1;
            if let Err(e) = self.procfs.disable_all_events() {
                log!(LogWarn, "failed to bulk-disable events: {}", e);
            }
            if let Err(e) = self.procfs.clear_trace() {
                log!(LogWarn, "failed to clear trace buffer: {}", e);
            }
        }

        if self.state.atrace_on && expected_apps.is_empty() && expected_categories.is_empty() {
            if atrace::disable_atrace(self.atrace.as_ref()) {
                self.state.atrace_apps.clear();
                self.state.atrace_categories.clear();
                self.state.atrace_on = false;
            }
        } else if expected_apps.len() != current_apps.len()
            || expected_categories.len() != current_categories.len()
        {
            if atrace::start_atrace(self.atrace.as_ref(), &expected_apps, &expected_categories) {
                self.state.atrace_apps = expected_apps;
                self.state.atrace_categories = expected_categories;
            }
        }

        true
    }
}
