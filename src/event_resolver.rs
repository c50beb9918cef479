use crate::categories::{self, VendorCategories};
use crate::config::FtraceConfig;
use crate::event::{GroupAndName, SYNTHETIC_GROUP};
use crate::log::LogLevel::LogDebug;
use crate::procfs::Procfs;
use crate::translation_table::TranslationTable;
use std::collections::BTreeSet;

/// Enumerates `events/<group>/` via procfs and inserts `(group, each_name)`
/// for all of them. The one place a `group/*` wildcard is ever actually
/// resolved — used both for a caller-supplied `group/*` specifier and for
/// an atrace category's whole-group/individual-event wildcards (§4.1).
fn expand_group_wildcard(group: &str, procfs: &dyn Procfs, out: &mut BTreeSet<GroupAndName>) {
    match procfs.get_event_names_for_group(group) {
        Ok(names) => {
            for n in names {
                out.insert(GroupAndName::new(group, n));
            }
        }
        Err(e) => {
            log!(LogDebug, "could not enumerate events/{}: {}", group, e);
        }
    }
}

/// Resolves one event specifier (`group/name`, `group/*`, or a bare
/// `name`) into zero or more concrete `(group, name)` pairs (§4.1).
fn resolve_specifier(
    spec: &str,
    table: &dyn TranslationTable,
    procfs: &dyn Procfs,
    out: &mut BTreeSet<GroupAndName>,
) {
    let (group, name) = match spec.find('/') {
        Some(idx) => (&spec[..idx], &spec[idx + 1..]),
        None => ("", spec),
    };

    if name == "*" {
        expand_group_wildcard(group, procfs, out);
        return;
    }

    if group.is_empty() {
        match table.get_event_by_name(name) {
            Some(event) => {
                out.insert(event.group_and_name);
            }
            None => {
                log!(LogDebug, "unresolvable bare event name '{}', dropping", name);
            }
        }
        return;
    }

    // Caller explicitly named a group; insert verbatim even if the table
    // doesn't (yet) know it.
    out.insert(GroupAndName::new(group, name));
}

/// Expands the atrace category/app request into the hard-coded event set
/// (§4.1): always `ftrace/print`, then each category's whole-groups and
/// individual events, merged with any vendor-registered categories.
fn expand_atrace_categories(
    config: &FtraceConfig,
    vendor: Option<&VendorCategories>,
    table: &dyn TranslationTable,
    procfs: &dyn Procfs,
    out: &mut BTreeSet<GroupAndName>,
) {
    if !config.requires_atrace() {
        return;
    }

    out.insert(GroupAndName::new(SYNTHETIC_GROUP, "print"));

    for category in &config.atrace_categories {
        let spec = match categories::lookup(category, vendor) {
            Some(spec) => spec,
            None => continue,
        };

        for group in &spec.whole_groups {
            if let Some(events) = table.get_events_by_group(group) {
                for event in events {
                    out.insert(event.group_and_name);
                }
            } else {
                // The table doesn't know this group yet (e.g. it hasn't
                // been populated from a real kernel-ABI listing); fall
                // back to the same procfs enumeration a caller-supplied
                // `group/*` wildcard goes through, rather than inserting a
                // literal `"*"` event that would never actually enable on
                // the real backend.
                expand_group_wildcard(group, procfs, out);
            }
        }

        for event in &spec.individual_events {
            if event.name == "*" {
                expand_group_wildcard(&event.group, procfs, out);
            } else {
                out.insert(event.clone());
            }
        }
    }
}

/// `GetFtraceEvents(request, table) -> set<GroupAndName>` (§4.1).
pub fn get_ftrace_events(
    config: &FtraceConfig,
    table: &dyn TranslationTable,
    procfs: &dyn Procfs,
    vendor_categories: Option<&VendorCategories>,
) -> BTreeSet<GroupAndName> {
    let mut out = BTreeSet::new();

    for spec in &config.events {
        resolve_specifier(spec, table, procfs, &mut out);
    }

    expand_atrace_categories(config, vendor_categories, table, procfs, &mut out);

    out
}
