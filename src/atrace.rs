use crate::log::LogLevel::LogWarn;
use std::collections::BTreeSet;
use std::process::Command;

/// `RunAtrace(argv) -> bool` (§6): launches the `atrace` helper. The
/// helper exits non-zero on malformed categories; on legacy platforms
/// `--only_userspace` is absent (signalled by `is_old_atrace`).
pub trait AtraceHelper {
    fn run_atrace(&self, argv: &[String]) -> bool;
    fn is_old_atrace(&self) -> bool;
}

/// Spawns a real `atrace` subprocess and waits for it to exit.
pub struct SystemAtrace {
    legacy: bool,
}

impl SystemAtrace {
    pub fn new(legacy: bool) -> SystemAtrace {
        SystemAtrace { legacy }
    }
}

impl AtraceHelper for SystemAtrace {
    fn run_atrace(&self, argv: &[String]) -> bool {
        let (program, args) = match argv.split_first() {
            Some(parts) => parts,
            None => return false,
        };
        match Command::new(program).args(args).status() {
            Ok(status) => status.success(),
            Err(e) => {
                log!(LogWarn, "failed to launch {}: {}", program, e);
                false
            }
        }
    }

    fn is_old_atrace(&self) -> bool {
        self.legacy
    }
}

fn build_argv(
    subcommand: &str,
    legacy: bool,
    apps: &[String],
    categories: &[String],
) -> Vec<String> {
    let mut argv = vec!["atrace".to_string(), subcommand.to_string()];
    if !legacy {
        argv.push("--only_userspace".to_string());
    }
    for category in categories {
        argv.push(category.clone());
    }
    if !apps.is_empty() {
        argv.push("-a".to_string());
        argv.push(apps.join(","));
    }
    argv
}

/// `StartAtrace(apps, categories)` (§4.5).
pub fn start_atrace(helper: &dyn AtraceHelper, apps: &[String], categories: &[String]) -> bool {
    let argv = build_argv("--async_start", helper.is_old_atrace(), apps, categories);
    helper.run_atrace(&argv)
}

/// `DisableAtrace()` (§4.5).
pub fn disable_atrace(helper: &dyn AtraceHelper) -> bool {
    let argv = build_argv("--async_stop", helper.is_old_atrace(), &[], &[]);
    helper.run_atrace(&argv)
}

fn union_sorted(a: &[String], b: &[String]) -> Vec<String> {
    let set: BTreeSet<String> = a.iter().chain(b.iter()).cloned().collect();
    set.into_iter().collect()
}

/// `UpdateAtrace(request)` (§4.5): combines the currently-running apps and
/// categories with the newly-requested ones and (re)starts atrace with the
/// union, unless it's already running with exactly that union.
pub fn update_atrace(
    helper: &dyn AtraceHelper,
    atrace_on: bool,
    current_apps: &[String],
    current_categories: &[String],
    requested_apps: &[String],
    requested_categories: &[String],
) -> Option<(Vec<String>, Vec<String>)> {
    let combined_apps = union_sorted(current_apps, requested_apps);
    let combined_categories = union_sorted(current_categories, requested_categories);

    if atrace_on
        && combined_apps.len() == current_apps.len()
        && combined_categories.len() == current_categories.len()
    {
        return None;
    }

    if start_atrace(helper, &combined_apps, &combined_categories) {
        Some((combined_apps, combined_categories))
    } else {
        None
    }
}
