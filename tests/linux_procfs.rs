use ftrace_muxer::procfs::{LinuxProcfs, Procfs};
use std::fs;
use tempfile::TempDir;

/// Builds a minimal fake ftrace procfs tree under a temp dir so
/// `LinuxProcfs` can be exercised without a real kernel.
fn fake_tracing_root() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    let root = dir.path();

    fs::write(root.join("tracing_on"), "0\n").unwrap();
    fs::write(root.join("buffer_size_kb"), "1408\n").unwrap();
    fs::write(root.join("trace"), "").unwrap();
    fs::write(root.join("trace_clock"), "[local] global boot\n").unwrap();

    fs::create_dir_all(root.join("events")).unwrap();
    fs::write(root.join("events/enable"), "0\n").unwrap();

    fs::create_dir_all(root.join("events/sched/sched_switch")).unwrap();
    fs::write(root.join("events/sched/sched_switch/enable"), "0\n").unwrap();
    fs::create_dir_all(root.join("events/sched/sched_waking")).unwrap();
    fs::write(root.join("events/sched/sched_waking/enable"), "0\n").unwrap();

    dir
}

#[test]
fn reads_and_writes_tracing_on() {
    let dir = fake_tracing_root();
    let procfs = LinuxProcfs::new(dir.path());

    assert!(!procfs.is_tracing_enabled().unwrap());
    procfs.enable_tracing().unwrap();
    assert!(procfs.is_tracing_enabled().unwrap());
    procfs.disable_tracing().unwrap();
    assert!(!procfs.is_tracing_enabled().unwrap());
}

#[test]
fn enables_and_disables_individual_events() {
    let dir = fake_tracing_root();
    let procfs = LinuxProcfs::new(dir.path());

    procfs.enable_event("sched", "sched_switch").unwrap();
    let contents =
        fs::read_to_string(dir.path().join("events/sched/sched_switch/enable")).unwrap();
    assert_eq!(contents.trim(), "1");

    procfs.disable_event("sched", "sched_switch").unwrap();
    let contents =
        fs::read_to_string(dir.path().join("events/sched/sched_switch/enable")).unwrap();
    assert_eq!(contents.trim(), "0");
}

#[test]
fn enumerates_event_names_for_wildcard_expansion() {
    let dir = fake_tracing_root();
    let procfs = LinuxProcfs::new(dir.path());

    let mut names = procfs.get_event_names_for_group("sched").unwrap();
    names.sort();
    assert_eq!(names, vec!["sched_switch", "sched_waking"]);
}

#[test]
fn current_clock_is_parsed_out_of_brackets() {
    let dir = fake_tracing_root();
    let procfs = LinuxProcfs::new(dir.path());

    assert_eq!(procfs.get_clock().unwrap(), "local");
    let available = procfs.available_clocks().unwrap();
    assert_eq!(available, vec!["local", "global", "boot"]);

    procfs.set_clock("boot").unwrap();
    let contents = fs::read_to_string(dir.path().join("trace_clock")).unwrap();
    assert_eq!(contents, "boot");
}

#[test]
fn buffer_size_write_accounts_for_page_size() {
    let dir = fake_tracing_root();
    let procfs = LinuxProcfs::new(dir.path());

    procfs.set_cpu_buffer_size_in_pages(256).unwrap();
    let contents = fs::read_to_string(dir.path().join("buffer_size_kb")).unwrap();
    let kb: usize = contents.trim().parse().unwrap();
    assert_eq!(kb, 256 * ftrace_muxer::buffer::page_size_kb());
}
