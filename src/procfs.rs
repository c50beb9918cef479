use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// The clock ftrace is told to timestamp events with. Reported downstream
/// so readers can pick the right clock when interpreting timestamps.
#[derive(Copy, Clone, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum FtraceClock {
    /// `boot`, the expected default; omitted from downstream messages.
    Unspecified,
    Global,
    Local,
    Unknown,
}

/// Preference order used by clock setup (§4.3): the first of these that's
/// advertised by the kernel as available is selected.
pub const CLOCK_PREFERENCE: [&str; 3] = ["boot", "global", "local"];

pub fn clock_name_to_enum(name: &str) -> FtraceClock {
    match name {
        "boot" => FtraceClock::Unspecified,
        "global" => FtraceClock::Global,
        "local" => FtraceClock::Local,
        _ => FtraceClock::Unknown,
    }
}

/// Abstract capability over the ftrace procfs control files. The muxer
/// never touches a filesystem directly; it only calls through this trait,
/// which is specified here only as a contract (see external interfaces).
pub trait Procfs {
    fn is_tracing_enabled(&self) -> io::Result<bool>;
    fn enable_tracing(&self) -> io::Result<()>;
    fn disable_tracing(&self) -> io::Result<()>;

    /// Writes `buffer_size_kb = n * page_size / 1024` for every per-CPU
    /// buffer.
    fn set_cpu_buffer_size_in_pages(&self, pages: usize) -> io::Result<()>;

    fn disable_all_events(&self) -> io::Result<()>;
    fn clear_trace(&self) -> io::Result<()>;

    fn get_clock(&self) -> io::Result<String>;
    fn available_clocks(&self) -> io::Result<Vec<String>>;
    fn set_clock(&self, clock: &str) -> io::Result<()>;

    fn enable_event(&self, group: &str, name: &str) -> io::Result<()>;
    fn disable_event(&self, group: &str, name: &str) -> io::Result<()>;

    /// Enumerates event names under `events/<group>/`, used to resolve
    /// `group/*` wildcards.
    fn get_event_names_for_group(&self, group: &str) -> io::Result<Vec<String>>;
}

/// Real implementation backed by a mounted ftrace procfs, normally
/// `/sys/kernel/tracing` (falling back to the legacy
/// `/sys/kernel/debug/tracing` mount point on older kernels).
pub struct LinuxProcfs {
    root: PathBuf,
}

impl LinuxProcfs {
    pub fn new<P: Into<PathBuf>>(root: P) -> LinuxProcfs {
        LinuxProcfs { root: root.into() }
    }

    /// Probes the two conventional mount points and picks whichever
    /// exists, preferring the modern one.
    pub fn discover() -> LinuxProcfs {
        let modern = Path::new("/sys/kernel/tracing");
        if modern.is_dir() {
            return LinuxProcfs::new(modern);
        }
        LinuxProcfs::new("/sys/kernel/debug/tracing")
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    fn write_str(&self, rel: &str, contents: &str) -> io::Result<()> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(self.path(rel))?;
        file.write_all(contents.as_bytes())
    }

    fn read_string(&self, rel: &str) -> io::Result<String> {
        Ok(fs::read_to_string(self.path(rel))?.trim().to_string())
    }

    fn write_bool(&self, rel: &str, on: bool) -> io::Result<()> {
        self.write_str(rel, if on { "1" } else { "0" })
    }
}

impl Procfs for LinuxProcfs {
    fn is_tracing_enabled(&self) -> io::Result<bool> {
        Ok(self.read_string("tracing_on")? == "1")
    }

    fn enable_tracing(&self) -> io::Result<()> {
        self.write_bool("tracing_on", true)
    }

    fn disable_tracing(&self) -> io::Result<()> {
        self.write_bool("tracing_on", false)
    }

    fn set_cpu_buffer_size_in_pages(&self, pages: usize) -> io::Result<()> {
        let page_size = crate::buffer::page_size_kb();
        let kb = pages * page_size;
        self.write_str("buffer_size_kb", &kb.to_string())
    }

    fn disable_all_events(&self) -> io::Result<()> {
        self.write_bool("events/enable", false)
    }

    fn clear_trace(&self) -> io::Result<()> {
        self.write_str("trace", "")
    }

    fn get_clock(&self) -> io::Result<String> {
        let contents = self.read_string("trace_clock")?;
        // The file's contents look like "local [global] boot", with the
        // current clock bracketed.
        for word in contents.split_whitespace() {
            if word.starts_with('[') && word.ends_with(']') {
                return Ok(word.trim_matches(|c| c == '[' || c == ']').to_string());
            }
        }
        Ok(contents)
    }

    fn available_clocks(&self) -> io::Result<Vec<String>> {
        let contents = self.read_string("trace_clock")?;
        Ok(contents
            .split_whitespace()
            .map(|w| w.trim_matches(|c| c == '[' || c == ']').to_string())
            .collect())
    }

    fn set_clock(&self, clock: &str) -> io::Result<()> {
        self.write_str("trace_clock", clock)
    }

    fn enable_event(&self, group: &str, name: &str) -> io::Result<()> {
        self.write_bool(&format!("events/{}/{}/enable", group, name), true)
    }

    fn disable_event(&self, group: &str, name: &str) -> io::Result<()> {
        self.write_bool(&format!("events/{}/{}/enable", group, name), false)
    }

    fn get_event_names_for_group(&self, group: &str) -> io::Result<Vec<String>> {
        let dir = self.path(&format!("events/{}", group));
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}
