use crate::log::LogLevel::LogWarn;
use nix::unistd::{sysconf, SysconfVar};

const DEFAULT_BUFFER_KB: usize = 2 * 1024;
const MAX_BUFFER_KB: usize = 64 * 1024;

/// The system page size in KiB. Falls back to 4 if `sysconf` is
/// unavailable, which matches every Linux target this crate ships for.
pub fn page_size_kb() -> usize {
    match sysconf(SysconfVar::PAGE_SIZE) {
        Ok(Some(bytes)) if bytes > 0 => (bytes as usize) / 1024,
        _ => 4,
    }
}

/// Converts a requested per-CPU buffer size (in KiB, 0 meaning "use the
/// default") into a page count. Caps oversized requests and logs;
/// guarantees the result is at least 1 page.
pub fn compute_cpu_buffer_size_in_pages(requested_kb: usize) -> usize {
    let page_kb = page_size_kb();
    let kb = if requested_kb == 0 {
        DEFAULT_BUFFER_KB
    } else if requested_kb > MAX_BUFFER_KB {
        log!(
            LogWarn,
            "requested ftrace buffer size {} KiB exceeds cap, using {} KiB",
            requested_kb,
            MAX_BUFFER_KB
        );
        MAX_BUFFER_KB
    } else {
        requested_kb
    };

    let pages = kb / page_kb;
    if pages == 0 {
        1
    } else {
        pages
    }
}
