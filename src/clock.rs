use crate::log::LogLevel::LogWarn;
use crate::procfs::{clock_name_to_enum, FtraceClock, Procfs, CLOCK_PREFERENCE};

/// One-shot clock selection run on the first config's Setup (§4.3):
/// iterates the preference list `boot, global, local` and selects the
/// first one the kernel advertises as available, writing it only if it
/// isn't already current.
pub fn setup_clock(procfs: &dyn Procfs) -> FtraceClock {
    let available = match procfs.available_clocks() {
        Ok(clocks) => clocks,
        Err(e) => {
            log!(LogWarn, "could not read available ftrace clocks: {}", e);
            return FtraceClock::Unknown;
        }
    };

    let chosen = CLOCK_PREFERENCE
        .iter()
        .find(|candidate| available.iter().any(|c| c == *candidate));

    let chosen = match chosen {
        Some(c) => *c,
        None => {
            log!(LogWarn, "none of the preferred clocks are available: {:?}", available);
            return FtraceClock::Unknown;
        }
    };

    match procfs.get_clock() {
        Ok(current) if current == chosen => {}
        _ => {
            if let Err(e) = procfs.set_clock(chosen) {
                log!(LogWarn, "failed to set ftrace clock to {}: {}", chosen, e);
                return FtraceClock::Unknown;
            }
        }
    }

    clock_name_to_enum(chosen)
}
