use std::sync::atomic::{AtomicU64, Ordering};

static SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum LogLevel {
    LogError,
    LogWarn,
    LogInfo,
    LogDebug,
}

impl LogLevel {
    fn tag(self) -> &'static str {
        match self {
            LogLevel::LogError => "E",
            LogLevel::LogWarn => "W",
            LogLevel::LogInfo => "I",
            LogLevel::LogDebug => "D",
        }
    }
}

/// Writes one line to stderr. Not a generic logging facade: the muxer is a
/// small, single-threaded component and doesn't need one.
#[doc(hidden)]
pub fn log_line(level: LogLevel, args: std::fmt::Arguments) {
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    eprintln!("[{} ftrace_muxer {:06}] {}", level.tag(), seq, args);
}

#[macro_export]
macro_rules! log {
    ($level:expr, $($arg:tt)+) => {
        $crate::log::log_line($level, format_args!($($arg)+))
    };
}
