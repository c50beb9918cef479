//! Reconciles multiple concurrent tracing-client configurations onto the
//! single, globally-shared Linux kernel ftrace facility exposed through
//! `/sys/kernel/tracing`.
//!
//! The entry point is [`muxer::FtraceConfigMuxer`]: construct one with a
//! [`procfs::Procfs`], a [`translation_table::TranslationTable`], and an
//! [`atrace::AtraceHelper`] (real backends are provided for all three, or
//! supply your own / a mock), then drive it through
//! `setup_config` -> `activate_config` -> `remove_config`.
//!
//! Out of scope: recording or decoding ftrace events, scheduling of
//! sampling, protocol framing, persistence of configurations across
//! process restarts, and any command-line or daemon front end — this
//! crate is the reconciliation core only.

#[macro_use]
pub mod log;

pub mod atrace;
pub mod buffer;
pub mod categories;
pub mod clock;
pub mod config;
pub mod event;
pub mod event_resolver;
pub mod flags;
pub mod muxer;
pub mod procfs;
pub mod state;
pub mod translation_table;

#[cfg(test)]
mod test_support;

pub use config::{ConfigId, FtraceConfig, FtraceDataSourceConfig};
pub use muxer::FtraceConfigMuxer;
