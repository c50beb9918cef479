/// Process-wide tunables the muxer needs but that aren't part of any one
/// config request. Constructed explicitly by the host and passed to
/// `FtraceConfigMuxer::new` — deliberately not a `lazy_static` singleton,
/// since the "no ambient global state" guidance for the registry applies
/// equally here (see design notes).
#[derive(Clone, Debug)]
pub struct MuxerFlags {
    /// True on platforms whose `atrace` predates incremental
    /// configuration and the `--only_userspace` flag (`IsOldAtrace()`).
    pub legacy_atrace: bool,
}

impl Default for MuxerFlags {
    fn default() -> MuxerFlags {
        MuxerFlags {
            legacy_atrace: false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_is_not_legacy() {
        assert!(!MuxerFlags::default().legacy_atrace);
    }
}
