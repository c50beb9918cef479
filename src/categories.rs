use crate::event::GroupAndName;
use lazy_static::lazy_static;
use std::collections::HashMap;

/// What one atrace category expands to: whole event groups (every event in
/// the group is enabled) plus a list of individually-named events.
#[derive(Clone, Debug, Default)]
pub struct CategorySpec {
    pub whole_groups: Vec<&'static str>,
    pub individual_events: Vec<GroupAndName>,
}

impl CategorySpec {
    fn new(whole_groups: &[&'static str], individual_events: &[(&str, &str)]) -> CategorySpec {
        CategorySpec {
            whole_groups: whole_groups.to_vec(),
            individual_events: individual_events
                .iter()
                .map(|(g, n)| GroupAndName::new(*g, *n))
                .collect(),
        }
    }
}

/// The full list of atrace categories this crate recognizes. Anything not
/// in this list is silently ignored by the resolver (§4.1).
pub const KNOWN_CATEGORIES: &[&str] = &[
    "gfx",
    "ion",
    "sched",
    "irq",
    "irqoff",
    "preemptoff",
    "i2c",
    "freq",
    "membus",
    "idle",
    "disk",
    "mmc",
    "load",
    "sync",
    "workq",
    "memreclaim",
    "regulators",
    "binder_driver",
    "binder_lock",
    "pagecache",
    "memory",
    "thermal",
];

lazy_static! {
    /// The hard-coded category -> event-set table. Kept as data rather
    /// than branching code so tests can iterate it and vendors can extend
    /// it through a parallel table (see `VendorCategories`).
    pub static ref CATEGORY_TABLE: HashMap<&'static str, CategorySpec> = build_table();
}

fn build_table() -> HashMap<&'static str, CategorySpec> {
    let mut t = HashMap::new();

    t.insert(
        "gfx",
        CategorySpec::new(
            &["mdss", "mali", "sde", "dpu", "g2d"],
            &[
                ("mdss", "tracing_mark_write"),
                ("sde", "tracing_mark_write"),
                ("sde", "sde_perf_calc_crtc"),
                ("sde", "sde_perf_set_qos_luts"),
                ("sde", "sde_perf_crtc_update"),
                ("dpu", "dpu_crtc_setup_mixers"),
                ("g2d", "tracing_mark_write"),
            ],
        ),
    );

    t.insert("ion", CategorySpec::new(&["ion"], &[]));

    t.insert(
        "sched",
        CategorySpec::new(
            &["cgroup", "systrace", "scm"],
            &[
                ("sched", "sched_switch"),
                ("sched", "sched_waking"),
                ("sched", "sched_blocked_reason"),
                ("sched", "sched_cpu_hotplug"),
                ("sched", "sched_pi_setprio"),
                ("sched", "sched_process_exit"),
                ("oom", "oom_score_adj_update"),
                ("task", "task_rename"),
                ("task", "task_newtask"),
                ("systrace", "0"),
                ("scm", "scm_call_start"),
                ("scm", "scm_call_end"),
            ],
        ),
    );

    t.insert(
        "irq",
        CategorySpec::new(
            &["irq", "ipi"],
            &[
                ("irq", "tasklet_entry"),
                ("irq", "tasklet_exit"),
                ("irq", "softirq_entry"),
                ("irq", "softirq_exit"),
                ("irq", "irq_handler_entry"),
                ("irq", "irq_handler_exit"),
                ("ipi", "ipi_entry"),
                ("ipi", "ipi_exit"),
                ("ipi", "ipi_raise"),
            ],
        ),
    );

    t.insert(
        "irqoff",
        CategorySpec::new(
            &[],
            &[
                ("preemptirq", "irq_enable"),
                ("preemptirq", "irq_disable"),
            ],
        ),
    );

    t.insert(
        "preemptoff",
        CategorySpec::new(
            &[],
            &[
                ("preemptirq", "preempt_enable"),
                ("preemptirq", "preempt_disable"),
            ],
        ),
    );

    t.insert(
        "i2c",
        CategorySpec::new(
            &["i2c"],
            &[
                ("i2c", "i2c_read"),
                ("i2c", "i2c_write"),
                ("i2c", "i2c_result"),
                ("i2c", "i2c_reply"),
                ("i2c", "smbus_read"),
                ("i2c", "smbus_write"),
                ("i2c", "smbus_result"),
                ("i2c", "smbus_reply"),
            ],
        ),
    );

    t.insert(
        "freq",
        CategorySpec::new(
            &["msm_bus", "cpuhp"],
            &[
                ("power", "cpu_frequency"),
                ("power", "gpu_frequency"),
                ("power", "clock_set_rate"),
                ("power", "clock_disable"),
                ("power", "clock_enable"),
                ("power", "cpu_frequency_limits"),
                ("power", "suspend_resume"),
                ("clk", "clk_set_rate"),
                ("clk", "clk_disable"),
                ("clk", "clk_enable"),
            ],
        ),
    );

    t.insert("membus", CategorySpec::new(&["memory_bus"], &[]));

    t.insert("idle", CategorySpec::new(&[], &[("power", "cpu_idle")]));

    t.insert(
        "disk",
        CategorySpec::new(
            &[],
            &[
                ("f2fs", "f2fs_sync_file_enter"),
                ("f2fs", "f2fs_sync_file_exit"),
                ("f2fs", "f2fs_write_begin"),
                ("f2fs", "f2fs_write_end"),
                ("ext4", "ext4_da_write_begin"),
                ("ext4", "ext4_da_write_end"),
                ("ext4", "ext4_sync_file_enter"),
                ("ext4", "ext4_sync_file_exit"),
                ("block", "block_rq_issue"),
                ("block", "block_rq_complete"),
            ],
        ),
    );

    t.insert("mmc", CategorySpec::new(&["mmc"], &[]));

    t.insert("load", CategorySpec::new(&["cpufreq_interactive"], &[]));

    t.insert(
        "sync",
        CategorySpec::new(
            &["sync", "fence", "dma_fence"],
            &[
                ("sync", "sync_pt"),
                ("sync", "sync_timeline"),
                ("sync", "sync_wait"),
                ("fence", "fence_init"),
                ("fence", "fence_destroy"),
                ("fence", "fence_enable_signal"),
                ("fence", "fence_signaled"),
                ("fence", "fence_wait_start"),
                ("fence", "fence_wait_end"),
            ],
        ),
    );

    t.insert(
        "workq",
        CategorySpec::new(
            &["workqueue"],
            &[
                ("workqueue", "workqueue_queue_work"),
                ("workqueue", "workqueue_execute_start"),
                ("workqueue", "workqueue_execute_end"),
                ("workqueue", "workqueue_activate_work"),
            ],
        ),
    );

    t.insert(
        "memreclaim",
        CategorySpec::new(
            &["lowmemorykiller"],
            &[
                ("vmscan", "mm_vmscan_direct_reclaim_begin"),
                ("vmscan", "mm_vmscan_direct_reclaim_end"),
                ("vmscan", "mm_vmscan_kswapd_wake"),
                ("vmscan", "mm_vmscan_kswapd_sleep"),
                ("lowmemorykiller", "lowmemory_kill"),
            ],
        ),
    );

    t.insert(
        "regulators",
        CategorySpec::new(
            &["regulator"],
            &[
                ("regulator", "regulator_set_voltage"),
                ("regulator", "regulator_set_voltage_complete"),
                ("regulator", "regulator_enable"),
                ("regulator", "regulator_enable_delay"),
                ("regulator", "regulator_enable_complete"),
                ("regulator", "regulator_disable"),
                ("regulator", "regulator_disable_complete"),
            ],
        ),
    );

    t.insert(
        "binder_driver",
        CategorySpec::new(
            &[],
            &[
                ("binder", "binder_transaction"),
                ("binder", "binder_transaction_received"),
                ("binder", "binder_transaction_alloc_buf"),
                ("binder", "binder_set_priority"),
            ],
        ),
    );

    t.insert(
        "binder_lock",
        CategorySpec::new(
            &[],
            &[
                ("binder", "binder_lock"),
                ("binder", "binder_locked"),
                ("binder", "binder_unlock"),
            ],
        ),
    );

    t.insert(
        "pagecache",
        CategorySpec::new(
            &["filemap"],
            &[
                ("filemap", "mm_filemap_add_to_page_cache"),
                ("filemap", "mm_filemap_delete_from_page_cache"),
                ("filemap", "filemap_set_wb_err"),
                ("filemap", "file_check_and_advance_wb_err"),
            ],
        ),
    );

    t.insert(
        "memory",
        CategorySpec::new(
            &[],
            &[
                ("kmem", "rss_stat"),
                ("kmem", "ion_heap_grow"),
                ("kmem", "ion_heap_shrink"),
                ("ion", "ion_stat"),
                ("mm_event", "mm_event_record"),
                ("dmabuf_heap", "dma_heap_stat"),
            ],
        ),
    );

    t.insert(
        "thermal",
        CategorySpec::new(
            &[],
            &[
                ("thermal", "thermal_temperature"),
                ("thermal", "cdev_update"),
            ],
        ),
    );

    t
}

/// A vendor-registered extension: an additional mapping merged in after
/// the hard-coded table above.
pub type VendorCategories = HashMap<String, CategorySpec>;

/// Looks up a category in the hard-coded table first, then in `vendor` if
/// supplied. Unknown categories return `None` and are silently ignored by
/// the caller.
pub fn lookup<'a>(
    category: &str,
    vendor: Option<&'a VendorCategories>,
) -> Option<std::borrow::Cow<'a, CategorySpec>> {
    if let Some(spec) = CATEGORY_TABLE.get(category) {
        return Some(std::borrow::Cow::Borrowed(spec));
    }
    vendor
        .and_then(|v| v.get(category))
        .map(|spec| std::borrow::Cow::Owned(spec.clone()))
}
