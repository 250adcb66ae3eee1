/// Config filenames checked when `--config` is not given.
pub(crate) const DEFAULT_CONFIG_FILES: [&str; 2] = ["perfmon.toml", "perfmon.json"];

pub(crate) const DEFAULT_COMPONENT_MIN_NS: u64 = 1_000;
pub(crate) const DEFAULT_COMPONENT_MAX_NS: u64 = 20_000;
