#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(args) = perfmon::fuzzing::apply_config_from_toml(input) {
            debug_assert!(args.threshold_ns.get() >= 1);
            debug_assert!(!args.report_interval.is_zero());
            for component in &args.components {
                debug_assert!(!component.name.is_empty());
                debug_assert!(component.min_ns <= component.max_ns);
            }
        }
    }
});
