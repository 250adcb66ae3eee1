#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(duration) = perfmon::fuzzing::parse_duration_value_input(input) {
            debug_assert!(duration.as_millis() > 0);
        }
        if let Ok(component) = perfmon::fuzzing::parse_component_input(input) {
            debug_assert!(component.min_ns <= component.max_ns);
        }
        if let Ok(value) = perfmon::fuzzing::parse_positive_u64_input(input) {
            debug_assert!(value >= 1);
        }
    }
});
