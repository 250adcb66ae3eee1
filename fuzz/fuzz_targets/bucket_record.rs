#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut samples = Vec::new();
    for chunk in data.chunks_exact(9).take(512) {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&chunk[1..9]);
        samples.push((chunk[0], u64::from_le_bytes(bytes)));
    }

    let Ok(window) = perfmon::fuzzing::record_bucket_input(&samples) else {
        return;
    };
    let component_total: u64 = window
        .components
        .iter()
        .map(|component| component.stats.count)
        .sum();
    debug_assert_eq!(component_total, window.aggregate.count);
    debug_assert!(window.aggregate.stddev_ns >= 0.0);
    if let (Some(min), Some(max)) = (window.aggregate.min_ns, window.aggregate.max_ns) {
        debug_assert!(min <= max);
    }
});
