#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut values = data
        .chunks_exact(8)
        .take(1024)
        .map(|chunk| {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(chunk);
            u64::from_le_bytes(bytes)
        });
    let Some(threshold) = values.next() else {
        return;
    };
    let durations: Vec<u64> = values.collect();

    let snapshot = perfmon::fuzzing::classify_input(threshold, &durations);
    debug_assert_eq!(snapshot.total_count, durations.len() as u64);
    debug_assert_eq!(
        snapshot.satisfied_count + snapshot.tolerated_count + snapshot.unsatisfied_count,
        snapshot.total_count
    );
    debug_assert!((0.0..=1.0).contains(&snapshot.lp_index));
});
