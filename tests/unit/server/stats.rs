use super::*;

#[test]
fn counter_starts_at_zero_and_increments() {
    let stats = ProcessingStats::new();
    assert_eq!(stats.processed_images(), 0);
    assert_eq!(stats.record_success(), 1);
    assert_eq!(stats.record_success(), 2);
    assert_eq!(stats.snapshot().bongo_cat.processed_images, 2);
}

#[test]
fn snapshot_serializes_with_camel_case_keys() {
    let stats = ProcessingStats::new();
    stats.record_success();
    let v = serde_json::to_value(stats.snapshot()).unwrap();
    assert_eq!(v["bongoCat"]["name"], "Bongo Cat");
    assert_eq!(v["bongoCat"]["processedImages"], 1);
    assert!(v["server"]["uptimeSecs"].as_f64().unwrap() >= 0.0);
}

#[test]
fn concurrent_increments_are_not_lost() {
    let stats = std::sync::Arc::new(ProcessingStats::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let s = stats.clone();
            std::thread::spawn(move || {
                for _ in 0..250 {
                    s.record_success();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(stats.processed_images(), 1000);
}
