//! Integration tests for the weight store and feedback adapter under
//! concurrent access.

use std::sync::Arc;
use std::thread;

use guidecheck::config::{Config, FeedbackConfig, MAX_WEIGHT, MIN_WEIGHT};
use guidecheck::feedback::{read_audit_log, FeedbackAction, FeedbackAdapter};
use guidecheck::weights::WeightStore;

fn file_backed_store(dir: &tempfile::TempDir) -> Arc<WeightStore> {
    let path = dir.path().join("rules.yaml");
    std::fs::write(&path, Config::default().to_yaml().unwrap()).unwrap();
    Arc::new(WeightStore::load(&path).unwrap())
}

#[test]
fn test_concurrent_resolves_lose_no_update() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_backed_store(&dir);
    let adapter = Arc::new(FeedbackAdapter::new(
        Arc::clone(&store),
        dir.path().join("audit.jsonl"),
        FeedbackConfig::default(),
    ));

    const CALLERS: usize = 8;
    let handles: Vec<_> = (0..CALLERS)
        .map(|i| {
            let adapter = Arc::clone(&adapter);
            thread::spawn(move || {
                adapter
                    .record(&format!("G3:Foo.java:{}", i + 1), "G3", FeedbackAction::Resolve)
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Sequential replay: 0.5 + 8 * 0.05, nowhere near the clamp.
    let expected = 0.5 + CALLERS as f64 * 0.05;
    assert!((store.get("G3").unwrap() - expected).abs() < 1e-9);

    let events = read_audit_log(dir.path().join("audit.jsonl")).unwrap();
    assert_eq!(events.len(), CALLERS);
}

#[test]
fn test_mixed_concurrent_feedback_matches_sequential_replay() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_backed_store(&dir);
    let adapter = Arc::new(FeedbackAdapter::new(
        Arc::clone(&store),
        dir.path().join("audit.jsonl"),
        FeedbackConfig::default(),
    ));

    // Four resolves and two dismisses net to zero, and no interleaving
    // of these deltas can reach a clamp boundary from 0.5, so the final
    // value is order-independent.
    let actions = [
        FeedbackAction::Resolve,
        FeedbackAction::Resolve,
        FeedbackAction::Dismiss,
        FeedbackAction::Resolve,
        FeedbackAction::Dismiss,
        FeedbackAction::Resolve,
    ];
    let handles: Vec<_> = actions
        .into_iter()
        .enumerate()
        .map(|(i, action)| {
            let adapter = Arc::clone(&adapter);
            thread::spawn(move || {
                adapter
                    .record(&format!("G4:Bar.java:{}", i + 1), "G4", action)
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert!((store.get("G4").unwrap() - 0.5).abs() < 1e-9);
}

#[test]
fn test_weights_stay_bounded_under_any_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_backed_store(&dir);
    let adapter = FeedbackAdapter::new(
        Arc::clone(&store),
        dir.path().join("audit.jsonl"),
        FeedbackConfig::default(),
    );

    let actions = [
        FeedbackAction::Dismiss,
        FeedbackAction::Dismiss,
        FeedbackAction::Dismiss,
        FeedbackAction::Dismiss,
        FeedbackAction::Dismiss,
        FeedbackAction::Resolve,
        FeedbackAction::Override,
        FeedbackAction::Dismiss,
    ];
    for (i, action) in actions.into_iter().enumerate() {
        adapter
            .record(&format!("G10:Baz.java:{}", i + 1), "G10", action)
            .unwrap();
        let weight = store.get("G10").unwrap();
        assert!((MIN_WEIGHT..=MAX_WEIGHT).contains(&weight));
    }
    assert_eq!(store.get("G10"), Some(MIN_WEIGHT));
}

#[test]
fn test_feedback_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.yaml");
    std::fs::write(&path, Config::default().to_yaml().unwrap()).unwrap();

    {
        let store = Arc::new(WeightStore::load(&path).unwrap());
        let adapter = FeedbackAdapter::new(
            Arc::clone(&store),
            dir.path().join("audit.jsonl"),
            FeedbackConfig::default(),
        );
        adapter
            .record("G2:Qux.java:9", "G2", FeedbackAction::Dismiss)
            .unwrap();
    }

    let reloaded = WeightStore::load(&path).unwrap();
    assert!((reloaded.get("G2").unwrap() - 0.4).abs() < 1e-9);
}

#[test]
fn test_audit_log_outlives_unknown_rules() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_backed_store(&dir);
    let snapshot_before = store.snapshot();
    let adapter = FeedbackAdapter::new(
        Arc::clone(&store),
        dir.path().join("audit.jsonl"),
        FeedbackConfig::default(),
    );

    adapter
        .record("G123:Old.java:1", "G123", FeedbackAction::Resolve)
        .unwrap();

    assert_eq!(store.snapshot(), snapshot_before);
    let events = read_audit_log(dir.path().join("audit.jsonl")).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].rule_id, "G123");
}
