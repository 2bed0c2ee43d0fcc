//! Snapshots of a shared value tree taken while another thread keeps
//! mutating it. Every snapshot must be a complete, consistent tree that
//! belongs to the reader alone.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use pdecl_core::{deep_copy, SharedValue};
use serde_json::{json, Value};

fn base_tree() -> Value {
    json!({
        "type": "object",
        "properties": {
            "message": {"type": "string"},
            "status": {"type": "number"}
        }
    })
}

#[test]
fn snapshots_stay_consistent_under_concurrent_writes() {
    let shared = SharedValue::new(base_tree());
    let stop = AtomicBool::new(false);

    thread::scope(|s| {
        let writer = shared.clone();
        let stop_ref = &stop;
        s.spawn(move || {
            let mut i = 0u64;
            while !stop_ref.load(Ordering::Relaxed) {
                writer.update(|tree| {
                    if let Some(props) = tree["properties"].as_object_mut() {
                        props.insert(format!("dynamic_{i}"), json!({"type": "string"}));
                        if props.len() > 16 {
                            props.retain(|k, _| !k.starts_with("dynamic_"));
                        }
                    }
                });
                i += 1;
            }
        });

        let readers: Vec<_> = (0..8)
            .map(|_| {
                let reader = shared.clone();
                s.spawn(move || {
                    for _ in 0..500 {
                        let snap = reader.snapshot();
                        let props = snap["properties"].as_object().expect("properties");
                        assert!(props.contains_key("message"));
                        assert!(props.contains_key("status"));
                        assert_eq!(props["status"]["type"], "number");
                        for (key, sub) in props {
                            if key != "status" {
                                assert_eq!(sub["type"], "string");
                            }
                        }
                    }
                })
            })
            .collect();

        let results: Vec<_> = readers.into_iter().map(|r| r.join()).collect();
        stop.store(true, Ordering::Relaxed);
        assert!(results.iter().all(Result::is_ok), "reader thread panicked");
    });
}

#[test]
fn snapshot_does_not_observe_later_writes() {
    let shared = SharedValue::new(base_tree());
    let snap = shared.snapshot();

    shared.update(|tree| {
        tree["properties"]
            .as_object_mut()
            .unwrap()
            .remove("message");
    });

    assert!(snap["properties"].get("message").is_some());
    assert!(shared.snapshot()["properties"].get("message").is_none());
}

#[test]
fn deep_copy_of_same_reference_from_many_threads() {
    let tree = base_tree();
    thread::scope(|s| {
        for _ in 0..50 {
            s.spawn(|| {
                let copied = deep_copy(&tree);
                assert_eq!(copied, tree);
            });
        }
    });
}
