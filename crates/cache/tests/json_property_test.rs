//! Property tests for the JSON convenience layer

use proptest::prelude::*;
use serde_json::{json, Value};
use tabstore_cache::{MemoryBackend, StorageManager};

/// Arbitrary JSON documents (integers only, so values compare exactly)
fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 _\\-]{0,24}".prop_map(Value::String),
    ];

    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..6)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn prop_json_round_trip(key in "[a-z][a-z0-9-]{0,16}", value in arb_json()) {
        let manager = StorageManager::with_backend(MemoryBackend::new()).unwrap();

        prop_assert!(manager.safe_save_to_storage(&key, &value));
        prop_assert_eq!(manager.safe_get_from_storage(&key), Some(value));
    }
}

#[test]
fn test_edge_values_round_trip() {
    let manager = StorageManager::with_backend(MemoryBackend::new()).unwrap();

    for value in [json!({}), json!([]), json!(null), json!(false), json!({"a": [1, {"b": "c"}]})] {
        assert!(manager.safe_save_to_storage("doc", &value));
        assert_eq!(manager.safe_get_from_storage("doc"), Some(value));
    }
    assert_eq!(manager.safe_get_from_storage("missing"), None);
}

#[test]
fn test_typed_round_trip() {
    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Preferences {
        theme: String,
        font_size: u8,
    }

    let manager = StorageManager::with_backend(MemoryBackend::new()).unwrap();
    let preferences = Preferences {
        theme: "dark".into(),
        font_size: 14,
    };

    assert!(manager.save_json("user-preferences", &preferences));
    assert_eq!(manager.load_json::<Preferences>("user-preferences"), Some(preferences));
    assert_eq!(manager.load_json::<Vec<u8>>("user-preferences"), None);
}
