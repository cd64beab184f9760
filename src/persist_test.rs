use super::*;
use crate::element::{Shape, Style};

fn doc(n: usize) -> Vec<Element> {
    (0..n)
        .map(|i| {
            Element::new(
                Shape::Rectangle { x: i as f64, y: 0.0, width: 10.0, height: 10.0 },
                Style::default(),
            )
        })
        .collect()
}

#[test]
fn save_then_load_round_trips() {
    let mut store = MemoryStore::default();
    let elements = doc(3);
    save(&mut store, KEY_ELEMENTS, &elements).unwrap();
    let back: Vec<Element> = load(&store, KEY_ELEMENTS).unwrap();
    assert_eq!(back, elements);
}

#[test]
fn missing_key_loads_as_none() {
    let store = MemoryStore::default();
    let back: Option<Vec<Element>> = load(&store, KEY_ELEMENTS);
    assert!(back.is_none());
}

#[test]
fn malformed_json_loads_as_none() {
    let mut store = MemoryStore::default();
    store.write(KEY_CAMERA, "{not json").unwrap();
    let back: Option<crate::camera::Camera> = load(&store, KEY_CAMERA);
    assert!(back.is_none());
}

#[test]
fn wrong_shape_json_loads_as_none() {
    let mut store = MemoryStore::default();
    store.write(KEY_CAMERA, "[1, 2, 3]").unwrap();
    let back: Option<crate::camera::Camera> = load(&store, KEY_CAMERA);
    assert!(back.is_none());
}

#[test]
fn quota_refusal_surfaces_as_error() {
    let mut store = MemoryStore { quota: Some(8), ..MemoryStore::default() };
    let err = save(&mut store, KEY_ELEMENTS, &doc(3)).unwrap_err();
    assert!(matches!(err, PersistError::QuotaExceeded));
}

#[test]
fn history_save_degrades_to_current_snapshot() {
    let mut history = History::new();
    for i in 1..=20 {
        history.record(doc(i));
    }
    let full = serde_json::to_string(&history).unwrap();
    let current = doc(1);
    let baseline = serde_json::to_string(&History::with_baseline(current.clone())).unwrap();

    // Quota admits the baseline but not the full history.
    let mut store = MemoryStore { quota: Some(baseline.len()), ..MemoryStore::default() };
    assert!(full.len() > baseline.len());
    save_history(&mut store, &history, &current).unwrap();

    let persisted: History = load(&store, KEY_HISTORY).unwrap();
    assert!(!persisted.can_undo());
    assert!(!persisted.can_redo());
}

#[test]
fn history_save_drops_the_key_when_nothing_fits() {
    let mut history = History::new();
    history.record(doc(5));
    let mut store = MemoryStore { quota: Some(4), ..MemoryStore::default() };
    store.write(KEY_HISTORY, "old").unwrap();
    save_history(&mut store, &history, &doc(5)).unwrap();
    assert!(store.read(KEY_HISTORY).is_none());
}

#[test]
fn history_save_stores_everything_when_it_fits() {
    let mut history = History::new();
    history.record(doc(2));
    let mut store = MemoryStore::default();
    save_history(&mut store, &history, &doc(2)).unwrap();
    let persisted: History = load(&store, KEY_HISTORY).unwrap();
    assert!(persisted.can_undo());
}
