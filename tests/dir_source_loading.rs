use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use grouplist::{DirSource, GroupListApp, LoadState, Loader, StateStore};

const HIRING: &str = r#"[
    {"id": 755, "listId": 2, "name": ""},
    {"id": 203, "listId": 2, "name": ""},
    {"id": 684, "listId": 1, "name": "Item 684"},
    {"id": 276, "listId": 1, "name": "Item 276"},
    {"id": 736, "listId": 3, "name": null},
    {"id": 926, "listId": 4, "name": null},
    {"id": 808, "listId": 4, "name": "Item 808"},
    {"id": 680, "listId": 3, "name": "Item 680"},
    {"id": 534, "listId": 4, "name": "Item 534"},
    {"id": 906, "listId": 2, "name": "Item 906"}
]"#;

fn observe(store: &StateStore) -> (Arc<Mutex<Vec<LoadState>>>, grouplist::Subscription) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let sub = store.subscribe(move |s| sink.lock().unwrap().push(s.clone()));
    (seen, sub)
}

#[test]
fn loads_json_asset_from_directory() {
    let temp = tempfile::tempdir().expect("failed creating tempdir");
    fs::write(temp.path().join("hiring.json"), HIRING).unwrap();

    let (app, handle) = GroupListApp::launch(temp.path(), "hiring.json");
    handle.wait();

    let state = app.state();
    let result = state.result().expect("ready");
    let shape: Vec<(i64, Vec<i64>)> = result
        .groups()
        .iter()
        .map(|g| (g.group_key(), g.records().iter().map(|r| r.id).collect()))
        .collect();
    assert_eq!(
        shape,
        vec![
            (1, vec![276, 684]),
            (2, vec![906]),
            (3, vec![680]),
            (4, vec![534, 808]),
        ]
    );
}

#[test]
fn missing_file_then_present_file() {
    let temp = tempfile::tempdir().expect("failed creating tempdir");
    let store = StateStore::new();
    let (seen, _sub) = observe(&store);
    let loader = Loader::new(
        Arc::new(DirSource::new(temp.path())),
        store.clone(),
        "hiring.json",
    );

    loader.load().wait();
    {
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], LoadState::Loading);
        assert!(seen[1].failure().is_some());
    }

    fs::write(temp.path().join("hiring.json"), HIRING).unwrap();
    loader.load().wait();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 4);
    assert_eq!(seen[2], LoadState::Loading);
    assert_eq!(seen[3].result().map(|r| r.record_count()), Some(6));
}

#[test]
fn loads_csv_asset_from_directory() {
    let temp = tempfile::tempdir().expect("failed creating tempdir");
    fs::write(
        temp.path().join("hiring.csv"),
        "id,listId,name\n3,1,Item 3\n1,1,Item 1\n2,2,\n",
    )
    .unwrap();

    let loader = Loader::new(
        Arc::new(DirSource::new(temp.path())),
        StateStore::new(),
        "hiring.csv",
    );
    let state = loader.load_blocking();
    let ids: Vec<i64> = state.result().unwrap().records().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn bundled_asset_loads() {
    let assets = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets");
    let loader = Loader::new(
        Arc::new(DirSource::new(assets)),
        StateStore::new(),
        "hiring.json",
    );
    let state = loader.load_blocking();
    let result = state.result().expect("bundled asset should parse");
    assert!(!result.is_empty());
    assert!(result.records().all(|r| r.visible_label().is_some()));
}
