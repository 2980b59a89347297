use std::fs;
use std::path::Path;
use std::sync::Mutex;

use spool_tracekit::topology::{TOPOLOGY_ENV, TOPOLOGY_FILE};
use spool_tracekit::Topology;

// Tests in this file share the process environment.
static ENV_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn env_var_selects_topology_file() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("line2.toml");
    fs::write(
        &path,
        r#"
stations = ["Cut", "Weld", "NDT"]
witness_stations = ["Weld", "NDT"]
hold_stations = ["NDT"]

[routes]
SW = ["Cut", "Weld", "NDT"]
"#,
    )
    .unwrap();

    std::env::set_var(TOPOLOGY_ENV, &path);
    let loaded = Topology::load();
    std::env::remove_var(TOPOLOGY_ENV);

    let topology = loaded.unwrap();
    assert_eq!(topology.stations(), ["Cut", "Weld", "NDT"]);
    assert!(topology.is_hold_station("NDT"));
    assert_eq!(topology.route("SW").unwrap(), vec!["Cut", "Weld", "NDT"]);
}

#[test]
fn invalid_env_topology_is_an_error_not_the_default() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(
        &path,
        r#"
stations = ["Cut"]
[routes]
SW = ["Cut", "Paint"]
"#,
    )
    .unwrap();

    std::env::set_var(TOPOLOGY_ENV, &path);
    let loaded = Topology::load();
    std::env::remove_var(TOPOLOGY_ENV);

    let err = loaded.unwrap_err();
    assert!(err.is_topology_fault());
    assert!(err.to_string().contains("'Paint'"));
}

#[test]
fn missing_env_topology_file_is_an_error() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();

    std::env::set_var(TOPOLOGY_ENV, dir.path().join("absent.toml"));
    let loaded = Topology::load();
    std::env::remove_var(TOPOLOGY_ENV);

    assert!(loaded.is_err());
}

#[test]
fn no_env_and_no_local_file_uses_builtin_shopfloor() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    std::env::remove_var(TOPOLOGY_ENV);
    assert!(!Path::new(TOPOLOGY_FILE).exists());

    let topology = Topology::load().unwrap();
    assert_eq!(topology.stations().len(), 14);
    assert_eq!(topology.to_config(), Topology::default().to_config());
}
