use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use ik_kinematics::Query;
use ik_results::{BatchRequest, RunStore, format_rows, parse_queries, run_batch};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

fn sample_reaction() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../reactions/28mg_dp.yaml")
}

#[test]
fn stored_run_is_reused() {
    let dir = unique_temp_dir("ik_results_service");
    fs::create_dir_all(&dir).unwrap();
    let reaction_path = dir.join("28mg_dp.yaml");
    fs::copy(sample_reaction(), &reaction_path).unwrap();

    let file = ik_project::load_yaml(&reaction_path).unwrap();
    let queries = [
        Query::new(0.0, -20.0),
        Query::new(2.0, -20.0),
        Query::new(25.0, -20.0),
    ];
    let request = BatchRequest {
        reaction_path: &reaction_path,
        file: &file,
        queries: &queries,
        solver_version: "test",
        store: true,
        use_cache: true,
    };

    let first = run_batch(&request).unwrap();
    assert!(!first.loaded_from_cache);
    assert_eq!(first.rows.len(), 3);
    assert_eq!(first.manifest.counts.solved, 2);
    assert_eq!(first.manifest.counts.forbidden, 1);
    let theta = first.rows[0].theta_cm_deg.unwrap();
    assert!((theta - 36.743_367_457_757_98).abs() < 1e-6);

    let second = run_batch(&request).unwrap();
    assert!(second.loaded_from_cache);
    assert_eq!(second.run_id, first.run_id);
    assert_eq!(second.rows, first.rows);
    assert_eq!(format_rows(&second.rows), format_rows(&first.rows));

    let fresh = run_batch(&BatchRequest {
        use_cache: false,
        ..request
    })
    .unwrap();
    assert!(!fresh.loaded_from_cache);

    let store = RunStore::for_reaction(&reaction_path).unwrap();
    assert_eq!(store.list_runs(&file.name).unwrap().len(), 1);
}

#[test]
fn unstored_run_leaves_no_files() {
    let dir = unique_temp_dir("ik_results_nostore");
    fs::create_dir_all(&dir).unwrap();
    let reaction_path = dir.join("28mg_dp.yaml");
    fs::copy(sample_reaction(), &reaction_path).unwrap();

    let file = ik_project::load_yaml(&reaction_path).unwrap();
    let queries = parse_queries("0 -40\n0 0\n1.0 10\n").unwrap();
    let response = run_batch(&BatchRequest {
        reaction_path: &reaction_path,
        file: &file,
        queries: &queries,
        solver_version: "test",
        store: false,
        use_cache: true,
    })
    .unwrap();

    assert_eq!(response.manifest.counts.solved, 3);
    assert!(!dir.join(".isskin").exists());
}
