//! Batch runs with optional content-addressed caching.

use crate::hash::compute_run_id;
use crate::store::RunStore;
use crate::types::{AngleRow, OutcomeCounts, RunManifest};
use crate::ResultsResult;
use ik_kinematics::{BatchSummary, Query, solve_batch};
use ik_project::{ReactionFile, build_solver};
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Clone, Copy)]
pub struct BatchRequest<'a> {
    /// Location of the reaction file; the run store sits next to it
    pub reaction_path: &'a Path,
    pub file: &'a ReactionFile,
    pub queries: &'a [Query],
    pub solver_version: &'a str,
    /// Save the run and reuse stored runs with the same id
    pub store: bool,
    /// Ignored unless `store` is set
    pub use_cache: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunTimingSummary {
    pub build_time_s: f64,
    pub solve_time_s: f64,
    pub save_time_s: f64,
    pub load_cache_time_s: f64,
    pub total_time_s: f64,
}

#[derive(Debug, Clone)]
pub struct BatchResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub rows: Vec<AngleRow>,
    pub loaded_from_cache: bool,
    pub timing: RunTimingSummary,
}

pub fn run_batch(request: &BatchRequest<'_>) -> ResultsResult<BatchResponse> {
    let started = Instant::now();
    let mut timing = RunTimingSummary::default();

    let run_id = compute_run_id(request.file, request.queries, request.solver_version)?;
    let store = if request.store {
        Some(RunStore::for_reaction(request.reaction_path)?)
    } else {
        None
    };

    if let Some(store) = &store
        && request.use_cache
        && store.has_run(&run_id)
    {
        let load_started = Instant::now();
        let manifest = store.load_manifest(&run_id)?;
        let rows = store.load_rows(&run_id)?;
        timing.load_cache_time_s = load_started.elapsed().as_secs_f64();
        timing.total_time_s = started.elapsed().as_secs_f64();
        tracing::info!(%run_id, "loaded cached run");

        return Ok(BatchResponse {
            run_id,
            manifest,
            rows,
            loaded_from_cache: true,
            timing,
        });
    }

    let build_started = Instant::now();
    let solver = build_solver(request.file)?;
    timing.build_time_s = build_started.elapsed().as_secs_f64();

    let solve_started = Instant::now();
    let records = solve_batch(&solver, request.queries);
    timing.solve_time_s = solve_started.elapsed().as_secs_f64();

    let rows: Vec<AngleRow> = records.iter().map(AngleRow::from).collect();
    let manifest = RunManifest {
        run_id: run_id.clone(),
        reaction_name: request.file.name.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        solver_version: request.solver_version.to_string(),
        counts: OutcomeCounts::from(BatchSummary::from_records(&records)),
    };

    if let Some(store) = &store {
        let save_started = Instant::now();
        store.save_run(&manifest, &rows)?;
        timing.save_time_s = save_started.elapsed().as_secs_f64();
    }
    timing.total_time_s = started.elapsed().as_secs_f64();

    Ok(BatchResponse {
        run_id,
        manifest,
        rows,
        loaded_from_cache: false,
        timing,
    })
}
