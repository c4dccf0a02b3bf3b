//! Parallel evaluation of independent queries.

use crate::error::QueryError;
use crate::solver::{AngleSolution, AngleSolver, Query};
use ik_core::timing::AccumulatingTimer;
use rayon::prelude::*;

/// Per-query solve time, recorded while timing is enabled.
pub static SOLVE_CALLS: AccumulatingTimer = AccumulatingTimer::new();

/// A query and its outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct AngleRecord {
    pub query: Query,
    pub outcome: Result<AngleSolution, QueryError>,
}

/// Outcome counts over a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub solved: usize,
    pub forbidden: usize,
    pub not_converged: usize,
    pub invalid: usize,
}

impl BatchSummary {
    pub fn from_records(records: &[AngleRecord]) -> Self {
        records
            .iter()
            .fold(Self::default(), |mut summary, record| {
                summary.total += 1;
                match &record.outcome {
                    Ok(_) => summary.solved += 1,
                    Err(QueryError::Forbidden { .. }) => summary.forbidden += 1,
                    Err(QueryError::NotConverged { .. }) => summary.not_converged += 1,
                    Err(QueryError::InvalidInput { .. }) => summary.invalid += 1,
                }
                summary
            })
    }
}

/// Solve every query in parallel. Records come back in input order and a
/// failed query never affects the others.
pub fn solve_batch(solver: &AngleSolver, queries: &[Query]) -> Vec<AngleRecord> {
    let records: Vec<AngleRecord> = queries
        .par_iter()
        .map(|&query| {
            let outcome = SOLVE_CALLS.time(|| solver.solve_query(query));
            if let Err(err) = &outcome {
                tracing::debug!(ex_mev = query.ex_mev, z_cm = query.z_cm, %err, "query failed");
            }
            AngleRecord { query, outcome }
        })
        .collect();

    let summary = BatchSummary::from_records(&records);
    tracing::info!(
        total = summary.total,
        solved = summary.solved,
        forbidden = summary.forbidden,
        not_converged = summary.not_converged,
        invalid = summary.invalid,
        "batch solved"
    );
    records
}
