//! Result data types.

use crate::table::status_tag;
use ik_kinematics::{AngleRecord, BatchSummary};
use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: RunId,
    pub reaction_name: String,
    pub timestamp: String,
    pub solver_version: String,
    pub counts: OutcomeCounts,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub total: usize,
    pub solved: usize,
    pub forbidden: usize,
    pub not_converged: usize,
    pub invalid: usize,
}

impl From<BatchSummary> for OutcomeCounts {
    fn from(s: BatchSummary) -> Self {
        Self {
            total: s.total,
            solved: s.solved,
            forbidden: s.forbidden,
            not_converged: s.not_converged,
            invalid: s.invalid,
        }
    }
}

/// One stored query outcome. Failed queries keep only their inputs and status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AngleRow {
    pub ex_mev: f64,
    pub z_cm: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theta_cm_deg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theta_lab_deg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ke_lab_mev: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residual_cm: Option<f64>,
    pub status: String,
}

impl From<&AngleRecord> for AngleRow {
    fn from(record: &AngleRecord) -> Self {
        let solution = record.outcome.as_ref().ok();
        Self {
            ex_mev: record.query.ex_mev,
            z_cm: record.query.z_cm,
            theta_cm_deg: solution.map(|s| s.theta_cm_deg),
            theta_lab_deg: solution.map(|s| s.theta_lab_deg),
            ke_lab_mev: solution.map(|s| s.ejectile_lab_energy_mev),
            iterations: solution.map(|s| s.iterations),
            residual_cm: solution.map(|s| s.residual_cm),
            status: status_tag(&record.outcome),
        }
    }
}

impl AngleRow {
    pub fn is_solved(&self) -> bool {
        self.theta_cm_deg.is_some()
    }
}
