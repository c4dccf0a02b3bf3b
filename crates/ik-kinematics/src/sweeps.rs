//! Linear parameter sweeps over excitation energy and position.
//!
//! Used to build lookup tables and calibration curves from the solver.

use crate::error::{KinematicsError, KinematicsResult};
use crate::solver::Query;
use ik_core::ensure_finite;
use std::fmt;

/// Uniformly spaced points from `start` to `end` inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearSweep {
    pub start: f64,
    pub end: f64,
    pub num_points: usize,
}

impl LinearSweep {
    pub fn new(start: f64, end: f64, num_points: usize) -> KinematicsResult<Self> {
        ensure_finite(start, "sweep start")?;
        ensure_finite(end, "sweep end")?;

        if num_points == 0 {
            return Err(KinematicsError::InvalidConfig {
                what: "sweep must have at least 1 point".to_string(),
            });
        }
        if num_points > 1 && (start - end).abs() < 1e-12 {
            return Err(KinematicsError::InvalidConfig {
                what: "start and end values must be different".to_string(),
            });
        }

        Ok(Self {
            start,
            end,
            num_points,
        })
    }

    /// A single fixed value.
    pub fn fixed(value: f64) -> KinematicsResult<Self> {
        Self::new(value, value, 1)
    }

    pub fn generate_points(&self) -> Vec<f64> {
        if self.num_points <= 1 {
            return vec![self.start];
        }

        let delta = (self.end - self.start) / (self.num_points - 1) as f64;
        let mut points: Vec<f64> = (0..self.num_points)
            .map(|i| self.start + i as f64 * delta)
            .collect();

        // Ensure exact endpoint
        points[self.num_points - 1] = self.end;
        points
    }
}

impl fmt::Display for LinearSweep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {} ({} points)",
            self.start, self.end, self.num_points
        )
    }
}

/// Cartesian grid of excitation energies and positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepGrid {
    pub ex_mev: LinearSweep,
    pub z_cm: LinearSweep,
}

impl SweepGrid {
    pub fn len(&self) -> usize {
        self.ex_mev.num_points * self.z_cm.num_points
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Queries in excitation-energy-major order.
    pub fn queries(&self) -> Vec<Query> {
        let zs = self.z_cm.generate_points();
        self.ex_mev
            .generate_points()
            .into_iter()
            .flat_map(|ex| zs.iter().map(move |&z| Query::new(ex, z)))
            .collect()
    }
}
