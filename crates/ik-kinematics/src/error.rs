//! Error types for kinematics configuration and per-query outcomes.

use ik_core::CoreError;
use std::fmt;
use thiserror::Error;

/// Errors raised while building a solver configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KinematicsError {
    #[error("Invalid configuration: {what}")]
    InvalidConfig { what: String },

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

pub type KinematicsResult<T> = Result<T, KinematicsError>;

impl From<KinematicsError> for CoreError {
    fn from(e: KinematicsError) -> Self {
        match e {
            KinematicsError::InvalidConfig { what } => CoreError::InvalidArg { what },
            KinematicsError::Core(inner) => inner,
        }
    }
}

/// Why a query has no physical solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForbiddenReason {
    /// Excitation energy leaves no energy for the ejectile (`E3_cm < m3`).
    AboveThreshold,
    /// No first-revolution orbit returns to the array at this position.
    OutOfReach,
    /// Orbit diameter is smaller than the array radius.
    OrbitTooSmall,
}

impl ForbiddenReason {
    pub fn tag(self) -> &'static str {
        match self {
            Self::AboveThreshold => "above-threshold",
            Self::OutOfReach => "out-of-reach",
            Self::OrbitTooSmall => "orbit-too-small",
        }
    }
}

impl fmt::Display for ForbiddenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Failed outcome of a single query. Never fatal to a batch.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum QueryError {
    #[error("Forbidden kinematics at Ex = {ex_mev} MeV: {reason}")]
    Forbidden { ex_mev: f64, reason: ForbiddenReason },

    #[error("Did not converge after {iterations} iterations (residual = {residual:e} cm)")]
    NotConverged { iterations: usize, residual: f64 },

    #[error("Invalid input: {what}")]
    InvalidInput { what: &'static str },
}

impl QueryError {
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden { .. })
    }

    pub fn is_not_converged(&self) -> bool {
        matches!(self, Self::NotConverged { .. })
    }
}
