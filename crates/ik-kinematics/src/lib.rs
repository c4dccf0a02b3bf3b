//! Inverse-kinematics solver for a helical-orbit (solenoidal) spectrometer.
//!
//! Converts a measured ejectile position along the beam axis and a recoil
//! excitation energy into the centre-of-mass emission angle. The reaction is
//! described once by an immutable [`AngleSolver`]; each query is a pure
//! computation, so batches run in parallel without coordination.

pub mod batch;
pub mod error;
pub mod geometry;
pub mod newton;
pub mod reaction;
pub mod solver;
pub mod sweeps;

#[cfg(test)]
mod test_support;

pub use batch::{AngleRecord, BatchSummary, SOLVE_CALLS, solve_batch};
pub use error::{ForbiddenReason, KinematicsError, KinematicsResult, QueryError};
pub use geometry::{ArrayGeometry, effective_radius_cm};
pub use newton::{NewtonConfig, NewtonError, NewtonResult, newton_solve};
pub use reaction::{EjectileCm, FrameTransform, Reaction, ReactionMasses};
pub use solver::{
    AngleSolution, AngleSolver, PositionSolution, Query, ReachWindow, Spectrometer,
};
pub use sweeps::{LinearSweep, SweepGrid};
