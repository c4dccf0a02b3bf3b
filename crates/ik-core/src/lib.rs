//! ik-core: shared foundation for isskin.
//!
//! Contains:
//! - units (uom types for field, length and energy + constructors, physical constants)
//! - numeric (Real + tolerances + float helpers)
//! - timing (opt-in wall-clock timers)
//! - error (shared error type)

pub mod error;
pub mod numeric;
pub mod timing;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::*;
