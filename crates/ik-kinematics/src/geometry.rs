//! Effective radius of the detector array.
//!
//! The array is a rectangular face at height `h` above the beam axis spanning
//! `[X1, X2]` across it. Averaging the distance `sqrt(h^2 + x^2)` from the axis
//! over the face gives the radius of the equivalent circular array:
//!
//! ```text
//! R = h^2 / (2 (X2 - X1)) [ A sqrt(1 + A^2) + asinh(A) ] from A1 = X1/h to A2 = X2/h
//! ```

use crate::error::{KinematicsError, KinematicsResult};
use ik_core::{Length, cm, ensure_finite, ensure_positive, in_cm};

/// Closed-form average radius (cm) of a flat array face.
pub fn effective_radius_cm(x1_cm: f64, x2_cm: f64, height_cm: f64) -> KinematicsResult<f64> {
    let x1 = ensure_finite(x1_cm, "array X1")?;
    let x2 = ensure_finite(x2_cm, "array X2")?;
    let h = ensure_positive(height_cm, "array height")?;
    if x1 == x2 {
        return Err(KinematicsError::InvalidConfig {
            what: format!("degenerate array geometry: X1 == X2 == {x1} cm"),
        });
    }

    let primitive = |a: f64| a * (1.0 + a * a).sqrt() + a.asinh();
    let (a1, a2) = (x1 / h, x2 / h);
    Ok(h * h / (2.0 * (x2 - x1)) * (primitive(a2) - primitive(a1)))
}

/// Physical extent of the array face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrayGeometry {
    /// Lower edge across the axis
    pub x1: Length,
    /// Upper edge across the axis
    pub x2: Length,
    /// Distance of the face from the beam axis
    pub height: Length,
}

impl ArrayGeometry {
    pub fn from_cm(x1_cm: f64, x2_cm: f64, height_cm: f64) -> Self {
        Self {
            x1: cm(x1_cm),
            x2: cm(x2_cm),
            height: cm(height_cm),
        }
    }

    pub fn effective_radius(&self) -> KinematicsResult<Length> {
        effective_radius_cm(in_cm(self.x1), in_cm(self.x2), in_cm(self.height)).map(cm)
    }
}
