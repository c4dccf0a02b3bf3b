//! Centre-of-mass angle solver for a helical-orbit spectrometer.
//!
//! An ejectile leaving the target on the beam axis follows a helix in the
//! solenoid field. After an orbit phase `phi = k z / p_para_lab` its distance
//! from the axis is the chord `(2 p_perp / k) sin(phi / 2)`, where
//! `k = q B` in MeV/cm. The array registers the ejectile where this chord
//! equals the array radius on the way back to the axis, i.e. for
//! `pi < phi < 2 pi`.
//!
//! Given a measured position `z` and the recoil excitation energy, the solver
//! finds the CM parallel momentum `u` satisfying
//!
//! ```text
//! f(u) = (2 p_perp(u) / k) sin(k z / (2 gamma (u + beta E3))) - R = 0,
//! p_perp(u) = sqrt(p3^2 - u^2)
//! ```
//!
//! with Newton-Raphson, and reports `theta_cm = 180 - acos(u / p3)` in degrees.

use crate::error::{ForbiddenReason, KinematicsError, KinematicsResult, QueryError};
use crate::geometry::ArrayGeometry;
use crate::newton::{NewtonConfig, NewtonError, newton_solve};
use crate::reaction::{EjectileCm, FrameTransform, Reaction};
use ik_core::constants::rigidity_mev_per_cm;
use ik_core::{Length, MagField, ensure_nonzero, ensure_positive, in_cm, in_tesla, sqrt_diff_squares};
use std::f64::consts::{PI, TAU};

/// Field, ejectile charge state and array radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spectrometer {
    pub field: MagField,
    /// Ejectile charge in units of e
    pub ejectile_charge: u32,
    /// Effective radius of the detector array
    pub array_radius: Length,
}

impl Spectrometer {
    /// Spectrometer whose radius is derived from the array face geometry.
    pub fn with_array(
        field: MagField,
        ejectile_charge: u32,
        geometry: &ArrayGeometry,
    ) -> KinematicsResult<Self> {
        Ok(Self {
            field,
            ejectile_charge,
            array_radius: geometry.effective_radius()?,
        })
    }

    pub fn validate(&self) -> KinematicsResult<()> {
        ensure_nonzero(in_tesla(self.field), "magnetic field")?;
        ensure_positive(in_cm(self.array_radius), "array radius")?;
        if self.ejectile_charge == 0 {
            return Err(KinematicsError::InvalidConfig {
                what: "ejectile charge must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}

/// One measurement: recoil excitation energy and axial position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Query {
    pub ex_mev: f64,
    pub z_cm: f64,
}

impl Query {
    pub fn new(ex_mev: f64, z_cm: f64) -> Self {
        Self { ex_mev, z_cm }
    }
}

/// Converged solution of one query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleSolution {
    /// Emission angle in the CM frame (degrees)
    pub theta_cm_deg: f64,
    /// Emission angle in the lab frame (degrees)
    pub theta_lab_deg: f64,
    /// Ejectile kinetic energy in the lab (MeV)
    pub ejectile_lab_energy_mev: f64,
    /// CM momentum along the beam axis (MeV/c)
    pub p_para_cm: f64,
    /// CM momentum transverse to the beam axis (MeV/c)
    pub p_perp_cm: f64,
    /// Orbit residual at the solution (cm)
    pub residual_cm: f64,
    /// Newton steps taken
    pub iterations: usize,
}

/// Forward kinematics: where an ejectile at a given CM angle lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSolution {
    /// Axial position at the array (cm)
    pub z_cm: f64,
    pub theta_lab_deg: f64,
    pub ejectile_lab_energy_mev: f64,
    /// Cyclotron radius of the orbit (cm)
    pub orbit_radius_cm: f64,
}

/// Axial positions an ejectile can reach on its first revolution for one
/// excitation energy, with the CM angles at the extremes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReachWindow {
    pub z_min_cm: f64,
    pub theta_at_min_deg: f64,
    pub z_max_cm: f64,
    pub theta_at_max_deg: f64,
}

impl ReachWindow {
    pub fn contains(&self, z_cm: f64) -> bool {
        z_cm >= self.z_min_cm && z_cm <= self.z_max_cm
    }
}

/// Samples of the forward map when locating the reach window.
const REACH_SAMPLES: usize = 1800;
const GOLDEN_ITERS: usize = 80;

/// Maximise `g` on `[a, b]` by golden-section search.
fn golden_max(g: impl Fn(f64) -> f64, mut a: f64, mut b: f64) -> (f64, f64) {
    let ratio = (5.0_f64.sqrt() - 1.0) / 2.0;
    let mut c = b - ratio * (b - a);
    let mut d = a + ratio * (b - a);
    let (mut gc, mut gd) = (g(c), g(d));
    for _ in 0..GOLDEN_ITERS {
        if gc >= gd {
            b = d;
            d = c;
            gd = gc;
            c = b - ratio * (b - a);
            gc = g(c);
        } else {
            a = c;
            c = d;
            gc = gd;
            d = a + ratio * (b - a);
            gd = g(d);
        }
    }
    if gc >= gd { (c, gc) } else { (d, gd) }
}

fn check_query(ex_mev: f64, z_cm: f64) -> Result<(), QueryError> {
    if !ex_mev.is_finite() {
        return Err(QueryError::InvalidInput {
            what: "excitation energy",
        });
    }
    if !z_cm.is_finite() {
        return Err(QueryError::InvalidInput { what: "position" });
    }
    Ok(())
}

/// Orbit equation for one `(ex, z)` query.
struct OrbitEquation {
    rigidity: f64,
    z_cm: f64,
    gamma: f64,
    beta_e3: f64,
    p3: f64,
    radius_cm: f64,
}

impl OrbitEquation {
    /// `(f, df/du)`, or `None` where `p_perp` would be imaginary.
    fn eval(&self, u: f64) -> Option<(f64, f64)> {
        let p_perp = sqrt_diff_squares(self.p3, u)?;
        let w = u + self.beta_e3;
        let s = self.rigidity * self.z_cm / (2.0 * self.gamma * w);
        let (sin_s, cos_s) = s.sin_cos();
        let f = 2.0 * p_perp / self.rigidity * sin_s - self.radius_cm;
        let ds_du = -s / w;
        let df = 2.0 / self.rigidity * (-(u / p_perp) * sin_s + p_perp * cos_s * ds_du);
        Some((f, df))
    }
}

/// Immutable solver for one reaction and spectrometer setting.
///
/// All frame quantities are derived in [`AngleSolver::new`]; queries only read
/// them, so a solver can be shared across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct AngleSolver {
    reaction: Reaction,
    spectrometer: Spectrometer,
    newton: NewtonConfig,
    frame: FrameTransform,
    rigidity: f64,
    radius_cm: f64,
}

impl AngleSolver {
    pub fn new(
        reaction: Reaction,
        spectrometer: Spectrometer,
        newton: NewtonConfig,
    ) -> KinematicsResult<Self> {
        spectrometer.validate()?;
        ensure_positive(newton.abs_tol, "solver tolerance")?;
        if newton.max_iterations == 0 {
            return Err(KinematicsError::InvalidConfig {
                what: "iteration cap must be positive".to_string(),
            });
        }
        if !(newton.line_search_beta > 0.0 && newton.line_search_beta < 1.0) {
            return Err(KinematicsError::InvalidConfig {
                what: format!(
                    "line search factor must lie in (0, 1) (got {})",
                    newton.line_search_beta
                ),
            });
        }

        let frame = FrameTransform::from_reaction(&reaction)?;
        // Chord geometry only depends on |B|
        let rigidity =
            rigidity_mev_per_cm(in_tesla(spectrometer.field).abs(), spectrometer.ejectile_charge);
        let radius_cm = in_cm(spectrometer.array_radius);

        Ok(Self {
            reaction,
            spectrometer,
            newton,
            frame,
            rigidity,
            radius_cm,
        })
    }

    pub fn reaction(&self) -> &Reaction {
        &self.reaction
    }

    pub fn spectrometer(&self) -> &Spectrometer {
        &self.spectrometer
    }

    pub fn newton_config(&self) -> &NewtonConfig {
        &self.newton
    }

    pub fn frame(&self) -> &FrameTransform {
        &self.frame
    }

    /// `q B` in MeV/cm.
    pub fn rigidity_mev_per_cm(&self) -> f64 {
        self.rigidity
    }

    pub fn array_radius_cm(&self) -> f64 {
        self.radius_cm
    }

    pub fn solve_query(&self, query: Query) -> Result<AngleSolution, QueryError> {
        self.solve(query.ex_mev, query.z_cm)
    }

    /// CM emission angle for excitation energy `ex_mev` measured at `z_cm`.
    pub fn solve(&self, ex_mev: f64, z_cm: f64) -> Result<AngleSolution, QueryError> {
        check_query(ex_mev, z_cm)?;

        let ejectile = self.frame.ejectile_cm(ex_mev)?;
        let forbidden = |reason| QueryError::Forbidden { ex_mev, reason };

        if z_cm == 0.0 {
            return self.solve_transverse(ex_mev, &ejectile);
        }

        let orbit = self.orbit_equation(&ejectile, z_cm);

        // One full turn: p_para_lab = k z / (2 pi)
        let p_para_lab_guess = self.rigidity * z_cm / TAU;
        let u0 = p_para_lab_guess / self.frame.gamma - self.frame.beta * ejectile.energy;
        if !(u0.abs() < ejectile.momentum) {
            return Err(forbidden(ForbiddenReason::OutOfReach));
        }

        let root = newton_solve(u0, |u| orbit.eval(u), &self.newton).map_err(|e| match e {
            NewtonError::InadmissibleStart { .. } => forbidden(ForbiddenReason::OutOfReach),
            other => {
                let (iterations, residual) = other.progress().unwrap_or((0, f64::NAN));
                tracing::debug!(ex_mev, z_cm, error = %other, "newton failed");
                self.classify_failure(ex_mev, z_cm, iterations, residual)
            }
        })?;

        let u = root.x;
        let p_para_lab = self.frame.para_to_lab(&ejectile, u);
        let phase = self.rigidity * z_cm / p_para_lab;
        if !(phase > PI && phase < TAU) {
            tracing::debug!(ex_mev, z_cm, phase, "root outside the returning half-turn");
            return Err(self.classify_failure(ex_mev, z_cm, root.iterations, root.residual));
        }

        let p_perp = sqrt_diff_squares(ejectile.momentum, u)
            .ok_or_else(|| forbidden(ForbiddenReason::OutOfReach))?;
        Ok(self.solution(&ejectile, u, p_perp, root.residual, root.iterations))
    }

    /// Orbit residual `f(p_para_cm)` in cm for a query.
    pub fn residual(&self, ex_mev: f64, z_cm: f64, p_para_cm: f64) -> Result<f64, QueryError> {
        check_query(ex_mev, z_cm)?;
        if !p_para_cm.is_finite() {
            return Err(QueryError::InvalidInput {
                what: "parallel momentum",
            });
        }
        let ejectile = self.frame.ejectile_cm(ex_mev)?;
        if z_cm == 0.0 {
            let p_perp = sqrt_diff_squares(ejectile.momentum, p_para_cm).ok_or(
                QueryError::Forbidden {
                    ex_mev,
                    reason: ForbiddenReason::OutOfReach,
                },
            )?;
            // Limit of f as p_para_lab -> 0 on the returning half-turn
            return Ok(if 2.0 * p_perp / self.rigidity >= self.radius_cm {
                0.0
            } else {
                2.0 * p_perp / self.rigidity - self.radius_cm
            });
        }
        self.orbit_equation(&ejectile, z_cm)
            .eval(p_para_cm)
            .map(|(f, _)| f)
            .ok_or(QueryError::Forbidden {
                ex_mev,
                reason: ForbiddenReason::OutOfReach,
            })
    }

    /// Axial position at which an ejectile emitted at `theta_cm_deg` reaches
    /// the array on its first revolution.
    pub fn position_for_angle(
        &self,
        ex_mev: f64,
        theta_cm_deg: f64,
    ) -> Result<PositionSolution, QueryError> {
        if !ex_mev.is_finite() {
            return Err(QueryError::InvalidInput {
                what: "excitation energy",
            });
        }
        if !(theta_cm_deg > 0.0 && theta_cm_deg < 180.0) {
            return Err(QueryError::InvalidInput {
                what: "CM angle must lie in (0, 180) degrees",
            });
        }

        let ejectile = self.frame.ejectile_cm(ex_mev)?;
        let theta = theta_cm_deg.to_radians();
        let u = -ejectile.momentum * theta.cos();
        let p_perp = ejectile.momentum * theta.sin();

        let x = self.rigidity * self.radius_cm / (2.0 * p_perp);
        if x > 1.0 {
            return Err(QueryError::Forbidden {
                ex_mev,
                reason: ForbiddenReason::OrbitTooSmall,
            });
        }
        let phase = TAU - 2.0 * x.asin();
        let p_para_lab = self.frame.para_to_lab(&ejectile, u);
        let solution = self.solution(&ejectile, u, p_perp, 0.0, 0);

        Ok(PositionSolution {
            z_cm: p_para_lab * phase / self.rigidity,
            theta_lab_deg: solution.theta_lab_deg,
            ejectile_lab_energy_mev: solution.ejectile_lab_energy_mev,
            orbit_radius_cm: p_perp / self.rigidity,
        })
    }

    /// First-revolution reach window for one excitation energy.
    ///
    /// Samples the forward map over the open angle range and refines both
    /// extremes by golden-section search between neighbouring samples.
    pub fn reach(&self, ex_mev: f64) -> Result<ReachWindow, QueryError> {
        if !ex_mev.is_finite() {
            return Err(QueryError::InvalidInput {
                what: "excitation energy",
            });
        }
        self.frame.ejectile_cm(ex_mev)?;

        let z_at = |theta: f64| -> Option<f64> {
            if theta > 0.0 && theta < 180.0 {
                self.position_for_angle(ex_mev, theta).ok().map(|p| p.z_cm)
            } else {
                None
            }
        };

        let step = 180.0 / REACH_SAMPLES as f64;
        let mut lowest: Option<(f64, f64)> = None;
        let mut highest: Option<(f64, f64)> = None;
        for i in 1..REACH_SAMPLES {
            let theta = i as f64 * step;
            let Some(z) = z_at(theta) else { continue };
            if lowest.is_none_or(|(_, lo)| z < lo) {
                lowest = Some((theta, z));
            }
            if highest.is_none_or(|(_, hi)| z > hi) {
                highest = Some((theta, z));
            }
        }
        let (Some((theta_lo, z_lo)), Some((theta_hi, z_hi))) = (lowest, highest) else {
            return Err(QueryError::Forbidden {
                ex_mev,
                reason: ForbiddenReason::OrbitTooSmall,
            });
        };

        let (theta_max, z_max) = golden_max(
            |t| z_at(t).unwrap_or(f64::NEG_INFINITY),
            theta_hi - step,
            theta_hi + step,
        );
        let (theta_min, neg_z_min) = golden_max(
            |t| z_at(t).map_or(f64::NEG_INFINITY, |z| -z),
            theta_lo - step,
            theta_lo + step,
        );

        let (theta_at_max_deg, z_max_cm) = if z_max > z_hi {
            (theta_max, z_max)
        } else {
            (theta_hi, z_hi)
        };
        let (theta_at_min_deg, z_min_cm) = if -neg_z_min < z_lo {
            (theta_min, -neg_z_min)
        } else {
            (theta_lo, z_lo)
        };

        Ok(ReachWindow {
            z_min_cm,
            theta_at_min_deg,
            z_max_cm,
            theta_at_max_deg,
        })
    }

    /// A failed solve outside the reach window is physically impossible;
    /// inside it the query is only numerically difficult.
    fn classify_failure(
        &self,
        ex_mev: f64,
        z_cm: f64,
        iterations: usize,
        residual: f64,
    ) -> QueryError {
        match self.reach(ex_mev) {
            Ok(window) if window.contains(z_cm) => QueryError::NotConverged {
                iterations,
                residual,
            },
            _ => QueryError::Forbidden {
                ex_mev,
                reason: ForbiddenReason::OutOfReach,
            },
        }
    }

    fn orbit_equation(&self, ejectile: &EjectileCm, z_cm: f64) -> OrbitEquation {
        OrbitEquation {
            rigidity: self.rigidity,
            z_cm,
            gamma: self.frame.gamma,
            beta_e3: self.frame.beta * ejectile.energy,
            p3: ejectile.momentum,
            radius_cm: self.radius_cm,
        }
    }

    /// `z == 0`: emission at 90 degrees in the lab, `p_para_lab = 0`.
    fn solve_transverse(
        &self,
        ex_mev: f64,
        ejectile: &EjectileCm,
    ) -> Result<AngleSolution, QueryError> {
        let u = -self.frame.beta * ejectile.energy;
        let forbidden = |reason| QueryError::Forbidden { ex_mev, reason };
        let p_perp = sqrt_diff_squares(ejectile.momentum, u)
            .ok_or_else(|| forbidden(ForbiddenReason::OutOfReach))?;
        if 2.0 * p_perp / self.rigidity < self.radius_cm {
            return Err(forbidden(ForbiddenReason::OrbitTooSmall));
        }
        Ok(self.solution(ejectile, u, p_perp, 0.0, 0))
    }

    fn solution(
        &self,
        ejectile: &EjectileCm,
        u: f64,
        p_perp: f64,
        residual_cm: f64,
        iterations: usize,
    ) -> AngleSolution {
        let cos_cm = (u / ejectile.momentum).clamp(-1.0, 1.0);
        let p_para_lab = self.frame.para_to_lab(ejectile, u);
        let e_lab = self.frame.energy_to_lab(ejectile, u);

        AngleSolution {
            theta_cm_deg: 180.0 - cos_cm.acos().to_degrees(),
            theta_lab_deg: p_perp.atan2(p_para_lab).to_degrees(),
            ejectile_lab_energy_mev: e_lab - self.frame.m3,
            p_para_cm: u,
            p_perp_cm: p_perp,
            residual_cm,
            iterations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::mg28_dp_solver as solver;
    use ik_core::{cm, tesla};

    #[test]
    fn orbit_derivative_matches_finite_difference() {
        let s = solver();
        let ejectile = s.frame().ejectile_cm(0.0).unwrap();
        let orbit = s.orbit_equation(&ejectile, -20.0);
        for u in [-160.0, -150.0, -120.0] {
            let (_, df) = orbit.eval(u).unwrap();
            let h = 1e-5;
            let (fp, _) = orbit.eval(u + h).unwrap();
            let (fm, _) = orbit.eval(u - h).unwrap();
            let fd = (fp - fm) / (2.0 * h);
            assert!((df - fd).abs() < 1e-6 * df.abs().max(1.0), "u={u}: {df} vs {fd}");
        }
    }

    #[test]
    fn orbit_is_inadmissible_beyond_p3() {
        let s = solver();
        let ejectile = s.frame().ejectile_cm(0.0).unwrap();
        let orbit = s.orbit_equation(&ejectile, -20.0);
        assert!(orbit.eval(-ejectile.momentum - 1.0).is_none());
    }

    #[test]
    fn reference_query_converges() {
        let solution = solver().solve(0.0, -20.0).unwrap();
        assert!((solution.theta_cm_deg - 36.743_367_457_757_98).abs() < 1e-6);
        assert!(solution.residual_cm.abs() < 1e-5);
        assert_eq!(solution.iterations, 2);
    }

    #[test]
    fn lab_diagnostics_for_reference_query() {
        let solution = solver().solve(0.0, -20.0).unwrap();
        assert!((solution.theta_lab_deg - 102.136_893_59).abs() < 1e-4);
        assert!((solution.ejectile_lab_energy_mev - 7.006_271_29).abs() < 1e-4);
        assert!(solution.p_perp_cm > 0.0);
    }

    #[test]
    fn zero_position_is_transverse_emission() {
        let s = solver();
        let solution = s.solve(0.0, 0.0).unwrap();
        assert!((solution.theta_cm_deg - 47.639_057_399_901_19).abs() < 1e-9);
        assert!((solution.theta_lab_deg - 90.0).abs() < 1e-9);
        assert_eq!(solution.iterations, 0);
        assert_eq!(s.residual(0.0, 0.0, solution.p_para_cm).unwrap(), 0.0);
    }

    #[test]
    fn forbidden_excitation() {
        let err = solver().solve(25.0, -20.0).unwrap_err();
        assert_eq!(
            err,
            QueryError::Forbidden {
                ex_mev: 25.0,
                reason: ForbiddenReason::AboveThreshold
            }
        );
    }

    #[test]
    fn unreachable_positions_are_forbidden() {
        let s = solver();
        // Beyond the full-turn reach
        let err = s.solve(0.0, -60.0).unwrap_err();
        assert!(matches!(
            err,
            QueryError::Forbidden {
                reason: ForbiddenReason::OutOfReach,
                ..
            }
        ));
        // Full-turn guess is admissible but no returning orbit exists
        let err = s.solve(0.0, -50.0).unwrap_err();
        assert!(matches!(
            err,
            QueryError::Forbidden {
                reason: ForbiddenReason::OutOfReach,
                ..
            }
        ));
    }

    #[test]
    fn iteration_cap_is_reported() {
        let s = solver();
        let tight = NewtonConfig {
            max_iterations: 1,
            ..NewtonConfig::default()
        };
        let capped = AngleSolver::new(*s.reaction(), *s.spectrometer(), tight).unwrap();
        let err = capped.solve(0.0, -20.0).unwrap_err();
        match err {
            QueryError::NotConverged {
                iterations,
                residual,
            } => {
                assert_eq!(iterations, 1);
                assert!(residual.abs() >= 1e-5);
            }
            other => panic!("expected non-convergence, got {other:?}"),
        }
    }

    #[test]
    fn non_finite_inputs_rejected() {
        let s = solver();
        assert!(matches!(
            s.solve(f64::NAN, -20.0),
            Err(QueryError::InvalidInput { .. })
        ));
        assert!(matches!(
            s.solve(0.0, f64::INFINITY),
            Err(QueryError::InvalidInput { .. })
        ));
        assert!(matches!(
            s.position_for_angle(0.0, 180.0),
            Err(QueryError::InvalidInput { .. })
        ));
    }

    #[test]
    fn residual_rejects_non_finite_inputs() {
        let s = solver();
        for (ex, z, u) in [
            (0.0, f64::NAN, -150.0),
            (f64::NAN, -20.0, -150.0),
            (0.0, f64::NEG_INFINITY, -150.0),
            (0.0, -20.0, f64::NAN),
            (0.0, 0.0, f64::INFINITY),
        ] {
            assert!(
                matches!(s.residual(ex, z, u), Err(QueryError::InvalidInput { .. })),
                "ex={ex} z={z} u={u}"
            );
        }
        let at_root = s.solve(0.0, -20.0).unwrap();
        let f = s.residual(0.0, -20.0, at_root.p_para_cm).unwrap();
        assert!(f.abs() < 1e-5);
    }

    #[test]
    fn forward_then_inverse() {
        let s = solver();
        let pos = s.position_for_angle(0.0, 40.0).unwrap();
        assert!((pos.z_cm + 14.479_867_621_374_739).abs() < 1e-9);
        let back = s.solve(0.0, pos.z_cm).unwrap();
        assert!((back.theta_cm_deg - 40.0).abs() < 1e-4);
        assert!((back.theta_lab_deg - pos.theta_lab_deg).abs() < 1e-4);
    }

    #[test]
    fn reach_window_for_ground_state() {
        let window = solver().reach(0.0).unwrap();
        assert!((window.z_min_cm + 47.547_074).abs() < 1e-3, "{window:?}");
        assert!((window.z_max_cm - 253.047_54).abs() < 1e-3, "{window:?}");
        assert!(window.theta_at_min_deg < window.theta_at_max_deg);
        assert!(window.contains(-20.0));
        assert!(!window.contains(-50.0));
    }

    #[test]
    fn failure_beyond_reach_is_forbidden() {
        let s = solver();
        let window = s.reach(19.0).unwrap();
        assert!((window.z_max_cm - 106.560_6).abs() < 1e-2, "{window:?}");
        let err = s.solve(19.0, 120.21).unwrap_err();
        assert_eq!(
            err,
            QueryError::Forbidden {
                ex_mev: 19.0,
                reason: ForbiddenReason::OutOfReach
            }
        );
    }

    #[test]
    fn forward_small_orbit_forbidden() {
        // Near 0 degrees p_perp vanishes and the orbit cannot reach the array
        let err = solver().position_for_angle(0.0, 0.5).unwrap_err();
        assert!(matches!(
            err,
            QueryError::Forbidden {
                reason: ForbiddenReason::OrbitTooSmall,
                ..
            }
        ));
    }

    #[test]
    fn invalid_spectrometer_rejected() {
        let s = solver();
        let mut zero_field = *s.spectrometer();
        zero_field.field = tesla(0.0);
        assert!(AngleSolver::new(*s.reaction(), zero_field, NewtonConfig::default()).is_err());

        let mut zero_charge = *s.spectrometer();
        zero_charge.ejectile_charge = 0;
        assert!(AngleSolver::new(*s.reaction(), zero_charge, NewtonConfig::default()).is_err());

        let mut no_radius = *s.spectrometer();
        no_radius.array_radius = cm(0.0);
        assert!(AngleSolver::new(*s.reaction(), no_radius, NewtonConfig::default()).is_err());

        let bad_tol = NewtonConfig {
            abs_tol: 0.0,
            ..NewtonConfig::default()
        };
        assert!(AngleSolver::new(*s.reaction(), *s.spectrometer(), bad_tol).is_err());
    }

    #[test]
    fn reversed_field_gives_same_angle() {
        let s = solver();
        let mut reversed = *s.spectrometer();
        reversed.field = tesla(-2.5);
        let r = AngleSolver::new(*s.reaction(), reversed, NewtonConfig::default()).unwrap();
        assert_eq!(
            r.solve(0.0, -20.0).unwrap().theta_cm_deg,
            s.solve(0.0, -20.0).unwrap().theta_cm_deg
        );
    }
}
