//! Two-body reaction constants and the lab <-> CM frame transform.

use crate::error::{ForbiddenReason, KinematicsError, KinematicsResult, QueryError};
use ik_core::constants::AMU_MEV;
use ik_core::{Energy, ensure_finite, ensure_positive, in_mev};

/// Rest masses of the reaction participants in atomic mass units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReactionMasses {
    pub beam_u: f64,
    pub target_u: f64,
    pub ejectile_u: f64,
    pub recoil_u: f64,
}

/// Beam on fixed target: `beam + target -> ejectile + recoil`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reaction {
    pub masses: ReactionMasses,
    /// Beam kinetic energy per nucleon (lab)
    pub beam_energy_per_u: Energy,
    pub beam_mass_number: u32,
}

impl Reaction {
    /// Total beam kinetic energy in MeV.
    pub fn beam_kinetic_energy_mev(&self) -> f64 {
        in_mev(self.beam_energy_per_u) * self.beam_mass_number as f64
    }

    pub fn validate(&self) -> KinematicsResult<()> {
        ensure_positive(self.masses.beam_u, "beam mass")?;
        ensure_positive(self.masses.target_u, "target mass")?;
        ensure_positive(self.masses.ejectile_u, "ejectile mass")?;
        ensure_positive(self.masses.recoil_u, "recoil mass")?;
        let e = ensure_finite(in_mev(self.beam_energy_per_u), "beam energy")?;
        if e < 0.0 {
            return Err(KinematicsError::InvalidConfig {
                what: format!("beam energy must be non-negative (got {e} MeV/u)"),
            });
        }
        if self.beam_mass_number == 0 {
            return Err(KinematicsError::InvalidConfig {
                what: "beam mass number must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Frame quantities derived once from the reaction constants. Energies in MeV.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransform {
    pub m1: f64,
    pub m2: f64,
    pub m3: f64,
    pub m4: f64,
    /// Beam total energy in the lab
    pub beam_total_lab: f64,
    /// System total energy in the lab
    pub total_lab: f64,
    /// Invariant mass of the system
    pub total_cm: f64,
    pub gamma: f64,
    pub beta: f64,
}

/// Ejectile energy and momentum magnitude in the CM frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EjectileCm {
    pub energy: f64,
    pub momentum: f64,
}

impl FrameTransform {
    pub fn from_reaction(reaction: &Reaction) -> KinematicsResult<Self> {
        reaction.validate()?;

        let m1 = reaction.masses.beam_u * AMU_MEV;
        let m2 = reaction.masses.target_u * AMU_MEV;
        let m3 = reaction.masses.ejectile_u * AMU_MEV;
        let m4 = reaction.masses.recoil_u * AMU_MEV;

        let beam_total_lab = reaction.beam_kinetic_energy_mev() + m1;
        let total_lab = beam_total_lab + m2;
        let total_cm = (m1 * m1 + m2 * m2 + 2.0 * beam_total_lab * m2).sqrt();
        let gamma = total_lab / total_cm;
        // gamma can round just below 1 for a beam at rest
        let beta = (1.0 - 1.0 / (gamma * gamma)).max(0.0).sqrt();

        tracing::debug!(total_cm, gamma, beta, "derived frame transform");

        Ok(Self {
            m1,
            m2,
            m3,
            m4,
            beam_total_lab,
            total_lab,
            total_cm,
            gamma,
            beta,
        })
    }

    /// Ground-state Q value in MeV.
    pub fn q_value_mev(&self) -> f64 {
        self.m1 + self.m2 - self.m3 - self.m4
    }

    /// Largest recoil excitation energy that still produces an ejectile.
    pub fn excitation_threshold_mev(&self) -> f64 {
        self.total_cm - self.m3 - self.m4
    }

    /// CM energy and momentum of the ejectile for a recoil excited to `ex_mev`.
    pub fn ejectile_cm(&self, ex_mev: f64) -> Result<EjectileCm, QueryError> {
        let m4_ex = self.m4 + ex_mev;
        let e3 = 0.5 * (self.total_cm * self.total_cm + self.m3 * self.m3 - m4_ex * m4_ex)
            / self.total_cm;
        if !(e3 >= self.m3) {
            return Err(QueryError::Forbidden {
                ex_mev,
                reason: ForbiddenReason::AboveThreshold,
            });
        }
        Ok(EjectileCm {
            energy: e3,
            momentum: (e3 * e3 - self.m3 * self.m3).sqrt(),
        })
    }

    /// Boost a CM momentum component along the beam axis into the lab.
    pub fn para_to_lab(&self, ejectile: &EjectileCm, p_para_cm: f64) -> f64 {
        self.gamma * (p_para_cm + self.beta * ejectile.energy)
    }

    /// Lab total energy of the ejectile.
    pub fn energy_to_lab(&self, ejectile: &EjectileCm, p_para_cm: f64) -> f64 {
        self.gamma * (ejectile.energy + self.beta * p_para_cm)
    }
}
