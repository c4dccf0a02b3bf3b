//! Reaction file schema definitions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReactionFile {
    pub version: u32,
    pub name: String,
    pub reaction: ReactionDef,
    pub spectrometer: SpectrometerDef,
    #[serde(default)]
    pub solver: SolverDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReactionDef {
    pub beam: NucleusDef,
    pub target: NucleusDef,
    pub ejectile: NucleusDef,
    pub recoil: NucleusDef,
    pub beam_energy_mev_per_u: f64,
}

impl ReactionDef {
    /// `beam(target,ejectile)recoil`, e.g. `28Mg(2H,1H)29Mg`.
    pub fn notation(&self) -> String {
        format!(
            "{}({},{}){}",
            self.beam.label, self.target.label, self.ejectile.label, self.recoil.label
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NucleusDef {
    pub label: String,
    /// Atomic mass in u
    pub mass_u: f64,
    pub mass_number: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpectrometerDef {
    pub field_t: f64,
    pub ejectile_charge: u32,
    pub array: ArrayDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ArrayDef {
    /// Flat detector face from `x1_cm` to `x2_cm` at `height_cm` off axis.
    Rectangular {
        x1_cm: f64,
        x2_cm: f64,
        height_cm: f64,
    },
    /// Effective radius given directly.
    Radius { radius_cm: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolverDef {
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_abs_tol_cm")]
    pub abs_tol_cm: f64,
}

fn default_max_iterations() -> usize {
    10_000
}

fn default_abs_tol_cm() -> f64 {
    1e-5
}

impl Default for SolverDef {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            abs_tol_cm: default_abs_tol_cm(),
        }
    }
}
