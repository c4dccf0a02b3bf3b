//! Turn a validated reaction file into a solver.

use crate::ProjectResult;
use crate::schema::{ArrayDef, ReactionFile};
use crate::validate::validate_reaction_file;
use ik_core::{cm, mev, tesla};
use ik_kinematics::{
    AngleSolver, ArrayGeometry, NewtonConfig, Reaction, ReactionMasses, Spectrometer,
};

pub fn reaction_from_file(file: &ReactionFile) -> Reaction {
    let r = &file.reaction;
    Reaction {
        masses: ReactionMasses {
            beam_u: r.beam.mass_u,
            target_u: r.target.mass_u,
            ejectile_u: r.ejectile.mass_u,
            recoil_u: r.recoil.mass_u,
        },
        beam_energy_per_u: mev(r.beam_energy_mev_per_u),
        beam_mass_number: r.beam.mass_number,
    }
}

pub fn spectrometer_from_file(file: &ReactionFile) -> ProjectResult<Spectrometer> {
    let def = &file.spectrometer;
    let field = tesla(def.field_t);
    let spectrometer = match def.array {
        ArrayDef::Rectangular {
            x1_cm,
            x2_cm,
            height_cm,
        } => Spectrometer::with_array(
            field,
            def.ejectile_charge,
            &ArrayGeometry::from_cm(x1_cm, x2_cm, height_cm),
        )?,
        ArrayDef::Radius { radius_cm } => Spectrometer {
            field,
            ejectile_charge: def.ejectile_charge,
            array_radius: cm(radius_cm),
        },
    };
    Ok(spectrometer)
}

pub fn newton_config_from_file(file: &ReactionFile) -> NewtonConfig {
    NewtonConfig {
        max_iterations: file.solver.max_iterations,
        abs_tol: file.solver.abs_tol_cm,
        ..NewtonConfig::default()
    }
}

/// Validate `file` and derive the solver for it.
pub fn build_solver(file: &ReactionFile) -> ProjectResult<AngleSolver> {
    validate_reaction_file(file)?;
    let solver = AngleSolver::new(
        reaction_from_file(file),
        spectrometer_from_file(file)?,
        newton_config_from_file(file),
    )?;
    tracing::debug!(
        name = %file.name,
        radius_cm = solver.array_radius_cm(),
        e_cm = solver.frame().total_cm,
        "solver built"
    );
    Ok(solver)
}
