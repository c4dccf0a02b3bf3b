//! Reaction file validation logic.

use crate::schema::{ArrayDef, NucleusDef, ReactionFile};

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Mass number not conserved: {incoming} in, {outgoing} out")]
    MassNumberMismatch { incoming: u32, outgoing: u32 },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_reaction_file(file: &ReactionFile) -> Result<(), ValidationError> {
    if file.version == 0 || file.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: file.version,
        });
    }

    let reaction = &file.reaction;
    for (role, nucleus) in [
        ("beam", &reaction.beam),
        ("target", &reaction.target),
        ("ejectile", &reaction.ejectile),
        ("recoil", &reaction.recoil),
    ] {
        validate_nucleus(role, nucleus)?;
    }

    let incoming = reaction.beam.mass_number + reaction.target.mass_number;
    let outgoing = reaction.ejectile.mass_number + reaction.recoil.mass_number;
    if incoming != outgoing {
        return Err(ValidationError::MassNumberMismatch { incoming, outgoing });
    }

    let energy = reaction.beam_energy_mev_per_u;
    if !energy.is_finite() || energy < 0.0 {
        return Err(invalid(
            "reaction beam_energy_mev_per_u",
            energy,
            "must be non-negative and finite",
        ));
    }

    let spectrometer = &file.spectrometer;
    if !spectrometer.field_t.is_finite() || spectrometer.field_t == 0.0 {
        return Err(invalid(
            "spectrometer field_t",
            spectrometer.field_t,
            "must be non-zero and finite",
        ));
    }
    if spectrometer.ejectile_charge == 0 {
        return Err(invalid(
            "spectrometer ejectile_charge",
            0,
            "must be non-zero",
        ));
    }
    if spectrometer.ejectile_charge > reaction.ejectile.mass_number {
        return Err(invalid(
            "spectrometer ejectile_charge",
            spectrometer.ejectile_charge,
            "exceeds the ejectile mass number",
        ));
    }
    validate_array(&spectrometer.array)?;

    let solver = &file.solver;
    if solver.max_iterations == 0 {
        return Err(invalid("solver max_iterations", 0, "must be positive"));
    }
    if !solver.abs_tol_cm.is_finite() || solver.abs_tol_cm <= 0.0 {
        return Err(invalid(
            "solver abs_tol_cm",
            solver.abs_tol_cm,
            "must be positive and finite",
        ));
    }

    Ok(())
}

fn validate_nucleus(role: &str, nucleus: &NucleusDef) -> Result<(), ValidationError> {
    if !nucleus.mass_u.is_finite() || nucleus.mass_u <= 0.0 {
        return Err(invalid(
            format!("{role} '{}' mass_u", nucleus.label),
            nucleus.mass_u,
            "must be positive and finite",
        ));
    }
    if nucleus.mass_number == 0 {
        return Err(invalid(
            format!("{role} '{}' mass_number", nucleus.label),
            0,
            "must be positive",
        ));
    }
    Ok(())
}

fn validate_array(array: &ArrayDef) -> Result<(), ValidationError> {
    match *array {
        ArrayDef::Rectangular {
            x1_cm,
            x2_cm,
            height_cm,
        } => {
            for (field, value) in [("x1_cm", x1_cm), ("x2_cm", x2_cm), ("height_cm", height_cm)] {
                if !value.is_finite() {
                    return Err(invalid(format!("array {field}"), value, "must be finite"));
                }
            }
            if x1_cm == x2_cm {
                return Err(invalid("array x2_cm", x2_cm, "must differ from x1_cm"));
            }
            if height_cm <= 0.0 {
                return Err(invalid("array height_cm", height_cm, "must be positive"));
            }
        }
        ArrayDef::Radius { radius_cm } => {
            if !radius_cm.is_finite() || radius_cm <= 0.0 {
                return Err(invalid(
                    "array radius_cm",
                    radius_cm,
                    "must be positive and finite",
                ));
            }
        }
    }
    Ok(())
}
