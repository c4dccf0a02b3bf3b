//! 28Mg(d,p)29Mg at 9.473 MeV/u in a 2.5 T field, shared by the unit tests.

use crate::geometry::ArrayGeometry;
use crate::newton::NewtonConfig;
use crate::reaction::{Reaction, ReactionMasses};
use crate::solver::{AngleSolver, Spectrometer};
use ik_core::{mev, tesla};

pub(crate) fn mg28_dp_reaction() -> Reaction {
    Reaction {
        masses: ReactionMasses {
            beam_u: 27.983_876_8,
            target_u: 2.014_101_777_85,
            ejectile_u: 1.007_825_032_07,
            recoil_u: 28.988_6,
        },
        beam_energy_per_u: mev(9.473),
        beam_mass_number: 28,
    }
}

pub(crate) fn mg28_dp_solver() -> AngleSolver {
    let spectrometer =
        Spectrometer::with_array(tesla(2.5), 1, &ArrayGeometry::from_cm(-0.45, 0.45, 1.15))
            .unwrap();
    AngleSolver::new(mg28_dp_reaction(), spectrometer, NewtonConfig::default()).unwrap()
}
