use ik_core::{mev, tesla};
use ik_kinematics::{
    AngleSolver, ArrayGeometry, NewtonConfig, Reaction, ReactionMasses, Spectrometer,
};

/// 28Mg(d,p)29Mg at 9.473 MeV/u in a 2.5 T field.
pub fn mg28_dp() -> AngleSolver {
    let reaction = Reaction {
        masses: ReactionMasses {
            beam_u: 27.983_876_8,
            target_u: 2.014_101_777_85,
            ejectile_u: 1.007_825_032_07,
            recoil_u: 28.988_6,
        },
        beam_energy_per_u: mev(9.473),
        beam_mass_number: 28,
    };
    let spectrometer =
        Spectrometer::with_array(tesla(2.5), 1, &ArrayGeometry::from_cm(-0.45, 0.45, 1.15))
            .unwrap();
    AngleSolver::new(reaction, spectrometer, NewtonConfig::default()).unwrap()
}
