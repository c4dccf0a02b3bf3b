// ik-core/src/units.rs

use uom::si::f64::{
    Energy as UomEnergy, Length as UomLength, MagneticFluxDensity as UomMagneticFluxDensity,
};

// Public canonical unit types (SI, f64)
pub type Energy = UomEnergy;
pub type Length = UomLength;
pub type MagField = UomMagneticFluxDensity;

#[inline]
pub fn mev(v: f64) -> Energy {
    use uom::si::energy::megaelectronvolt;
    Energy::new::<megaelectronvolt>(v)
}

#[inline]
pub fn cm(v: f64) -> Length {
    use uom::si::length::centimeter;
    Length::new::<centimeter>(v)
}

#[inline]
pub fn tesla(v: f64) -> MagField {
    use uom::si::magnetic_flux_density::tesla;
    MagField::new::<tesla>(v)
}

#[inline]
pub fn in_mev(e: Energy) -> f64 {
    use uom::si::energy::megaelectronvolt;
    e.get::<megaelectronvolt>()
}

#[inline]
pub fn in_cm(l: Length) -> f64 {
    use uom::si::length::centimeter;
    l.get::<centimeter>()
}

#[inline]
pub fn in_tesla(b: MagField) -> f64 {
    use uom::si::magnetic_flux_density::tesla;
    b.get::<tesla>()
}

pub mod constants {
    /// Unified atomic mass unit in MeV (CODATA 2018).
    pub const AMU_MEV: f64 = 931.494_102_42;

    /// Momentum (MeV/c) of a unit charge on a 1 cm orbit in a 1 T field.
    pub const RIGIDITY_MEV_PER_T_CM: f64 = 2.997_924_58;

    /// Field strength as energy per unit length per unit charge (MeV/cm).
    #[inline]
    pub fn rigidity_mev_per_cm(field_t: f64, charge: u32) -> f64 {
        charge as f64 * field_t * RIGIDITY_MEV_PER_T_CM
    }
}
