// eq-core/src/units.rs

use uom::si::f64::{
    MassDensity as UomMassDensity, MolarMass as UomMolarMass, Pressure as UomPressure,
    ThermodynamicTemperature as UomThermodynamicTemperature,
};

// Public canonical unit types (SI, f64)
pub type Density = UomMassDensity;
pub type MolarMass = UomMolarMass;
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;

/// Pressure in bar, the working unit of phase-equilibrium model files.
#[inline]
pub fn bar(v: f64) -> Pressure {
    use uom::si::pressure::bar;
    Pressure::new::<bar>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

/// Molar mass in g/mol, as tabulated in model files.
#[inline]
pub fn g_per_mol(v: f64) -> MolarMass {
    use uom::si::molar_mass::gram_per_mole;
    MolarMass::new::<gram_per_mole>(v)
}

#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn to_bar(p: Pressure) -> f64 {
    use uom::si::pressure::bar;
    p.get::<bar>()
}

#[inline]
pub fn to_kelvin(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::kelvin;
    t.get::<kelvin>()
}

/// Molar mass in kg/mol, the unit reported to callers.
#[inline]
pub fn to_kg_per_mol(m: MolarMass) -> f64 {
    use uom::si::molar_mass::kilogram_per_mole;
    m.get::<kilogram_per_mole>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _p = bar(20_000.0);
        let _t = k(1500.0);
        let _m = g_per_mol(60.084);
        let _rho = kg_per_m3(3249.3);
    }

    #[test]
    fn molar_mass_reported_in_kg_per_mol() {
        let m = g_per_mol(60.084);
        assert!((to_kg_per_mol(m) * 1000.0 - 60.084).abs() < 1e-9);
    }

    #[test]
    fn pressure_and_temperature_round_trip_working_units() {
        assert!((to_bar(bar(20_000.0)) - 20_000.0).abs() < 1e-6);
        assert!((to_kelvin(k(1500.0)) - 1500.0).abs() < 1e-9);
    }
}
