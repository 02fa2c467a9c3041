//! Bulk system properties and model validity bounds.

use eq_core::units::{Density, kg_per_m3};
use eq_core::{CoreError, CoreResult, ensure_finite};

/// Scalar bulk properties reported for the whole assemblage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemProperty {
    /// Density [kg/m³]
    Density,
    /// Thermal expansivity [1/K]
    Expansivity,
    /// Molar entropy, in the model's molar unit
    MolarEntropy,
    /// Molar isobaric heat capacity, in the model's molar unit
    MolarHeatCapacity,
}

impl SystemProperty {
    pub const ALL: [SystemProperty; 4] = [
        SystemProperty::Density,
        SystemProperty::Expansivity,
        SystemProperty::MolarEntropy,
        SystemProperty::MolarHeatCapacity,
    ];
}

/// Bulk properties from one minimization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemProperties {
    pub density: f64,
    pub expansivity: f64,
    pub molar_entropy: f64,
    pub molar_heat_capacity: f64,
}

impl SystemProperties {
    pub fn get(&self, kind: SystemProperty) -> f64 {
        match kind {
            SystemProperty::Density => self.density,
            SystemProperty::Expansivity => self.expansivity,
            SystemProperty::MolarEntropy => self.molar_entropy,
            SystemProperty::MolarHeatCapacity => self.molar_heat_capacity,
        }
    }

    pub fn density_quantity(&self) -> Density {
        kg_per_m3(self.density)
    }

    pub(crate) fn validate(&self) -> CoreResult<()> {
        ensure_finite(self.density, "density")?;
        ensure_finite(self.expansivity, "thermal expansivity")?;
        ensure_finite(self.molar_entropy, "molar entropy")?;
        ensure_finite(self.molar_heat_capacity, "molar heat capacity")?;
        Ok(())
    }
}

/// Pressure [bar] and temperature [K] range supported by a loaded model.
///
/// Always satisfies `min <= max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelBounds {
    min_pressure: f64,
    max_pressure: f64,
    min_temperature: f64,
    max_temperature: f64,
}

impl ModelBounds {
    pub fn new(pressure: (f64, f64), temperature: (f64, f64)) -> CoreResult<Self> {
        let (min_pressure, max_pressure) = pressure;
        let (min_temperature, max_temperature) = temperature;
        ensure_finite(min_pressure, "minimum pressure")?;
        ensure_finite(max_pressure, "maximum pressure")?;
        ensure_finite(min_temperature, "minimum temperature")?;
        ensure_finite(max_temperature, "maximum temperature")?;
        if min_pressure > max_pressure {
            return Err(CoreError::Invariant {
                what: "minimum pressure exceeds maximum pressure",
            });
        }
        if min_temperature > max_temperature {
            return Err(CoreError::Invariant {
                what: "minimum temperature exceeds maximum temperature",
            });
        }
        Ok(Self {
            min_pressure,
            max_pressure,
            min_temperature,
            max_temperature,
        })
    }

    pub fn min_pressure(&self) -> f64 {
        self.min_pressure
    }

    pub fn max_pressure(&self) -> f64 {
        self.max_pressure
    }

    pub fn min_temperature(&self) -> f64 {
        self.min_temperature
    }

    pub fn max_temperature(&self) -> f64 {
        self.max_temperature
    }

    pub fn contains(&self, pressure: f64, temperature: f64) -> bool {
        (self.min_pressure..=self.max_pressure).contains(&pressure)
            && (self.min_temperature..=self.max_temperature).contains(&temperature)
    }
}
