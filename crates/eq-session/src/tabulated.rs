//! Table-backed minimizer: serves precomputed assemblages from model files.

use crate::minimizer::{
    ComponentInfo, MinimizationRequest, Minimizer, MinimizerError, ModelDescription,
    RawAssemblage, RawResidualPhase, RawSolutionPhase,
};
use crate::properties::{ModelBounds, SystemProperties};
use eq_core::units::{bar, g_per_mol, k, to_bar, to_kelvin};
use eq_core::{Tolerances, nearly_equal, normalized};
use eq_model::{AssemblageDef, ModelFile, ModelLocator};

/// Absolute tolerance on each normalized bulk fraction.
const COMPOSITION_TOL: f64 = 1e-6;

/// Minimizer backed by tabulated assemblages in `eq-model` files.
///
/// A request is answered only when P, T and the normalized bulk
/// composition match a tabulated point; anything else does not converge.
#[derive(Debug, Clone, Default)]
pub struct TabulatedMinimizer {
    locator: ModelLocator,
    model: Option<ModelFile>,
}

impl TabulatedMinimizer {
    pub fn new(locator: ModelLocator) -> Self {
        Self {
            locator,
            model: None,
        }
    }

    /// Search `EQ_MODEL_PATH`, then the working directory.
    pub fn from_env() -> Self {
        Self::new(ModelLocator::from_env())
    }

    pub fn locator(&self) -> &ModelLocator {
        &self.locator
    }

    /// The loaded model file, if any.
    pub fn model(&self) -> Option<&ModelFile> {
        self.model.as_ref()
    }
}

impl Minimizer for TabulatedMinimizer {
    fn name(&self) -> &str {
        "tabulated"
    }

    fn load(&mut self, model: &str) -> Result<ModelDescription, MinimizerError> {
        let path = self.locator.resolve(model).map_err(load_error)?;
        let file = eq_model::load_path(&path).map_err(load_error)?;

        let bounds = ModelBounds::new(
            (file.bounds.pressure.min, file.bounds.pressure.max),
            (file.bounds.temperature.min, file.bounds.temperature.max),
        )
        .map_err(load_error)?;
        let description = ModelDescription {
            name: file.name.clone(),
            components: file
                .components
                .iter()
                .map(|c| ComponentInfo {
                    name: c.name.clone(),
                    molar_mass: g_per_mol(c.molar_mass),
                })
                .collect(),
            bounds,
            default_bulk: file.default_bulk(),
        };

        self.model = Some(file);
        Ok(description)
    }

    fn minimize(
        &mut self,
        request: &MinimizationRequest<'_>,
    ) -> Result<RawAssemblage, MinimizerError> {
        let model = self.model.as_ref().ok_or(MinimizerError::NotLoaded)?;

        // Compare as quantities: bar -> Pa -> bar does not round-trip exactly.
        let bounds = &model.bounds;
        let (p, t) = (request.pressure(), request.temperature());
        let pressure = to_bar(p);
        let temperature = to_kelvin(t);
        if p < bar(bounds.pressure.min) || p > bar(bounds.pressure.max) {
            return Err(MinimizerError::OutOfBounds {
                what: "pressure",
                value: pressure,
                min: bounds.pressure.min,
                max: bounds.pressure.max,
            });
        }
        if t < k(bounds.temperature.min) || t > k(bounds.temperature.max) {
            return Err(MinimizerError::OutOfBounds {
                what: "temperature",
                value: temperature,
                min: bounds.temperature.min,
                max: bounds.temperature.max,
            });
        }

        if request.composition().len() != model.components.len() {
            return Err(MinimizerError::InvalidInput {
                what: "bulk composition length differs from component count",
            });
        }
        let bulk = normalized(request.composition()).map_err(|_| {
            MinimizerError::InvalidInput {
                what: "bulk composition must be non-negative with a positive sum",
            }
        })?;

        let found = model
            .assemblages
            .iter()
            .find(|a| matches_point(a, pressure, temperature, &bulk));
        match found {
            Some(assemblage) => Ok(to_raw(assemblage)),
            None => Err(MinimizerError::NotConverged {
                message: format!(
                    "no stable assemblage for {} at {pressure} bar, {temperature} K",
                    model.name
                ),
            }),
        }
    }
}

fn load_error(err: impl std::fmt::Display) -> MinimizerError {
    MinimizerError::Load {
        message: err.to_string(),
    }
}

fn matches_point(a: &AssemblageDef, pressure: f64, temperature: f64, bulk: &[f64]) -> bool {
    let tol = Tolerances {
        abs: 0.0,
        rel: 1e-9,
    };
    if !nearly_equal(a.pressure, pressure, tol) || !nearly_equal(a.temperature, temperature, tol)
    {
        return false;
    }
    match normalized(&a.composition) {
        Ok(table) => {
            table.len() == bulk.len()
                && table
                    .iter()
                    .zip(bulk)
                    .all(|(x, y)| (x - y).abs() <= COMPOSITION_TOL)
        }
        Err(_) => false,
    }
}

fn to_raw(a: &AssemblageDef) -> RawAssemblage {
    RawAssemblage {
        solution_phases: a
            .solution_phases
            .iter()
            .map(|p| RawSolutionPhase {
                name: p.name.clone(),
                abbreviation: p.abbreviation.clone(),
                weight_fraction: p.weight_fraction,
                molar_fraction: p.molar_fraction,
                molar_amount: p.molar_amount,
            })
            .collect(),
        residual_phases: a
            .residual_phases
            .iter()
            .map(|p| RawResidualPhase {
                name: p.name.clone(),
                weight_fraction: p.weight_fraction,
                molar_fraction: p.molar_fraction,
                molar_amount: p.molar_amount,
                endmember_ratios: p.endmember_ratios.clone(),
            })
            .collect(),
        system: SystemProperties {
            density: a.system.density,
            expansivity: a.system.expansivity,
            molar_entropy: a.system.molar_entropy,
            molar_heat_capacity: a.system.molar_heat_capacity,
        },
    }
}
