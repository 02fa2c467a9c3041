//! Boundary with the phase-equilibrium minimization engine.

use crate::properties::{ModelBounds, SystemProperties};
use eq_core::units::{MolarMass, Pressure, Temperature};
use thiserror::Error;

/// Errors reported by a minimizer backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MinimizerError {
    /// Model parameters could not be located or parsed.
    #[error("Model load failed: {message}")]
    Load { message: String },

    /// `minimize` called before a model was loaded.
    #[error("No model loaded")]
    NotLoaded,

    /// Input outside the range supported by the model.
    #[error("{what} {value} outside model bounds [{min}, {max}]")]
    OutOfBounds {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Physically invalid input (e.g. empty bulk composition).
    #[error("Invalid input: {what}")]
    InvalidInput { what: &'static str },

    /// The solver could not find a stable assemblage.
    #[error("Not converged: {message}")]
    NotConverged { message: String },
}

/// One chemical component as declared by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentInfo {
    pub name: String,
    pub molar_mass: MolarMass,
}

/// What a model load hands back to the session.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDescription {
    pub name: String,
    pub components: Vec<ComponentInfo>,
    pub bounds: ModelBounds,
    /// One entry per component, in component order.
    pub default_bulk: Vec<f64>,
}

/// Inputs for one minimization, in registry order.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimizationRequest<'a> {
    pressure: Pressure,
    temperature: Temperature,
    composition: &'a [f64],
}

impl<'a> MinimizationRequest<'a> {
    pub fn new(pressure: Pressure, temperature: Temperature, composition: &'a [f64]) -> Self {
        Self {
            pressure,
            temperature,
            composition,
        }
    }

    pub fn pressure(&self) -> Pressure {
        self.pressure
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    pub fn composition(&self) -> &[f64] {
        self.composition
    }
}

/// Solution phase as reported by the solver, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSolutionPhase {
    pub name: String,
    pub abbreviation: String,
    pub weight_fraction: f64,
    pub molar_fraction: f64,
    pub molar_amount: f64,
}

/// Residual phase as reported by the solver, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResidualPhase {
    pub name: String,
    pub weight_fraction: f64,
    pub molar_fraction: f64,
    pub molar_amount: f64,
    pub endmember_ratios: Vec<f64>,
}

/// Unvalidated output of one successful minimization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAssemblage {
    pub solution_phases: Vec<RawSolutionPhase>,
    pub residual_phases: Vec<RawResidualPhase>,
    pub system: SystemProperties,
}

/// Trait for phase-equilibrium minimizers.
///
/// Implementations wrap a single, non-reentrant solver instance, hence the
/// `&mut self` receivers and no `Send + Sync` bound. A failed `minimize`
/// must not return partial output.
pub trait Minimizer {
    /// Backend name (for debugging/logging).
    fn name(&self) -> &str;

    /// Load thermodynamic model parameters.
    fn load(&mut self, model: &str) -> Result<ModelDescription, MinimizerError>;

    /// Find the stable assemblage for the request.
    fn minimize(
        &mut self,
        request: &MinimizationRequest<'_>,
    ) -> Result<RawAssemblage, MinimizerError>;
}

impl<M: Minimizer + ?Sized> Minimizer for Box<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn load(&mut self, model: &str) -> Result<ModelDescription, MinimizerError> {
        (**self).load(model)
    }

    fn minimize(
        &mut self,
        request: &MinimizationRequest<'_>,
    ) -> Result<RawAssemblage, MinimizerError> {
        (**self).minimize(request)
    }
}
