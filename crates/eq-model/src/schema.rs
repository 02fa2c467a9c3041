//! Model file schema definitions.
//!
//! Units follow the model's working set: pressure in bar, temperature in K,
//! molar mass in g/mol. Bulk properties are stored as the solver reports them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelFile {
    pub name: String,
    pub components: Vec<ComponentDef>,
    pub bounds: BoundsDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_bulk: Option<Vec<f64>>,
    #[serde(default)]
    pub assemblages: Vec<AssemblageDef>,
}

impl ModelFile {
    /// Bulk composition used before the caller sets one (zeros unless given).
    pub fn default_bulk(&self) -> Vec<f64> {
        self.default_bulk
            .clone()
            .unwrap_or_else(|| vec![0.0; self.components.len()])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentDef {
    pub name: String,
    /// g/mol
    pub molar_mass: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RangeDef {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoundsDef {
    /// bar
    pub pressure: RangeDef,
    /// K
    pub temperature: RangeDef,
}

/// One precomputed stable assemblage at a (P, T, bulk) point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssemblageDef {
    pub pressure: f64,
    pub temperature: f64,
    pub composition: Vec<f64>,
    #[serde(default)]
    pub solution_phases: Vec<SolutionPhaseDef>,
    #[serde(default)]
    pub residual_phases: Vec<ResidualPhaseDef>,
    pub system: SystemPropsDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolutionPhaseDef {
    pub name: String,
    pub abbreviation: String,
    #[serde(default)]
    pub weight_fraction: f64,
    #[serde(default)]
    pub molar_fraction: f64,
    #[serde(default)]
    pub molar_amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResidualPhaseDef {
    pub name: String,
    pub weight_fraction: f64,
    pub molar_fraction: f64,
    pub molar_amount: f64,
    pub endmember_ratios: Vec<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SystemPropsDef {
    pub density: f64,
    pub expansivity: f64,
    pub molar_entropy: f64,
    pub molar_heat_capacity: f64,
}
