//! Stable phases: solution phases and residual (explicitly resolved) phases.

use crate::minimizer::{RawResidualPhase, RawSolutionPhase};
use eq_core::{
    CoreError, CoreResult, check_index, ensure_finite, ensure_fraction, ensure_non_negative,
};
use std::fmt;

/// The two phase classes held by a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    Solution,
    Residual,
}

impl PhaseKind {
    pub(crate) fn label(self) -> &'static str {
        match self {
            PhaseKind::Solution => "solution phase",
            PhaseKind::Residual => "residual phase",
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Amounts shared by every phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseAmounts {
    /// Mass fraction of the system, in [0, 1].
    pub weight_fraction: f64,
    /// Mole fraction of the system, in [0, 1].
    pub molar_fraction: f64,
    /// Amount in the model's molar unit, non-negative.
    pub molar_amount: f64,
}

impl PhaseAmounts {
    fn checked(weight_fraction: f64, molar_fraction: f64, molar_amount: f64) -> CoreResult<Self> {
        Ok(Self {
            weight_fraction: ensure_fraction(weight_fraction, "phase weight fraction")?,
            molar_fraction: ensure_fraction(molar_fraction, "phase molar fraction")?,
            molar_amount: ensure_non_negative(molar_amount, "phase molar amount")?,
        })
    }
}

/// Capability shared by both phase classes.
pub trait Phase {
    fn kind(&self) -> PhaseKind;
    fn name(&self) -> &str;
    fn amounts(&self) -> &PhaseAmounts;

    fn weight_fraction(&self) -> f64 {
        self.amounts().weight_fraction
    }

    fn molar_fraction(&self) -> f64 {
        self.amounts().molar_fraction
    }

    fn molar_amount(&self) -> f64 {
        self.amounts().molar_amount
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolutionPhase {
    name: String,
    abbreviated_name: String,
    amounts: PhaseAmounts,
}

impl SolutionPhase {
    pub(crate) fn from_raw(raw: RawSolutionPhase) -> CoreResult<Self> {
        let amounts =
            PhaseAmounts::checked(raw.weight_fraction, raw.molar_fraction, raw.molar_amount)?;
        Ok(Self {
            name: raw.name,
            abbreviated_name: raw.abbreviation,
            amounts,
        })
    }

    pub fn abbreviated_name(&self) -> &str {
        &self.abbreviated_name
    }
}

impl Phase for SolutionPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Solution
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn amounts(&self) -> &PhaseAmounts {
        &self.amounts
    }
}

/// A stable phase resolved to an explicit formula.
///
/// `endmember_ratios[c]` is the molar ratio of component `c` in the phase's
/// nominal formula; one entry per registered component.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualPhase {
    name: String,
    amounts: PhaseAmounts,
    endmember_ratios: Vec<f64>,
}

impl ResidualPhase {
    pub(crate) fn from_raw(raw: RawResidualPhase, n_components: usize) -> CoreResult<Self> {
        let amounts =
            PhaseAmounts::checked(raw.weight_fraction, raw.molar_fraction, raw.molar_amount)?;
        if raw.endmember_ratios.len() != n_components {
            return Err(CoreError::Invariant {
                what: "endmember ratio row length differs from component count",
            });
        }
        for &r in &raw.endmember_ratios {
            ensure_finite(r, "endmember composition ratio")?;
        }
        Ok(Self {
            name: raw.name,
            amounts,
            endmember_ratios: raw.endmember_ratios,
        })
    }

    pub fn endmember_ratio(&self, component: usize) -> CoreResult<f64> {
        let c = check_index(component, self.endmember_ratios.len(), "component")?;
        Ok(self.endmember_ratios[c])
    }

    pub fn endmember_ratios(&self) -> &[f64] {
        &self.endmember_ratios
    }
}

impl Phase for ResidualPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Residual
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn amounts(&self) -> &PhaseAmounts {
        &self.amounts
    }
}
