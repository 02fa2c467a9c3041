//! Validated output of one minimization.

use crate::fingerprint::Fingerprint;
use crate::minimizer::RawAssemblage;
use crate::phase::{Phase, PhaseKind, ResidualPhase, SolutionPhase};
use crate::properties::SystemProperties;
use eq_core::{CoreError, CoreResult, check_index};
use std::collections::HashMap;

/// Stable phases and bulk properties from one successful minimization.
///
/// Built atomically by [`ResultSet::publish`]; never partially filled.
/// Tagged with the fingerprint of the inputs that produced it.
#[derive(Debug, Clone)]
pub struct ResultSet {
    solution_phases: Vec<SolutionPhase>,
    residual_phases: Vec<ResidualPhase>,
    system: SystemProperties,
    fingerprint: Fingerprint,
    /// Lowercased name (and solution abbreviation) -> position.
    names: HashMap<(PhaseKind, String), usize>,
}

impl ResultSet {
    /// Validate raw solver output and build the result set.
    ///
    /// Per-class fraction sums may exceed one by at most `fraction_tolerance`.
    pub fn publish(
        raw: RawAssemblage,
        n_components: usize,
        fraction_tolerance: f64,
        fingerprint: Fingerprint,
    ) -> CoreResult<Self> {
        raw.system.validate()?;

        let solution_phases = raw
            .solution_phases
            .into_iter()
            .map(SolutionPhase::from_raw)
            .collect::<CoreResult<Vec<_>>>()?;
        let residual_phases = raw
            .residual_phases
            .into_iter()
            .map(|p| ResidualPhase::from_raw(p, n_components))
            .collect::<CoreResult<Vec<_>>>()?;

        check_sums(&solution_phases, fraction_tolerance)?;
        check_sums(&residual_phases, fraction_tolerance)?;

        let mut names = HashMap::new();
        for (i, phase) in solution_phases.iter().enumerate() {
            names
                .entry((PhaseKind::Solution, phase.name().to_lowercase()))
                .or_insert(i);
        }
        for (i, phase) in solution_phases.iter().enumerate() {
            names
                .entry((PhaseKind::Solution, phase.abbreviated_name().to_lowercase()))
                .or_insert(i);
        }
        for (i, phase) in residual_phases.iter().enumerate() {
            names
                .entry((PhaseKind::Residual, phase.name().to_lowercase()))
                .or_insert(i);
        }

        Ok(Self {
            solution_phases,
            residual_phases,
            system: raw.system,
            fingerprint,
            names,
        })
    }

    pub fn count(&self, kind: PhaseKind) -> usize {
        match kind {
            PhaseKind::Solution => self.solution_phases.len(),
            PhaseKind::Residual => self.residual_phases.len(),
        }
    }

    pub fn solution_phases(&self) -> &[SolutionPhase] {
        &self.solution_phases
    }

    pub fn residual_phases(&self) -> &[ResidualPhase] {
        &self.residual_phases
    }

    pub fn solution_phase(&self, index: usize) -> CoreResult<&SolutionPhase> {
        let i = check_index(index, self.solution_phases.len(), PhaseKind::Solution.label())?;
        Ok(&self.solution_phases[i])
    }

    pub fn residual_phase(&self, index: usize) -> CoreResult<&ResidualPhase> {
        let i = check_index(index, self.residual_phases.len(), PhaseKind::Residual.label())?;
        Ok(&self.residual_phases[i])
    }

    pub fn phase(&self, kind: PhaseKind, index: usize) -> CoreResult<&dyn Phase> {
        match kind {
            PhaseKind::Solution => self.solution_phase(index).map(|p| p as &dyn Phase),
            PhaseKind::Residual => self.residual_phase(index).map(|p| p as &dyn Phase),
        }
    }

    /// Case-insensitive lookup; solution phases also match their abbreviation.
    pub fn index_of(&self, kind: PhaseKind, name: &str) -> Option<usize> {
        self.names.get(&(kind, name.to_lowercase())).copied()
    }

    pub fn system(&self) -> &SystemProperties {
        &self.system
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }
}

fn check_sums<P: Phase>(phases: &[P], tolerance: f64) -> CoreResult<()> {
    let weight: f64 = phases.iter().map(|p| p.weight_fraction()).sum();
    if weight > 1.0 + tolerance {
        return Err(CoreError::OutOfUnitInterval {
            what: "summed phase weight fraction",
            value: weight,
        });
    }
    let molar: f64 = phases.iter().map(|p| p.molar_fraction()).sum();
    if molar > 1.0 + tolerance {
        return Err(CoreError::OutOfUnitInterval {
            what: "summed phase molar fraction",
            value: molar,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::ConfigSnapshot;
    use crate::minimizer::{RawResidualPhase, RawSolutionPhase};

    fn fingerprint() -> Fingerprint {
        Fingerprint::of(&ConfigSnapshot {
            model: "test",
            pressure: 1.0,
            temperature: 1000.0,
            composition: &[1.0, 1.0],
        })
    }

    fn solution(name: &str, abbr: &str, w: f64) -> RawSolutionPhase {
        RawSolutionPhase {
            name: name.to_string(),
            abbreviation: abbr.to_string(),
            weight_fraction: w,
            molar_fraction: w,
            molar_amount: w * 10.0,
        }
    }

    fn residual(name: &str, w: f64) -> RawResidualPhase {
        RawResidualPhase {
            name: name.to_string(),
            weight_fraction: w,
            molar_fraction: w,
            molar_amount: w * 10.0,
            endmember_ratios: vec![1.0, 2.0],
        }
    }

    fn raw() -> RawAssemblage {
        RawAssemblage {
            solution_phases: vec![solution("O(HGP)", "Ol", 0.7), solution("Opx(HGP)", "Opx", 0.3)],
            residual_phases: vec![residual("O(HGP)", 0.7), residual("Opx(HGP)", 0.3)],
            system: SystemProperties {
                density: 3300.0,
                expansivity: 3.5e-5,
                molar_entropy: 1000.0,
                molar_heat_capacity: 500.0,
            },
        }
    }

    #[test]
    fn publish_and_lookup() {
        let set = ResultSet::publish(raw(), 2, 1e-6, fingerprint()).unwrap();
        assert_eq!(set.count(PhaseKind::Solution), 2);
        assert_eq!(set.count(PhaseKind::Residual), 2);
        assert_eq!(set.phase(PhaseKind::Residual, 1).unwrap().name(), "Opx(HGP)");
        assert!(matches!(
            set.phase(PhaseKind::Solution, 2),
            Err(CoreError::IndexOob { index: 2, len: 2, .. })
        ));
    }

    #[test]
    fn name_lookup_is_case_insensitive() {
        let set = ResultSet::publish(raw(), 2, 1e-6, fingerprint()).unwrap();
        assert_eq!(set.index_of(PhaseKind::Solution, "opx(hgp)"), Some(1));
        assert_eq!(set.index_of(PhaseKind::Solution, "OL"), Some(0));
        assert_eq!(set.index_of(PhaseKind::Residual, "Ol"), None);
        assert_eq!(set.index_of(PhaseKind::Residual, "O(HGP)"), Some(0));
    }

    #[test]
    fn empty_classes_are_valid() {
        let mut r = raw();
        r.solution_phases.clear();
        r.residual_phases.clear();
        let set = ResultSet::publish(r, 2, 1e-6, fingerprint()).unwrap();
        assert_eq!(set.count(PhaseKind::Solution), 0);
        assert!(set.solution_phase(0).is_err());
    }

    #[test]
    fn summed_fraction_above_one_rejected() {
        let mut r = raw();
        r.residual_phases.push(residual("Gt(HGP)", 0.2));
        assert!(matches!(
            ResultSet::publish(r, 2, 1e-6, fingerprint()),
            Err(CoreError::OutOfUnitInterval { .. })
        ));
    }

    #[test]
    fn rounding_within_tolerance_accepted() {
        let mut r = raw();
        r.residual_phases[1].weight_fraction = 0.3000001;
        assert!(ResultSet::publish(r, 2, 1e-6, fingerprint()).is_ok());
    }

    #[test]
    fn ratio_row_length_checked_against_components() {
        assert!(ResultSet::publish(raw(), 3, 1e-6, fingerprint()).is_err());
    }
}
