//! Query façade: the surface external callers use.
//!
//! Every read checks the session stage and the index before delegating to
//! the registry or the current result set. Nothing here calls the solver
//! except `minimize`.

use crate::error::{SessionError, SessionResult};
use crate::minimizer::Minimizer;
use crate::phase::PhaseKind;
use crate::properties::{SystemProperties, SystemProperty};
use crate::result::ResultSet;
use crate::session::{Session, SessionOptions, Stage};

/// Bounds-checked, stage-checked access to one equilibrium session.
pub struct Equilibrium<M> {
    session: Session<M>,
}

impl<M: Minimizer> Equilibrium<M> {
    pub fn new(minimizer: M) -> Self {
        Self::from_session(Session::new(minimizer))
    }

    pub fn with_options(minimizer: M, options: SessionOptions) -> Self {
        Self::from_session(Session::with_options(minimizer, options))
    }

    pub fn from_session(session: Session<M>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session<M> {
        &self.session
    }

    pub fn into_session(self) -> Session<M> {
        self.session
    }

    // ---- lifecycle ----

    pub fn initialize(&mut self, model_identifier: &str) -> SessionResult<()> {
        self.session.initialize(model_identifier)
    }

    /// Pressure [bar].
    pub fn set_pressure(&mut self, pressure: f64) {
        self.session.set_pressure(pressure);
    }

    /// Temperature [K].
    pub fn set_temperature(&mut self, temperature: f64) {
        self.session.set_temperature(temperature);
    }

    pub fn set_bulk_composition(&mut self, index: usize, value: f64) -> SessionResult<()> {
        self.session.set_bulk_composition(index, value)
    }

    pub fn minimize(&mut self) -> SessionResult<()> {
        self.session.minimize()
    }

    pub fn stage(&self) -> Stage {
        self.session.stage()
    }

    pub fn is_result_fresh(&self) -> bool {
        self.session.is_result_fresh()
    }

    pub fn model_name(&self) -> SessionResult<&str> {
        self.session.model_name()
    }

    pub fn pressure(&self) -> Option<f64> {
        self.session.pressure()
    }

    pub fn temperature(&self) -> Option<f64> {
        self.session.temperature()
    }

    // ---- composition registry ----

    pub fn component_count(&self) -> SessionResult<usize> {
        Ok(self.session.registry("component_count")?.len())
    }

    pub fn component_name(&self, index: usize) -> SessionResult<&str> {
        Ok(self.session.registry("component_name")?.name(index)?)
    }

    /// Molar mass [kg/mol].
    pub fn component_molar_mass(&self, index: usize) -> SessionResult<f64> {
        Ok(self.session.registry("component_molar_mass")?.molar_mass(index)?)
    }

    /// Exact-match component lookup.
    pub fn component_index(&self, name: &str) -> SessionResult<usize> {
        self.session
            .registry("component_index")?
            .index_of(name)
            .ok_or_else(|| SessionError::UnknownName {
                what: "component",
                name: name.to_string(),
            })
    }

    pub fn bulk_fraction(&self, index: usize) -> SessionResult<f64> {
        Ok(self.session.registry("bulk_fraction")?.bulk_fraction(index)?)
    }

    pub fn bulk_composition(&self) -> SessionResult<&[f64]> {
        Ok(self.session.registry("bulk_composition")?.bulk_composition())
    }

    // ---- model bounds ----

    /// Lowest supported pressure [bar].
    pub fn minimum_pressure(&self) -> SessionResult<f64> {
        Ok(self.session.bounds("minimum_pressure")?.min_pressure())
    }

    /// Highest supported pressure [bar].
    pub fn maximum_pressure(&self) -> SessionResult<f64> {
        Ok(self.session.bounds("maximum_pressure")?.max_pressure())
    }

    /// Lowest supported temperature [K].
    pub fn minimum_temperature(&self) -> SessionResult<f64> {
        Ok(self.session.bounds("minimum_temperature")?.min_temperature())
    }

    /// Highest supported temperature [K].
    pub fn maximum_temperature(&self) -> SessionResult<f64> {
        Ok(self.session.bounds("maximum_temperature")?.max_temperature())
    }

    // ---- result set ----

    pub fn solution_phase_count(&self) -> SessionResult<usize> {
        self.phase_count(PhaseKind::Solution)
    }

    pub fn residual_phase_count(&self) -> SessionResult<usize> {
        self.phase_count(PhaseKind::Residual)
    }

    pub fn phase_count(&self, kind: PhaseKind) -> SessionResult<usize> {
        Ok(self.result("phase_count")?.count(kind))
    }

    pub fn phase_name(&self, kind: PhaseKind, index: usize) -> SessionResult<&str> {
        Ok(self.result("phase_name")?.phase(kind, index)?.name())
    }

    pub fn phase_abbreviated_name(&self, index: usize) -> SessionResult<&str> {
        let result = self.result("phase_abbreviated_name")?;
        Ok(result.solution_phase(index)?.abbreviated_name())
    }

    /// Case-insensitive; solution phases also resolve by abbreviation.
    pub fn phase_index(&self, kind: PhaseKind, name: &str) -> SessionResult<usize> {
        self.result("phase_index")?
            .index_of(kind, name)
            .ok_or_else(|| SessionError::UnknownName {
                what: kind.label(),
                name: name.to_string(),
            })
    }

    /// Weight fraction of residual phase `index`.
    pub fn phase_weight_fraction(&self, index: usize) -> SessionResult<f64> {
        self.phase_weight_fraction_of(PhaseKind::Residual, index)
    }

    /// Molar fraction of residual phase `index`.
    pub fn phase_molar_fraction(&self, index: usize) -> SessionResult<f64> {
        self.phase_molar_fraction_of(PhaseKind::Residual, index)
    }

    /// Molar amount of residual phase `index`.
    pub fn phase_molar_amount(&self, index: usize) -> SessionResult<f64> {
        self.phase_molar_amount_of(PhaseKind::Residual, index)
    }

    pub fn phase_weight_fraction_of(&self, kind: PhaseKind, index: usize) -> SessionResult<f64> {
        Ok(self.result("phase_weight_fraction")?.phase(kind, index)?.weight_fraction())
    }

    pub fn phase_molar_fraction_of(&self, kind: PhaseKind, index: usize) -> SessionResult<f64> {
        Ok(self.result("phase_molar_fraction")?.phase(kind, index)?.molar_fraction())
    }

    pub fn phase_molar_amount_of(&self, kind: PhaseKind, index: usize) -> SessionResult<f64> {
        Ok(self.result("phase_molar_amount")?.phase(kind, index)?.molar_amount())
    }

    /// Molar ratio of `component_index` in the formula of residual phase
    /// `phase_index`.
    pub fn endmember_composition_ratio(
        &self,
        phase_index: usize,
        component_index: usize,
    ) -> SessionResult<f64> {
        let result = self.result("endmember_composition_ratio")?;
        Ok(result
            .residual_phase(phase_index)?
            .endmember_ratio(component_index)?)
    }

    pub fn endmember_composition_ratios(&self, phase_index: usize) -> SessionResult<&[f64]> {
        let result = self.result("endmember_composition_ratios")?;
        Ok(result.residual_phase(phase_index)?.endmember_ratios())
    }

    pub fn system_property(&self, kind: SystemProperty) -> SessionResult<f64> {
        Ok(self.result("system_property")?.system().get(kind))
    }

    pub fn system_properties(&self) -> SessionResult<SystemProperties> {
        Ok(*self.result("system_properties")?.system())
    }

    fn result(&self, operation: &'static str) -> SessionResult<&ResultSet> {
        self.session.result(operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minimizer::{
        ComponentInfo, MinimizationRequest, MinimizerError, ModelDescription, RawAssemblage,
        RawResidualPhase, RawSolutionPhase,
    };
    use crate::properties::ModelBounds;
    use eq_core::units::g_per_mol;

    struct Fixed;

    impl Minimizer for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn load(&mut self, _model: &str) -> Result<ModelDescription, MinimizerError> {
            Ok(ModelDescription {
                name: "binary".to_string(),
                components: vec![
                    ComponentInfo {
                        name: "MgO".to_string(),
                        molar_mass: g_per_mol(40.304),
                    },
                    ComponentInfo {
                        name: "SiO2".to_string(),
                        molar_mass: g_per_mol(60.084),
                    },
                ],
                bounds: ModelBounds::new((1.0, 1000.0), (800.0, 1800.0)).map_err(|e| {
                    MinimizerError::Load {
                        message: e.to_string(),
                    }
                })?,
                default_bulk: vec![2.0, 1.0],
            })
        }

        fn minimize(
            &mut self,
            _request: &MinimizationRequest<'_>,
        ) -> Result<RawAssemblage, MinimizerError> {
            Ok(RawAssemblage {
                solution_phases: vec![RawSolutionPhase {
                    name: "O(HGP)".to_string(),
                    abbreviation: "Ol".to_string(),
                    weight_fraction: 1.0,
                    molar_fraction: 1.0,
                    molar_amount: 1.0,
                }],
                residual_phases: vec![RawResidualPhase {
                    name: "fo".to_string(),
                    weight_fraction: 1.0,
                    molar_fraction: 1.0,
                    molar_amount: 1.0,
                    endmember_ratios: vec![2.0, 1.0],
                }],
                system: SystemProperties {
                    density: 3220.0,
                    expansivity: 2.8e-5,
                    molar_entropy: 95.1,
                    molar_heat_capacity: 118.6,
                },
            })
        }
    }

    fn solved() -> Equilibrium<Fixed> {
        let mut eq = Equilibrium::new(Fixed);
        eq.initialize("binary").unwrap();
        eq.set_pressure(100.0);
        eq.set_temperature(1200.0);
        eq.minimize().unwrap();
        eq
    }

    #[test]
    fn registry_reads_need_a_model() {
        let eq = Equilibrium::new(Fixed);
        let err = eq.component_count().unwrap_err();
        assert_eq!(
            err,
            SessionError::NotReady {
                operation: "component_count",
                required: Stage::Configured,
                actual: Stage::Uninitialized,
            }
        );
        assert!(eq.minimum_pressure().is_err());
    }

    #[test]
    fn registry_reads_after_initialize() {
        let mut eq = Equilibrium::new(Fixed);
        eq.initialize("binary").unwrap();
        assert_eq!(eq.model_name().unwrap(), "binary");
        assert_eq!(eq.component_count().unwrap(), 2);
        assert_eq!(eq.component_name(1).unwrap(), "SiO2");
        assert!((eq.component_molar_mass(0).unwrap() - 0.040304).abs() < 1e-12);
        assert_eq!(eq.component_index("SiO2").unwrap(), 1);
        assert!(matches!(
            eq.component_index("sio2"),
            Err(SessionError::UnknownName { .. })
        ));
        assert_eq!(eq.bulk_composition().unwrap(), &[2.0, 1.0]);
        assert_eq!(eq.maximum_temperature().unwrap(), 1800.0);
    }

    #[test]
    fn result_reads_need_minimize() {
        let mut eq = Equilibrium::new(Fixed);
        eq.initialize("binary").unwrap();
        assert!(matches!(
            eq.solution_phase_count(),
            Err(SessionError::NotReady {
                required: Stage::Solved,
                actual: Stage::Configured,
                ..
            })
        ));
        assert!(eq.system_property(SystemProperty::Density).is_err());
    }

    #[test]
    fn phase_accessors() {
        let eq = solved();
        assert_eq!(eq.phase_count(PhaseKind::Solution).unwrap(), 1);
        assert_eq!(eq.phase_name(PhaseKind::Residual, 0).unwrap(), "fo");
        assert_eq!(eq.phase_abbreviated_name(0).unwrap(), "Ol");
        assert_eq!(eq.phase_index(PhaseKind::Solution, "ol").unwrap(), 0);
        assert_eq!(eq.phase_molar_amount(0).unwrap(), 1.0);
        assert_eq!(eq.endmember_composition_ratio(0, 0).unwrap(), 2.0);
        assert_eq!(eq.endmember_composition_ratios(0).unwrap(), &[2.0, 1.0]);
        assert_eq!(eq.system_properties().unwrap().molar_entropy, 95.1);
    }

    #[test]
    fn index_errors_name_the_axis() {
        let eq = solved();
        assert_eq!(
            eq.endmember_composition_ratio(0, 2).unwrap_err(),
            SessionError::IndexOutOfRange {
                what: "component",
                index: 2,
                len: 2,
            }
        );
        assert_eq!(
            eq.phase_weight_fraction(1).unwrap_err(),
            SessionError::IndexOutOfRange {
                what: "residual phase",
                index: 1,
                len: 1,
            }
        );
        assert!(matches!(
            eq.phase_index(PhaseKind::Residual, "Ol"),
            Err(SessionError::UnknownName { what: "residual phase", .. })
        ));
    }
}
