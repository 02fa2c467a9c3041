//! Session state: the single active equilibrium problem.

use crate::error::{SessionError, SessionResult};
use crate::fingerprint::{ConfigSnapshot, Fingerprint};
use crate::minimizer::{MinimizationRequest, Minimizer};
use crate::properties::ModelBounds;
use crate::registry::CompositionRegistry;
use crate::result::ResultSet;
use eq_core::units::{bar, k};
use std::fmt;
use tracing::{debug, info, instrument};

/// Lifecycle stage of a session.
///
/// `Solved` means a result set is held, not that it matches the current
/// inputs; changing P, T or composition keeps the stage. Use
/// [`Session::is_result_fresh`] for that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Uninitialized,
    Configured,
    Solved,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Uninitialized => "Uninitialized",
            Stage::Configured => "Configured",
            Stage::Solved => "Solved",
        };
        f.write_str(s)
    }
}

/// What to do when the held result set no longer matches the inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalenessPolicy {
    /// Fail result queries with `StaleResult`.
    #[default]
    Reject,
    /// Serve the last successful result regardless.
    Serve,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionOptions {
    pub staleness: StalenessPolicy,
    /// Slack allowed when per-class fraction sums exceed one.
    pub fraction_tolerance: f64,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            staleness: StalenessPolicy::Reject,
            fraction_tolerance: 1e-6,
        }
    }
}

#[derive(Debug, Clone)]
struct LoadedModel {
    id: String,
    name: String,
    bounds: ModelBounds,
    registry: CompositionRegistry,
}

/// One equilibrium problem and the minimizer that solves it.
///
/// Owns the composition registry and the current result set. Not meant to
/// be shared across threads: the wrapped solver is assumed non-reentrant,
/// so callers serialize access themselves.
pub struct Session<M> {
    minimizer: M,
    options: SessionOptions,
    stage: Stage,
    model: Option<LoadedModel>,
    /// bar
    pressure: Option<f64>,
    /// K
    temperature: Option<f64>,
    /// Fingerprint of the current inputs; `None` until model, P and T are known.
    current: Option<Fingerprint>,
    result: Option<ResultSet>,
}

impl<M: Minimizer> Session<M> {
    pub fn new(minimizer: M) -> Self {
        Self::with_options(minimizer, SessionOptions::default())
    }

    pub fn with_options(minimizer: M, options: SessionOptions) -> Self {
        Self {
            minimizer,
            options,
            stage: Stage::Uninitialized,
            model: None,
            pressure: None,
            temperature: None,
            current: None,
            result: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn minimizer(&self) -> &M {
        &self.minimizer
    }

    /// Load model parameters and build the composition registry.
    ///
    /// Repeating the call with the loaded identifier is a no-op. A different
    /// identifier reloads and drops the held result set. On failure the
    /// session returns to `Uninitialized`.
    #[instrument(skip_all, fields(model = model_identifier))]
    pub fn initialize(&mut self, model_identifier: &str) -> SessionResult<()> {
        if let Some(model) = &self.model {
            if model.id == model_identifier {
                debug!("model already loaded");
                return Ok(());
            }
        }

        self.model = None;
        self.result = None;
        self.current = None;
        self.stage = Stage::Uninitialized;

        let description = self.minimizer.load(model_identifier)?;
        let registry = CompositionRegistry::new(description.components, description.default_bulk)
            .map_err(|e| SessionError::Configuration {
                message: e.to_string(),
            })?;

        info!(
            backend = self.minimizer.name(),
            name = %description.name,
            components = registry.len(),
            "model loaded"
        );

        self.model = Some(LoadedModel {
            id: model_identifier.to_string(),
            name: description.name,
            bounds: description.bounds,
            registry,
        });
        self.stage = Stage::Configured;
        self.refresh_fingerprint();
        Ok(())
    }

    /// Store pressure [bar]. Bounds are enforced by the minimizer.
    pub fn set_pressure(&mut self, pressure: f64) {
        self.pressure = Some(pressure);
        self.refresh_fingerprint();
    }

    /// Store temperature [K]. Bounds are enforced by the minimizer.
    pub fn set_temperature(&mut self, temperature: f64) {
        self.temperature = Some(temperature);
        self.refresh_fingerprint();
    }

    pub fn pressure(&self) -> Option<f64> {
        self.pressure
    }

    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    pub fn set_bulk_composition(&mut self, index: usize, value: f64) -> SessionResult<()> {
        let model = self
            .model
            .as_mut()
            .ok_or_else(|| not_ready("set_bulk_composition", Stage::Configured, self.stage))?;
        model.registry.set_bulk_fraction(index, value)?;
        self.refresh_fingerprint();
        Ok(())
    }

    /// Composition registry; available once a model is loaded.
    pub fn registry(&self, operation: &'static str) -> SessionResult<&CompositionRegistry> {
        self.loaded(operation).map(|m| &m.registry)
    }

    pub fn bounds(&self, operation: &'static str) -> SessionResult<&ModelBounds> {
        self.loaded(operation).map(|m| &m.bounds)
    }

    pub fn model_name(&self) -> SessionResult<&str> {
        self.loaded("model_name").map(|m| m.name.as_str())
    }

    /// Run the minimizer on the current inputs.
    ///
    /// On success the new result set replaces the old one and the stage
    /// becomes `Solved`. On failure nothing is published and the stage is
    /// left as it was.
    #[instrument(skip_all)]
    pub fn minimize(&mut self) -> SessionResult<()> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| not_ready("minimize", Stage::Configured, self.stage))?;
        let pressure = self.pressure.ok_or_else(|| SessionError::MinimizationFailure {
            message: "pressure has not been set".to_string(),
        })?;
        let temperature = self
            .temperature
            .ok_or_else(|| SessionError::MinimizationFailure {
                message: "temperature has not been set".to_string(),
            })?;

        let composition = model.registry.bulk_composition();
        let fingerprint = Fingerprint::of(&ConfigSnapshot {
            model: &model.id,
            pressure,
            temperature,
            composition,
        });
        let request = MinimizationRequest::new(bar(pressure), k(temperature), composition);

        debug!(pressure, temperature, ?composition, "minimizing");
        let raw = self.minimizer.minimize(&request)?;
        let result = ResultSet::publish(
            raw,
            model.registry.len(),
            self.options.fraction_tolerance,
            fingerprint,
        )?;

        info!(
            solution_phases = result.solution_phases().len(),
            residual_phases = result.residual_phases().len(),
            "minimization succeeded"
        );
        self.result = Some(result);
        self.stage = Stage::Solved;
        Ok(())
    }

    /// The held result set, subject to the staleness policy.
    pub fn result(&self, operation: &'static str) -> SessionResult<&ResultSet> {
        let result = match (&self.result, self.stage) {
            (Some(result), Stage::Solved) => result,
            _ => return Err(not_ready(operation, Stage::Solved, self.stage)),
        };
        if self.options.staleness == StalenessPolicy::Reject && !self.is_result_fresh() {
            return Err(SessionError::StaleResult);
        }
        Ok(result)
    }

    /// Whether the held result set was produced by the current inputs.
    pub fn is_result_fresh(&self) -> bool {
        match (&self.result, &self.current) {
            (Some(result), Some(current)) => result.fingerprint() == current,
            _ => false,
        }
    }

    fn loaded(&self, operation: &'static str) -> SessionResult<&LoadedModel> {
        self.model
            .as_ref()
            .ok_or_else(|| not_ready(operation, Stage::Configured, self.stage))
    }

    fn refresh_fingerprint(&mut self) {
        self.current = match (&self.model, self.pressure, self.temperature) {
            (Some(model), Some(pressure), Some(temperature)) => {
                Some(Fingerprint::of(&ConfigSnapshot {
                    model: &model.id,
                    pressure,
                    temperature,
                    composition: model.registry.bulk_composition(),
                }))
            }
            _ => None,
        };
    }
}

fn not_ready(operation: &'static str, required: Stage, actual: Stage) -> SessionError {
    SessionError::NotReady {
        operation,
        required,
        actual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minimizer::{
        ComponentInfo, MinimizerError, ModelDescription, RawAssemblage, RawResidualPhase,
    };
    use crate::properties::SystemProperties;
    use eq_core::units::g_per_mol;

    /// Two-component stub: fails above 100 bar, otherwise one residual phase.
    struct Stub {
        loads: usize,
        solves: usize,
    }

    impl Minimizer for Stub {
        fn name(&self) -> &str {
            "stub"
        }

        fn load(&mut self, model: &str) -> Result<ModelDescription, MinimizerError> {
            self.loads += 1;
            if model == "missing" {
                return Err(MinimizerError::Load {
                    message: "no such model".to_string(),
                });
            }
            Ok(ModelDescription {
                name: model.to_string(),
                components: vec![
                    ComponentInfo {
                        name: "SiO2".to_string(),
                        molar_mass: g_per_mol(60.084),
                    },
                    ComponentInfo {
                        name: "MgO".to_string(),
                        molar_mass: g_per_mol(40.304),
                    },
                ],
                bounds: ModelBounds::new((1.0, 100.0), (1000.0, 2000.0))
                    .map_err(|e| MinimizerError::Load {
                        message: e.to_string(),
                    })?,
                default_bulk: vec![],
            })
        }

        fn minimize(
            &mut self,
            request: &MinimizationRequest<'_>,
        ) -> Result<RawAssemblage, MinimizerError> {
            self.solves += 1;
            let p = eq_core::to_bar(request.pressure());
            if p > 100.0 {
                return Err(MinimizerError::OutOfBounds {
                    what: "pressure",
                    value: p,
                    min: 1.0,
                    max: 100.0,
                });
            }
            Ok(RawAssemblage {
                solution_phases: vec![],
                residual_phases: vec![RawResidualPhase {
                    name: "Fo".to_string(),
                    weight_fraction: 1.0,
                    molar_fraction: 1.0,
                    molar_amount: request.composition().iter().sum(),
                    endmember_ratios: vec![1.0, 2.0],
                }],
                system: SystemProperties {
                    density: 3200.0 + p,
                    expansivity: 3e-5,
                    molar_entropy: 95.0,
                    molar_heat_capacity: 118.0,
                },
            })
        }
    }

    fn solved(options: SessionOptions) -> Session<Stub> {
        let mut s = Session::with_options(Stub { loads: 0, solves: 0 }, options);
        s.initialize("fo").unwrap();
        s.set_pressure(10.0);
        s.set_temperature(1500.0);
        s.set_bulk_composition(0, 1.0).unwrap();
        s.set_bulk_composition(1, 2.0).unwrap();
        s.minimize().unwrap();
        s
    }

    #[test]
    fn stages_advance() {
        let mut s = Session::new(Stub { loads: 0, solves: 0 });
        assert_eq!(s.stage(), Stage::Uninitialized);
        s.initialize("fo").unwrap();
        assert_eq!(s.stage(), Stage::Configured);
        s.set_pressure(10.0);
        s.set_temperature(1500.0);
        s.minimize().unwrap();
        assert_eq!(s.stage(), Stage::Solved);
    }

    #[test]
    fn initialize_same_model_is_idempotent() {
        let mut s = solved(SessionOptions::default());
        s.initialize("fo").unwrap();
        assert_eq!(s.minimizer().loads, 1);
        assert_eq!(s.stage(), Stage::Solved);
        assert!(s.result("test").is_ok());
    }

    #[test]
    fn initialize_other_model_drops_result() {
        let mut s = solved(SessionOptions::default());
        s.initialize("en").unwrap();
        assert_eq!(s.stage(), Stage::Configured);
        assert_eq!(s.registry("test").unwrap().bulk_composition(), &[0.0, 0.0]);
        assert!(matches!(s.result("test"), Err(SessionError::NotReady { .. })));
    }

    #[test]
    fn failed_load_resets_session() {
        let mut s = solved(SessionOptions::default());
        let err = s.initialize("missing").unwrap_err();
        assert!(matches!(err, SessionError::Configuration { .. }));
        assert_eq!(s.stage(), Stage::Uninitialized);
        assert!(matches!(s.registry("test"), Err(SessionError::NotReady { .. })));
    }

    #[test]
    fn composition_requires_model() {
        let mut s = Session::new(Stub { loads: 0, solves: 0 });
        assert!(matches!(
            s.set_bulk_composition(0, 1.0),
            Err(SessionError::NotReady { .. })
        ));
    }

    #[test]
    fn minimize_without_inputs_fails() {
        let mut s = Session::new(Stub { loads: 0, solves: 0 });
        assert!(matches!(s.minimize(), Err(SessionError::NotReady { .. })));
        s.initialize("fo").unwrap();
        assert!(matches!(
            s.minimize(),
            Err(SessionError::MinimizationFailure { .. })
        ));
        assert_eq!(s.minimizer().solves, 0);
    }

    #[test]
    fn reconfiguring_makes_result_stale() {
        let mut s = solved(SessionOptions::default());
        assert!(s.is_result_fresh());
        s.set_temperature(1600.0);
        assert!(!s.is_result_fresh());
        assert_eq!(s.stage(), Stage::Solved);
        assert!(matches!(s.result("test"), Err(SessionError::StaleResult)));

        // Back to the earlier inputs: fresh again.
        s.set_temperature(1500.0);
        assert!(s.result("test").is_ok());
    }

    #[test]
    fn freshness_follows_input_values() {
        let mut s = solved(SessionOptions::default());
        s.set_bulk_composition(1, -0.0).unwrap();
        s.minimize().unwrap();
        s.set_bulk_composition(1, 0.0).unwrap();
        assert!(s.is_result_fresh());

        s.set_temperature(f64::INFINITY);
        s.minimize().unwrap();
        s.set_temperature(f64::NAN);
        assert!(!s.is_result_fresh());
        assert!(matches!(s.result("test"), Err(SessionError::StaleResult)));
    }

    #[test]
    fn serve_policy_returns_stale_result() {
        let mut s = solved(SessionOptions {
            staleness: StalenessPolicy::Serve,
            ..SessionOptions::default()
        });
        s.set_bulk_composition(1, 5.0).unwrap();
        let result = s.result("test").unwrap();
        assert_eq!(result.residual_phases()[0].endmember_ratios(), &[1.0, 2.0]);
        assert!(!s.is_result_fresh());
    }

    #[test]
    fn failed_minimize_keeps_previous_result() {
        let mut s = solved(SessionOptions {
            staleness: StalenessPolicy::Serve,
            ..SessionOptions::default()
        });
        s.set_pressure(500.0);
        let err = s.minimize().unwrap_err();
        assert!(matches!(err, SessionError::MinimizationFailure { .. }));
        assert_eq!(s.stage(), Stage::Solved);
        let density = s.result("test").unwrap().system().density;
        assert_eq!(density, 3210.0);
    }

    #[test]
    fn stage_display() {
        assert_eq!(Stage::Configured.to_string(), "Configured");
        assert!(Stage::Uninitialized < Stage::Configured);
        assert!(Stage::Configured < Stage::Solved);
    }
}
