//! eq-session: query and lifecycle layer over a phase-equilibrium minimizer.
//!
//! Provides:
//! - Session state (model, pressure, temperature, bulk composition, stage)
//! - Composition registry (components, molar masses, bulk fractions)
//! - Validated result sets (solution and residual phases, bulk properties)
//! - `Minimizer` trait isolating the numerical solver
//! - `Equilibrium` query façade with bounds-checked, stage-checked reads
//! - A table-backed minimizer driven by `eq-model` files
//!
//! # Example
//!
//! ```no_run
//! use eq_session::{Equilibrium, PhaseKind, SystemProperty, TabulatedMinimizer};
//!
//! let mut eq = Equilibrium::new(TabulatedMinimizer::from_env());
//! eq.initialize("simple")?;
//! eq.set_pressure(20_000.0);
//! eq.set_temperature(1500.0);
//! for (i, x) in [38.5, 2.82, 50.5, 5.88].into_iter().enumerate() {
//!     eq.set_bulk_composition(i, x)?;
//! }
//! eq.minimize()?;
//!
//! println!("{} stable solution phases", eq.solution_phase_count()?);
//! println!("first: {}", eq.phase_name(PhaseKind::Solution, 0)?);
//! println!("density: {} kg/m³", eq.system_property(SystemProperty::Density)?);
//! # Ok::<(), eq_session::SessionError>(())
//! ```

pub mod error;
pub mod fingerprint;
pub mod minimizer;
pub mod phase;
pub mod properties;
pub mod query;
pub mod registry;
pub mod result;
pub mod session;
pub mod tabulated;

// Re-exports for ergonomics
pub use error::{SessionError, SessionResult};
pub use fingerprint::{ConfigSnapshot, Fingerprint};
pub use minimizer::{
    ComponentInfo, MinimizationRequest, Minimizer, MinimizerError, ModelDescription,
    RawAssemblage, RawResidualPhase, RawSolutionPhase,
};
pub use phase::{Phase, PhaseAmounts, PhaseKind, ResidualPhase, SolutionPhase};
pub use properties::{ModelBounds, SystemProperties, SystemProperty};
pub use query::Equilibrium;
pub use registry::{Component, CompositionRegistry};
pub use result::ResultSet;
pub use session::{Session, SessionOptions, Stage, StalenessPolicy};
pub use tabulated::TabulatedMinimizer;
