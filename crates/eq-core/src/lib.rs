//! eq-core: stable foundation for the equilibrium query layer.
//!
//! Contains:
//! - units (uom SI types + constructors in the model's working units)
//! - numeric (Real + tolerances + fraction/index checks)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::*;
