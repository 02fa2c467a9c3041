//! Model file validation logic.
//!
//! Structural checks only. Physical plausibility of tabulated results
//! (fractions in [0, 1] and so on) is checked by the consumer when the
//! assemblage is published.

use crate::schema::{AssemblageDef, ModelFile, RangeDef};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate component: {name}")]
    DuplicateComponent { name: String },

    #[error("Model defines no components")]
    NoComponents,

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Length mismatch: {field} has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },
}

pub fn validate_model(model: &ModelFile) -> Result<(), ValidationError> {
    if model.components.is_empty() {
        return Err(ValidationError::NoComponents);
    }

    let mut names = HashSet::new();
    for component in &model.components {
        if !names.insert(component.name.as_str()) {
            return Err(ValidationError::DuplicateComponent {
                name: component.name.clone(),
            });
        }
        if !component.molar_mass.is_finite() || component.molar_mass <= 0.0 {
            return Err(ValidationError::InvalidValue {
                field: format!("components.{}.molar_mass", component.name),
                value: component.molar_mass.to_string(),
                reason: "must be positive and finite".to_string(),
            });
        }
    }

    validate_range("bounds.pressure", &model.bounds.pressure)?;
    validate_range("bounds.temperature", &model.bounds.temperature)?;

    let n = model.components.len();
    if let Some(bulk) = &model.default_bulk {
        check_len("default_bulk", n, bulk.len())?;
    }

    for (i, assemblage) in model.assemblages.iter().enumerate() {
        validate_assemblage(i, assemblage, n)?;
    }

    Ok(())
}

fn validate_range(field: &str, range: &RangeDef) -> Result<(), ValidationError> {
    if !range.min.is_finite() || !range.max.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: format!("[{}, {}]", range.min, range.max),
            reason: "bounds must be finite".to_string(),
        });
    }
    if range.min > range.max {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: format!("[{}, {}]", range.min, range.max),
            reason: "min exceeds max".to_string(),
        });
    }
    Ok(())
}

fn validate_assemblage(
    index: usize,
    assemblage: &AssemblageDef,
    n_components: usize,
) -> Result<(), ValidationError> {
    check_len(
        &format!("assemblages[{index}].composition"),
        n_components,
        assemblage.composition.len(),
    )?;
    for phase in &assemblage.residual_phases {
        check_len(
            &format!("assemblages[{index}].{}.endmember_ratios", phase.name),
            n_components,
            phase.endmember_ratios.len(),
        )?;
    }
    Ok(())
}

fn check_len(field: &str, expected: usize, actual: usize) -> Result<(), ValidationError> {
    if expected != actual {
        return Err(ValidationError::LengthMismatch {
            field: field.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}
