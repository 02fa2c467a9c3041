//! Composition registry: the ordered, fixed-size list of chemical components.

use crate::minimizer::ComponentInfo;
use eq_core::units::{MolarMass, to_kg_per_mol};
use eq_core::{CoreError, CoreResult, check_index};
use std::collections::HashMap;

/// A chemical component of the bulk system.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    name: String,
    molar_mass: MolarMass,
}

impl Component {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn molar_mass(&self) -> MolarMass {
        self.molar_mass
    }

    /// Molar mass [kg/mol].
    pub fn molar_mass_kg_per_mol(&self) -> f64 {
        to_kg_per_mol(self.molar_mass)
    }
}

/// Components plus the caller-supplied bulk composition, in model order.
///
/// The component list is fixed once built; only bulk fractions change.
#[derive(Debug, Clone, Default)]
pub struct CompositionRegistry {
    components: Vec<Component>,
    bulk: Vec<f64>,
    by_name: HashMap<String, usize>,
}

impl CompositionRegistry {
    /// Build a registry from model components.
    ///
    /// An empty `default_bulk` means all zeros.
    pub fn new(infos: Vec<ComponentInfo>, default_bulk: Vec<f64>) -> CoreResult<Self> {
        let n = infos.len();
        let bulk = if default_bulk.is_empty() {
            vec![0.0; n]
        } else if default_bulk.len() == n {
            default_bulk
        } else {
            return Err(CoreError::InvalidArg {
                what: "default bulk composition length differs from component count",
            });
        };

        let mut by_name = HashMap::with_capacity(n);
        let mut components = Vec::with_capacity(n);
        for (i, info) in infos.into_iter().enumerate() {
            let mass = to_kg_per_mol(info.molar_mass);
            if !mass.is_finite() || mass <= 0.0 {
                return Err(CoreError::InvalidArg {
                    what: "component molar mass must be positive and finite",
                });
            }
            if by_name.insert(info.name.clone(), i).is_some() {
                return Err(CoreError::InvalidArg {
                    what: "duplicate component name",
                });
            }
            components.push(Component {
                name: info.name,
                molar_mass: info.molar_mass,
            });
        }

        Ok(Self {
            components,
            bulk,
            by_name,
        })
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn component(&self, index: usize) -> CoreResult<&Component> {
        let i = check_index(index, self.components.len(), "component")?;
        Ok(&self.components[i])
    }

    pub fn name(&self, index: usize) -> CoreResult<&str> {
        self.component(index).map(Component::name)
    }

    /// Molar mass [kg/mol].
    pub fn molar_mass(&self, index: usize) -> CoreResult<f64> {
        self.component(index).map(Component::molar_mass_kg_per_mol)
    }

    pub fn bulk_fraction(&self, index: usize) -> CoreResult<f64> {
        let i = check_index(index, self.bulk.len(), "component")?;
        Ok(self.bulk[i])
    }

    /// Overwrite one bulk fraction. The value is stored as given.
    pub fn set_bulk_fraction(&mut self, index: usize, value: f64) -> CoreResult<()> {
        let i = check_index(index, self.bulk.len(), "component")?;
        self.bulk[i] = value;
        Ok(())
    }

    pub fn bulk_composition(&self) -> &[f64] {
        &self.bulk
    }

    /// Exact-match name lookup.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Component> + '_ {
        self.components.iter()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use eq_core::units::g_per_mol;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn bulk_round_trips_last_write(
            writes in prop::collection::vec((0_usize..6, -1.0e3_f64..1.0e3), 0..32)
        ) {
            let components = (0..6)
                .map(|i| ComponentInfo {
                    name: format!("C{i}"),
                    molar_mass: g_per_mol(10.0 + i as f64),
                })
                .collect();
            let mut reg = CompositionRegistry::new(components, vec![]).unwrap();
            let mut expected = vec![0.0; 6];
            for (i, v) in writes {
                reg.set_bulk_fraction(i, v).unwrap();
                expected[i] = v;
            }
            for (i, v) in expected.iter().enumerate() {
                prop_assert_eq!(reg.bulk_fraction(i).unwrap(), *v);
            }
        }
    }
}
