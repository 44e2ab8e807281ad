//! Per-oscillator parameter rows.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ModelError, ModelResult};

/// Immutable parameters for a batch, one entry per oscillator.
///
/// Entry `i` belongs to state row `i`. The set is fixed once built; models
/// only ever read from it.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterSet<P> {
    rows: Vec<P>,
}

impl<P> ParameterSet<P> {
    pub fn new(rows: Vec<P>) -> ModelResult<Self> {
        if rows.is_empty() {
            return Err(ModelError::EmptyBatch);
        }
        Ok(Self { rows })
    }

    /// Number of oscillators.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&P> {
        self.rows.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, P> {
        self.rows.iter()
    }

    pub fn as_slice(&self) -> &[P] {
        &self.rows
    }
}

impl<P: Serialize> Serialize for ParameterSet<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.rows.serialize(serializer)
    }
}

// Deserialized sets go through `new` so an empty list is rejected.
impl<'de, P: Deserialize<'de>> Deserialize<'de> for ParameterSet<P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<P>::deserialize(deserializer)?;
        Self::new(rows).map_err(serde::de::Error::custom)
    }
}

impl<'a, P> IntoIterator for &'a ParameterSet<P> {
    type Item = &'a P;
    type IntoIter = std::slice::Iter<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
