//! The closed model: three-valued truth over the vocabulary.
//!
//! Unknown is a first-class value, not an absence: it marks atoms the
//! domain deliberately leaves open (`Optional` modality) and that were
//! not asserted. It is never conflated with false.

use crate::assertion::{Assertion, AssertionSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Truth value of an atom after closure.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Truth {
    True,
    False,
    Unknown,
}

impl std::fmt::Display for Truth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::True => write!(f, "true"),
            Self::False => write!(f, "false"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A mapping from every atom of the composed vocabulary to a truth
/// value. Produced fresh per gating run; carries no cross-run state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosedModel {
    atoms: BTreeMap<String, Truth>,
}

impl ClosedModel {
    pub(crate) fn from_atoms(atoms: BTreeMap<String, Truth>) -> Self {
        Self { atoms }
    }

    pub fn value(&self, atom: &str) -> Option<Truth> {
        self.atoms.get(atom).copied()
    }

    pub fn is_true(&self, atom: &str) -> bool {
        self.value(atom) == Some(Truth::True)
    }

    pub fn atoms(&self) -> &BTreeMap<String, Truth> {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Re-assert exactly the true atoms of this model.
    ///
    /// Feeding the result back through the gate reproduces the model:
    /// closure is idempotent.
    pub fn to_assertions(&self) -> AssertionSet {
        self.atoms
            .iter()
            .filter(|(_, truth)| **truth == Truth::True)
            .map(|(atom, _)| Assertion::fact(atom.clone()))
            .collect()
    }
}
