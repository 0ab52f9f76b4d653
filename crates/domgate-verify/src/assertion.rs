//! Ground assertions: the instance data for one validation run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A ground fact over the vocabulary, as a subject-predicate-object
/// triple. The predicate names the vocabulary atom the fact supports.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assertion {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Assertion {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// A bare ground fact named by its predicate, for atoms that carry
    /// no interesting subject or object of their own.
    pub fn fact(atom: impl Into<String>) -> Self {
        let atom = atom.into();
        Self {
            subject: atom.clone(),
            predicate: atom,
            object: "true".to_string(),
        }
    }
}

impl std::fmt::Display for Assertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} --{}--> {}", self.subject, self.predicate, self.object)
    }
}

/// The set of assertions supplied for one validation run.
///
/// Backed by an ordered set so every traversal, and therefore every
/// report derived from it, is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionSet {
    facts: BTreeSet<Assertion>,
}

impl AssertionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, assertion: Assertion) {
        self.facts.insert(assertion);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Assertion> {
        self.facts.iter()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Whether any assertion supports the named atom.
    pub fn supports(&self, atom: &str) -> bool {
        self.facts.iter().any(|a| a.predicate == atom)
    }

    /// The names of all asserted atoms.
    pub fn asserted_atoms(&self) -> BTreeSet<String> {
        self.facts.iter().map(|a| a.predicate.clone()).collect()
    }
}

impl FromIterator<Assertion> for AssertionSet {
    fn from_iter<T: IntoIterator<Item = Assertion>>(iter: T) -> Self {
        Self {
            facts: iter.into_iter().collect(),
        }
    }
}
