//! Normative rules: modality, condition, precedence.
//!
//! A rule assigns one of four modalities to a scoped vocabulary
//! element. Modalities have fixed meaning across the pipeline:
//!
//! - **Obligatory**: the atom must be asserted (admissibility layer).
//! - **Forbidden**: the atom must be false after closure (execution layer).
//! - **Permitted**: no obligation either way.
//! - **Optional**: excluded from the closed-world default; the atom
//!   stays unknown unless explicitly asserted.
//!
//! The modality set is deliberately a closed enum, not an open rule
//! hierarchy: resolution is exhaustive and statically checkable.

use crate::element::ScopeRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The four normative modalities.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    Obligatory,
    Permitted,
    Forbidden,
    Optional,
}

impl Modality {
    /// Modality compatibility table.
    ///
    /// Two rules at equal precedence on the same scope are coherent only
    /// when their modalities are compatible. Requiring and forbidding the
    /// same atom is incoherent; so is obligating or forbidding an atom
    /// that is declared open-ended (`Optional`). Permission is subsumed
    /// by obligation and refined by optionality.
    pub fn compatible_with(self, other: Self) -> bool {
        use Modality::*;
        match (self, other) {
            (a, b) if a == b => true,
            (Obligatory, Permitted) | (Permitted, Obligatory) => true,
            (Permitted, Optional) | (Optional, Permitted) => true,
            _ => false,
        }
    }

}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Obligatory => write!(f, "OBLIGATORY"),
            Self::Permitted => write!(f, "PERMITTED"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::Optional => write!(f, "OPTIONAL"),
        }
    }
}

/// Condition under which a rule fires, evaluated over the set of
/// asserted atom names.
///
/// A closed data enum rather than an opaque predicate: conditions stay
/// serializable, comparable, and deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Unconditional; the rule always applies.
    Always,

    /// Applies only when the named atom is asserted.
    Present(String),

    /// Applies only when the named atom is not asserted.
    Absent(String),
}

impl Condition {
    /// The atom this condition inspects, if any.
    pub fn atom(&self) -> Option<&str> {
        match self {
            Self::Always => None,
            Self::Present(atom) | Self::Absent(atom) => Some(atom),
        }
    }

    /// Evaluate against the set of asserted atom names.
    pub fn holds(&self, asserted: &BTreeSet<String>) -> bool {
        match self {
            Self::Always => true,
            Self::Present(atom) => asserted.contains(atom),
            Self::Absent(atom) => !asserted.contains(atom),
        }
    }
}

/// A normative rule: (scope, modality, condition, precedence).
///
/// Rules are immutable once attached to a domain language. Precedence
/// orders competing rules on the same scope: the highest-precedence
/// matching rule wins, and an equal-precedence tie between
/// incompatible modalities is a hard error, never silently resolved.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NormativeRule {
    pub scope: ScopeRef,
    pub modality: Modality,
    pub condition: Condition,
    pub precedence: u32,
}

impl NormativeRule {
    pub fn new(scope: ScopeRef, modality: Modality, condition: Condition, precedence: u32) -> Self {
        Self {
            scope,
            modality,
            condition,
            precedence,
        }
    }

    /// An unconditional rule.
    pub fn unconditional(scope: ScopeRef, modality: Modality, precedence: u32) -> Self {
        Self::new(scope, modality, Condition::Always, precedence)
    }
}

impl std::fmt::Display for NormativeRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})@{}", self.modality, self.scope, self.precedence)
    }
}
