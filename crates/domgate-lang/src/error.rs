//! Error types for domain construction and composition.
//!
//! These errors abort the operation that raised them: no partially
//! built domain language or graph is ever returned. Validation-time
//! findings (missing obligatory facts, true forbidden atoms) are not
//! errors; they are structured diagnostics inside a validation report.

use crate::rule::Modality;

/// Errors arising from malformed domains or failed composition.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// The domain definition itself is malformed (duplicate names,
    /// empty graph, missing fields).
    #[error("schema violation in '{module}': {message}")]
    Schema { module: String, message: String },

    /// A rule scope or import declaration references something that
    /// does not exist.
    #[error("unresolved reference in '{module}': {message}")]
    Reference { module: String, message: String },

    /// Two equal-precedence rules disagree on the modality of the
    /// same scope.
    #[error(
        "modality conflict in '{module}' on '{scope}': \
         {first} vs {second} at precedence {precedence}"
    )]
    ModalityConflict {
        module: String,
        scope: String,
        first: Modality,
        second: Modality,
        precedence: u32,
    },

    /// Graph composition found a name collision it cannot resolve:
    /// two modules define '{name}' differently at equal precedence.
    #[error("merge conflict on '{name}': modules '{left}' and '{right}' disagree at weight {weight}")]
    MergeConflict {
        name: String,
        left: String,
        right: String,
        weight: u32,
    },

    /// The fixed-point merge did not stabilize within its round cap.
    #[error("composition did not converge after {rounds} rounds")]
    NonConvergence { rounds: usize },
}
