//! # Domgate Language
//!
//! Domain languages: the closure layer that turns open-world domain
//! knowledge into a deterministic, closed specification of admissible
//! meaning. A domain language (DomL) bundles a vocabulary with
//! normative rules; a domain language graph (DomLG) composes several
//! modules through precedence-weighted import edges.
//!
//! This crate is **representation-agnostic**: it does not prescribe how
//! domains are stored, parsed, or translated downstream. It only
//! prescribes what a well-formed domain is and how modules merge.
//!
//! ## Architecture
//!
//! ```text
//! DomainElement          ← Vocabulary items (class, property, individual)
//!     │
//! NormativeRule          ← (scope, modality, condition, precedence)
//!     │
//! DomainLanguage         ← One module; Self-QC enforced at build
//!     │
//! DomainLanguageGraph    ← Modules + import edges, precedence-weighted
//!     │
//! compose                ← Fixed-point merge into one DomL
//! ```
//!
//! A `DomainLanguage` can only be obtained through
//! [`DomainLanguageBuilder::build`] or [`DomainLanguageGraph::compose`],
//! both of which run Self-QC and refuse to return an inconsistent
//! domain. Every value in this crate is immutable after construction.

pub mod element;
pub mod error;
pub mod graph;
pub mod language;
pub mod qc;
pub mod rule;

pub use element::{DomainElement, ElementKind, ScopeRef};
pub use error::DomainError;
pub use graph::{DomainLanguageGraph, ImportEdge};
pub use language::{DomainLanguage, DomainLanguageBuilder, ImportDecl};
pub use qc::{QcDiagnostic, QcIssue, QcReport, QcVerdict};
pub use rule::{Condition, Modality, NormativeRule};
