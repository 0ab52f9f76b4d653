//! # Domgate Verify
//!
//! Validation of instance data against a composed domain language.
//!
//! The pipeline is a deterministic, side-effect-free computation over
//! immutable values: independent runs share no state and may execute
//! concurrently without coordination.
//!
//! ## Pipeline
//!
//! ```text
//! AssertionSet            ← Ground facts for one validation run
//!     │
//! NormativeRuleEngine     ← Per-atom modality verdicts, precedence-resolved
//!     │
//! gate                    ← OWA → CWA closure into a ClosedModel
//!     │
//! Validator               ← Self-QC → Admissibility → Execution
//!     │
//! ValidationReport        ← Verdict + deterministic diagnostics
//! ```
//!
//! Construction-time problems (`DomainError`) abort; validation-time
//! findings are structured diagnostics inside reports, so a caller can
//! inspect failures, retry with corrected instance data, or continue a
//! batch without the process terminating.

pub mod assertion;
pub mod engine;
pub mod gate;
pub mod model;
pub mod report;
pub mod validator;

pub use assertion::{Assertion, AssertionSet};
pub use engine::{NormativeRuleEngine, Verdict};
pub use gate::gate;
pub use model::{ClosedModel, Truth};
pub use report::{Diagnostic, Layer, LayerVerdict, ValidationReport, diagnostic_class};
pub use validator::{FailureMode, ValidationRun, Validator};
