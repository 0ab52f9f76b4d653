//! Validation reports and deterministic diagnostics.
//!
//! Two independent runs over the same inputs must produce identical
//! reports, including diagnostic IDs. The ID is derived from a
//! canonical key (schema, class, scope, layer) serialized with sorted
//! keys and hashed with SHA-256; messages and context payloads do not
//! contribute, so wording can evolve without changing identities.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// The three validation layers, in pipeline order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    SelfQc,
    Admissibility,
    Execution,
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SelfQc => write!(f, "SELF_QC"),
            Self::Admissibility => write!(f, "ADMISSIBILITY"),
            Self::Execution => write!(f, "EXECUTION"),
        }
    }
}

/// Pass/fail verdict of one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerVerdict {
    Pass,
    Fail,
}

/// Diagnostic class constants.
pub mod diagnostic_class {
    /// A domain inconsistency surfaced by the composed-domain QC layer.
    pub const SELF_QC_FAILURE: &str = "self_qc_failure";

    /// An obligatory scope with no supporting assertion.
    pub const ADMISSIBILITY_FAILURE: &str = "admissibility_failure";

    /// An assertion whose predicate the vocabulary does not declare.
    pub const VOCABULARY_GAP: &str = "vocabulary_gap";

    /// A forbidden atom that is true in the closed model.
    pub const EXECUTION_VIOLATION: &str = "execution_violation";
}

/// One validation finding: the violated rule scope, a reason, and a
/// deterministic identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Deterministic ID: `d1_` followed by a truncated SHA-256 of the
    /// canonical key.
    pub diagnostic_id: String,

    /// Failure classification (see [`diagnostic_class`]).
    pub class: String,

    /// The offending scope or element.
    pub scope: String,

    /// Human-readable reason.
    pub message: String,

    /// Class-specific machine-readable details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl Diagnostic {
    pub fn new(
        layer: Layer,
        class: impl Into<String>,
        scope: impl Into<String>,
        message: impl Into<String>,
        context: Option<Value>,
    ) -> Self {
        let class = class.into();
        let scope = scope.into();
        let diagnostic_id = compute_diagnostic_id(layer, &class, &scope);
        Self {
            diagnostic_id,
            class,
            scope,
            message: message.into(),
            context,
        }
    }

    /// Ordering key: class, then scope, then ID.
    fn sort_key(&self) -> (&str, &str, &str) {
        (&self.class, &self.scope, &self.diagnostic_id)
    }
}

impl PartialOrd for Diagnostic {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Diagnostic {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

/// Compute a deterministic diagnostic ID from the canonical key.
pub fn compute_diagnostic_id(layer: Layer, class: &str, scope: &str) -> String {
    // serde_json maps are ordered, so the serialization is canonical.
    let key = serde_json::json!({
        "schema": 1,
        "layer": layer,
        "class": class,
        "scope": scope,
    });
    let bytes = serde_json::to_vec(&key).unwrap_or_default();
    let hash = Sha256::digest(&bytes);
    let mut hex = String::with_capacity(24);
    for byte in hash.iter().take(12) {
        hex.push_str(&format!("{byte:02x}"));
    }
    format!("d1_{hex}")
}

/// The outcome of one validation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub layer: Layer,
    pub verdict: LayerVerdict,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    /// A passing layer with no findings.
    pub fn pass(layer: Layer) -> Self {
        Self {
            layer,
            verdict: LayerVerdict::Pass,
            diagnostics: vec![],
        }
    }

    /// A failing layer. Diagnostics are sorted into their canonical
    /// order.
    pub fn fail(layer: Layer, mut diagnostics: Vec<Diagnostic>) -> Self {
        diagnostics.sort();
        Self {
            layer,
            verdict: LayerVerdict::Fail,
            diagnostics,
        }
    }

    /// Build from collected findings: pass when empty, fail otherwise.
    pub fn from_diagnostics(layer: Layer, diagnostics: Vec<Diagnostic>) -> Self {
        if diagnostics.is_empty() {
            Self::pass(layer)
        } else {
            Self::fail(layer, diagnostics)
        }
    }

    pub fn passed(&self) -> bool {
        self.verdict == LayerVerdict::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_id_determinism() {
        let a = compute_diagnostic_id(Layer::Execution, "execution_violation", "Unescorted-minor");
        let b = compute_diagnostic_id(Layer::Execution, "execution_violation", "Unescorted-minor");
        assert_eq!(a, b);
        assert!(a.starts_with("d1_"));
        assert_eq!(a.len(), 3 + 24);
    }

    #[test]
    fn diagnostic_id_sensitivity() {
        let a = compute_diagnostic_id(Layer::Execution, "execution_violation", "X");
        let b = compute_diagnostic_id(Layer::Execution, "execution_violation", "Y");
        let c = compute_diagnostic_id(Layer::Admissibility, "admissibility_failure", "X");
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn message_does_not_affect_identity() {
        let a = Diagnostic::new(Layer::Execution, "execution_violation", "X", "one", None);
        let b = Diagnostic::new(Layer::Execution, "execution_violation", "X", "two", None);
        assert_eq!(a.diagnostic_id, b.diagnostic_id);
    }

    #[test]
    fn failing_report_sorts_diagnostics() {
        let d1 = Diagnostic::new(Layer::Execution, "execution_violation", "Zed", "z", None);
        let d2 = Diagnostic::new(Layer::Execution, "execution_violation", "Alpha", "a", None);
        let report = ValidationReport::fail(Layer::Execution, vec![d1, d2]);
        assert_eq!(report.diagnostics[0].scope, "Alpha");
    }

    #[test]
    fn report_serializes_camel_case() {
        let report = ValidationReport::pass(Layer::SelfQc);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["layer"], "self_qc");
        assert_eq!(json["verdict"], "pass");
    }
}
