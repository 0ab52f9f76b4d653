//! Self-QC: internal consistency checking of a domain language.
//!
//! Self-QC runs automatically at build time and again, through the
//! validator, on composed domains (module merging can introduce
//! conflicts between individually consistent modules). It is
//! deterministic and side-effect-free: the same input always yields
//! the same report, with diagnostics in a fixed order.
//!
//! Checks:
//! - duplicate element names
//! - rule scopes that do not resolve (locally or through a declared import)
//! - condition atoms that resolve neither locally nor through an import
//! - equal-precedence rules with incompatible modalities on one scope

use crate::element::{DomainElement, ScopeRef};
use crate::error::DomainError;
use crate::language::ImportDecl;
use crate::rule::{Modality, NormativeRule};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Overall verdict of a QC run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QcVerdict {
    Pass,
    Fail,
}

/// What kind of inconsistency a diagnostic reports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum QcIssue {
    DuplicateElement,
    DanglingReference,
    UndeclaredImport,
    ModalityConflict,
}

/// Details of an equal-precedence modality clash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictDetail {
    pub first: Modality,
    pub second: Modality,
    pub precedence: u32,
}

/// One Self-QC finding.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QcDiagnostic {
    pub issue: QcIssue,
    pub scope: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict: Option<ConflictDetail>,
}

impl QcDiagnostic {
    fn new(issue: QcIssue, scope: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            issue,
            scope: scope.into(),
            message: message.into(),
            conflict: None,
        }
    }

    /// Lift this finding into the construction error it corresponds to.
    pub fn to_error(&self, module: &str) -> DomainError {
        match self.issue {
            QcIssue::DuplicateElement => DomainError::Schema {
                module: module.to_string(),
                message: self.message.clone(),
            },
            QcIssue::DanglingReference | QcIssue::UndeclaredImport => DomainError::Reference {
                module: module.to_string(),
                message: self.message.clone(),
            },
            QcIssue::ModalityConflict => match self.conflict {
                Some(detail) => DomainError::ModalityConflict {
                    module: module.to_string(),
                    scope: self.scope.clone(),
                    first: detail.first,
                    second: detail.second,
                    precedence: detail.precedence,
                },
                None => DomainError::Schema {
                    module: module.to_string(),
                    message: self.message.clone(),
                },
            },
        }
    }
}

/// Result of a Self-QC run: a verdict plus ordered diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QcReport {
    pub verdict: QcVerdict,
    pub diagnostics: Vec<QcDiagnostic>,
}

impl QcReport {
    pub fn passed(&self) -> bool {
        self.verdict == QcVerdict::Pass
    }
}

/// Run Self-QC over a candidate domain definition.
///
/// Pure: the report is a function of the arguments alone, and the
/// diagnostic order is fixed (sorted by issue, scope, message).
pub fn run_self_qc(
    elements: &[DomainElement],
    rules: &[NormativeRule],
    imports: &[ImportDecl],
) -> QcReport {
    let mut diagnostics = Vec::new();

    // Duplicate element names.
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for el in elements {
        if !seen.insert(&el.name) {
            diagnostics.push(QcDiagnostic::new(
                QcIssue::DuplicateElement,
                el.name.clone(),
                format!("element '{}' declared more than once", el.name),
            ));
        }
    }

    // Scope resolution: local scopes must name a declared element;
    // imported scopes must name a declared import. Resolution of the
    // imported element itself is deferred to composition, where the
    // target module's vocabulary is available.
    let local: BTreeSet<&str> = elements.iter().map(|e| e.name.as_str()).collect();
    let declared_imports: BTreeSet<&str> = imports.iter().map(|i| i.target.as_str()).collect();
    for rule in rules {
        match &rule.scope {
            ScopeRef::Local(name) => {
                if !local.contains(name.as_str()) {
                    diagnostics.push(QcDiagnostic::new(
                        QcIssue::DanglingReference,
                        name.clone(),
                        format!("rule {rule} references undeclared element '{name}'"),
                    ));
                }
            }
            ScopeRef::Imported { module, element } => {
                if !declared_imports.contains(module.as_str()) {
                    diagnostics.push(QcDiagnostic::new(
                        QcIssue::UndeclaredImport,
                        format!("{module}:{element}"),
                        format!("rule {rule} references '{element}' via undeclared import '{module}'"),
                    ));
                }
            }
        }
    }

    // Condition atoms must name vocabulary, like scopes do: an atom
    // outside every vocabulary can never be true in a closed model, so
    // a condition on it is either dead or breaks gating idempotence.
    // Condition atoms are unqualified, so a module with imports defers
    // the check to composition, where the merged vocabulary is local
    // and no imports remain.
    for rule in rules {
        if let Some(atom) = rule.condition.atom() {
            if !local.contains(atom) && imports.is_empty() {
                diagnostics.push(QcDiagnostic::new(
                    QcIssue::DanglingReference,
                    atom.to_string(),
                    format!("rule {rule} conditions on undeclared atom '{atom}'"),
                ));
            }
        }
    }

    // Equal-precedence modality clashes, keyed by the element name the
    // scope points at (conditions are ignored here: whether two rules
    // can actually co-fire is irrelevant to definitional coherence).
    let mut by_atom: BTreeMap<&str, Vec<&NormativeRule>> = BTreeMap::new();
    for rule in rules {
        by_atom
            .entry(rule.scope.element_name())
            .or_default()
            .push(rule);
    }
    for (atom, group) in &by_atom {
        for i in 0..group.len() {
            for j in (i + 1)..group.len() {
                let (a, b) = (group[i], group[j]);
                if a.precedence == b.precedence && !a.modality.compatible_with(b.modality) {
                    diagnostics.push(QcDiagnostic {
                        issue: QcIssue::ModalityConflict,
                        scope: (*atom).to_string(),
                        message: format!(
                            "rules {a} and {b} assign incompatible modalities at equal precedence"
                        ),
                        conflict: Some(ConflictDetail {
                            first: a.modality,
                            second: b.modality,
                            precedence: a.precedence,
                        }),
                    });
                }
            }
        }
    }

    diagnostics.sort();
    let verdict = if diagnostics.is_empty() {
        QcVerdict::Pass
    } else {
        QcVerdict::Fail
    };
    QcReport {
        verdict,
        diagnostics,
    }
}
