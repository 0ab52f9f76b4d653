//! The three-layer validation pipeline.
//!
//! Layers run in strict order against immutable inputs:
//!
//! 1. **Self-QC** — re-validate the fully composed domain (merging can
//!    introduce conflicts between individually consistent modules).
//! 2. **Admissibility** — before gating, every obligatory scope must
//!    have a supporting assertion, and every assertion must land in
//!    the vocabulary.
//! 3. **Execution** — gate into the closed model, then require every
//!    forbidden scope to be false in it (not merely absent).
//!
//! A failing layer short-circuits by default; `FailureMode::CollectAll`
//! runs every layer and gathers all diagnostics instead. Each run is a
//! pure function of (composed domain, assertions) and never mutates
//! either.

use crate::assertion::AssertionSet;
use crate::engine::NormativeRuleEngine;
use crate::gate::gate;
use crate::model::ClosedModel;
use crate::report::{Diagnostic, Layer, ValidationReport, diagnostic_class};
use domgate_lang::{DomainError, DomainLanguage, Modality};
use serde::{Deserialize, Serialize};

/// Whether a failing layer stops the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    /// Stop at the first failing layer.
    #[default]
    ShortCircuit,

    /// Run every layer and collect all diagnostics.
    CollectAll,
}

/// The outcome of one pipeline run: per-layer reports, plus the closed
/// model when gating was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRun {
    pub reports: Vec<ValidationReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ClosedModel>,
}

impl ValidationRun {
    /// All three layers ran and passed.
    pub fn passed(&self) -> bool {
        self.reports.len() == 3 && self.reports.iter().all(ValidationReport::passed)
    }

    pub fn report(&self, layer: Layer) -> Option<&ValidationReport> {
        self.reports.iter().find(|r| r.layer == layer)
    }
}

/// Orchestrates the three layers over a composed domain.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    mode: FailureMode,
}

impl Validator {
    pub fn new(mode: FailureMode) -> Self {
        Self { mode }
    }

    /// Run the pipeline.
    ///
    /// Admissibility and execution findings come back as report
    /// diagnostics; only construction-grade problems (a modality tie
    /// discovered while evaluating rules) surface as errors.
    pub fn run(
        &self,
        domain: &DomainLanguage,
        assertions: &AssertionSet,
    ) -> Result<ValidationRun, DomainError> {
        let mut run = ValidationRun {
            reports: vec![],
            model: None,
        };

        let self_qc = self.check_self_qc(domain);
        let stop = !self_qc.passed() && self.mode == FailureMode::ShortCircuit;
        run.reports.push(self_qc);
        if stop {
            return Ok(run);
        }

        let admissibility = self.check_admissibility(domain, assertions)?;
        let stop = !admissibility.passed() && self.mode == FailureMode::ShortCircuit;
        run.reports.push(admissibility);
        if stop {
            return Ok(run);
        }

        let model = gate(domain, assertions)?;
        run.reports.push(self.check_execution(domain, assertions, &model)?);
        run.model = Some(model);
        Ok(run)
    }

    fn check_self_qc(&self, domain: &DomainLanguage) -> ValidationReport {
        let qc = domain.self_qc();
        let diagnostics = qc
            .diagnostics
            .iter()
            .map(|d| {
                Diagnostic::new(
                    Layer::SelfQc,
                    diagnostic_class::SELF_QC_FAILURE,
                    d.scope.clone(),
                    d.message.clone(),
                    None,
                )
            })
            .collect();
        ValidationReport::from_diagnostics(Layer::SelfQc, diagnostics)
    }

    fn check_admissibility(
        &self,
        domain: &DomainLanguage,
        assertions: &AssertionSet,
    ) -> Result<ValidationReport, DomainError> {
        let mut diagnostics = Vec::new();

        // Vocabulary closure: instance data may only speak the
        // composed vocabulary.
        for assertion in assertions.iter() {
            if !domain.declares(&assertion.predicate) {
                diagnostics.push(Diagnostic::new(
                    Layer::Admissibility,
                    diagnostic_class::VOCABULARY_GAP,
                    assertion.predicate.clone(),
                    format!("assertion {assertion} is outside the composed vocabulary"),
                    None,
                ));
            }
        }

        // Every obligatory scope needs a supporting assertion.
        let verdicts = NormativeRuleEngine::evaluate_domain(domain, assertions)?;
        for (atom, verdict) in &verdicts {
            if verdict.modality == Modality::Obligatory && !assertions.supports(atom) {
                diagnostics.push(Diagnostic::new(
                    Layer::Admissibility,
                    diagnostic_class::ADMISSIBILITY_FAILURE,
                    atom.clone(),
                    format!("obligatory scope '{atom}' has no supporting assertion"),
                    Some(serde_json::json!({ "precedence": verdict.precedence })),
                ));
            }
        }

        Ok(ValidationReport::from_diagnostics(
            Layer::Admissibility,
            diagnostics,
        ))
    }

    fn check_execution(
        &self,
        domain: &DomainLanguage,
        assertions: &AssertionSet,
        model: &ClosedModel,
    ) -> Result<ValidationReport, DomainError> {
        let verdicts = NormativeRuleEngine::evaluate_domain(domain, assertions)?;
        let mut diagnostics = Vec::new();
        for (atom, verdict) in &verdicts {
            if verdict.modality == Modality::Forbidden && model.is_true(atom) {
                diagnostics.push(Diagnostic::new(
                    Layer::Execution,
                    diagnostic_class::EXECUTION_VIOLATION,
                    atom.clone(),
                    format!("forbidden atom '{atom}' is true in the closed model"),
                    Some(serde_json::json!({ "precedence": verdict.precedence })),
                ));
            }
        }
        Ok(ValidationReport::from_diagnostics(
            Layer::Execution,
            diagnostics,
        ))
    }
}
