//! The gate: open-world to closed-world transformation.
//!
//! Gating is a representational closure step, not inference or
//! validation: it assigns a truth value to every atom of the composed
//! vocabulary and nothing else. Asserted atoms are true; unasserted
//! atoms governed by an `Optional` verdict stay unknown; everything
//! else falls to false under the domain-completion assumption.
//!
//! Properties:
//! - **Pure**: identical (domain, assertions) pairs yield identical
//!   models.
//! - **Idempotent**: re-asserting a model's true atoms and gating
//!   again reproduces the model; no atom flips on a second pass.
//!
//! Rule-violation checking is the validator's job, against the model
//! this function produces.

use crate::assertion::AssertionSet;
use crate::engine::NormativeRuleEngine;
use crate::model::{ClosedModel, Truth};
use domgate_lang::{DomainError, DomainLanguage, Modality};
use std::collections::BTreeMap;

/// Close a domain over a set of asserted facts.
pub fn gate(
    domain: &DomainLanguage,
    assertions: &AssertionSet,
) -> Result<ClosedModel, DomainError> {
    let verdicts = NormativeRuleEngine::evaluate_domain(domain, assertions)?;

    let mut atoms = BTreeMap::new();
    for name in domain.elements().keys() {
        let truth = if assertions.supports(name) {
            Truth::True
        } else if verdicts
            .get(name)
            .is_some_and(|v| v.modality == Modality::Optional)
        {
            Truth::Unknown
        } else {
            Truth::False
        };
        atoms.insert(name.clone(), truth);
    }
    Ok(ClosedModel::from_atoms(atoms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertion::Assertion;
    use domgate_lang::DomainLanguageBuilder;

    fn domain() -> DomainLanguage {
        DomainLanguageBuilder::new("VisitorCore")
            .property("ID-presented")
            .property("Unescorted-minor")
            .property("Badge-returned")
            .obligatory("ID-presented", 0)
            .forbidden("Unescorted-minor", 0)
            .optional("Badge-returned", 0)
            .build()
            .unwrap()
    }

    #[test]
    fn asserted_atoms_are_true_rest_default_false() {
        let assertions: AssertionSet = [Assertion::new("visit-17", "ID-presented", "true")]
            .into_iter()
            .collect();
        let model = gate(&domain(), &assertions).unwrap();
        assert_eq!(model.value("ID-presented"), Some(Truth::True));
        assert_eq!(model.value("Unescorted-minor"), Some(Truth::False));
    }

    #[test]
    fn optional_unasserted_stays_unknown() {
        let model = gate(&domain(), &AssertionSet::new()).unwrap();
        assert_eq!(model.value("Badge-returned"), Some(Truth::Unknown));
    }

    #[test]
    fn optional_asserted_becomes_true() {
        let assertions: AssertionSet = [Assertion::fact("Badge-returned")].into_iter().collect();
        let model = gate(&domain(), &assertions).unwrap();
        assert_eq!(model.value("Badge-returned"), Some(Truth::True));
    }

    #[test]
    fn gate_is_deterministic() {
        let assertions: AssertionSet = [Assertion::fact("ID-presented")].into_iter().collect();
        let d = domain();
        assert_eq!(gate(&d, &assertions).unwrap(), gate(&d, &assertions).unwrap());
    }

    #[test]
    fn gate_is_idempotent() {
        let assertions: AssertionSet = [Assertion::fact("ID-presented")].into_iter().collect();
        let d = domain();
        let once = gate(&d, &assertions).unwrap();
        let twice = gate(&d, &once.to_assertions()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn model_covers_exactly_the_vocabulary() {
        // Assertions outside the vocabulary do not leak into the model.
        let assertions: AssertionSet = [Assertion::fact("Not-in-vocab")].into_iter().collect();
        let model = gate(&domain(), &assertions).unwrap();
        assert_eq!(model.len(), 3);
        assert_eq!(model.value("Not-in-vocab"), None);
    }
}
