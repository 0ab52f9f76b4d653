//! The normative rule engine: per-atom modality verdicts.
//!
//! For each atom, the engine collects the rules whose scope names it
//! and whose condition holds over the assertion set, then resolves the
//! winner by precedence. A tie between incompatible modalities at the
//! top precedence is a [`DomainError::ModalityConflict`], surfaced
//! rather than silently resolved. Atoms with no matching rule are left
//! to default policy downstream (closed-world false unless declared
//! optional).

use crate::assertion::AssertionSet;
use domgate_lang::{DomainError, DomainLanguage, Modality, NormativeRule};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The effective modality governing one atom, with the precedence it
/// was resolved at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub modality: Modality,
    pub precedence: u32,
}

/// Stateless evaluator over a rule set.
pub struct NormativeRuleEngine;

impl NormativeRuleEngine {
    /// Evaluate a rule set against an assertion set.
    ///
    /// Returns one verdict per governed atom. Deterministic: the result
    /// is a function of the arguments alone.
    pub fn evaluate(
        module: &str,
        rules: &[NormativeRule],
        assertions: &AssertionSet,
    ) -> Result<BTreeMap<String, Verdict>, DomainError> {
        let asserted = assertions.asserted_atoms();

        let mut matching: BTreeMap<&str, Vec<&NormativeRule>> = BTreeMap::new();
        for rule in rules {
            if rule.condition.holds(&asserted) {
                matching
                    .entry(rule.scope.element_name())
                    .or_default()
                    .push(rule);
            }
        }

        let mut verdicts = BTreeMap::new();
        for (atom, group) in matching {
            let top = group
                .iter()
                .map(|r| r.precedence)
                .max()
                .unwrap_or_default();
            let winners: Vec<&&NormativeRule> =
                group.iter().filter(|r| r.precedence == top).collect();

            for i in 0..winners.len() {
                for j in (i + 1)..winners.len() {
                    let (a, b) = (winners[i], winners[j]);
                    if !a.modality.compatible_with(b.modality) {
                        return Err(DomainError::ModalityConflict {
                            module: module.to_string(),
                            scope: atom.to_string(),
                            first: a.modality,
                            second: b.modality,
                            precedence: top,
                        });
                    }
                }
            }

            // Compatible winners: the strongest modality binds.
            let effective = winners
                .iter()
                .map(|r| r.modality)
                .max_by_key(|m| strength(*m))
                .unwrap_or(Modality::Permitted);
            verdicts.insert(
                atom.to_string(),
                Verdict {
                    modality: effective,
                    precedence: top,
                },
            );
        }
        Ok(verdicts)
    }

    /// Evaluate a domain's rule set.
    pub fn evaluate_domain(
        domain: &DomainLanguage,
        assertions: &AssertionSet,
    ) -> Result<BTreeMap<String, Verdict>, DomainError> {
        Self::evaluate(domain.name(), domain.rules(), assertions)
    }
}

/// Ranking used to pick the binding modality among compatible winners.
/// Obligation and prohibition bind hardest; bare permission weakest.
fn strength(modality: Modality) -> u8 {
    match modality {
        Modality::Obligatory | Modality::Forbidden => 3,
        Modality::Optional => 2,
        Modality::Permitted => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertion::Assertion;
    use domgate_lang::{Condition, ScopeRef};

    fn rule(modality: Modality, precedence: u32) -> NormativeRule {
        NormativeRule::unconditional(ScopeRef::local("Escort"), modality, precedence)
    }

    #[test]
    fn highest_precedence_wins() {
        let rules = vec![rule(Modality::Permitted, 0), rule(Modality::Forbidden, 5)];
        let verdicts =
            NormativeRuleEngine::evaluate("test", &rules, &AssertionSet::new()).unwrap();
        let verdict = verdicts["Escort"];
        assert_eq!(verdict.modality, Modality::Forbidden);
        assert_eq!(verdict.precedence, 5);
    }

    #[test]
    fn equal_precedence_conflict_is_an_error() {
        let rules = vec![rule(Modality::Obligatory, 2), rule(Modality::Forbidden, 2)];
        let err =
            NormativeRuleEngine::evaluate("test", &rules, &AssertionSet::new()).unwrap_err();
        assert!(matches!(
            err,
            DomainError::ModalityConflict { precedence: 2, .. }
        ));
    }

    #[test]
    fn compatible_winners_resolve_to_strongest() {
        let rules = vec![rule(Modality::Permitted, 1), rule(Modality::Obligatory, 1)];
        let verdicts =
            NormativeRuleEngine::evaluate("test", &rules, &AssertionSet::new()).unwrap();
        assert_eq!(verdicts["Escort"].modality, Modality::Obligatory);
    }

    #[test]
    fn condition_gates_rule_matching() {
        let rules = vec![NormativeRule::new(
            ScopeRef::local("Escort"),
            Modality::Obligatory,
            Condition::Present("Secure-zone".into()),
            0,
        )];

        let quiet = NormativeRuleEngine::evaluate("test", &rules, &AssertionSet::new()).unwrap();
        assert!(quiet.is_empty());

        let armed: AssertionSet = [Assertion::fact("Secure-zone")].into_iter().collect();
        let verdicts = NormativeRuleEngine::evaluate("test", &rules, &armed).unwrap();
        assert_eq!(verdicts["Escort"].modality, Modality::Obligatory);
    }

    #[test]
    fn unmatched_atoms_get_no_verdict() {
        let verdicts =
            NormativeRuleEngine::evaluate("test", &[], &AssertionSet::new()).unwrap();
        assert!(verdicts.is_empty());
    }
}
