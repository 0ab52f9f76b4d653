//! Domain language graph: module composition along import edges.
//!
//! A DomLG is a set of domain languages plus directed, precedence-
//! weighted import edges. `compose` merges the graph into a single
//! domain language:
//!
//! - a node's effective weight is the fixed point of max over the
//!   precedences of edges targeting it (importers with no incoming
//!   edge weigh 0), so cycles are legal and converge;
//! - a name declared by several modules resolves to the definition of
//!   the highest-weight declarer; differing definitions among the
//!   declarers at that top weight are a [`DomainError::MergeConflict`],
//!   never averaged, and declarers below it are shadowed;
//! - import-qualified rule scopes are resolved against the target
//!   module's vocabulary and flattened;
//! - the merged domain is rebuilt through the builder, so Self-QC
//!   catches conflicts introduced by merging modules that were
//!   individually consistent.
//!
//! The composed result is a function of the node set, edge set, and
//! weights alone: all iteration is over sorted structures, and the
//! inputs are never mutated.

use crate::element::{DomainElement, ScopeRef};
use crate::error::DomainError;
use crate::language::{DomainLanguage, DomainLanguageBuilder};
use crate::rule::NormativeRule;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A directed import edge: the importer pulls the imported module's
/// definitions in at the given precedence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportEdge {
    pub importer: String,
    pub imported: String,
    pub precedence: u32,
}

/// The composition graph over domain language modules.
#[derive(Debug, Clone, Default)]
pub struct DomainLanguageGraph {
    nodes: BTreeMap<String, DomainLanguage>,
    edges: Vec<ImportEdge>,
}

impl DomainLanguageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module to the graph. Module names are unique.
    pub fn add_node(&mut self, lang: DomainLanguage) -> Result<(), DomainError> {
        if self.nodes.contains_key(lang.name()) {
            return Err(DomainError::Schema {
                module: lang.name().to_string(),
                message: format!("module '{}' already present in graph", lang.name()),
            });
        }
        self.nodes.insert(lang.name().to_string(), lang);
        Ok(())
    }

    /// Add an import edge between two present modules.
    pub fn add_edge(
        &mut self,
        importer: &str,
        imported: &str,
        precedence: u32,
    ) -> Result<(), DomainError> {
        for endpoint in [importer, imported] {
            if !self.nodes.contains_key(endpoint) {
                return Err(DomainError::Reference {
                    module: endpoint.to_string(),
                    message: format!("edge endpoint '{endpoint}' is not a module in the graph"),
                });
            }
        }
        self.edges.push(ImportEdge {
            importer: importer.to_string(),
            imported: imported.to_string(),
            precedence,
        });
        Ok(())
    }

    pub fn nodes(&self) -> impl Iterator<Item = &DomainLanguage> {
        self.nodes.values()
    }

    pub fn edges(&self) -> &[ImportEdge] {
        &self.edges
    }

    /// Merge the graph into a single domain language.
    ///
    /// Never mutates the inputs; returns a fresh, fully re-validated
    /// domain. Calling `compose` twice yields identical results.
    pub fn compose(&self) -> Result<DomainLanguage, DomainError> {
        if self.nodes.is_empty() {
            return Err(DomainError::Schema {
                module: "<graph>".to_string(),
                message: "cannot compose an empty graph".to_string(),
            });
        }

        self.check_import_declarations()?;
        let weights = self.node_weights()?;

        // Resolve declared-name collisions by node weight. Each name is
        // settled in two steps: first the maximum weight among its
        // declarers, then agreement among the declarers at that weight.
        // Declarers below the maximum are shadowed outright, so the
        // outcome does not depend on module iteration order.
        let mut declarers: BTreeMap<&str, Vec<(&str, u32)>> = BTreeMap::new();
        for (module, lang) in &self.nodes {
            let weight = weights[module.as_str()];
            for name in lang.elements().keys() {
                declarers
                    .entry(name.as_str())
                    .or_default()
                    .push((module.as_str(), weight));
            }
        }

        let mut owner: BTreeMap<&str, &str> = BTreeMap::new();
        for (name, candidates) in &declarers {
            let top = candidates.iter().map(|&(_, w)| w).max().unwrap_or(0);
            let mut winner: Option<&str> = None;
            for &(module, weight) in candidates {
                if weight != top {
                    continue;
                }
                match winner {
                    None => winner = Some(module),
                    Some(first) => {
                        if definition_of(&self.nodes[first], name)
                            != definition_of(&self.nodes[module], name)
                        {
                            return Err(DomainError::MergeConflict {
                                name: (*name).to_string(),
                                left: first.to_string(),
                                right: module.to_string(),
                                weight: top,
                            });
                        }
                    }
                }
            }
            if let Some(module) = winner {
                owner.insert(*name, module);
            }
        }

        // Collect the winning elements and the surviving rules. A rule
        // is shadowed exactly when its module declares the scoped name
        // but lost the collision for it; rules scoped on another
        // module's element always survive.
        let mut elements: Vec<DomainElement> = Vec::new();
        for (name, &module) in &owner {
            if let Some(el) = self.nodes[module].element(name) {
                elements.push(el.clone());
            }
        }

        let mut rules: BTreeSet<NormativeRule> = BTreeSet::new();
        for (module, lang) in &self.nodes {
            for rule in lang.rules() {
                let atom = rule.scope.element_name();
                let shadowed = lang.declares(atom)
                    && owner
                        .get(atom)
                        .is_some_and(|&winner| winner != module.as_str());
                if shadowed {
                    continue;
                }
                rules.insert(self.resolve_scope(module, rule)?);
            }
        }

        let name = self
            .nodes
            .keys()
            .cloned()
            .collect::<Vec<_>>()
            .join("+");
        let version = self.nodes.values().map(DomainLanguage::version).max().unwrap_or(1);

        let mut builder = DomainLanguageBuilder::new(name).version(version);
        for el in elements {
            builder = builder.element(el);
        }
        for rule in rules {
            builder = builder.rule(rule);
        }
        builder.build()
    }

    /// Every import declaration carried by a member module must be
    /// matched by an edge in the graph.
    fn check_import_declarations(&self) -> Result<(), DomainError> {
        for (module, lang) in &self.nodes {
            for decl in lang.imports() {
                if !self.nodes.contains_key(&decl.target) {
                    return Err(DomainError::Reference {
                        module: module.clone(),
                        message: format!(
                            "'{module}' imports '{}' which is not in the graph",
                            decl.target
                        ),
                    });
                }
                let matched = self
                    .edges
                    .iter()
                    .any(|e| e.importer == *module && e.imported == decl.target);
                if !matched {
                    return Err(DomainError::Reference {
                        module: module.clone(),
                        message: format!(
                            "'{module}' imports '{}' but the graph declares no such edge",
                            decl.target
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Fixed-point node weights: repeatedly fold the edge set with a
    /// max-merge until an iteration changes nothing. The merge is
    /// idempotent and bounded by the largest edge precedence, so it
    /// stabilizes; the explicit round cap turns any failure to do so
    /// into an error instead of an unbounded loop.
    fn node_weights(&self) -> Result<BTreeMap<&str, u32>, DomainError> {
        let mut weights: BTreeMap<&str, u32> =
            self.nodes.keys().map(|n| (n.as_str(), 0)).collect();

        let mut edges: Vec<&ImportEdge> = self.edges.iter().collect();
        edges.sort();

        let cap = self.nodes.len() + self.edges.len() + 1;
        for _ in 0..cap {
            let mut changed = false;
            for edge in &edges {
                let current = weights[edge.imported.as_str()];
                let merged = current.max(edge.precedence);
                if merged != current {
                    weights.insert(edge.imported.as_str(), merged);
                    changed = true;
                }
            }
            if !changed {
                return Ok(weights);
            }
        }
        Err(DomainError::NonConvergence { rounds: cap })
    }

    /// Flatten an import-qualified scope against the target module's
    /// vocabulary.
    fn resolve_scope(
        &self,
        module: &str,
        rule: &NormativeRule,
    ) -> Result<NormativeRule, DomainError> {
        match &rule.scope {
            ScopeRef::Local(_) => Ok(rule.clone()),
            ScopeRef::Imported {
                module: target,
                element,
            } => {
                let imported = self.nodes.get(target).ok_or_else(|| DomainError::Reference {
                    module: module.to_string(),
                    message: format!("rule {rule} references unknown module '{target}'"),
                })?;
                if !imported.declares(element) {
                    return Err(DomainError::Reference {
                        module: module.to_string(),
                        message: format!(
                            "rule {rule} references '{element}' which '{target}' does not declare"
                        ),
                    });
                }
                let mut resolved = rule.clone();
                resolved.scope = ScopeRef::local(element.clone());
                Ok(resolved)
            }
        }
    }
}

/// A name's definition within one module: the element's kind plus the
/// module's locally scoped rules on it. Collisions compare these.
fn definition_of<'a>(
    lang: &'a DomainLanguage,
    name: &str,
) -> (Option<&'a DomainElement>, Vec<&'a NormativeRule>) {
    let rules = lang
        .rules()
        .iter()
        .filter(|r| matches!(&r.scope, ScopeRef::Local(n) if n == name))
        .collect();
    (lang.element(name), rules)
}
