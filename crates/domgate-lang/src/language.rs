//! The domain language: one module's vocabulary plus normative rules.
//!
//! A `DomainLanguage` can only be obtained through the builder (or
//! through graph composition, which goes through the builder too).
//! `build` runs Self-QC and refuses to return an inconsistent domain,
//! so every `DomainLanguage` in existence has a passing QC report and
//! is immutable thereafter.

use crate::element::{DomainElement, ScopeRef};
use crate::error::DomainError;
use crate::qc::{QcReport, run_self_qc};
use crate::rule::{Condition, Modality, NormativeRule};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A declared dependency on another domain language.
///
/// The precedence weight orders this import against the importer's own
/// definitions and other imports during graph composition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDecl {
    pub target: String,
    pub precedence: u32,
}

/// A named, versioned bundle of vocabulary and normative rules.
///
/// Invariant: every rule's scope and condition atom resolves to a
/// declared element or through a declared import, and no two rules
/// assign incompatible modalities to one scope at equal precedence.
/// Enforced at build; no mutation is possible afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainLanguage {
    name: String,
    version: u32,
    elements: BTreeMap<String, DomainElement>,
    rules: Vec<NormativeRule>,
    imports: Vec<ImportDecl>,
}

impl DomainLanguage {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// The vocabulary, keyed by element name.
    pub fn elements(&self) -> &BTreeMap<String, DomainElement> {
        &self.elements
    }

    pub fn element(&self, name: &str) -> Option<&DomainElement> {
        self.elements.get(name)
    }

    pub fn declares(&self, name: &str) -> bool {
        self.elements.contains_key(name)
    }

    pub fn rules(&self) -> &[NormativeRule] {
        &self.rules
    }

    pub fn imports(&self) -> &[ImportDecl] {
        &self.imports
    }

    /// Re-run Self-QC on this domain.
    ///
    /// Passes by construction for a freshly built domain; the validator
    /// runs it again on composed domains as its first layer.
    pub fn self_qc(&self) -> QcReport {
        let elements: Vec<DomainElement> = self.elements.values().cloned().collect();
        run_self_qc(&elements, &self.rules, &self.imports)
    }
}

impl std::fmt::Display for DomainLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DomL({} v{}: {} elements, {} rules, {} imports)",
            self.name,
            self.version,
            self.elements.len(),
            self.rules.len(),
            self.imports.len()
        )
    }
}

/// Accumulates a domain definition and validates it on `build`.
#[derive(Debug, Clone, Default)]
pub struct DomainLanguageBuilder {
    name: String,
    version: u32,
    elements: Vec<DomainElement>,
    rules: Vec<NormativeRule>,
    imports: Vec<ImportDecl>,
}

impl DomainLanguageBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: 1,
            ..Self::default()
        }
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn element(mut self, element: DomainElement) -> Self {
        self.elements.push(element);
        self
    }

    pub fn class(self, name: impl Into<String>) -> Self {
        self.element(DomainElement::class(name))
    }

    pub fn property(self, name: impl Into<String>) -> Self {
        self.element(DomainElement::property(name))
    }

    pub fn individual(self, name: impl Into<String>) -> Self {
        self.element(DomainElement::individual(name))
    }

    pub fn rule(mut self, rule: NormativeRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Unconditional obligation on a local scope.
    pub fn obligatory(self, scope: impl Into<String>, precedence: u32) -> Self {
        self.rule(NormativeRule::unconditional(
            ScopeRef::local(scope),
            Modality::Obligatory,
            precedence,
        ))
    }

    /// Unconditional prohibition on a local scope.
    pub fn forbidden(self, scope: impl Into<String>, precedence: u32) -> Self {
        self.rule(NormativeRule::unconditional(
            ScopeRef::local(scope),
            Modality::Forbidden,
            precedence,
        ))
    }

    /// Unconditional permission on a local scope.
    pub fn permitted(self, scope: impl Into<String>, precedence: u32) -> Self {
        self.rule(NormativeRule::unconditional(
            ScopeRef::local(scope),
            Modality::Permitted,
            precedence,
        ))
    }

    /// Declare a local scope deliberately open: excluded from the
    /// closed-world default, unknown unless asserted.
    pub fn optional(self, scope: impl Into<String>, precedence: u32) -> Self {
        self.rule(NormativeRule::unconditional(
            ScopeRef::local(scope),
            Modality::Optional,
            precedence,
        ))
    }

    /// A conditional rule on a local scope.
    pub fn rule_when(
        self,
        scope: impl Into<String>,
        modality: Modality,
        condition: Condition,
        precedence: u32,
    ) -> Self {
        self.rule(NormativeRule::new(
            ScopeRef::local(scope),
            modality,
            condition,
            precedence,
        ))
    }

    pub fn import(mut self, target: impl Into<String>, precedence: u32) -> Self {
        self.imports.push(ImportDecl {
            target: target.into(),
            precedence,
        });
        self
    }

    /// Run Self-QC on the accumulated definition without building.
    pub fn check(&self) -> QcReport {
        run_self_qc(&self.elements, &self.rules, &self.imports)
    }

    /// Validate and seal the domain.
    ///
    /// Fails with the first (deterministically ordered) QC finding if
    /// the definition is inconsistent; an inconsistent `DomainLanguage`
    /// can never exist.
    pub fn build(self) -> Result<DomainLanguage, DomainError> {
        if self.name.is_empty() {
            return Err(DomainError::Schema {
                module: String::new(),
                message: "domain language name must not be empty".to_string(),
            });
        }

        let report = self.check();
        if let Some(diag) = report.diagnostics.first() {
            return Err(diag.to_error(&self.name));
        }

        let mut elements = BTreeMap::new();
        for el in self.elements {
            elements.insert(el.name.clone(), el);
        }
        let mut rules = self.rules;
        rules.sort();
        let mut imports = self.imports;
        imports.sort();

        Ok(DomainLanguage {
            name: self.name,
            version: self.version,
            elements,
            rules,
            imports,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_valid_domain() {
        let lang = DomainLanguageBuilder::new("VisitorCore")
            .class("Visitor")
            .property("ID-presented")
            .obligatory("ID-presented", 0)
            .build()
            .unwrap();
        assert_eq!(lang.name(), "VisitorCore");
        assert_eq!(lang.version(), 1);
        assert!(lang.declares("Visitor"));
        assert!(lang.self_qc().passed());
    }

    #[test]
    fn duplicate_element_is_schema_error() {
        let err = DomainLanguageBuilder::new("Core")
            .class("Visitor")
            .class("Visitor")
            .build()
            .unwrap_err();
        assert!(matches!(err, DomainError::Schema { .. }));
    }

    #[test]
    fn dangling_scope_is_reference_error() {
        let err = DomainLanguageBuilder::new("Core")
            .forbidden("Ghost", 0)
            .build()
            .unwrap_err();
        assert!(matches!(err, DomainError::Reference { .. }));
    }

    #[test]
    fn equal_precedence_clash_is_modality_conflict() {
        let err = DomainLanguageBuilder::new("Core")
            .property("Escort")
            .obligatory("Escort", 1)
            .forbidden("Escort", 1)
            .build()
            .unwrap_err();
        match err {
            DomainError::ModalityConflict {
                scope, precedence, ..
            } => {
                assert_eq!(scope, "Escort");
                assert_eq!(precedence, 1);
            }
            other => panic!("expected modality conflict, got {other}"),
        }
    }

    #[test]
    fn imported_scope_needs_declared_import() {
        let err = DomainLanguageBuilder::new("ZonePolicy")
            .rule(NormativeRule::unconditional(
                ScopeRef::imported("VisitorCore", "ID-presented"),
                Modality::Obligatory,
                0,
            ))
            .build()
            .unwrap_err();
        assert!(matches!(err, DomainError::Reference { .. }));

        let lang = DomainLanguageBuilder::new("ZonePolicy")
            .import("VisitorCore", 1)
            .rule(NormativeRule::unconditional(
                ScopeRef::imported("VisitorCore", "ID-presented"),
                Modality::Obligatory,
                0,
            ))
            .build()
            .unwrap();
        assert_eq!(lang.imports().len(), 1);
    }

    #[test]
    fn empty_name_rejected() {
        let err = DomainLanguageBuilder::new("").build().unwrap_err();
        assert!(matches!(err, DomainError::Schema { .. }));
    }
}
