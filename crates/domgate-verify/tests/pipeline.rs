//! End-to-end pipeline tests over a composed two-module domain.
//!
//! A visitor-access domain built from two modules: VisitorCore declares
//! the vocabulary and the core obligations; ZonePolicy imports it and
//! layers zone-specific rules on top. Instance data is validated
//! through all three layers against the composed result.

use domgate_lang::{
    Condition, DomainLanguage, DomainLanguageBuilder, DomainLanguageGraph, Modality,
    NormativeRule, ScopeRef,
};
use domgate_verify::{
    Assertion, AssertionSet, FailureMode, Layer, Truth, Validator, diagnostic_class, gate,
};

fn visitor_core() -> DomainLanguage {
    DomainLanguageBuilder::new("VisitorCore")
        .class("Visitor")
        .property("ID-presented")
        .property("Unescorted-minor")
        .property("Badge-returned")
        .obligatory("ID-presented", 0)
        .forbidden("Unescorted-minor", 0)
        .optional("Badge-returned", 0)
        .build()
        .expect("VisitorCore must be consistent")
}

fn zone_policy() -> DomainLanguage {
    DomainLanguageBuilder::new("ZonePolicy")
        .property("Secure-zone")
        .property("Escort-assigned")
        .import("VisitorCore", 1)
        .rule(NormativeRule::new(
            ScopeRef::local("Escort-assigned"),
            Modality::Obligatory,
            Condition::Present("Secure-zone".into()),
            0,
        ))
        .build()
        .expect("ZonePolicy must be consistent")
}

fn composed() -> DomainLanguage {
    let mut graph = DomainLanguageGraph::new();
    graph.add_node(visitor_core()).unwrap();
    graph.add_node(zone_policy()).unwrap();
    graph.add_edge("ZonePolicy", "VisitorCore", 1).unwrap();
    graph.compose().expect("composition must succeed")
}

fn assertions(atoms: &[&str]) -> AssertionSet {
    atoms.iter().map(|a| Assertion::fact(*a)).collect()
}

#[test]
fn instance_a_missing_obligatory_fact_fails_admissibility() {
    let domain = composed();
    let run = Validator::default().run(&domain, &AssertionSet::new()).unwrap();

    assert!(!run.passed());
    // Short-circuits before gating: no execution report, no model.
    assert_eq!(run.reports.len(), 2);
    assert!(run.model.is_none());

    let report = run.report(Layer::Admissibility).unwrap();
    assert_eq!(report.diagnostics.len(), 1);
    let diag = &report.diagnostics[0];
    assert_eq!(diag.class, diagnostic_class::ADMISSIBILITY_FAILURE);
    assert_eq!(diag.scope, "ID-presented");
}

#[test]
fn instance_b_minimal_compliant_instance_passes() {
    let domain = composed();
    let run = Validator::default()
        .run(&domain, &assertions(&["ID-presented"]))
        .unwrap();

    assert!(run.passed());
    let model = run.model.expect("gating was reached");
    assert_eq!(model.value("ID-presented"), Some(Truth::True));
    assert_eq!(model.value("Unescorted-minor"), Some(Truth::False));
    assert_eq!(model.value("Badge-returned"), Some(Truth::Unknown));
    assert_eq!(model.value("Secure-zone"), Some(Truth::False));
}

#[test]
fn instance_c_forbidden_fact_fails_execution() {
    let domain = composed();
    let run = Validator::default()
        .run(&domain, &assertions(&["ID-presented", "Unescorted-minor"]))
        .unwrap();

    assert!(!run.passed());
    let model = run.model.as_ref().expect("gating was reached");
    assert_eq!(model.value("Unescorted-minor"), Some(Truth::True));

    let report = run.report(Layer::Execution).unwrap();
    assert_eq!(report.diagnostics.len(), 1);
    let diag = &report.diagnostics[0];
    assert_eq!(diag.class, diagnostic_class::EXECUTION_VIOLATION);
    assert_eq!(diag.scope, "Unescorted-minor");
}

#[test]
fn conditional_obligation_fires_only_in_secure_zones() {
    let domain = composed();

    // Entering a secure zone arms the escort obligation.
    let run = Validator::default()
        .run(&domain, &assertions(&["ID-presented", "Secure-zone"]))
        .unwrap();
    let report = run.report(Layer::Admissibility).unwrap();
    assert!(!report.passed());
    assert_eq!(report.diagnostics[0].scope, "Escort-assigned");

    // Assigning the escort discharges it.
    let run = Validator::default()
        .run(
            &domain,
            &assertions(&["ID-presented", "Secure-zone", "Escort-assigned"]),
        )
        .unwrap();
    assert!(run.passed());
}

#[test]
fn gating_composed_domain_is_idempotent() {
    let domain = composed();
    let instance = assertions(&["ID-presented", "Badge-returned"]);
    let once = gate(&domain, &instance).unwrap();
    let twice = gate(&domain, &once.to_assertions()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn collect_all_gathers_every_layer_diagnostic() {
    let domain = composed();
    let run = Validator::new(FailureMode::CollectAll)
        .run(&domain, &assertions(&["Unescorted-minor"]))
        .unwrap();

    assert_eq!(run.reports.len(), 3);
    // Missing obligatory fact and a true forbidden atom, in one run.
    assert!(!run.report(Layer::Admissibility).unwrap().passed());
    assert!(!run.report(Layer::Execution).unwrap().passed());
    assert!(run.model.is_some());
}

#[test]
fn identical_runs_yield_identical_reports() {
    let domain = composed();
    let instance = assertions(&["Unescorted-minor"]);
    let validator = Validator::new(FailureMode::CollectAll);
    let first = validator.run(&domain, &instance).unwrap();
    let second = validator.run(&domain, &instance).unwrap();
    assert_eq!(first, second);

    let json = serde_json::to_value(&first).unwrap();
    assert_eq!(json["reports"][0]["layer"], "self_qc");
    assert_eq!(json["reports"][1]["layer"], "admissibility");
    assert_eq!(json["reports"][2]["layer"], "execution");
}
