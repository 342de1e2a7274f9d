use loan_sim_core::bounds::PrincipalClass;
use loan_sim_core::simulation::orchestrator::{
    recompute_all, Edit, SimulationInput, SimulationOrchestrator,
};
use loan_sim_core::simulation::script::{simulate, SimulationScript};
use loan_sim_core::{LoanProduct, LoanSimError};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn auto_loan() -> LoanProduct {
    LoanProduct {
        id: "auto-12".into(),
        annual_rate: dec!(0.12),
        min_principal: dec!(5000),
        max_principal: dec!(18000),
        min_term: 12,
        max_term: 60,
    }
}

fn budget_loan() -> LoanProduct {
    LoanProduct {
        id: "budget-9".into(),
        annual_rate: dec!(0.09),
        min_principal: dec!(2000),
        max_principal: dec!(10000),
        min_term: 6,
        max_term: 36,
    }
}

// ===========================================================================
// Orchestrator
// ===========================================================================

#[test]
fn test_recompute_is_idempotent() {
    let product = auto_loan();
    let input = SimulationInput {
        vehicle_price: dec!(20000),
        down_payment: dec!(4000),
        term_months: 12,
        product: &product,
        payment_capacity: dec!(1000),
    };
    let first = recompute_all(&input).unwrap();
    let second = recompute_all(&input).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_reference_affordability_shortfall() {
    let product = auto_loan();
    let input = SimulationInput {
        vehicle_price: dec!(20000),
        down_payment: dec!(4000),
        term_months: 12,
        product: &product,
        payment_capacity: dec!(1000),
    };
    let out = recompute_all(&input).unwrap();
    assert!(!out.affordability.passes);
    assert_eq!(out.affordability.required_payment, dec!(1421.581));
    assert_eq!(out.affordability.shortfall, dec!(421.581));
}

#[test]
fn test_switching_product_resets_dependent_fields() {
    let auto = auto_loan();
    let budget = budget_loan();
    let mut orch = SimulationOrchestrator::for_product(&auto, dec!(20000), dec!(800)).unwrap();
    orch.apply(Edit::Term(48)).unwrap();

    let snap = orch.apply(Edit::Product(&budget)).unwrap();
    // budget target = 2000 + 0.7 * 8000 = 7600
    assert_eq!(snap.input.term_months, 6);
    assert_eq!(snap.input.down_payment, dec!(12400));
    assert_eq!(snap.output.principal, dec!(7600));
    assert_eq!(snap.output.classification, PrincipalClass::WithinBounds);
    assert_eq!(snap.output.available_terms.first(), Some(&6));
    assert_eq!(snap.output.available_terms.last(), Some(&36));
    assert!(snap.output.scenarios.iter().all(|s| s.term_months == 6 || s.term_months == 36));
}

#[test]
fn test_repeated_edit_is_stable() {
    let product = auto_loan();
    let mut orch = SimulationOrchestrator::for_product(&product, dec!(20000), dec!(800)).unwrap();
    let first = orch.apply(Edit::DownPayment(dec!(6000))).unwrap().output.clone();
    let second = orch.apply(Edit::DownPayment(dec!(6000))).unwrap().output.clone();
    assert_eq!(first, second);
    assert_eq!(orch.snapshot().revision, 2);
}

#[test]
fn test_invalid_product_edit_rejected() {
    let product = auto_loan();
    let mut broken = budget_loan();
    broken.max_term = 3;
    let mut orch = SimulationOrchestrator::for_product(&product, dec!(20000), dec!(800)).unwrap();
    let err = orch.apply(Edit::Product(&broken)).unwrap_err();
    assert!(matches!(err, LoanSimError::InvalidParameter { .. }));
    assert_eq!(orch.snapshot().input.product.id, "auto-12");
}

// ===========================================================================
// Script driver
// ===========================================================================

#[test]
fn test_script_from_json() {
    let json = r#"{
        "catalog": {"products": [
            {"id": "auto-12", "annual_rate": "0.12", "min_principal": "5000",
             "max_principal": "18000", "min_term": 12, "max_term": 60}
        ]},
        "product_id": "auto-12",
        "vehicle_price": "20000",
        "payment_capacity": "1500",
        "edits": [
            {"field": "down_payment", "value": "4000"},
            {"field": "term_months", "value": 24}
        ]
    }"#;
    let script: SimulationScript = serde_json::from_str(json).unwrap();
    let out = simulate(&script).unwrap();
    let snap = &out.result.snapshot;
    assert_eq!(snap.revision, 2);
    assert_eq!(snap.output.principal, dec!(16000));
    assert_eq!(snap.output.schedule.len(), 24);
    assert!(snap.output.affordability.passes);
}

#[test]
fn test_script_rejects_unknown_fields() {
    let json = r#"{"catalog": {"products": []}, "product_id": "x",
        "vehicle_price": "1", "payment_capacity": "1", "dealer": "d"}"#;
    assert!(serde_json::from_str::<SimulationScript>(json).is_err());
}
