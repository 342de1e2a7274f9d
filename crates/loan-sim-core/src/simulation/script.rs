//! Serializable driver for the orchestrator: an initial selection followed
//! by an ordered list of field edits, replayed one pass at a time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::orchestrator::{Edit, SimulationInput, SimulationOrchestrator, SimulationSnapshot};
use crate::amortization::calendar::{attach_due_dates, DatedScheduleRow};
use crate::bounds::{self, PrincipalClass};
use crate::product::ProductCatalog;
use crate::scenarios::comparison::out_of_bounds_warnings;
use crate::types::*;
use crate::LoanSimResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// A field edit as it arrives over the wire. Products are referenced by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldEdit {
    Product(String),
    VehiclePrice(Money),
    DownPayment(Money),
    TermMonths(Months),
    PaymentCapacity(Money),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationScript {
    pub catalog: ProductCatalog,
    pub product_id: String,
    pub vehicle_price: Money,
    pub payment_capacity: Money,
    /// Overrides the product's suggested down payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_payment: Option<Money>,
    /// Overrides the product's minimum term.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_months: Option<Months>,
    /// When set, the final schedule is reported with due dates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_due_date: Option<NaiveDate>,
    #[serde(default)]
    pub edits: Vec<FieldEdit>,
}

/// Condensed view of one recomputation pass.
#[derive(Debug, Clone, Serialize)]
pub struct PassSummary {
    pub revision: u64,
    pub field: String,
    pub principal: Money,
    pub classification: PrincipalClass,
    pub monthly_payment: Money,
    pub affordable: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport<'a> {
    pub snapshot: SimulationSnapshot<'a>,
    pub history: Vec<PassSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dated_schedule: Option<Vec<DatedScheduleRow>>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Replay `script` through an orchestrator and report the final snapshot.
pub fn simulate(script: &SimulationScript) -> LoanSimResult<ComputationOutput<SimulationReport<'_>>> {
    let start = Instant::now();

    script.catalog.validate()?;
    let product = script.catalog.find(&script.product_id)?;

    let mut input =
        SimulationInput::with_product_defaults(product, script.vehicle_price, script.payment_capacity);
    if let Some(down_payment) = script.down_payment {
        input.down_payment = down_payment;
    }
    if let Some(term_months) = script.term_months {
        input.term_months = term_months;
    }

    let mut orchestrator = SimulationOrchestrator::new(input)?;
    let mut history = vec![summarize_pass("initial", orchestrator.snapshot())];

    for field_edit in &script.edits {
        let edit = match field_edit {
            FieldEdit::Product(id) => Edit::Product(script.catalog.find(id)?),
            FieldEdit::VehiclePrice(v) => Edit::VehiclePrice(*v),
            FieldEdit::DownPayment(v) => Edit::DownPayment(*v),
            FieldEdit::TermMonths(v) => Edit::Term(*v),
            FieldEdit::PaymentCapacity(v) => Edit::PaymentCapacity(*v),
        };
        let snapshot = orchestrator.apply(edit)?;
        history.push(summarize_pass(edit.field(), snapshot));
    }

    let snapshot = orchestrator.snapshot().clone();
    let dated_schedule = script
        .first_due_date
        .map(|first_due| attach_due_dates(&snapshot.output.schedule, first_due))
        .transpose()?;

    let warnings = snapshot_warnings(&snapshot);

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "product_id": snapshot.input.product.id,
        "edits_applied": script.edits.len(),
        "payment_rounding_dp": crate::time_value::PAYMENT_DECIMAL_PLACES,
    });

    with_metadata(
        "Ordered single-pass loan simulation (bounds -> principal -> schedule -> affordability)",
        &assumptions,
        warnings,
        elapsed,
        SimulationReport {
            snapshot,
            history,
            dated_schedule,
        },
    )
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn summarize_pass(field: &str, snapshot: &SimulationSnapshot<'_>) -> PassSummary {
    PassSummary {
        revision: snapshot.revision,
        field: field.to_string(),
        principal: snapshot.output.principal,
        classification: snapshot.output.classification,
        monthly_payment: snapshot.output.monthly_payment,
        affordable: snapshot.output.affordability.passes,
    }
}

fn snapshot_warnings(snapshot: &SimulationSnapshot<'_>) -> Vec<String> {
    let output = &snapshot.output;
    let product = snapshot.input.product;
    let mut warnings = Vec::new();

    warnings.extend(bounds::bounds_warning("Principal", output.principal, product));
    if let Some(suggestion) = output.suggested_down_payment {
        warnings.push(format!("Suggested down payment: {suggestion}"));
    }
    if !output.affordability.passes {
        warnings.push(format!(
            "Monthly payment {} exceeds payment capacity {} by {}",
            output.affordability.required_payment,
            output.affordability.capacity,
            output.affordability.shortfall
        ));
    }
    warnings.extend(out_of_bounds_warnings(&output.scenarios, product));
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::LoanProduct;
    use rust_decimal_macros::dec;

    fn catalog() -> ProductCatalog {
        ProductCatalog {
            products: vec![
                LoanProduct {
                    id: "auto-12".into(),
                    annual_rate: dec!(0.12),
                    min_principal: dec!(5000),
                    max_principal: dec!(18000),
                    min_term: 12,
                    max_term: 60,
                },
                LoanProduct {
                    id: "promo-0".into(),
                    annual_rate: dec!(0),
                    min_principal: dec!(1000),
                    max_principal: dec!(11000),
                    min_term: 6,
                    max_term: 24,
                },
            ],
        }
    }

    fn script() -> SimulationScript {
        SimulationScript {
            catalog: catalog(),
            product_id: "auto-12".into(),
            vehicle_price: dec!(20000),
            payment_capacity: dec!(1000),
            down_payment: Some(dec!(4000)),
            term_months: None,
            first_due_date: None,
            edits: vec![],
        }
    }

    #[test]
    fn test_initial_snapshot_only() {
        let s = script();
        let out = simulate(&s).unwrap();
        let report = &out.result;
        assert_eq!(report.history.len(), 1);
        assert_eq!(report.snapshot.output.monthly_payment, dec!(1421.581));
        assert!(out.warnings.iter().any(|w| w.contains("exceeds payment capacity")));
    }

    #[test]
    fn test_replays_edits_in_order() {
        let mut s = script();
        s.edits = vec![
            FieldEdit::TermMonths(60),
            FieldEdit::Product("promo-0".into()),
        ];
        let out = simulate(&s).unwrap();
        let report = &out.result;
        assert_eq!(report.history.len(), 3);
        assert_eq!(report.history[1].field, "term_months");
        assert_eq!(report.history[2].field, "product");
        // promo-0 defaults: term 6, target 1000 + 0.7 * 10000 = 8000
        assert_eq!(report.snapshot.input.term_months, 6);
        assert_eq!(report.snapshot.input.down_payment, dec!(12000));
        assert_eq!(report.snapshot.revision, 2);
    }

    #[test]
    fn test_unknown_product_edit_fails() {
        let mut s = script();
        s.edits = vec![FieldEdit::Product("nope".into())];
        assert!(simulate(&s).is_err());
    }

    #[test]
    fn test_dated_schedule() {
        let mut s = script();
        s.first_due_date = NaiveDate::from_ymd_opt(2025, 1, 10);
        let out = simulate(&s).unwrap();
        let dated = out.result.dated_schedule.as_ref().unwrap();
        assert_eq!(dated.len(), 12);
        assert_eq!(dated[11].due_date, NaiveDate::from_ymd_opt(2025, 12, 10).unwrap());
    }

    #[test]
    fn test_edit_wire_format() {
        let json = r#"[{"field":"vehicle_price","value":"25000"},{"field":"term_months","value":36}]"#;
        let edits: Vec<FieldEdit> = serde_json::from_str(json).unwrap();
        assert_eq!(edits, vec![FieldEdit::VehiclePrice(dec!(25000)), FieldEdit::TermMonths(36)]);
    }
}
