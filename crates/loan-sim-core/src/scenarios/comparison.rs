use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::schedule::{build_schedule, scheduled_payment, summarize, ScheduleRow};
use crate::bounds::{self, PrincipalClass};
use crate::error::LoanSimError;
use crate::product::LoanProduct;
use crate::types::*;
use crate::LoanSimResult;

/// Share of the vehicle price put down in the standard scenarios.
pub const STANDARD_DOWN_PAYMENT_SHARE: Decimal = dec!(0.20);

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// The fixed set of comparison plans shown to a borrower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// 20% down, shortest term.
    TwentyPercentDown,
    /// Nothing down, shortest term.
    NoDownPayment,
    /// 20% down, longest term.
    MaximumTerm,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [
        ScenarioKind::TwentyPercentDown,
        ScenarioKind::NoDownPayment,
        ScenarioKind::MaximumTerm,
    ];

    /// Display name, also the key scenarios are published under.
    pub fn name(self) -> &'static str {
        match self {
            ScenarioKind::TwentyPercentDown => "20% down payment",
            ScenarioKind::NoDownPayment => "No down payment",
            ScenarioKind::MaximumTerm => "Maximum term",
        }
    }

    fn down_payment(self, vehicle_price: Money) -> Money {
        match self {
            ScenarioKind::NoDownPayment => Decimal::ZERO,
            ScenarioKind::TwentyPercentDown | ScenarioKind::MaximumTerm => {
                STANDARD_DOWN_PAYMENT_SHARE * vehicle_price
            }
        }
    }

    fn term(self, product: &LoanProduct) -> Months {
        match self {
            ScenarioKind::MaximumTerm => product.max_term,
            ScenarioKind::TwentyPercentDown | ScenarioKind::NoDownPayment => product.min_term,
        }
    }
}

/// One fully computed comparison plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub kind: ScenarioKind,
    pub down_payment: Money,
    pub principal: Money,
    pub term_months: Months,
    pub monthly_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    pub classification: PrincipalClass,
    /// True when the principal falls outside the product's range. The plan
    /// is still computed so it can be compared.
    pub out_of_bounds: bool,
    pub schedule: Vec<ScheduleRow>,
}

/// Input for a standalone scenario comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioInput {
    pub vehicle_price: Money,
    pub product: LoanProduct,
}

/// Output of a standalone scenario comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutput {
    pub vehicle_price: Money,
    pub product_id: String,
    pub scenarios: Vec<ScenarioResult>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the three standard scenarios for a vehicle under `product`.
///
/// Scenarios whose principal falls outside the product bounds are flagged,
/// never clamped or dropped.
pub fn build_scenarios(
    vehicle_price: Money,
    product: &LoanProduct,
) -> LoanSimResult<Vec<ScenarioResult>> {
    if vehicle_price <= Decimal::ZERO {
        return Err(LoanSimError::invalid(
            "vehicle_price",
            "Vehicle price must be positive",
        ));
    }
    product.validate()?;

    ScenarioKind::ALL
        .iter()
        .map(|kind| build_scenario(*kind, vehicle_price, product))
        .collect()
}

/// Look up a scenario by kind.
pub fn find_scenario(scenarios: &[ScenarioResult], kind: ScenarioKind) -> Option<&ScenarioResult> {
    scenarios.iter().find(|s| s.kind == kind)
}

/// Scenario comparison wrapped in the standard computation envelope.
pub fn compare_scenarios(
    input: &ScenarioInput,
) -> LoanSimResult<ComputationOutput<ScenarioOutput>> {
    let start = Instant::now();

    let scenarios = build_scenarios(input.vehicle_price, &input.product)?;
    let warnings = out_of_bounds_warnings(&scenarios, &input.product);

    let output = ScenarioOutput {
        vehicle_price: input.vehicle_price,
        product_id: input.product.id.clone(),
        scenarios,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "standard_down_payment_share": STANDARD_DOWN_PAYMENT_SHARE.to_string(),
        "annual_rate": input.product.annual_rate.to_string(),
        "min_term": input.product.min_term,
        "max_term": input.product.max_term,
    });

    with_metadata(
        "Level-payment scenario comparison (20% down / no down / maximum term)",
        &assumptions,
        warnings,
        elapsed,
        output,
    )
}

/// One warning line per scenario whose principal the product would refuse.
pub fn out_of_bounds_warnings(scenarios: &[ScenarioResult], product: &LoanProduct) -> Vec<String> {
    scenarios
        .iter()
        .filter_map(|s| {
            bounds::bounds_warning(&format!("Scenario '{}': principal", s.name), s.principal, product)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn build_scenario(
    kind: ScenarioKind,
    vehicle_price: Money,
    product: &LoanProduct,
) -> LoanSimResult<ScenarioResult> {
    let down_payment = kind.down_payment(vehicle_price);
    let term_months = kind.term(product);
    let principal = vehicle_price - down_payment;

    let schedule = build_schedule(principal, product.annual_rate, term_months)?;
    let summary = summarize(&schedule);
    let classification = bounds::classify(principal, product);

    Ok(ScenarioResult {
        name: kind.name().to_string(),
        kind,
        down_payment,
        principal,
        term_months,
        monthly_payment: scheduled_payment(principal, product.annual_rate, term_months)?,
        total_paid: summary.total_paid,
        total_interest: summary.total_interest,
        classification,
        out_of_bounds: !classification.is_within_bounds(),
        schedule,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product() -> LoanProduct {
        LoanProduct {
            id: "auto-12".into(),
            annual_rate: dec!(0.12),
            min_principal: dec!(5000),
            max_principal: dec!(18000),
            min_term: 12,
            max_term: 60,
        }
    }

    #[test]
    fn test_three_scenarios_in_order() {
        let scenarios = build_scenarios(dec!(20000), &product()).unwrap();
        let names: Vec<&str> = scenarios.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["20% down payment", "No down payment", "Maximum term"]);
    }

    #[test]
    fn test_twenty_percent_down() {
        let scenarios = build_scenarios(dec!(20000), &product()).unwrap();
        let s = find_scenario(&scenarios, ScenarioKind::TwentyPercentDown).unwrap();
        assert_eq!(s.down_payment, dec!(4000));
        assert_eq!(s.principal, dec!(16000));
        assert_eq!(s.term_months, 12);
        assert_eq!(s.monthly_payment, dec!(1421.581));
        assert_eq!(s.schedule.len(), 12);
        assert_eq!(s.schedule[11].closing_balance, Decimal::ZERO);
        assert!(!s.out_of_bounds);
    }

    #[test]
    fn test_no_down_payment_above_maximum_is_flagged() {
        let scenarios = build_scenarios(dec!(20000), &product()).unwrap();
        let s = find_scenario(&scenarios, ScenarioKind::NoDownPayment).unwrap();
        assert_eq!(s.principal, dec!(20000));
        assert_eq!(s.classification, PrincipalClass::AboveMaximum);
        assert!(s.out_of_bounds);
        assert_eq!(s.schedule.len(), 12);
    }

    #[test]
    fn test_maximum_term_uses_longest_term() {
        let scenarios = build_scenarios(dec!(20000), &product()).unwrap();
        let s = find_scenario(&scenarios, ScenarioKind::MaximumTerm).unwrap();
        assert_eq!(s.term_months, 60);
        assert_eq!(s.monthly_payment, dec!(355.911));
        assert_eq!(s.total_paid, s.principal + s.total_interest);
    }

    #[test]
    fn test_cheap_vehicle_below_minimum() {
        let scenarios = build_scenarios(dec!(4000), &product()).unwrap();
        assert_eq!(scenarios.len(), 3);
        assert!(scenarios
            .iter()
            .all(|s| s.classification == PrincipalClass::BelowMinimum));
    }

    #[test]
    fn test_rejects_non_positive_price() {
        match build_scenarios(Decimal::ZERO, &product()).unwrap_err() {
            LoanSimError::InvalidParameter { field, .. } => assert_eq!(field, "vehicle_price"),
            other => panic!("Expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_compare_scenarios_warns_on_out_of_bounds() {
        let input = ScenarioInput {
            vehicle_price: dec!(20000),
            product: product(),
        };
        let result = compare_scenarios(&input).unwrap();
        assert_eq!(result.result.scenarios.len(), 3);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("No down payment"));
        // 20000 financed against an 18000 maximum
        assert!(result.warnings[0].ends_with("nearest financeable principal is 18000"));
        assert_eq!(result.metadata.precision, "rust_decimal_128bit");
    }
}
