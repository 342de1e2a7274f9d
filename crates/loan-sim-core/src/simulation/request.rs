//! Request/response contract consumed by the submission collaborator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::bounds::{self, PrincipalClass};
use crate::error::LoanSimError;
use crate::product::LoanProduct;
use crate::scenarios::comparison::{build_scenarios, out_of_bounds_warnings, ScenarioResult};
use crate::types::*;
use crate::LoanSimResult;

/// What a borrower asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationRequest {
    pub vehicle_id: String,
    pub dealer_id: String,
    pub requested_principal: Money,
    pub term_months: Months,
    pub annual_rate: Rate,
}

/// Request plus the already-resolved vehicle price and product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestInput {
    pub request: SimulationRequest,
    pub vehicle_price: Money,
    pub product: LoanProduct,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub vehicle_id: String,
    pub dealer_id: String,
    pub vehicle_price: Money,
    pub requested_principal: Money,
    pub original_term: Months,
    pub annual_rate: Rate,
    pub requested_classification: PrincipalClass,
    /// Keyed by scenario name.
    pub scenarios: BTreeMap<String, ScenarioResult>,
}

/// Answer a simulation request with the three comparison scenarios.
pub fn respond_to_request(
    input: &RequestInput,
) -> LoanSimResult<ComputationOutput<SimulationResponse>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_request(input)?;

    let request = &input.request;
    let product = &input.product;

    let requested_classification = bounds::classify(request.requested_principal, product);
    warnings.extend(bounds::bounds_warning(
        "Requested principal",
        request.requested_principal,
        product,
    ));
    if !product.allows_term(request.term_months) {
        warnings.push(format!(
            "Requested term {} is outside the product range {}..={}",
            request.term_months, product.min_term, product.max_term
        ));
    }

    let scenarios = build_scenarios(input.vehicle_price, product)?;
    warnings.extend(out_of_bounds_warnings(&scenarios, product));

    let response = SimulationResponse {
        vehicle_id: request.vehicle_id.clone(),
        dealer_id: request.dealer_id.clone(),
        vehicle_price: input.vehicle_price,
        requested_principal: request.requested_principal,
        original_term: request.term_months,
        annual_rate: request.annual_rate,
        requested_classification,
        scenarios: scenarios
            .into_iter()
            .map(|s| (s.name.clone(), s))
            .collect(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "product_id": product.id,
        "min_principal": product.min_principal.to_string(),
        "max_principal": product.max_principal.to_string(),
    });

    with_metadata(
        "Simulation request answered with level-payment comparison scenarios",
        &assumptions,
        warnings,
        elapsed,
        response,
    )
}

fn validate_request(input: &RequestInput) -> LoanSimResult<()> {
    let request = &input.request;
    input.product.validate()?;

    if request.vehicle_id.trim().is_empty() {
        return Err(LoanSimError::invalid("vehicle_id", "Vehicle identifier is required"));
    }
    if request.dealer_id.trim().is_empty() {
        return Err(LoanSimError::invalid("dealer_id", "Dealer identifier is required"));
    }
    if input.vehicle_price <= Decimal::ZERO {
        return Err(LoanSimError::invalid(
            "vehicle_price",
            "Vehicle price must be positive",
        ));
    }
    if request.requested_principal < Decimal::ZERO {
        return Err(LoanSimError::invalid(
            "requested_principal",
            "Requested principal cannot be negative",
        ));
    }
    if request.requested_principal > input.vehicle_price {
        return Err(LoanSimError::invalid(
            "requested_principal",
            "Requested principal cannot exceed the vehicle price",
        ));
    }
    if request.term_months == 0 {
        return Err(LoanSimError::invalid(
            "term_months",
            "Term must be at least 1 month",
        ));
    }
    if request.annual_rate != input.product.annual_rate {
        return Err(LoanSimError::invalid(
            "annual_rate",
            format!(
                "Requested rate {} does not match product '{}' rate {}",
                request.annual_rate, input.product.id, input.product.annual_rate
            ),
        ));
    }
    Ok(())
}
