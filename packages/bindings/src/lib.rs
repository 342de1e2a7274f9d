use napi::Result as NapiResult;
use napi_derive::napi;
use serde::{Deserialize, Serialize};

use loan_sim_core::amortization::schedule;
use loan_sim_core::time_value;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LoanTerms {
    principal: rust_decimal::Decimal,
    annual_rate: rust_decimal::Decimal,
    term_months: u32,
}

#[derive(Serialize)]
struct ScheduleResult {
    monthly_payment: rust_decimal::Decimal,
    summary: schedule::ScheduleSummary,
    schedule: Vec<schedule::ScheduleRow>,
}

// ---------------------------------------------------------------------------
// Payments & schedules
// ---------------------------------------------------------------------------

/// Rounded level payment. Decimal values cross the boundary as strings.
#[napi]
pub fn level_payment(input_json: String) -> NapiResult<String> {
    let terms: LoanTerms = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let raw = time_value::level_payment(terms.principal, terms.annual_rate, terms.term_months)
        .map_err(to_napi_error)?;
    Ok(time_value::round_money(raw).to_string())
}

#[napi]
pub fn build_schedule(input_json: String) -> NapiResult<String> {
    let terms: LoanTerms = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let rows = schedule::build_schedule(terms.principal, terms.annual_rate, terms.term_months)
        .map_err(to_napi_error)?;
    let output = ScheduleResult {
        monthly_payment: schedule::scheduled_payment(
            terms.principal,
            terms.annual_rate,
            terms.term_months,
        )
        .map_err(to_napi_error)?,
        summary: schedule::summarize(&rows),
        schedule: rows,
    };
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Scenarios & simulation
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_scenarios(input_json: String) -> NapiResult<String> {
    let input: loan_sim_core::scenarios::comparison::ScenarioInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = loan_sim_core::scenarios::comparison::compare_scenarios(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn simulate(input_json: String) -> NapiResult<String> {
    let script: loan_sim_core::simulation::script::SimulationScript =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = loan_sim_core::simulation::script::simulate(&script).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn respond_to_request(input_json: String) -> NapiResult<String> {
    let input: loan_sim_core::simulation::request::RequestInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = loan_sim_core::simulation::request::respond_to_request(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
