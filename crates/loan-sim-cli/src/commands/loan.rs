use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

use loan_sim_core::amortization::calendar::{attach_due_dates, DatedScheduleRow};
use loan_sim_core::amortization::schedule::{self, ScheduleRow, ScheduleSummary};
use loan_sim_core::time_value::{self, PAYMENT_DECIMAL_PLACES};
use loan_sim_core::with_metadata;

use super::resolve_rate;
use crate::input;

/// Principal, rate and term shared by the payment and schedule commands
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoanTermsInput {
    principal: Decimal,
    annual_rate: Decimal,
    term_months: u32,
    #[serde(default)]
    first_due_date: Option<NaiveDate>,
}

/// Arguments for a level payment calculation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PaymentArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount financed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual nominal rate as a decimal fraction (0.12 = 12%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Annual nominal rate as a percentage (12 = 12%)
    #[arg(long, conflicts_with = "rate")]
    pub rate_pct: Option<Decimal>,

    /// Number of monthly installments
    #[arg(long, alias = "months")]
    pub term: Option<u32>,
}

/// Arguments for an amortization schedule
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub terms: PaymentArgs,

    /// Due date of the first installment (YYYY-MM-DD); adds dates to each row
    #[arg(long)]
    pub first_due: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct PaymentOutput {
    principal: Decimal,
    annual_rate: Decimal,
    periodic_rate: Decimal,
    term_months: u32,
    monthly_payment: Decimal,
    unrounded_payment: Decimal,
}

#[derive(Debug, Serialize)]
struct ScheduleOutput {
    monthly_payment: Decimal,
    summary: ScheduleSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    schedule: Option<Vec<ScheduleRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dated_schedule: Option<Vec<DatedScheduleRow>>,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let terms = load_terms(&args)?;

    let raw = time_value::level_payment(terms.principal, terms.annual_rate, terms.term_months)?;
    let output = PaymentOutput {
        principal: terms.principal,
        annual_rate: terms.annual_rate,
        periodic_rate: time_value::periodic_rate(terms.annual_rate),
        term_months: terms.term_months,
        monthly_payment: time_value::round_money(raw),
        unrounded_payment: raw,
    };

    let assumptions = serde_json::json!({ "payment_rounding_dp": PAYMENT_DECIMAL_PLACES });
    let result = with_metadata(
        "Level (annuity) payment",
        &assumptions,
        Vec::new(),
        start.elapsed().as_micros() as u64,
        output,
    )?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let mut terms = load_terms(&args.terms)?;
    if args.first_due.is_some() {
        terms.first_due_date = args.first_due;
    }

    let rows = schedule::build_schedule(terms.principal, terms.annual_rate, terms.term_months)?;
    let summary = schedule::summarize(&rows);
    let monthly_payment =
        schedule::scheduled_payment(terms.principal, terms.annual_rate, terms.term_months)?;

    let output = match terms.first_due_date {
        Some(first_due) => ScheduleOutput {
            monthly_payment,
            summary,
            schedule: None,
            dated_schedule: Some(attach_due_dates(&rows, first_due)?),
        },
        None => ScheduleOutput {
            monthly_payment,
            summary,
            schedule: Some(rows),
            dated_schedule: None,
        },
    };

    let assumptions = serde_json::json!({
        "principal": terms.principal.to_string(),
        "annual_rate": terms.annual_rate.to_string(),
        "term_months": terms.term_months,
        "payment_rounding_dp": PAYMENT_DECIMAL_PLACES,
    });
    let result = with_metadata(
        "Level-payment amortization schedule (final installment absorbs rounding)",
        &assumptions,
        Vec::new(),
        start.elapsed().as_micros() as u64,
        output,
    )?;
    Ok(serde_json::to_value(result)?)
}

fn load_terms(args: &PaymentArgs) -> Result<LoanTermsInput, Box<dyn std::error::Error>> {
    if let Some(terms) = input::load::<LoanTermsInput>(args.input.as_deref())? {
        return Ok(terms);
    }
    Ok(LoanTermsInput {
        principal: args
            .principal
            .ok_or("--principal is required (or provide --input)")?,
        annual_rate: resolve_rate(args.rate, args.rate_pct)?,
        term_months: args.term.ok_or("--term is required (or provide --input)")?,
        first_due_date: None,
    })
}
