//! Level-payment amortization schedules.
//!
//! The payment is rounded to the money precision once, up front. Every row
//! then splits it into interest on the opening balance and principal, and
//! the final row retires whatever balance is left so the schedule always
//! closes at exactly zero.
//!
//! Interest is `opening * r` carried to [`INTEREST_DECIMAL_PLACES`], which
//! keeps every balance at a fixed scale where `Decimal` subtraction is exact.

use rust_decimal::prelude::RoundingStrategy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::time_value::{level_payment, periodic_rate, round_money, validate_loan_terms};
use crate::types::{Money, Months, Rate};
use crate::LoanSimResult;

/// Scale interest accrues at, well below the payment precision.
pub const INTEREST_DECIMAL_PLACES: u32 = 12;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One installment of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// 1-based installment index.
    pub installment: Months,
    pub opening_balance: Money,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    pub closing_balance: Money,
}

/// Totals over a full schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub total_paid: Money,
    pub total_interest: Money,
    pub total_principal: Money,
    /// Payment of the last row, including its rounding correction.
    pub final_payment: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the row-by-row schedule for `principal` at `annual_rate` over
/// `term_months` level installments.
pub fn build_schedule(
    principal: Money,
    annual_rate: Rate,
    term_months: Months,
) -> LoanSimResult<Vec<ScheduleRow>> {
    validate_loan_terms(principal, annual_rate, term_months)?;

    let r = periodic_rate(annual_rate);
    let payment = round_money(level_payment(principal, annual_rate, term_months)?);

    let mut rows = Vec::with_capacity(term_months as usize);
    let mut opening = principal;

    for installment in 1..=term_months {
        let interest = accrued_interest(opening, r);

        let principal_portion = if installment == term_months {
            opening
        } else {
            // Rounding the payment up can overshoot a tiny balance
            (payment - interest).min(opening)
        };
        let closing = opening - principal_portion;

        rows.push(ScheduleRow {
            installment,
            opening_balance: opening,
            payment: principal_portion + interest,
            principal: principal_portion,
            interest,
            closing_balance: closing,
        });

        opening = closing;
    }

    tracing::trace!(
        principal = %principal,
        term_months,
        payment = %payment,
        "built amortization schedule"
    );

    Ok(rows)
}

/// The level payment every non-final row of a schedule carries, rounded.
pub fn scheduled_payment(
    principal: Money,
    annual_rate: Rate,
    term_months: Months,
) -> LoanSimResult<Money> {
    Ok(round_money(level_payment(principal, annual_rate, term_months)?))
}

fn accrued_interest(opening: Money, r: Rate) -> Money {
    (opening * r).round_dp_with_strategy(INTEREST_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Aggregate totals of a schedule. An empty schedule sums to zero.
pub fn summarize(rows: &[ScheduleRow]) -> ScheduleSummary {
    let mut total_paid = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;
    let mut total_principal = Decimal::ZERO;

    for row in rows {
        total_paid += row.payment;
        total_interest += row.interest;
        total_principal += row.principal;
    }

    ScheduleSummary {
        total_paid,
        total_interest,
        total_principal,
        final_payment: rows.last().map(|r| r.payment).unwrap_or(Decimal::ZERO),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
