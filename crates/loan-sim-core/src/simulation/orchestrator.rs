//! Keeps every derived loan figure coherent as single fields are edited.
//!
//! Each edit runs one ordered pass over the snapshot:
//!
//! ```text
//! edited field -> bounds -> principal -> schedule / scenarios -> affordability
//! ```
//!
//! The pass is a pure function of the previous snapshot and the edit
//! ([`reduce`]). No step feeds back into an earlier one, so principal is
//! never derived from both price and down payment in the same pass.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::affordability::{self, AffordabilityVerdict};
use crate::amortization::schedule::{build_schedule, scheduled_payment, ScheduleRow};
use crate::bounds::{self, PrincipalClass};
use crate::error::LoanSimError;
use crate::product::LoanProduct;
use crate::scenarios::comparison::{build_scenarios, ScenarioResult};
use crate::time_value::{principal_for_payment, round_money};
use crate::types::{Money, Months};
use crate::LoanSimResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The user's current field values. Replaced wholesale on every edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationInput<'a> {
    pub vehicle_price: Money,
    pub down_payment: Money,
    pub term_months: Months,
    pub product: &'a LoanProduct,
    pub payment_capacity: Money,
}

/// A single field edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit<'a> {
    Product(&'a LoanProduct),
    VehiclePrice(Money),
    DownPayment(Money),
    Term(Months),
    PaymentCapacity(Money),
}

/// Everything derived from a [`SimulationInput`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationOutput {
    pub principal: Money,
    pub classification: PrincipalClass,
    /// Down payment that would bring the principal back in range. Offered,
    /// never applied on the user's behalf.
    pub suggested_down_payment: Option<Money>,
    pub available_terms: Vec<Months>,
    pub monthly_payment: Money,
    pub schedule: Vec<ScheduleRow>,
    pub scenarios: Vec<ScenarioResult>,
    pub affordability: AffordabilityVerdict,
    /// Largest principal the applicant's capacity covers at the current
    /// rate and term.
    pub max_affordable_principal: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationSnapshot<'a> {
    /// Increases by one with every committed edit.
    pub revision: u64,
    pub input: SimulationInput<'a>,
    pub output: SimulationOutput,
}

/// Owner of the current snapshot.
#[derive(Debug, Clone)]
pub struct SimulationOrchestrator<'a> {
    current: SimulationSnapshot<'a>,
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

impl<'a> SimulationInput<'a> {
    /// Fresh input for `product`: shortest term and the suggested down
    /// payment.
    pub fn with_product_defaults(
        product: &'a LoanProduct,
        vehicle_price: Money,
        payment_capacity: Money,
    ) -> Self {
        SimulationInput {
            vehicle_price,
            down_payment: bounds::suggested_down_payment(vehicle_price, product),
            term_months: product.min_term,
            product,
            payment_capacity,
        }
    }

    /// The literal financed amount.
    pub fn principal(&self) -> Money {
        self.vehicle_price - self.down_payment
    }

    pub fn validate(&self) -> LoanSimResult<()> {
        self.product.validate()?;
        if self.vehicle_price <= Decimal::ZERO {
            return Err(LoanSimError::invalid(
                "vehicle_price",
                "Vehicle price must be positive",
            ));
        }
        if self.down_payment < Decimal::ZERO {
            return Err(LoanSimError::invalid(
                "down_payment",
                "Down payment cannot be negative",
            ));
        }
        if self.down_payment > self.vehicle_price {
            return Err(LoanSimError::invalid(
                "down_payment",
                "Down payment cannot exceed the vehicle price",
            ));
        }
        if !self.product.allows_term(self.term_months) {
            return Err(LoanSimError::invalid(
                "term_months",
                format!(
                    "Term {} is outside the product range {}..={}",
                    self.term_months, self.product.min_term, self.product.max_term
                ),
            ));
        }
        if self.payment_capacity < Decimal::ZERO {
            return Err(LoanSimError::invalid(
                "payment_capacity",
                "Payment capacity cannot be negative",
            ));
        }
        Ok(())
    }
}

impl Edit<'_> {
    pub fn field(&self) -> &'static str {
        match self {
            Edit::Product(_) => "product",
            Edit::VehiclePrice(_) => "vehicle_price",
            Edit::DownPayment(_) => "down_payment",
            Edit::Term(_) => "term_months",
            Edit::PaymentCapacity(_) => "payment_capacity",
        }
    }
}

// ---------------------------------------------------------------------------
// Recomputation pass
// ---------------------------------------------------------------------------

/// Derive every output field from scratch.
pub fn recompute_all(input: &SimulationInput<'_>) -> LoanSimResult<SimulationOutput> {
    input.validate()?;

    let (principal, classification, suggested_down_payment) = resolve_principal(input);
    let (schedule, monthly_payment) = repayment_plan(input, principal)?;
    let scenarios = build_scenarios(input.vehicle_price, input.product)?;
    let (affordability, max_affordable_principal) = assess_affordability(input, monthly_payment)?;

    Ok(SimulationOutput {
        principal,
        classification,
        suggested_down_payment,
        available_terms: input.product.term_range().collect(),
        monthly_payment,
        schedule,
        scenarios,
        affordability,
        max_affordable_principal,
    })
}

/// Apply one edit to `prev`, producing the next snapshot. Only the steps
/// downstream of the edited field run; everything else is carried over.
pub fn reduce<'a>(
    prev: &SimulationSnapshot<'a>,
    edit: Edit<'a>,
) -> LoanSimResult<SimulationSnapshot<'a>> {
    let mut input = prev.input.clone();
    let mut output = prev.output.clone();

    match edit {
        Edit::Product(product) => {
            product.validate()?;
            input = SimulationInput::with_product_defaults(
                product,
                input.vehicle_price,
                input.payment_capacity,
            );
            input.validate()?;
            output.available_terms = product.term_range().collect();
            reprice(&input, &mut output)?;
            output.scenarios = build_scenarios(input.vehicle_price, input.product)?;
        }
        Edit::VehiclePrice(vehicle_price) => {
            input.vehicle_price = vehicle_price;
            input.validate()?;
            reprice(&input, &mut output)?;
            output.scenarios = build_scenarios(input.vehicle_price, input.product)?;
        }
        Edit::DownPayment(down_payment) => {
            input.down_payment = down_payment;
            input.validate()?;
            reprice(&input, &mut output)?;
        }
        Edit::Term(term_months) => {
            input.term_months = term_months;
            input.validate()?;
            let (schedule, monthly_payment) = repayment_plan(&input, output.principal)?;
            output.schedule = schedule;
            output.monthly_payment = monthly_payment;
        }
        Edit::PaymentCapacity(payment_capacity) => {
            input.payment_capacity = payment_capacity;
            input.validate()?;
        }
    }

    let (verdict, max_affordable_principal) = assess_affordability(&input, output.monthly_payment)?;
    output.affordability = verdict;
    output.max_affordable_principal = max_affordable_principal;

    let revision = prev.revision + 1;
    tracing::debug!(
        revision,
        edit = edit.field(),
        principal = %output.principal,
        classification = ?output.classification,
        monthly_payment = %output.monthly_payment,
        "recomputed simulation"
    );

    Ok(SimulationSnapshot {
        revision,
        input,
        output,
    })
}

/// Principal, its classification and schedule, in that order.
fn reprice(input: &SimulationInput<'_>, output: &mut SimulationOutput) -> LoanSimResult<()> {
    let (principal, classification, suggested_down_payment) = resolve_principal(input);
    let (schedule, monthly_payment) = repayment_plan(input, principal)?;
    output.principal = principal;
    output.classification = classification;
    output.suggested_down_payment = suggested_down_payment;
    output.schedule = schedule;
    output.monthly_payment = monthly_payment;
    Ok(())
}

fn resolve_principal(input: &SimulationInput<'_>) -> (Money, PrincipalClass, Option<Money>) {
    let principal = input.principal();
    let classification = bounds::classify(principal, input.product);
    let suggestion = if classification.is_within_bounds() {
        None
    } else {
        Some(bounds::suggested_down_payment(input.vehicle_price, input.product))
    };
    (principal, classification, suggestion)
}

fn repayment_plan(
    input: &SimulationInput<'_>,
    principal: Money,
) -> LoanSimResult<(Vec<ScheduleRow>, Money)> {
    let rate = input.product.annual_rate;
    let schedule = build_schedule(principal, rate, input.term_months)?;
    let payment = scheduled_payment(principal, rate, input.term_months)?;
    Ok((schedule, payment))
}

fn assess_affordability(
    input: &SimulationInput<'_>,
    monthly_payment: Money,
) -> LoanSimResult<(AffordabilityVerdict, Money)> {
    let verdict = affordability::check(monthly_payment, input.payment_capacity);
    let max_principal = principal_for_payment(
        input.payment_capacity,
        input.product.annual_rate,
        input.term_months,
    )?;
    Ok((verdict, round_money(max_principal)))
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

impl<'a> SimulationOrchestrator<'a> {
    /// Start from a caller-supplied input, as-is.
    pub fn new(input: SimulationInput<'a>) -> LoanSimResult<Self> {
        let output = recompute_all(&input)?;
        Ok(SimulationOrchestrator {
            current: SimulationSnapshot {
                revision: 0,
                input,
                output,
            },
        })
    }

    /// Start from `product`'s defaults, as if it had just been selected.
    pub fn for_product(
        product: &'a LoanProduct,
        vehicle_price: Money,
        payment_capacity: Money,
    ) -> LoanSimResult<Self> {
        Self::new(SimulationInput::with_product_defaults(
            product,
            vehicle_price,
            payment_capacity,
        ))
    }

    pub fn snapshot(&self) -> &SimulationSnapshot<'a> {
        &self.current
    }

    /// Compute the snapshot `edit` would produce without committing it.
    pub fn propose(&self, edit: Edit<'a>) -> LoanSimResult<SimulationSnapshot<'a>> {
        reduce(&self.current, edit)
    }

    /// Install `candidate` if it was computed from the current snapshot.
    /// A candidate built on an older snapshot is discarded and `false`
    /// returned.
    pub fn commit(&mut self, candidate: SimulationSnapshot<'a>) -> bool {
        if candidate.revision != self.current.revision + 1 {
            tracing::debug!(
                current = self.current.revision,
                stale = candidate.revision,
                "discarding stale simulation result"
            );
            return false;
        }
        self.current = candidate;
        true
    }

    /// Propose and commit in one step. A rejected edit leaves the current
    /// snapshot untouched.
    pub fn apply(&mut self, edit: Edit<'a>) -> LoanSimResult<&SimulationSnapshot<'a>> {
        let next = self.propose(edit)?;
        self.current = next;
        Ok(&self.current)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
