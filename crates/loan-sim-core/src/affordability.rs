use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Outcome of comparing a required payment to an applicant's capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffordabilityVerdict {
    pub passes: bool,
    pub required_payment: Money,
    pub capacity: Money,
    /// Zero when the verdict passes.
    pub shortfall: Money,
}

/// Compare an already-rounded payment to the applicant's monthly capacity.
pub fn check(payment: Money, capacity: Money) -> AffordabilityVerdict {
    let passes = capacity >= payment;
    AffordabilityVerdict {
        passes,
        required_payment: payment,
        capacity,
        shortfall: if passes { Decimal::ZERO } else { payment - capacity },
    }
}
