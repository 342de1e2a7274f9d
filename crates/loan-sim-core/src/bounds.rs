//! Reconcile a principal against a product's allowed range.
//!
//! Nothing in here fails: a principal outside the range is a normal state
//! the caller reports, together with a down payment that would fix it.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::product::LoanProduct;
use crate::types::Money;

/// Fraction of the way from the minimum to the maximum principal that a
/// suggested down payment aims for. Sitting inside the range leaves
/// headroom for later edits.
pub const TARGET_RANGE_FRACTION: Decimal = dec!(0.7);

/// Where a principal sits relative to a product's inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalClass {
    WithinBounds,
    BelowMinimum,
    AboveMaximum,
}

impl PrincipalClass {
    pub fn is_within_bounds(self) -> bool {
        self == PrincipalClass::WithinBounds
    }
}

/// Principal the suggestion aims for: 70% of the way through the range.
pub fn target_principal(product: &LoanProduct) -> Money {
    product.min_principal + TARGET_RANGE_FRACTION * (product.max_principal - product.min_principal)
}

/// Down payment that brings the principal to [`target_principal`], never
/// negative.
pub fn suggested_down_payment(vehicle_price: Money, product: &LoanProduct) -> Money {
    (vehicle_price - target_principal(product)).max(Decimal::ZERO)
}

/// Compare the literal principal to the product bounds.
pub fn classify(principal: Money, product: &LoanProduct) -> PrincipalClass {
    if principal < product.min_principal {
        PrincipalClass::BelowMinimum
    } else if principal > product.max_principal {
        PrincipalClass::AboveMaximum
    } else {
        PrincipalClass::WithinBounds
    }
}

/// Nearest principal the product accepts.
pub fn clamp_principal(principal: Money, product: &LoanProduct) -> Money {
    principal.max(product.min_principal).min(product.max_principal)
}

/// Report line for a principal outside the product range, naming the
/// nearest principal the product would finance. `None` when in range.
pub fn bounds_warning(subject: &str, principal: Money, product: &LoanProduct) -> Option<String> {
    let (side, limit) = match classify(principal, product) {
        PrincipalClass::WithinBounds => return None,
        PrincipalClass::BelowMinimum => ("below the product minimum", product.min_principal),
        PrincipalClass::AboveMaximum => ("above the product maximum", product.max_principal),
    };
    Some(format!(
        "{subject} {principal} is {side} {limit}; nearest financeable principal is {}",
        clamp_principal(principal, product)
    ))
}
