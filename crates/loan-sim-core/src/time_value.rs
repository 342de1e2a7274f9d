use rust_decimal::prelude::RoundingStrategy;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::LoanSimError;
use crate::types::{Money, Months, Rate};
use crate::LoanSimResult;

/// Decimal places every payment is rounded to before display or comparison.
pub const PAYMENT_DECIMAL_PLACES: u32 = 3;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Monthly periodic rate for an annual nominal rate.
pub fn periodic_rate(annual_rate: Rate) -> Rate {
    annual_rate / MONTHS_PER_YEAR
}

/// Round a monetary amount to the payment precision, half away from zero.
pub fn round_money(amount: Money) -> Money {
    amount.round_dp_with_strategy(PAYMENT_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Level (annuity) payment that retires `principal` over `term_months`.
///
/// The result is not rounded; [`round_money`] is applied by the scheduler.
pub fn level_payment(principal: Money, annual_rate: Rate, term_months: Months) -> LoanSimResult<Money> {
    validate_loan_terms(principal, annual_rate, term_months)?;

    let r = periodic_rate(annual_rate);
    let n = Decimal::from(term_months);

    if r.is_zero() {
        return Ok(principal / n);
    }

    let factor = match annuity_factor(r, term_months) {
        Some(factor) => factor,
        // r too small to register at 28 significant digits
        None => return Ok(principal / n),
    };

    principal
        .checked_mul(factor)
        .ok_or_else(|| LoanSimError::invalid("principal", "Payment exceeds decimal range"))
}

/// Principal that a fixed monthly payment can retire over `term_months`.
///
/// Inverse of [`level_payment`]; used to report how much an applicant's
/// payment capacity could finance at the product's rate.
pub fn principal_for_payment(payment: Money, annual_rate: Rate, term_months: Months) -> LoanSimResult<Money> {
    if payment < Decimal::ZERO {
        return Err(LoanSimError::invalid("payment", "Payment cannot be negative"));
    }
    validate_loan_terms(Decimal::ZERO, annual_rate, term_months)?;

    let r = periodic_rate(annual_rate);
    let n = Decimal::from(term_months);

    if r.is_zero() {
        return Ok(payment * n);
    }

    let discount = match (Decimal::ONE + r).checked_powu(u64::from(term_months)) {
        Some(growth) => Decimal::ONE - Decimal::ONE / growth,
        None => Decimal::ONE,
    };
    payment
        .checked_mul(discount / r)
        .ok_or_else(|| LoanSimError::invalid("payment", "Principal exceeds decimal range"))
}

/// Payment per unit of principal, `r(1+r)^n / ((1+r)^n - 1)`.
///
/// Stays between `r` and `1 + r`, so scaling by the principal last cannot
/// overflow where the raw compound factor would. A compound factor past the
/// decimal range leaves `r` itself. `None` when `(1+r)^n` rounds to one.
fn annuity_factor(r: Rate, term_months: Months) -> Option<Decimal> {
    let growth = match (Decimal::ONE + r).checked_powu(u64::from(term_months)) {
        Some(growth) => growth,
        None => return Some(r),
    };
    let denominator = growth - Decimal::ONE;
    if denominator.is_zero() {
        return None;
    }
    match r.checked_mul(growth) {
        Some(scaled) => Some(scaled / denominator),
        None => Some(r / (Decimal::ONE - Decimal::ONE / growth)),
    }
}

pub(crate) fn validate_loan_terms(
    principal: Money,
    annual_rate: Rate,
    term_months: Months,
) -> LoanSimResult<()> {
    if term_months == 0 {
        return Err(LoanSimError::invalid(
            "term_months",
            "Number of installments must be > 0",
        ));
    }
    if principal < Decimal::ZERO {
        return Err(LoanSimError::invalid("principal", "Principal cannot be negative"));
    }
    if annual_rate < Decimal::ZERO {
        return Err(LoanSimError::invalid("annual_rate", "Annual rate cannot be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_level_payment_basic() {
        let result = level_payment(dec!(16000), dec!(0.12), 12).unwrap();
        // 16000 * 0.01 * 1.01^12 / (1.01^12 - 1) = 1421.5806...
        assert!((result - dec!(1421.5806)).abs() < dec!(0.0001));
        assert_eq!(round_money(result), dec!(1421.581));
    }

    #[test]
    fn test_level_payment_zero_rate() {
        let result = level_payment(dec!(1000), Decimal::ZERO, 3).unwrap();
        assert_eq!(result, dec!(1000) / dec!(3));
    }

    #[test]
    fn test_level_payment_zero_principal() {
        assert_eq!(level_payment(Decimal::ZERO, dec!(0.12), 24).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_level_payment_rejects_zero_term() {
        match level_payment(dec!(1000), dec!(0.12), 0).unwrap_err() {
            LoanSimError::InvalidParameter { field, .. } => assert_eq!(field, "term_months"),
            other => panic!("Expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_level_payment_rejects_negative_principal() {
        match level_payment(dec!(-1), dec!(0.12), 12).unwrap_err() {
            LoanSimError::InvalidParameter { field, .. } => assert_eq!(field, "principal"),
            other => panic!("Expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_single_installment_repays_principal_plus_one_month() {
        let result = level_payment(dec!(1000), dec!(0.12), 1).unwrap();
        assert_eq!(result, dec!(1010));
    }

    #[test]
    fn test_principal_for_payment_inverts_level_payment() {
        let payment = level_payment(dec!(16000), dec!(0.12), 12).unwrap();
        let principal = principal_for_payment(payment, dec!(0.12), 12).unwrap();
        assert!((principal - dec!(16000)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_long_term_high_rate_does_not_overflow() {
        // 1.1^600 is near the top of the decimal range
        let result = level_payment(dec!(200000), dec!(1.2), 600).unwrap();
        // Payment converges to interest-only: 200000 * 0.1
        assert!((result - dec!(20000)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_compound_factor_beyond_decimal_range() {
        // 1.1^1000 does not fit in a Decimal
        let result = level_payment(dec!(200000), dec!(1.2), 1000).unwrap();
        assert_eq!(round_money(result), dec!(20000));
        let principal = principal_for_payment(dec!(20000), dec!(1.2), 1000).unwrap();
        assert_eq!(round_money(principal), dec!(200000));
    }

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(dec!(1.0005)), dec!(1.001));
        assert_eq!(round_money(dec!(1.0004)), dec!(1.000));
    }
}
