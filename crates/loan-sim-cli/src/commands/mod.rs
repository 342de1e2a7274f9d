pub mod loan;
pub mod scenarios;
pub mod simulation;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Annual rate as a decimal fraction from either `--rate` or `--rate-pct`.
pub fn resolve_rate(
    rate: Option<Decimal>,
    rate_pct: Option<Decimal>,
) -> Result<Decimal, Box<dyn std::error::Error>> {
    match (rate, rate_pct) {
        (Some(r), _) => Ok(r),
        (None, Some(pct)) => Ok(pct / dec!(100)),
        (None, None) => Err("--rate or --rate-pct is required (or provide --input)".into()),
    }
}
