use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::LoanSimResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.12 = 12%). Never as percentages.
pub type Rate = Decimal;

/// Loan terms and installment indices, counted in months.
pub type Months = u32;

/// Standard computation output envelope. Every top-level entry point
/// (scenario comparison, simulation run, request response) returns one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
    /// Decimal places payments were rounded to.
    pub payment_decimal_places: u32,
}

/// Helper to wrap computation results with metadata. Fails with
/// `SerializationError` when the assumptions do not map to JSON.
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> LoanSimResult<ComputationOutput<T>> {
    Ok(ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions)?,
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
            payment_decimal_places: crate::time_value::PAYMENT_DECIMAL_PLACES,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LoanSimError;
    use std::collections::BTreeMap;

    #[test]
    fn test_envelope_records_payment_precision() {
        let out = with_metadata("test", &serde_json::json!({}), vec![], 0, 1u8).unwrap();
        assert_eq!(out.metadata.payment_decimal_places, 3);
        assert_eq!(out.metadata.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_unserializable_assumptions_are_reported() {
        // JSON object keys must be strings
        let mut assumptions = BTreeMap::new();
        assumptions.insert((1u8, 2u8), "pair");
        match with_metadata("test", &assumptions, vec![], 0, 1u8).unwrap_err() {
            LoanSimError::SerializationError(msg) => assert!(msg.contains("key must be a string")),
            other => panic!("Expected SerializationError, got {other:?}"),
        }
    }
}
