//! Credit product terms as supplied by the product lookup collaborator.
//!
//! A [`LoanProduct`] is immutable once loaded. The engine only ever borrows
//! it, so a simulation never outlives the catalog it was started from.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::error::LoanSimError;
use crate::types::{Money, Months, Rate};
use crate::LoanSimResult;

/// Rate and principal/term bounds of a single credit product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoanProduct {
    pub id: String,
    /// Annual nominal rate as a decimal fraction (0.12 = 12%).
    pub annual_rate: Rate,
    pub min_principal: Money,
    pub max_principal: Money,
    pub min_term: Months,
    pub max_term: Months,
}

impl LoanProduct {
    /// Check the product invariants. A product that fails here is a caller
    /// bug, not a user-facing condition.
    pub fn validate(&self) -> LoanSimResult<()> {
        if self.annual_rate < Decimal::ZERO {
            return Err(LoanSimError::invalid(
                "annual_rate",
                "Annual rate cannot be negative",
            ));
        }
        if self.min_principal < Decimal::ZERO {
            return Err(LoanSimError::invalid(
                "min_principal",
                "Minimum principal cannot be negative",
            ));
        }
        if self.min_principal > self.max_principal {
            return Err(LoanSimError::invalid(
                "min_principal",
                "Minimum principal cannot exceed maximum principal",
            ));
        }
        if self.min_term == 0 {
            return Err(LoanSimError::invalid(
                "min_term",
                "Minimum term must be at least 1 month",
            ));
        }
        if self.min_term > self.max_term {
            return Err(LoanSimError::invalid(
                "min_term",
                "Minimum term cannot exceed maximum term",
            ));
        }
        Ok(())
    }

    /// Every term, in months, the product allows.
    pub fn term_range(&self) -> RangeInclusive<Months> {
        self.min_term..=self.max_term
    }

    pub fn allows_term(&self, term_months: Months) -> bool {
        self.term_range().contains(&term_months)
    }
}

/// The set of products a caller has already resolved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductCatalog {
    pub products: Vec<LoanProduct>,
}

impl ProductCatalog {
    pub fn new(products: Vec<LoanProduct>) -> LoanSimResult<Self> {
        let catalog = ProductCatalog { products };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> LoanSimResult<()> {
        for product in &self.products {
            product.validate()?;
        }
        Ok(())
    }

    pub fn find(&self, id: &str) -> LoanSimResult<&LoanProduct> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| LoanSimError::MissingProduct(id.to_string()))
    }
}
