pub mod affordability;
pub mod amortization;
pub mod bounds;
pub mod error;
pub mod product;
pub mod time_value;
pub mod types;

#[cfg(feature = "scenarios")]
pub mod scenarios;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use error::LoanSimError;
pub use product::{LoanProduct, ProductCatalog};
pub use types::*;

/// Standard result type for all loan-sim operations
pub type LoanSimResult<T> = Result<T, LoanSimError>;
