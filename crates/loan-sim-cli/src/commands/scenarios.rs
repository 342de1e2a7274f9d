use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_sim_core::scenarios::comparison::{self, ScenarioInput};
use loan_sim_core::{LoanProduct, ProductCatalog};

use super::resolve_rate;
use crate::input;

/// Arguments for the standard scenario comparison
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ScenariosArgs {
    /// Path to JSON/YAML input file with `vehicle_price` and `product`
    #[arg(long)]
    pub input: Option<String>,

    /// Vehicle price
    #[arg(long, alias = "price")]
    pub vehicle_price: Option<Decimal>,

    /// Product catalog file (JSON/YAML); use with --product
    #[arg(long, requires = "product")]
    pub catalog: Option<String>,

    /// Product id to pick from --catalog
    #[arg(long)]
    pub product: Option<String>,

    /// Annual nominal rate as a decimal fraction (0.12 = 12%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Annual nominal rate as a percentage (12 = 12%)
    #[arg(long, conflicts_with = "rate")]
    pub rate_pct: Option<Decimal>,

    /// Smallest principal the product finances
    #[arg(long)]
    pub min_principal: Option<Decimal>,

    /// Largest principal the product finances
    #[arg(long)]
    pub max_principal: Option<Decimal>,

    /// Shortest term in months
    #[arg(long)]
    pub min_term: Option<u32>,

    /// Longest term in months
    #[arg(long)]
    pub max_term: Option<u32>,
}

pub fn run_scenarios(args: ScenariosArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario_input: ScenarioInput =
        if let Some(loaded) = input::load::<ScenarioInput>(args.input.as_deref())? {
            loaded
        } else {
            ScenarioInput {
                vehicle_price: args
                    .vehicle_price
                    .ok_or("--vehicle-price is required (or provide --input)")?,
                product: product_from_args(&args)?,
            }
        };

    let result = comparison::compare_scenarios(&scenario_input)?;
    Ok(serde_json::to_value(result)?)
}

fn product_from_args(args: &ScenariosArgs) -> Result<LoanProduct, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.catalog {
        let catalog: ProductCatalog = input::file::read_input(path)?;
        catalog.validate()?;
        let id = args.product.as_deref().ok_or("--product is required with --catalog")?;
        return Ok(catalog.find(id)?.clone());
    }

    Ok(LoanProduct {
        id: args.product.clone().unwrap_or_else(|| "adhoc".to_string()),
        annual_rate: resolve_rate(args.rate, args.rate_pct)?,
        min_principal: args
            .min_principal
            .ok_or("--min-principal is required (or provide --catalog)")?,
        max_principal: args
            .max_principal
            .ok_or("--max-principal is required (or provide --catalog)")?,
        min_term: args
            .min_term
            .ok_or("--min-term is required (or provide --catalog)")?,
        max_term: args
            .max_term
            .ok_or("--max-term is required (or provide --catalog)")?,
    })
}
