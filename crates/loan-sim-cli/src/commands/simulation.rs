use clap::Args;
use serde_json::Value;

use loan_sim_core::simulation::request::{self, RequestInput};
use loan_sim_core::simulation::script::{self, SimulationScript};

use crate::input;

/// Arguments for replaying a simulation script
#[derive(Args)]
pub struct SimulateArgs {
    /// Path to JSON/YAML script: catalog, product_id, vehicle_price,
    /// payment_capacity and an ordered list of edits
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for answering a simulation request
#[derive(Args)]
pub struct RequestArgs {
    /// Path to JSON/YAML file with `request`, `vehicle_price` and `product`
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let simulation_script: SimulationScript = input::load(args.input.as_deref())?
        .ok_or("--input file is required for a simulation run")?;

    let result = script::simulate(&simulation_script)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_request(args: RequestArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request_input: RequestInput = input::load(args.input.as_deref())?
        .ok_or("--input file is required to answer a simulation request")?;

    let result = request::respond_to_request(&request_input)?;
    Ok(serde_json::to_value(result)?)
}
