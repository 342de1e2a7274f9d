pub mod orchestrator;
pub mod request;
pub mod script;
