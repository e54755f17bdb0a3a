//! Application layer: the pipeline stages and the orchestrator that drives
//! one card through them.

pub mod gateway;
pub mod orchestrator;
pub mod resolver;
