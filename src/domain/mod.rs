//! Domain types and the ports the pipeline talks to its collaborators through.

pub mod billing;
pub mod card;
pub mod issuer;
pub mod outcome;
pub mod ports;
pub mod report;
