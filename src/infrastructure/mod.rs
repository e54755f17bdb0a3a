//! Adapters behind the domain ports: the local issuer table and in-process
//! gateway doubles.

pub mod static_table;
pub mod stub;
