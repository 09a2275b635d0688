//! Bonus simulation library: calculation engine, editable session tables,
//! and the configuration/telemetry plumbing shared with the API service.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
