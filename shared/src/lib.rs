//! Shared types, models and the stock aggregation engine
//!
//! This crate holds everything that does not touch the database or HTTP:
//! the calculation log models, request date parsing and the pure
//! aggregation pipeline used by every stock report.

pub mod aggregation;
pub mod models;
pub mod types;

pub use aggregation::*;
pub use models::*;
pub use types::*;
