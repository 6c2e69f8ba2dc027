//! HTTP handlers

pub mod health;
pub mod intake;
pub mod stock;

pub use health::health_check;
pub use intake::*;
pub use stock::*;
