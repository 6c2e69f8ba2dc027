//! Business logic services for the stock ledger

pub mod export;
pub mod intake;
pub mod stock;

pub use intake::IntakeService;
pub use stock::StockService;
