//! Domain models for the stock ledger

mod calculation;
mod intake;
mod ledger;
mod packing;
mod report;

pub use calculation::*;
pub use intake::*;
pub use ledger::*;
pub use packing::*;
pub use report::*;
