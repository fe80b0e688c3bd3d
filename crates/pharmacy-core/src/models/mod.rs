//! Domain models for the pharmacy ledger.

mod bill;
mod inventory;

pub use bill::*;
pub use inventory::*;
