//! Configuration module for the coin-scope application.

mod binance;
mod catalog;
mod debug;
mod persistence;
mod simulator;

// Re-export commonly used items
pub use binance::BINANCE;
pub use catalog::{CATALOG, CatalogEntry, find_by_symbol};
pub use debug::DF;
pub use persistence::PERSISTENCE;
pub use simulator::SIMULATOR;
