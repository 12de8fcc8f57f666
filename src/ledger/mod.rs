// 9.0: core paper ledger. coordinates accounts, position and order margin,
// settlement into realized trades, and reporting.
// deterministic given its seed and clock; snapshot writes are best effort.

mod core;
mod orders;
mod reporting;
mod results;
mod settlement;

pub use core::Ledger;
pub use orders::{OpenPositionParams, PlaceOrderParams};
pub use results::LedgerError;
