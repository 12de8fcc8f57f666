// paper-ledger: paper trading ledger for simulated perpetual futures.
// bookkeeping-first architecture: balances, margin reservation, and realized
// pnl take priority. prices are always supplied by the caller; the ledger
// never fetches or evaluates market data on its own.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: ids, Side, Symbol, Price, Quote, Leverage
//   2.x  position.rs: open positions, margin/pnl/liquidation formulas
//   3.x  order.rs: pending limit orders (reserve-and-cancel only, no fills)
//   4.x  trade.rs: realized trades, immutable after close
//   5.x  leaderboard.rs: pnl ranking and badges
//   5.1  report.rs: csv export of trade history
//   6.x  config.rs: balances, margin rate, caps, presets
//   7.x  events.rs: state transition events for audit
//   8.x  price_feed.rs: caller-supplied market quotes
//   9.x  ledger/: core ledger: accounts, orders, settlement, reporting
//   10.x account.rs: account records, secret hashing, trade stats
//   11.x persistence.rs: best-effort json snapshots
//   12.x waitlist.rs: pre-launch signup capture

// core bookkeeping modules
pub mod account;
pub mod events;
pub mod ledger;
pub mod order;
pub mod position;
pub mod trade;
pub mod types;

// derived views and integration modules
pub mod config;
pub mod leaderboard;
pub mod persistence;
pub mod price_feed;
pub mod report;
pub mod waitlist;

// re exports for convenience
pub use account::*;
pub use events::*;
pub use ledger::*;
pub use order::*;
pub use position::*;
pub use trade::*;
pub use types::*;
pub use config::{ConfigError, LedgerConfig};
pub use leaderboard::{build_leaderboard, Badge, LeaderboardEntry};
pub use persistence::{save_best_effort, JsonFileStore, LedgerState, PersistenceError, SnapshotStore};
pub use price_feed::{MarketQuote, PriceFeed, StaticPriceFeed};
pub use report::export_trade_history_csv;
pub use waitlist::WaitlistEntry;
