// 4.0: realized trades. created only when a position closes, immutable after.
// the history itself lives on the ledger and is capped most-recent-first.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{AccountId, Leverage, Price, Quote, Side, Symbol, Timestamp, TradeId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub account_id: AccountId,
    pub symbol: Symbol,
    pub side: Side,
    pub entry_price: Price,
    pub exit_price: Price,
    pub size: Quote,
    pub leverage: Leverage,
    pub pnl: Quote,
    // pnl relative to the margin that backed the position
    pub pnl_percent: Decimal,
    pub opened_at: Timestamp,
    pub closed_at: Timestamp,
}

impl Trade {
    pub fn is_win(&self) -> bool {
        self.pnl.is_positive()
    }
}
