// 2.0: open position tracking.
// size is notional in quote currency; margin = size / leverage is reserved
// from the balance at open time. positions are immutable once opened: the
// liquidation price is computed once and frozen.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{AccountId, Leverage, MarginMode, PositionId, Price, Quote, Side, Symbol, Timestamp};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub account_id: AccountId,
    pub symbol: Symbol,
    pub side: Side,
    pub entry_price: Price,
    // Notional exposure in quote currency
    pub size: Quote,
    pub leverage: Leverage,
    pub margin: Quote,
    pub margin_mode: MarginMode,
    // Recorded only. nothing in the ledger evaluates these against prices.
    pub take_profit: Option<Price>,
    pub stop_loss: Option<Price>,
    pub liquidation_price: Price,
    pub opened_at: Timestamp,
}

impl Position {
    // 2.1: paper gains/losses against the current mark.
    // pnl = (mark - entry) / entry * size * leverage * direction
    pub fn unrealized_pnl(&self, mark_price: Price) -> Quote {
        calculate_pnl(
            self.side,
            self.entry_price,
            mark_price,
            self.size,
            self.leverage,
        )
    }

    pub fn roi_percent(&self, mark_price: Price) -> Decimal {
        let pnl = self.unrealized_pnl(mark_price);
        pnl.value() / self.margin.value() * dec!(100)
    }
}

// 2.2: collateral backing an exposure of `size` at `leverage`
pub fn calculate_margin(size: Quote, leverage: Leverage) -> Quote {
    Quote::new(size.value() / leverage.as_decimal())
}

// 2.3: the pnl formula. leveraged return on entry, signed by direction.
pub fn calculate_pnl(
    side: Side,
    entry_price: Price,
    exit_price: Price,
    size: Quote,
    leverage: Leverage,
) -> Quote {
    let price_diff = exit_price.value() - entry_price.value();
    let pnl = price_diff / entry_price.value() * size.value() * leverage.as_decimal() * side.sign();
    Quote::new(pnl)
}

// 2.4: liquidation price, linear approximation that ignores fees and funding.
//   long:  entry * (1 - 1/L + m)
//   short: entry * (1 + 1/L - m)
// frozen at open time; m is the maintenance margin rate.
pub fn calculate_liquidation_price(
    entry_price: Price,
    side: Side,
    leverage: Leverage,
    maintenance_margin_rate: Decimal,
) -> Price {
    let inv_leverage = leverage.margin_fraction();
    let factor = match side {
        Side::Long => Decimal::ONE - inv_leverage + maintenance_margin_rate,
        Side::Short => Decimal::ONE + inv_leverage - maintenance_margin_rate,
    };
    Price::new_unchecked(entry_price.value() * factor)
}
