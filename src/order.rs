// 3.0: pending limit orders.
// margin is reserved at placement exactly like a position and credited back on
// cancellation. no fill engine exists: price movement never removes an order,
// only an explicit cancel does.

use serde::{Deserialize, Serialize};

use crate::position::calculate_margin;
use crate::types::{AccountId, Leverage, MarginMode, OrderId, Price, Quote, Side, Symbol, Timestamp};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitOrder {
    pub id: OrderId,
    pub account_id: AccountId,
    pub symbol: Symbol,
    pub side: Side,
    pub limit_price: Price,
    // Notional exposure in quote currency
    pub size: Quote,
    pub leverage: Leverage,
    pub margin_mode: MarginMode,
    pub take_profit: Option<Price>,
    pub stop_loss: Option<Price>,
    pub placed_at: Timestamp,
}

impl LimitOrder {
    // Reserved at placement, returned on cancel
    pub fn margin(&self) -> Quote {
        calculate_margin(self.size, self.leverage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn order_margin_matches_position_rule() {
        let order = LimitOrder {
            id: OrderId(1),
            account_id: AccountId(1),
            symbol: Symbol::EthUsdt,
            side: Side::Short,
            limit_price: Price::new_unchecked(dec!(2000)),
            size: Quote::new(dec!(500)),
            leverage: Leverage::new(5).unwrap(),
            margin_mode: MarginMode::Isolated,
            take_profit: None,
            stop_loss: Some(Price::new_unchecked(dec!(2100))),
            placed_at: Timestamp::from_millis(0),
        };

        assert_eq!(order.margin().value(), dec!(100));
    }
}
