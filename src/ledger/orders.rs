//! Position opening and limit order management.
//!
//! Both paths reserve margin up front. Validation happens before any state is
//! touched, so a rejected command leaves the ledger exactly as it was.

use super::core::Ledger;
use super::results::LedgerError;
use crate::events::{EventPayload, OrderCanceledEvent, OrderPlacedEvent, PositionOpenedEvent};
use crate::order::LimitOrder;
use crate::position::{calculate_liquidation_price, calculate_margin, Position};
use crate::types::{
    AccountId, Leverage, MarginMode, OrderId, PositionId, Price, Quote, Side, Symbol,
};

#[derive(Debug, Clone)]
pub struct OpenPositionParams {
    pub symbol: Symbol,
    pub side: Side,
    pub entry_price: Price,
    pub size: Quote,
    pub leverage: Leverage,
    pub margin_mode: MarginMode,
    pub take_profit: Option<Price>,
    pub stop_loss: Option<Price>,
}

#[derive(Debug, Clone)]
pub struct PlaceOrderParams {
    pub symbol: Symbol,
    pub side: Side,
    pub limit_price: Price,
    pub size: Quote,
    pub leverage: Leverage,
    pub margin_mode: MarginMode,
    pub take_profit: Option<Price>,
    pub stop_loss: Option<Price>,
}

impl Ledger {
    // open a market position at the caller-supplied entry price.
    // margin = size / leverage comes out of the balance, the liquidation
    // price is computed here and never recomputed.
    pub fn open_position(
        &mut self,
        account_id: AccountId,
        params: OpenPositionParams,
    ) -> Result<Position, LedgerError> {
        if !params.size.is_positive() {
            return Err(LedgerError::InvalidOrderParameters {
                reason: format!("size must be positive, got {}", params.size.value()),
            });
        }

        let margin = calculate_margin(params.size, params.leverage);
        let account = self
            .accounts
            .get_mut(&account_id)
            .ok_or(LedgerError::AccountNotFound(account_id))?;
        account.reserve_margin(margin)?;

        let liquidation_price = calculate_liquidation_price(
            params.entry_price,
            params.side,
            params.leverage,
            self.config.maintenance_margin_rate,
        );

        let id = PositionId(self.next_position_id);
        self.next_position_id += 1;

        let position = Position {
            id,
            account_id,
            symbol: params.symbol,
            side: params.side,
            entry_price: params.entry_price,
            size: params.size,
            leverage: params.leverage,
            margin,
            margin_mode: params.margin_mode,
            take_profit: params.take_profit,
            stop_loss: params.stop_loss,
            liquidation_price,
            opened_at: self.current_time,
        };

        self.emit_event(EventPayload::PositionOpened(PositionOpenedEvent {
            account_id,
            position_id: id,
            symbol: position.symbol,
            side: position.side,
            entry_price: position.entry_price,
            size: position.size,
            leverage: position.leverage,
            margin_reserved: margin,
            liquidation_price,
        }));

        self.positions.insert(id, position.clone());
        self.persist();
        Ok(position)
    }

    // park a limit order. margin is reserved immediately even though no
    // fill engine exists; the order sits until it is canceled.
    pub fn place_limit_order(
        &mut self,
        account_id: AccountId,
        params: PlaceOrderParams,
    ) -> Result<LimitOrder, LedgerError> {
        if !params.size.is_positive() {
            return Err(LedgerError::InvalidOrderParameters {
                reason: format!("size must be positive, got {}", params.size.value()),
            });
        }

        let margin = calculate_margin(params.size, params.leverage);
        let account = self
            .accounts
            .get_mut(&account_id)
            .ok_or(LedgerError::AccountNotFound(account_id))?;
        account.reserve_margin(margin)?;

        let id = OrderId(self.next_order_id);
        self.next_order_id += 1;

        let order = LimitOrder {
            id,
            account_id,
            symbol: params.symbol,
            side: params.side,
            limit_price: params.limit_price,
            size: params.size,
            leverage: params.leverage,
            margin_mode: params.margin_mode,
            take_profit: params.take_profit,
            stop_loss: params.stop_loss,
            placed_at: self.current_time,
        };

        self.emit_event(EventPayload::OrderPlaced(OrderPlacedEvent {
            account_id,
            order_id: id,
            symbol: order.symbol,
            side: order.side,
            limit_price: order.limit_price,
            size: order.size,
            margin_reserved: margin,
        }));

        self.limit_orders.insert(id, order.clone());
        self.persist();
        Ok(order)
    }

    // cancel returns the reserved margin exactly once. an unknown id or
    // someone else's order is OrderNotFound, so a repeated cancel can never
    // credit twice.
    pub fn cancel_limit_order(
        &mut self,
        account_id: AccountId,
        order_id: OrderId,
    ) -> Result<LimitOrder, LedgerError> {
        let owned = self
            .limit_orders
            .get(&order_id)
            .map(|o| o.account_id == account_id)
            .unwrap_or(false);
        if !owned {
            return Err(LedgerError::OrderNotFound(order_id));
        }

        let order = self
            .limit_orders
            .remove(&order_id)
            .ok_or(LedgerError::OrderNotFound(order_id))?;

        let margin = order.margin();
        let account = self
            .accounts
            .get_mut(&account_id)
            .ok_or(LedgerError::AccountNotFound(account_id))?;
        account.return_margin(margin);

        self.emit_event(EventPayload::OrderCanceled(OrderCanceledEvent {
            account_id,
            order_id,
            margin_returned: margin,
        }));

        self.persist();
        Ok(order)
    }
}
