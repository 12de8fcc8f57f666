// 7.0: every state change produces an event. used for audit trails and for
// notifying external systems. the EventPayload enum lists all event types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{
    AccountId, Leverage, OrderId, PositionId, Price, Quote, Side, Symbol, Timestamp, TradeId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub timestamp: Timestamp,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(id: EventId, timestamp: Timestamp, payload: EventPayload) -> Self {
        Self {
            id,
            timestamp,
            payload,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    // Account events
    AccountCreated(AccountCreatedEvent),
    Deposit(DepositEvent),
    Withdrawal(WithdrawalEvent),
    WithdrawalRejected(WithdrawalRejectedEvent),

    // Position events
    PositionOpened(PositionOpenedEvent),
    PositionClosed(PositionClosedEvent),

    // Order events
    OrderPlaced(OrderPlacedEvent),
    OrderCanceled(OrderCanceledEvent),

    // Misc
    WaitlistJoined(WaitlistJoinedEvent),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountCreatedEvent {
    pub account_id: AccountId,
    pub username: String,
    pub starting_balance: Quote,
    pub referred_by: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositEvent {
    pub account_id: AccountId,
    pub amount: Quote,
    pub new_balance: Quote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalEvent {
    pub account_id: AccountId,
    pub amount: Quote,
    pub new_balance: Quote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalRejectedEvent {
    pub account_id: AccountId,
    pub amount: Quote,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionOpenedEvent {
    pub account_id: AccountId,
    pub position_id: PositionId,
    pub symbol: Symbol,
    pub side: Side,
    pub entry_price: Price,
    pub size: Quote,
    pub leverage: Leverage,
    pub margin_reserved: Quote,
    pub liquidation_price: Price,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionClosedEvent {
    pub account_id: AccountId,
    pub position_id: PositionId,
    pub trade_id: TradeId,
    pub symbol: Symbol,
    pub exit_price: Price,
    pub realized_pnl: Quote,
    pub pnl_percent: Decimal,
    pub margin_returned: Quote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPlacedEvent {
    pub account_id: AccountId,
    pub order_id: OrderId,
    pub symbol: Symbol,
    pub side: Side,
    pub limit_price: Price,
    pub size: Quote,
    pub margin_reserved: Quote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCanceledEvent {
    pub account_id: AccountId,
    pub order_id: OrderId,
    pub margin_returned: Quote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitlistJoinedEvent {
    pub entry_id: u64,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn event_construction() {
        let event = Event::new(
            EventId(1),
            Timestamp::from_millis(1000),
            EventPayload::Deposit(DepositEvent {
                account_id: AccountId(1),
                amount: Quote::new(dec!(500)),
                new_balance: Quote::new(dec!(10500)),
            }),
        );

        assert_eq!(event.id, EventId(1));
        assert!(matches!(event.payload, EventPayload::Deposit(_)));
    }

    #[test]
    fn events_round_trip_through_json() {
        let event = Event::new(
            EventId(2),
            Timestamp::from_millis(2000),
            EventPayload::OrderCanceled(OrderCanceledEvent {
                account_id: AccountId(3),
                order_id: OrderId(9),
                margin_returned: Quote::new(dec!(40)),
            }),
        );

        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, event.id);
    }
}
