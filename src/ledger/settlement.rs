//! Settlement of positions into realized trades.
//!
//! Close is the only way a position leaves the book and the only source of
//! trades. Validation runs first; once it passes the whole sequence applies:
//! margin back, pnl settled into the balance, win stats recomputed, trade
//! pushed onto the capped history.

use super::core::Ledger;
use super::results::LedgerError;
use crate::events::{EventPayload, PositionClosedEvent};
use crate::position::calculate_pnl;
use crate::trade::Trade;
use crate::types::{AccountId, PositionId, Price, TradeId};
use rust_decimal_macros::dec;

impl Ledger {
    // settle a position at the caller-supplied exit price.
    pub fn close_position(
        &mut self,
        account_id: AccountId,
        position_id: PositionId,
        exit_price: Price,
    ) -> Result<Trade, LedgerError> {
        let owned = self
            .positions
            .get(&position_id)
            .map(|p| p.account_id == account_id)
            .unwrap_or(false);
        if !owned {
            return Err(LedgerError::PositionNotFound(position_id));
        }
        if !self.accounts.contains_key(&account_id) {
            return Err(LedgerError::AccountNotFound(account_id));
        }

        let position = self
            .positions
            .remove(&position_id)
            .ok_or(LedgerError::PositionNotFound(position_id))?;

        let pnl = calculate_pnl(
            position.side,
            position.entry_price,
            exit_price,
            position.size,
            position.leverage,
        );
        let pnl_percent = pnl.value() / position.margin.value() * dec!(100);

        let account = self
            .accounts
            .get_mut(&account_id)
            .ok_or(LedgerError::AccountNotFound(account_id))?;
        account.return_margin(position.margin);
        account.realize_pnl(pnl);
        account.record_trade_outcome(pnl);

        let trade_id = TradeId(self.next_trade_id);
        self.next_trade_id += 1;

        let trade = Trade {
            id: trade_id,
            account_id,
            symbol: position.symbol,
            side: position.side,
            entry_price: position.entry_price,
            exit_price,
            size: position.size,
            leverage: position.leverage,
            pnl,
            pnl_percent,
            opened_at: position.opened_at,
            closed_at: self.current_time,
        };

        self.emit_event(EventPayload::PositionClosed(PositionClosedEvent {
            account_id,
            position_id,
            trade_id,
            symbol: trade.symbol,
            exit_price,
            realized_pnl: pnl,
            pnl_percent,
            margin_returned: position.margin,
        }));

        // Most recent first, oldest entries fall off the end
        self.trade_history.insert(0, trade.clone());
        self.trade_history.truncate(self.config.trade_history_cap);

        self.persist();
        Ok(trade)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerConfig;
    use crate::ledger::orders::OpenPositionParams;
    use crate::types::{Leverage, MarginMode, Quote, Side, Symbol};
    use rust_decimal_macros::dec;

    fn ledger_with_account() -> (Ledger, AccountId) {
        let mut ledger = Ledger::new_seeded(LedgerConfig::default(), 42);
        let account = ledger.sign_up("alice", "secret1", None).unwrap();
        (ledger, account.id)
    }

    fn open(
        ledger: &mut Ledger,
        account_id: AccountId,
        side: Side,
        entry: rust_decimal::Decimal,
        size: rust_decimal::Decimal,
        leverage: u32,
    ) -> PositionId {
        ledger
            .open_position(
                account_id,
                OpenPositionParams {
                    symbol: Symbol::BtcUsdt,
                    side,
                    entry_price: Price::new_unchecked(entry),
                    size: Quote::new(size),
                    leverage: Leverage::new(leverage).unwrap(),
                    margin_mode: MarginMode::Isolated,
                    take_profit: None,
                    stop_loss: None,
                },
            )
            .unwrap()
            .id
    }

    #[test]
    fn close_settles_pnl_and_returns_margin() {
        let (mut ledger, account_id) = ledger_with_account();
        let position_id = open(&mut ledger, account_id, Side::Long, dec!(100), dec!(1000), 10);
        assert_eq!(
            ledger.account(account_id).unwrap().balance.value(),
            dec!(9900)
        );

        let trade = ledger
            .close_position(account_id, position_id, Price::new_unchecked(dec!(110)))
            .unwrap();

        // (110-100)/100 * 1000 * 10 = 1000
        assert_eq!(trade.pnl.value(), dec!(1000));
        assert_eq!(trade.pnl_percent, dec!(1000));
        let account = ledger.account(account_id).unwrap();
        assert_eq!(account.balance.value(), dec!(11000));
        assert_eq!(account.total_pnl.value(), dec!(1000));
        assert_eq!(account.trades_count, 1);
        assert_eq!(account.win_rate, dec!(100));
        assert!(ledger.position(position_id).is_none());
    }

    #[test]
    fn losing_short_reduces_balance() {
        let (mut ledger, account_id) = ledger_with_account();
        let position_id = open(&mut ledger, account_id, Side::Short, dec!(100), dec!(500), 5);

        let trade = ledger
            .close_position(account_id, position_id, Price::new_unchecked(dec!(110)))
            .unwrap();

        // short loses on a rally: (110-100)/100 * 500 * 5 * -1 = -250
        assert_eq!(trade.pnl.value(), dec!(-250));
        assert!(!trade.is_win());
        let account = ledger.account(account_id).unwrap();
        assert_eq!(account.balance.value(), dec!(9750));
        assert_eq!(account.win_rate, dec!(0));
    }

    #[test]
    fn breakeven_close_counts_as_loss() {
        let (mut ledger, account_id) = ledger_with_account();
        let position_id = open(&mut ledger, account_id, Side::Long, dec!(100), dec!(100), 10);

        let trade = ledger
            .close_position(account_id, position_id, Price::new_unchecked(dec!(100)))
            .unwrap();

        assert_eq!(trade.pnl.value(), dec!(0));
        let account = ledger.account(account_id).unwrap();
        assert_eq!(account.trades_count, 1);
        assert_eq!(account.win_rate, dec!(0));
        assert_eq!(account.balance.value(), dec!(10000));
    }

    #[test]
    fn close_rejects_unknown_or_foreign_position() {
        let (mut ledger, alice) = ledger_with_account();
        let bob = ledger.sign_up("bob", "pw", None).unwrap().id;
        let position_id = open(&mut ledger, alice, Side::Long, dec!(100), dec!(100), 2);

        assert!(matches!(
            ledger.close_position(alice, PositionId(999), Price::new_unchecked(dec!(100))),
            Err(LedgerError::PositionNotFound(_))
        ));
        assert!(matches!(
            ledger.close_position(bob, position_id, Price::new_unchecked(dec!(100))),
            Err(LedgerError::PositionNotFound(_))
        ));
        // Position still open, margin still reserved
        assert_eq!(ledger.positions_for(alice).len(), 1);
        assert_eq!(ledger.account(alice).unwrap().balance.value(), dec!(9950));
    }

    #[test]
    fn history_is_most_recent_first_and_capped() {
        let mut config = LedgerConfig::default();
        config.trade_history_cap = 3;
        let mut ledger = Ledger::new_seeded(config, 42);
        let account_id = ledger.sign_up("alice", "secret1", None).unwrap().id;

        for i in 0..5u64 {
            ledger.set_time(crate::types::Timestamp::from_millis(i as i64 * 1000));
            let position_id = open(&mut ledger, account_id, Side::Long, dec!(100), dec!(10), 2);
            ledger
                .close_position(account_id, position_id, Price::new_unchecked(dec!(101)))
                .unwrap();
        }

        let history = ledger.trade_history();
        assert_eq!(history.len(), 3);
        assert!(history[0].closed_at.as_millis() > history[1].closed_at.as_millis());
        assert!(history[1].closed_at.as_millis() > history[2].closed_at.as_millis());
    }

    #[test]
    fn win_rate_recomputed_from_rounded_wins() {
        let (mut ledger, account_id) = ledger_with_account();

        // win, loss, win over three trades
        for (exit, _) in [(dec!(110), true), (dec!(90), false), (dec!(105), true)] {
            let position_id = open(&mut ledger, account_id, Side::Long, dec!(100), dec!(10), 2);
            ledger
                .close_position(account_id, position_id, Price::new_unchecked(exit))
                .unwrap();
        }

        let account = ledger.account(account_id).unwrap();
        assert_eq!(account.trades_count, 3);
        // 2 wins of 3
        assert_eq!(
            account.win_rate.round_dp(4),
            dec!(66.6667)
        );
    }
}
