// 9.0 ledger/core.rs: main ledger struct. all state lives here.
//
// One explicit instance owned by the caller, no process-wide singleton. every
// mutating command takes &mut self, so callers serialize concurrent access
// with their own lock or actor queue; nothing here blocks on I/O except the
// fire-and-forget snapshot save at the end of a successful mutation.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

use super::results::LedgerError;
use crate::account::{
    generate_account_number, generate_referral_code, hash_secret, verify_secret, Account,
};
use crate::config::LedgerConfig;
use crate::events::{
    AccountCreatedEvent, DepositEvent, Event, EventId, EventPayload, WaitlistJoinedEvent,
    WithdrawalEvent, WithdrawalRejectedEvent,
};
use crate::order::LimitOrder;
use crate::persistence::{save_best_effort, LedgerState, SnapshotStore};
use crate::position::Position;
use crate::price_feed::PriceFeed;
use crate::trade::Trade;
use crate::types::{AccountId, OrderId, PositionId, Quote, Timestamp};
use crate::waitlist::WaitlistEntry;

pub struct Ledger {
    pub(super) config: LedgerConfig,
    pub(super) accounts: HashMap<AccountId, Account>,
    pub(super) positions: HashMap<PositionId, Position>,
    pub(super) limit_orders: HashMap<OrderId, LimitOrder>,
    // Most-recent-first, capped at config.trade_history_cap
    pub(super) trade_history: Vec<Trade>,
    pub(super) waitlist: Vec<WaitlistEntry>,
    pub(super) events: Vec<Event>,
    pub(super) next_event_id: u64,
    pub(super) next_account_id: u64,
    pub(super) next_position_id: u64,
    pub(super) next_order_id: u64,
    pub(super) next_trade_id: u64,
    pub(super) next_waitlist_id: u64,
    pub(super) current_time: Timestamp,
    pub(super) rng: StdRng,
    store: Option<Box<dyn SnapshotStore>>,
}

impl Ledger {
    pub fn new(config: LedgerConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    // Deterministic identifiers for tests and replays
    pub fn new_seeded(config: LedgerConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: LedgerConfig, rng: StdRng) -> Self {
        Self {
            config,
            accounts: HashMap::new(),
            positions: HashMap::new(),
            limit_orders: HashMap::new(),
            trade_history: Vec::new(),
            waitlist: Vec::new(),
            events: Vec::new(),
            next_event_id: 1,
            next_account_id: 1,
            next_position_id: 1,
            next_order_id: 1,
            next_trade_id: 1,
            next_waitlist_id: 1,
            current_time: Timestamp::from_millis(0),
            rng,
            store: None,
        }
    }

    pub fn attach_store(&mut self, store: Box<dyn SnapshotStore>) {
        self.store = Some(store);
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn set_time(&mut self, timestamp: Timestamp) {
        self.current_time = timestamp;
    }

    pub fn time(&self) -> Timestamp {
        self.current_time
    }

    pub fn advance_time(&mut self, millis: i64) {
        self.current_time = Timestamp::from_millis(self.current_time.as_millis() + millis);
    }

    // 9.1: account registry

    pub fn sign_up(
        &mut self,
        username: &str,
        secret: &str,
        referral_code: Option<&str>,
    ) -> Result<Account, LedgerError> {
        let taken = self
            .accounts
            .values()
            .any(|a| a.username.eq_ignore_ascii_case(username));
        if taken {
            return Err(LedgerError::UsernameTaken(username.to_string()));
        }

        let id = AccountId(self.next_account_id);
        self.next_account_id += 1;

        let account = Account::new(
            id,
            username.to_string(),
            hash_secret(secret),
            generate_account_number(&mut self.rng),
            generate_referral_code(&self.config.referral_code_prefix, &mut self.rng),
            referral_code.map(str::to_string),
            self.config.initial_balance,
            self.current_time,
        );

        self.emit_event(EventPayload::AccountCreated(AccountCreatedEvent {
            account_id: id,
            username: account.username.clone(),
            starting_balance: account.balance,
            referred_by: account.referred_by.clone(),
        }));

        self.accounts.insert(id, account.clone());
        self.persist();
        Ok(account)
    }

    pub fn login(&self, username: &str, secret: &str) -> Result<Account, LedgerError> {
        self.accounts
            .values()
            .find(|a| a.username.eq_ignore_ascii_case(username))
            .filter(|a| verify_secret(secret, &a.secret_hash))
            .cloned()
            .ok_or(LedgerError::InvalidCredentials)
    }

    pub fn deposit(&mut self, account_id: AccountId, amount: Quote) -> Result<Account, LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(amount.value()));
        }
        let account = self
            .accounts
            .get_mut(&account_id)
            .ok_or(LedgerError::AccountNotFound(account_id))?;

        account.deposit(amount);
        let updated = account.clone();

        self.emit_event(EventPayload::Deposit(DepositEvent {
            account_id,
            amount,
            new_balance: updated.balance,
        }));

        self.persist();
        Ok(updated)
    }

    pub fn withdraw(&mut self, account_id: AccountId, amount: Quote) -> Result<Account, LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(amount.value()));
        }
        let account = self
            .accounts
            .get_mut(&account_id)
            .ok_or(LedgerError::AccountNotFound(account_id))?;

        if let Err(e) = account.withdraw(amount) {
            let reason = e.to_string();
            self.emit_event(EventPayload::WithdrawalRejected(WithdrawalRejectedEvent {
                account_id,
                amount,
                reason,
            }));
            return Err(LedgerError::Account(e));
        }
        let updated = account.clone();

        self.emit_event(EventPayload::Withdrawal(WithdrawalEvent {
            account_id,
            amount,
            new_balance: updated.balance,
        }));

        self.persist();
        Ok(updated)
    }

    pub fn join_waitlist(
        &mut self,
        name: &str,
        email: &str,
        telegram: Option<&str>,
        referral_code: Option<&str>,
    ) -> WaitlistEntry {
        let entry = WaitlistEntry {
            id: self.next_waitlist_id,
            name: name.to_string(),
            email: email.to_string(),
            telegram: telegram.map(str::to_string),
            referral_code: referral_code.map(str::to_string),
            joined_at: self.current_time,
        };
        self.next_waitlist_id += 1;

        self.emit_event(EventPayload::WaitlistJoined(WaitlistJoinedEvent {
            entry_id: entry.id,
            email: entry.email.clone(),
        }));

        self.waitlist.push(entry.clone());
        self.persist();
        entry
    }

    // 9.2: read access

    pub fn account(&self, account_id: AccountId) -> Option<&Account> {
        self.accounts.get(&account_id)
    }

    pub fn accounts_iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn position(&self, position_id: PositionId) -> Option<&Position> {
        self.positions.get(&position_id)
    }

    pub fn positions_for(&self, account_id: AccountId) -> Vec<&Position> {
        let mut positions: Vec<&Position> = self
            .positions
            .values()
            .filter(|p| p.account_id == account_id)
            .collect();
        positions.sort_by_key(|p| p.id.0);
        positions
    }

    pub fn orders_for(&self, account_id: AccountId) -> Vec<&LimitOrder> {
        let mut orders: Vec<&LimitOrder> = self
            .limit_orders
            .values()
            .filter(|o| o.account_id == account_id)
            .collect();
        orders.sort_by_key(|o| o.id.0);
        orders
    }

    pub fn trade_history(&self) -> &[Trade] {
        &self.trade_history
    }

    pub fn waitlist(&self) -> &[WaitlistEntry] {
        &self.waitlist
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn recent_events(&self, count: usize) -> &[Event] {
        let start = self.events.len().saturating_sub(count);
        &self.events[start..]
    }

    // Margin currently locked in open positions and pending orders
    pub fn margin_reserved(&self, account_id: AccountId) -> Quote {
        let position_margin: Quote = self
            .positions
            .values()
            .filter(|p| p.account_id == account_id)
            .map(|p| p.margin)
            .sum();
        let order_margin: Quote = self
            .limit_orders
            .values()
            .filter(|o| o.account_id == account_id)
            .map(|o| o.margin())
            .sum();
        position_margin.add(order_margin)
    }

    // Mark all open positions of an account against a feed. positions whose
    // symbol has no quote contribute nothing, matching the original view.
    pub fn unrealized_pnl(&self, account_id: AccountId, feed: &dyn PriceFeed) -> Quote {
        self.positions
            .values()
            .filter(|p| p.account_id == account_id)
            .filter_map(|p| feed.price(p.symbol).map(|mark| p.unrealized_pnl(mark)))
            .sum()
    }

    // 9.3: snapshot hooks

    pub fn snapshot(&self) -> LedgerState {
        LedgerState {
            accounts: self.accounts.clone(),
            positions: self.positions.clone(),
            limit_orders: self.limit_orders.clone(),
            trade_history: self.trade_history.clone(),
            waitlist: self.waitlist.clone(),
            next_account_id: self.next_account_id,
            next_position_id: self.next_position_id,
            next_order_id: self.next_order_id,
            next_trade_id: self.next_trade_id,
            next_waitlist_id: self.next_waitlist_id,
        }
    }

    pub fn restore(&mut self, state: LedgerState) {
        self.accounts = state.accounts;
        self.positions = state.positions;
        self.limit_orders = state.limit_orders;
        self.trade_history = state.trade_history;
        self.waitlist = state.waitlist;
        self.next_account_id = state.next_account_id.max(1);
        self.next_position_id = state.next_position_id.max(1);
        self.next_order_id = state.next_order_id.max(1);
        self.next_trade_id = state.next_trade_id.max(1);
        self.next_waitlist_id = state.next_waitlist_id.max(1);
    }

    pub(super) fn persist(&self) {
        if let Some(store) = &self.store {
            save_best_effort(store.as_ref(), &self.snapshot());
        }
    }

    pub(super) fn emit_event(&mut self, payload: EventPayload) {
        let event = Event::new(EventId(self.next_event_id), self.current_time, payload);
        self.next_event_id += 1;

        if self.config.verbose {
            println!("[Event {}] {:?}", event.id.0, event.payload);
        }

        self.events.push(event);

        if self.events.len() > self.config.max_events {
            let drain_count = self.events.len() - self.config.max_events;
            self.events.drain(0..drain_count);
        }
    }
}
