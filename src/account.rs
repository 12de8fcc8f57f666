//! Account records and balance ownership.
//!
//! Every money-moving operation lands here: the starting grant, deposits,
//! withdrawals, margin reservation and settlement. Aggregate statistics
//! (total PnL, trade count, win rate) are only updated by the settlement
//! path, never by callers directly.

use rand::Rng;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{AccountId, Quote, Timestamp};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub secret_hash: String,
    // 10-digit display identifier, distinct from the internal id
    pub account_number: String,
    pub balance: Quote,
    pub initial_balance: Quote,
    pub total_deposited: Quote,
    pub total_withdrawn: Quote,
    pub created_at: Timestamp,
    pub referral_code: String,
    // Stored verbatim, never validated and never rewarded
    pub referred_by: Option<String>,
    pub total_pnl: Quote,
    pub trades_count: u32,
    // Percentage in [0, 100]
    pub win_rate: Decimal,
}

impl Account {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: AccountId,
        username: String,
        secret_hash: String,
        account_number: String,
        referral_code: String,
        referred_by: Option<String>,
        initial_balance: Quote,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            username,
            secret_hash,
            account_number,
            balance: initial_balance,
            initial_balance,
            total_deposited: Quote::zero(),
            total_withdrawn: Quote::zero(),
            created_at: timestamp,
            referral_code,
            referred_by,
            total_pnl: Quote::zero(),
            trades_count: 0,
            win_rate: Decimal::ZERO,
        }
    }

    pub fn deposit(&mut self, amount: Quote) {
        self.balance = self.balance.add(amount);
        self.total_deposited = self.total_deposited.add(amount);
    }

    pub fn withdraw(&mut self, amount: Quote) -> Result<(), AccountError> {
        if amount.value() > self.balance.value() {
            return Err(AccountError::InsufficientBalance {
                requested: amount,
                available: self.balance,
            });
        }
        self.balance = self.balance.sub(amount);
        self.total_withdrawn = self.total_withdrawn.add(amount);
        Ok(())
    }

    pub fn reserve_margin(&mut self, amount: Quote) -> Result<(), AccountError> {
        if amount.value() > self.balance.value() {
            return Err(AccountError::InsufficientMargin {
                required: amount,
                available: self.balance,
            });
        }
        self.balance = self.balance.sub(amount);
        Ok(())
    }

    pub fn return_margin(&mut self, amount: Quote) {
        self.balance = self.balance.add(amount);
    }

    // PnL can be any sign; a loss bigger than the margin drives the balance
    // below zero (no forced-liquidation sweep exists)
    pub fn realize_pnl(&mut self, pnl: Quote) {
        self.balance = self.balance.add(pnl);
        self.total_pnl = self.total_pnl.add(pnl);
    }

    // Win count is recomputed from the stored rate rather than carried,
    // matching the accounting the leaderboard was built on.
    pub fn record_trade_outcome(&mut self, pnl: Quote) {
        let prior_wins = (self.win_rate * Decimal::from(self.trades_count) / dec!(100))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let wins = prior_wins + if pnl.is_positive() { Decimal::ONE } else { Decimal::ZERO };
        self.trades_count += 1;
        self.win_rate = wins / Decimal::from(self.trades_count) * dec!(100);
    }

    // initial grant + deposits - withdrawals + realized pnl. the difference
    // between this and the live balance is exactly the reserved margin.
    pub fn equity_basis(&self) -> Quote {
        self.initial_balance
            .add(self.total_deposited)
            .sub(self.total_withdrawn)
            .add(self.total_pnl)
    }
}

// The original product's credential check: a 32-bit rolling hash rendered as
// hex. Trivially reversible, NOT a security mechanism; kept only for
// behavioral parity with the demo it models.
pub fn hash_secret(secret: &str) -> String {
    let mut hash: i32 = 0;
    for unit in secret.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit));
    }
    if hash < 0 {
        format!("-{:x}", -(i64::from(hash)))
    } else {
        format!("{:x}", hash)
    }
}

pub fn verify_secret(secret: &str, expected_hash: &str) -> bool {
    hash_secret(secret) == expected_hash
}

// 10 random digits, leading zeros allowed
pub fn generate_account_number<R: Rng>(rng: &mut R) -> String {
    (0..10)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

// prefix + 6 random base-36 characters, upper-cased
pub fn generate_referral_code<R: Rng>(prefix: &str, rng: &mut R) -> String {
    const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let suffix: String = (0..6)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect();
    format!("{prefix}{suffix}")
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AccountError {
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: Quote, available: Quote },

    #[error("Insufficient margin: required {required}, available {available}")]
    InsufficientMargin { required: Quote, available: Quote },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal_macros::dec;

    fn test_account() -> Account {
        Account::new(
            AccountId(1),
            "alice".to_string(),
            hash_secret("secret1"),
            "0123456789".to_string(),
            "ARKAB12CD".to_string(),
            None,
            Quote::new(dec!(10000)),
            Timestamp::from_millis(0),
        )
    }

    #[test]
    fn new_account_gets_initial_balance() {
        let account = test_account();
        assert_eq!(account.balance.value(), dec!(10000));
        assert_eq!(account.total_pnl.value(), dec!(0));
        assert_eq!(account.trades_count, 0);
    }

    #[test]
    fn deposit_and_withdraw() {
        let mut account = test_account();
        account.deposit(Quote::new(dec!(5000)));
        assert_eq!(account.balance.value(), dec!(15000));

        account.withdraw(Quote::new(dec!(3000))).unwrap();
        assert_eq!(account.balance.value(), dec!(12000));
        assert_eq!(account.total_deposited.value(), dec!(5000));
        assert_eq!(account.total_withdrawn.value(), dec!(3000));
    }

    #[test]
    fn withdraw_insufficient_balance() {
        let mut account = test_account();
        let result = account.withdraw(Quote::new(dec!(20000)));
        assert!(matches!(
            result,
            Err(AccountError::InsufficientBalance { .. })
        ));
        assert_eq!(account.balance.value(), dec!(10000));
    }

    #[test]
    fn reserve_and_return_margin() {
        let mut account = test_account();
        account.reserve_margin(Quote::new(dec!(100))).unwrap();
        assert_eq!(account.balance.value(), dec!(9900));

        account.return_margin(Quote::new(dec!(100)));
        assert_eq!(account.balance.value(), dec!(10000));
    }

    #[test]
    fn realize_pnl_moves_balance_and_total() {
        let mut account = test_account();
        account.realize_pnl(Quote::new(dec!(1000)));
        assert_eq!(account.balance.value(), dec!(11000));
        assert_eq!(account.total_pnl.value(), dec!(1000));

        account.realize_pnl(Quote::new(dec!(-500)));
        assert_eq!(account.balance.value(), dec!(10500));
        assert_eq!(account.total_pnl.value(), dec!(500));
    }

    #[test]
    fn win_rate_progression() {
        let mut account = test_account();

        account.record_trade_outcome(Quote::new(dec!(100)));
        assert_eq!(account.trades_count, 1);
        assert_eq!(account.win_rate, dec!(100));

        account.record_trade_outcome(Quote::new(dec!(-50)));
        assert_eq!(account.trades_count, 2);
        assert_eq!(account.win_rate, dec!(50));

        account.record_trade_outcome(Quote::new(dec!(25)));
        assert_eq!(account.trades_count, 3);
        // 2 wins of 3
        assert_eq!(
            account.win_rate.round_dp(4),
            (dec!(2) / dec!(3) * dec!(100)).round_dp(4)
        );
    }

    #[test]
    fn equity_basis_tracks_flows() {
        let mut account = test_account();
        account.deposit(Quote::new(dec!(500)));
        account.withdraw(Quote::new(dec!(200))).unwrap();
        account.realize_pnl(Quote::new(dec!(-300)));
        assert_eq!(account.equity_basis().value(), dec!(10000));
        assert_eq!(account.balance.value(), account.equity_basis().value());
    }

    #[test]
    fn hash_is_deterministic_and_hex() {
        // hand-computed rolling hash of "abc"
        assert_eq!(hash_secret("abc"), "17862");
        assert_eq!(hash_secret(""), "0");
        assert_eq!(hash_secret("secret1"), hash_secret("secret1"));
        assert_ne!(hash_secret("secret1"), hash_secret("secret2"));
        assert!(verify_secret("secret1", &hash_secret("secret1")));
        assert!(!verify_secret("wrong", &hash_secret("secret1")));
    }

    #[test]
    fn generated_identifiers_have_expected_shape() {
        let mut rng = StdRng::seed_from_u64(7);

        let number = generate_account_number(&mut rng);
        assert_eq!(number.len(), 10);
        assert!(number.chars().all(|c| c.is_ascii_digit()));

        let code = generate_referral_code("ARK", &mut rng);
        assert_eq!(code.len(), 9);
        assert!(code.starts_with("ARK"));
        assert!(code[3..]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }
}
