// 6.0 config.rs: all ledger settings in one place.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Quote;

// Complete configuration for a paper trading ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    // Balance granted to every new account
    pub initial_balance: Quote,
    // Maintenance margin rate used in the liquidation price formula
    pub maintenance_margin_rate: Decimal,
    // Most-recent trades retained per history
    pub trade_history_cap: usize,
    // Leaderboard is truncated to this many entries
    pub leaderboard_size: usize,
    // Prefix prepended to generated referral codes
    pub referral_code_prefix: String,
    // Audit event buffer cap
    pub max_events: usize,
    // Print events as they are emitted
    pub verbose: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            initial_balance: Quote::new(dec!(10000)),
            maintenance_margin_rate: dec!(0.005), // 0.5%
            trade_history_cap: 100,
            leaderboard_size: 50,
            referral_code_prefix: "ARK".to_string(),
            max_events: 10_000,
            verbose: false,
        }
    }
}

impl LedgerConfig {
    // Small-cap preset for tests and demos
    pub fn demo() -> Self {
        Self {
            trade_history_cap: 10,
            leaderboard_size: 5,
            max_events: 100,
            verbose: true,
            ..Self::default()
        }
    }

    // Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_balance.is_negative() {
            return Err(ConfigError::InvalidBalance {
                reason: "Initial balance must not be negative".to_string(),
            });
        }

        // rate is multiplied into the liquidation formula, so it must stay
        // well below the 1x margin fraction
        if self.maintenance_margin_rate <= Decimal::ZERO
            || self.maintenance_margin_rate >= Decimal::ONE
        {
            return Err(ConfigError::InvalidMargin {
                reason: "Maintenance margin rate must be between 0 and 1".to_string(),
            });
        }

        if self.trade_history_cap == 0 {
            return Err(ConfigError::InvalidHistory {
                reason: "Trade history cap must be at least 1".to_string(),
            });
        }

        if self.leaderboard_size == 0 {
            return Err(ConfigError::InvalidLeaderboard {
                reason: "Leaderboard size must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid initial balance: {reason}")]
    InvalidBalance { reason: String },

    #[error("Invalid maintenance margin rate: {reason}")]
    InvalidMargin { reason: String },

    #[error("Invalid trade history cap: {reason}")]
    InvalidHistory { reason: String },

    #[error("Invalid leaderboard size: {reason}")]
    InvalidLeaderboard { reason: String },
}
