//! Leaderboard and export entry points on the ledger.

use super::core::Ledger;
use super::results::LedgerError;
use crate::leaderboard::{build_leaderboard, LeaderboardEntry};
use crate::report::export_trade_history_csv;
use crate::types::AccountId;

impl Ledger {
    // Ranked by lifetime realized pnl, capped at the configured size
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        build_leaderboard(self.accounts.values(), self.config.leaderboard_size)
    }

    // csv of the account's realized trades, most recent first
    pub fn export_trades_csv(&self, account_id: AccountId) -> Result<String, LedgerError> {
        if !self.accounts.contains_key(&account_id) {
            return Err(LedgerError::AccountNotFound(account_id));
        }
        let trades: Vec<_> = self
            .trade_history
            .iter()
            .filter(|t| t.account_id == account_id)
            .cloned()
            .collect();
        export_trade_history_csv(&trades).map_err(|e| LedgerError::ExportFailed(e.to_string()))
    }
}
