// 5.0: leaderboard derivation. read-only view over accounts, no mutation.
// rank = 1 + number of accounts with strictly greater total pnl, so ties
// share a rank and the next distinct value skips ahead.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::types::{AccountId, Quote};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl Badge {
    pub fn for_pnl(pnl: Quote) -> Option<Badge> {
        let v = pnl.value();
        if v >= dec!(100000) {
            Some(Badge::Diamond)
        } else if v >= dec!(50000) {
            Some(Badge::Platinum)
        } else if v >= dec!(20000) {
            Some(Badge::Gold)
        } else if v >= dec!(5000) {
            Some(Badge::Silver)
        } else if v >= dec!(1000) {
            Some(Badge::Bronze)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub account_id: AccountId,
    pub username: String,
    pub total_pnl: Quote,
    pub trades_count: u32,
    pub win_rate: Decimal,
    pub rank: usize,
    pub badge: Option<Badge>,
}

pub fn build_leaderboard<'a, I>(accounts: I, limit: usize) -> Vec<LeaderboardEntry>
where
    I: IntoIterator<Item = &'a Account>,
{
    let accounts: Vec<&Account> = accounts.into_iter().collect();

    let mut entries: Vec<LeaderboardEntry> = accounts
        .iter()
        .map(|account| {
            let strictly_better = accounts
                .iter()
                .filter(|other| other.total_pnl.value() > account.total_pnl.value())
                .count();
            LeaderboardEntry {
                account_id: account.id,
                username: account.username.clone(),
                total_pnl: account.total_pnl,
                trades_count: account.trades_count,
                win_rate: account.win_rate,
                rank: strictly_better + 1,
                badge: Badge::for_pnl(account.total_pnl),
            }
        })
        .collect();

    entries.sort_by(|a, b| b.total_pnl.cmp(&a.total_pnl));
    entries.truncate(limit);
    entries
}
