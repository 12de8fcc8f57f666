// 9.0.2: error taxonomy for ledger commands. all recoverable and caller
// facing; a failed command leaves state untouched.

use rust_decimal::Decimal;

use crate::account::AccountError;
use crate::types::{AccountId, OrderId, PositionId};

#[derive(Debug, Clone, thiserror::Error)]
pub enum LedgerError {
    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Account {0:?} not found")]
    AccountNotFound(AccountId),

    #[error("Amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    #[error("Invalid order parameters: {reason}")]
    InvalidOrderParameters { reason: String },

    #[error("Position {0:?} not found")]
    PositionNotFound(PositionId),

    #[error("Order {0:?} not found")]
    OrderNotFound(OrderId),

    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    #[error("Export failed: {0}")]
    ExportFailed(String),
}
