// Ledger 错误类型定义
// Ledger Error Types

use thiserror::Error;

use crate::db::{ConstraintViolation, StorageError};
use crate::ledger::types::{AccountId, Amount, OrderId, Ticker, UserId};

/// 错误大类,供外层映射为状态码
/// Error kind, mapped to status codes by the outer layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InsufficientFunds,
    BalanceOverflow,
    StorageFailure,
}

/// Ledger 错误类型
/// Ledger error types
#[derive(Error, Debug)]
pub enum LedgerError {
    /// 订单不存在(已成交、已撤销或从未存在)
    /// Order not found (already fulfilled, canceled, or never existed)
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// 订单引用的账户不存在 / Account referenced by an order does not exist
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// 余额不足 / Insufficient funds
    #[error("Insufficient funds: user={user_id}, ticker={ticker}, available={available}, requested={requested}")]
    InsufficientFunds {
        user_id: UserId,
        ticker: Ticker,
        available: Amount,
        requested: Amount,
    },

    /// 入账后余额超出 u64 / Credit would overflow u64
    #[error("Balance overflow: account={account_id}, balance={balance}, credit={credit}")]
    BalanceOverflow {
        account_id: AccountId,
        balance: Amount,
        credit: Amount,
    },

    /// 存储层错误 / Storage error
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::OrderNotFound(_) | Self::AccountNotFound(_) | Self::UserNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Self::BalanceOverflow { .. } => ErrorKind::BalanceOverflow,
            Self::Storage(_) => ErrorKind::StorageFailure,
        }
    }

    /// 约束冲突(未知用户/资产、重复注册等) / Constraint violation, if any
    pub fn constraint(&self) -> Option<&ConstraintViolation> {
        match self {
            Self::Storage(StorageError::Constraint(c)) => Some(c),
            _ => None,
        }
    }

    /// 锁超时或死锁 / Lock timeout or deadlock
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Storage(StorageError::Conflict(_)))
    }
}

impl From<ConstraintViolation> for LedgerError {
    fn from(c: ConstraintViolation) -> Self {
        Self::Storage(StorageError::Constraint(c))
    }
}

/// Result 类型别名 / Result type alias
pub type Result<T> = std::result::Result<T, LedgerError>;
