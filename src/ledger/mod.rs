// Ledger 模块 - 基于 RocksDB 事务的多资产账本与点对点兑换
// Ledger Module - multi-asset ledger and peer-to-peer swaps on RocksDB transactions

pub mod errors;
pub mod funding;
pub mod manager;
pub mod operations;
pub mod orders;
pub mod types;

// Re-export main types
// 重导出主要类型
pub use errors::{ErrorKind, LedgerError, Result};
pub use manager::LedgerManager;
pub use orders::MakeOrder;
pub use types::{
    Account, AccountId, AccountRef, Amount, Asset, InvalidTicker, Order, OrderId, Settlement,
    Ticker, User, UserId,
};

#[cfg(test)]
mod tests;
