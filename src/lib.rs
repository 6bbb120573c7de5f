// Library 模块导出
// Library Module Exports

pub mod config;
pub mod db;
pub mod docs;
pub mod ledger;
pub mod router;
pub mod util;

// Re-export commonly used types
// 重导出常用类型
pub use db::LedgerStorage;
pub use ledger::{Account, LedgerError, LedgerManager, MakeOrder, Order, Settlement, Ticker};
