// Ledger 测试模块
// Ledger Test Module

use crate::config::DatabaseConfig;
use crate::db::LedgerStorage;
use crate::ledger::{Account, LedgerManager, MakeOrder, Ticker, UserId};
use std::sync::Arc;
use uuid::Uuid;

/// 创建临时测试数据库
/// Create temporary test database
pub fn create_test_storage() -> (Arc<LedgerStorage>, String) {
    let temp_dir = std::env::temp_dir().join(format!("ledger_test_{}", Uuid::new_v4()));
    let path = temp_dir.to_string_lossy().to_string();
    let config = DatabaseConfig {
        rocksdb_path: path.clone(),
        lock_timeout_ms: 5000,
        use_fsync: false,
        ..DatabaseConfig::default()
    };
    let storage = LedgerStorage::new(&config).expect("Failed to open test DB");
    (Arc::new(storage), path)
}

/// 清理临时测试数据库
/// Clean up temporary test database
pub fn cleanup_test_db(path: &str) {
    let _ = std::fs::remove_dir_all(path);
}

/// 创建测试用 Ledger 管理器
/// Create test ledger manager
pub fn create_test_manager() -> (LedgerManager, String) {
    let (storage, temp_path) = create_test_storage();
    (LedgerManager::new(storage), temp_path)
}

pub fn ticker(code: &str) -> Ticker {
    Ticker::new(code).unwrap()
}

/// 注册 USD / EUR 两种资产和两个用户,返回 (U1, U2)
/// Register USD / EUR and two users, returns (U1, U2)
pub fn seed(manager: &LedgerManager) -> (UserId, UserId) {
    manager.register_asset(&ticker("USD")).unwrap();
    manager.register_asset(&ticker("EUR")).unwrap();
    let u1 = manager.register_user("U1").unwrap().id;
    let u2 = manager.register_user("U2").unwrap().id;
    (u1, u2)
}

/// 当前余额,账户不存在时为 None
/// Current balance, None when the account does not exist
pub fn balance(manager: &LedgerManager, user_id: UserId, code: &str) -> Option<u64> {
    manager
        .account(user_id, &ticker(code))
        .unwrap()
        .map(|a: Account| a.amount)
}

/// 某种资产在所有用户上的总余额(不含托管)
/// Total balance of an asset across the given users (escrow excluded)
pub fn total(manager: &LedgerManager, users: &[UserId], code: &str) -> u64 {
    users
        .iter()
        .map(|u| balance(manager, *u, code).unwrap_or(0))
        .sum()
}

pub fn order_req(user_id: UserId, sell: &str, sell_amount: u64, buy: &str, buy_amount: u64) -> MakeOrder {
    MakeOrder {
        user_id,
        sell_ticker: ticker(sell),
        sell_amount,
        buy_ticker: ticker(buy),
        buy_amount,
    }
}

mod order_test;
