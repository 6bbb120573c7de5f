// Ledger 管理器 - 每个对外操作对应一个原子事务
// Ledger Manager - one atomic transaction per public operation

use std::sync::Arc;

use crate::db::LedgerStorage;
use crate::ledger::errors::{LedgerError, Result};
use crate::ledger::funding::{deposit_in, withdraw_in};
use crate::ledger::orders::{cancel_order_in, make_order_in, take_order_in, MakeOrder};
use crate::ledger::types::{Account, Amount, Asset, Order, OrderId, Settlement, Ticker, User, UserId};

/// Ledger 管理器
/// Ledger manager
///
/// 只持有存储句柄,不持有任何跨事务的进程内锁;
/// 并发控制完全由 RocksDB 事务锁完成。
/// Holds only the storage handle and no in-process lock across transactions;
/// concurrency control is left entirely to RocksDB transaction locks.
#[derive(Clone)]
pub struct LedgerManager {
    storage: Arc<LedgerStorage>,
}

impl LedgerManager {
    pub fn new(storage: Arc<LedgerStorage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &LedgerStorage {
        &self.storage
    }

    // ==================== 资金操作 / Funding ====================

    /// 充值,首次使用该资产时自动创建账户
    /// Deposit, creating the account on first touch
    pub fn deposit(&self, user_id: UserId, ticker: &Ticker, amount: Amount) -> Result<Account> {
        self.storage
            .with_transaction(|tx| deposit_in(tx, user_id, ticker, amount))
    }

    /// 提现,账户不存在时返回余额不足
    /// Withdraw; a missing account yields insufficient funds
    pub fn withdraw(&self, user_id: UserId, ticker: &Ticker, amount: Amount) -> Result<Account> {
        self.storage
            .with_transaction(|tx| withdraw_in(tx, user_id, ticker, amount))
    }

    /// 查询或创建账户(不修改余额) / Get or create an account without touching its balance
    pub fn open_account(&self, user_id: UserId, ticker: &Ticker) -> Result<Account> {
        self.storage
            .with_transaction(|tx| Ok::<_, LedgerError>(tx.get_or_create_account(user_id, ticker)?))
    }

    // ==================== 订单 / Orders ====================

    pub fn make_order(&self, req: &MakeOrder) -> Result<Order> {
        self.storage.with_transaction(|tx| make_order_in(tx, req))
    }

    pub fn take_order(&self, taker_id: UserId, order_id: OrderId) -> Result<Settlement> {
        self.storage
            .with_transaction(|tx| take_order_in(tx, taker_id, order_id))
    }

    /// 撤单并退还托管资金,返回退款后的卖方账户
    /// Cancel and refund the escrow; returns the refunded seller account
    pub fn cancel_order(&self, order_id: OrderId) -> Result<Account> {
        self.storage
            .with_transaction(|tx| cancel_order_in(tx, order_id))
    }

    // ==================== 注册 / Registry ====================

    pub fn register_user(&self, name: &str) -> Result<User> {
        self.storage
            .with_transaction(|tx| Ok::<_, LedgerError>(tx.create_user(name)?))
    }

    pub fn register_asset(&self, ticker: &Ticker) -> Result<Asset> {
        self.storage
            .with_transaction(|tx| Ok::<_, LedgerError>(tx.create_asset(ticker)?))
    }

    /// 删除未被任何账户引用的资产 / Remove an asset no account references
    pub fn remove_asset(&self, ticker: &Ticker) -> Result<Asset> {
        self.storage
            .with_transaction(|tx| Ok::<_, LedgerError>(tx.delete_asset(ticker)?))
    }

    // ==================== 查询 / Queries ====================

    pub fn user(&self, id: UserId) -> Result<User> {
        self.storage
            .user(id)?
            .ok_or(LedgerError::UserNotFound(id))
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.storage.list_users()?)
    }

    pub fn list_assets(&self) -> Result<Vec<Asset>> {
        Ok(self.storage.list_assets()?)
    }

    pub fn list_accounts(&self, user_id: UserId) -> Result<Vec<Account>> {
        self.user(user_id)?;
        Ok(self.storage.list_accounts(user_id)?)
    }

    pub fn account(&self, user_id: UserId, ticker: &Ticker) -> Result<Option<Account>> {
        Ok(self.storage.find_account(user_id, ticker)?)
    }

    pub fn order(&self, id: OrderId) -> Result<Order> {
        self.storage
            .order(id)?
            .ok_or(LedgerError::OrderNotFound(id))
    }

    pub fn list_orders(&self) -> Result<Vec<Order>> {
        Ok(self.storage.list_orders()?)
    }
}
