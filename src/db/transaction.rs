// 事务上下文 - 一次原子操作内的所有读写
// Transaction context - every read and write of one atomic operation
//
// 所有会被修改的行都通过 get_for_update 以排他锁读取,
// 并发事务在锁上排队,提交后才能看到新值。
// Every row that may be mutated is read through get_for_update with an exclusive
// lock; concurrent transactions queue on the lock and only observe committed values.

use rocksdb::{Transaction, TransactionDB};
use serde::{de::DeserializeOwned, Serialize};

use crate::db::errors::{ConstraintViolation, StorageError, StorageResult};
use crate::db::keys;
use crate::ledger::types::{
    now_ts, Account, AccountId, Amount, Asset, Order, OrderId, Ticker, User, UserId,
};

/// 单个事务的读写上下文 / Read/write context of a single transaction
///
/// 由 [`crate::db::LedgerStorage::with_transaction`] 创建并以引用形式传入每一步操作。
/// Created by [`crate::db::LedgerStorage::with_transaction`] and passed by reference
/// into every step.
pub struct LedgerTx<'db> {
    txn: Transaction<'db, TransactionDB>,
}

impl<'db> LedgerTx<'db> {
    pub(crate) fn new(txn: Transaction<'db, TransactionDB>) -> Self {
        Self { txn }
    }

    pub(crate) fn commit(self) -> StorageResult<()> {
        self.txn.commit()?;
        Ok(())
    }

    pub(crate) fn rollback(&self) -> StorageResult<()> {
        self.txn.rollback()?;
        Ok(())
    }

    // ==================== 底层读写 / Raw Reads and Writes ====================

    fn load<T: DeserializeOwned>(&self, key: &str, exclusive: bool) -> StorageResult<Option<T>> {
        match self.txn.get_for_update(key.as_bytes(), exclusive)? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    fn store<T: Serialize>(&self, key: &str, value: &T) -> StorageResult<()> {
        self.txn.put(key.as_bytes(), serde_json::to_vec(value)?)?;
        Ok(())
    }

    /// 分配下一个 ID (从 1 开始) / Allocate the next id (starting at 1)
    fn next_id(&self, seq_key: &str) -> StorageResult<u64> {
        let current: u64 = self.load(seq_key, true)?.unwrap_or(0);
        let next = current
            .checked_add(1)
            .ok_or_else(|| StorageError::Corrupted(format!("sequence exhausted: {}", seq_key)))?;
        self.store(seq_key, &next)?;
        Ok(next)
    }

    // ==================== 用户 / Users ====================

    /// 读取用户(共享锁) / Load a user (shared lock)
    pub fn user(&self, id: UserId) -> StorageResult<Option<User>> {
        self.load(&keys::user_key(id), false)
    }

    pub fn create_user(&self, name: &str) -> StorageResult<User> {
        if name.trim().is_empty() {
            return Err(ConstraintViolation::EmptyUserName.into());
        }

        let name_key = keys::user_name_key(name);
        if self.load::<UserId>(&name_key, true)?.is_some() {
            return Err(ConstraintViolation::DuplicateUserName(name.to_string()).into());
        }

        let user = User {
            id: self.next_id(keys::SEQ_USER)?,
            name: name.to_string(),
            created_at: now_ts(),
        };
        self.store(&keys::user_key(user.id), &user)?;
        self.store(&name_key, &user.id)?;
        Ok(user)
    }

    // ==================== 资产 / Assets ====================

    pub fn create_asset(&self, ticker: &Ticker) -> StorageResult<Asset> {
        let key = keys::asset_key(ticker);
        if self.load::<Asset>(&key, true)?.is_some() {
            return Err(ConstraintViolation::DuplicateAsset(ticker.clone()).into());
        }

        let asset = Asset {
            ticker: ticker.clone(),
            created_at: now_ts(),
        };
        self.store(&key, &asset)?;
        Ok(asset)
    }

    /// 删除资产,仍有账户引用时失败
    /// Delete an asset; fails while any account still references it
    pub fn delete_asset(&self, ticker: &Ticker) -> StorageResult<Asset> {
        let key = keys::asset_key(ticker);
        let asset: Asset = self
            .load(&key, true)?
            .ok_or_else(|| ConstraintViolation::UnknownAsset(ticker.clone()))?;

        let refs: u64 = self.load(&keys::asset_refs_key(ticker), true)?.unwrap_or(0);
        if refs > 0 {
            return Err(ConstraintViolation::AssetInUse(ticker.clone()).into());
        }

        self.txn.delete(key.as_bytes())?;
        Ok(asset)
    }

    // ==================== 账户 / Accounts ====================

    /// 按 (user, ticker) 查询账户,不存在时不创建
    /// Look up the account for (user, ticker); never creates one
    pub fn get_account(&self, user_id: UserId, ticker: &Ticker) -> StorageResult<Option<Account>> {
        let index_key = keys::account_index_key(user_id, ticker);
        match self.load::<AccountId>(&index_key, true)? {
            Some(id) => self.account(id)?.map(Some).ok_or_else(|| {
                StorageError::Corrupted(format!("{} points to missing account {}", index_key, id))
            }),
            None => Ok(None),
        }
    }

    /// 按 ID 读取账户(排他锁) / Load an account by id (exclusive lock)
    pub fn account(&self, id: AccountId) -> StorageResult<Option<Account>> {
        self.load(&keys::account_key(id), true)
    }

    /// 查询或创建账户
    /// Get or create the account for (user, ticker)
    ///
    /// 索引键上的排他锁充当唯一约束: 并发的首次创建者会阻塞,
    /// 待赢家提交后读到已存在的账户。
    /// The exclusive lock on the index key acts as the unique constraint: a
    /// concurrent first-toucher blocks, then reads the winner's committed account.
    pub fn get_or_create_account(&self, user_id: UserId, ticker: &Ticker) -> StorageResult<Account> {
        if let Some(account) = self.get_account(user_id, ticker)? {
            return Ok(account);
        }

        if self.user(user_id)?.is_none() {
            return Err(ConstraintViolation::UnknownUser(user_id).into());
        }
        // 共享锁阻止并发删除资产 / Shared lock keeps the asset from being removed concurrently
        if self
            .load::<Asset>(&keys::asset_key(ticker), false)?
            .is_none()
        {
            return Err(ConstraintViolation::UnknownAsset(ticker.clone()).into());
        }

        let refs_key = keys::asset_refs_key(ticker);
        let refs: u64 = self.load(&refs_key, true)?.unwrap_or(0);
        self.store(&refs_key, &(refs + 1))?;

        let now = now_ts();
        let account = Account {
            id: self.next_id(keys::SEQ_ACCOUNT)?,
            user_id,
            ticker: ticker.clone(),
            amount: 0,
            created_at: now,
            updated_at: now,
        };
        self.store(&keys::account_key(account.id), &account)?;
        self.store(&keys::account_index_key(user_id, ticker), &account.id)?;
        Ok(account)
    }

    /// 保存账户余额 / Persist the account balance
    pub fn save_account(&self, account: &mut Account) -> StorageResult<()> {
        account.updated_at = now_ts();
        self.store(&keys::account_key(account.id), account)
    }

    // ==================== 订单 / Orders ====================

    pub fn create_order(
        &self,
        buyer: &Account,
        buy_amount: Amount,
        seller: &Account,
        sell_amount: Amount,
    ) -> StorageResult<Order> {
        let order = Order {
            id: self.next_id(keys::SEQ_ORDER)?,
            buyer: buyer.reference(),
            buy_amount,
            seller: seller.reference(),
            sell_amount,
            created_at: now_ts(),
        };
        self.store(&keys::order_key(order.id), &order)?;
        Ok(order)
    }

    /// 读取订单(排他锁,防止被并发成交或撤销)
    /// Load an order (exclusive lock, so it cannot be taken or canceled concurrently)
    pub fn order(&self, id: OrderId) -> StorageResult<Option<Order>> {
        self.load(&keys::order_key(id), true)
    }

    pub fn delete_order(&self, id: OrderId) -> StorageResult<()> {
        self.txn.delete(keys::order_key(id).as_bytes())?;
        Ok(())
    }
}
