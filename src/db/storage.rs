use anyhow::Result;
use rocksdb::{
    Direction, IteratorMode, Options, TransactionDB, TransactionDBOptions, TransactionOptions,
    WriteOptions,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::db::errors::{StorageError, StorageResult};
use crate::db::keys;
use crate::db::transaction::LedgerTx;
use crate::ledger::types::{Account, Asset, Order, OrderId, Ticker, User, UserId};

/// 账本 RocksDB 存储服务 / Ledger RocksDB storage service
pub struct LedgerStorage {
    db: Arc<TransactionDB>,
    lock_timeout_ms: i64,
}

impl LedgerStorage {
    /// 打开(或创建)账本数据库 / Open (or create) the ledger database
    pub fn new(config: &DatabaseConfig) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        // 1. 内存配置 / Memory config
        opts.set_write_buffer_size(config.write_buffer_size_mb * 1024 * 1024);
        opts.set_max_write_buffer_number(config.max_write_buffer_number);
        opts.set_min_write_buffer_number_to_merge(1);

        // 2. 压缩策略 / Compression strategy
        opts.set_compression_type(rocksdb::DBCompressionType::None);
        opts.set_compression_per_level(&[
            rocksdb::DBCompressionType::None,   // L0: 无压缩 / No compression
            rocksdb::DBCompressionType::Snappy, // L1: 轻压缩 / Light compression
            rocksdb::DBCompressionType::Lz4,    // L2+: 轻压缩 / Light compression
        ]);

        // 3. 并发与文件系统 / Concurrency and filesystem
        opts.set_max_background_jobs(config.max_background_jobs);
        opts.set_use_fsync(config.use_fsync);
        opts.set_paranoid_checks(config.paranoid_checks);

        // 4. 事务锁超时 / Transaction lock timeouts
        let mut txn_db_opts = TransactionDBOptions::default();
        txn_db_opts.set_txn_lock_timeout(config.lock_timeout_ms);
        txn_db_opts.set_default_lock_timeout(config.lock_timeout_ms);

        let db = TransactionDB::open(&opts, &txn_db_opts, &config.rocksdb_path)?;

        info!(
            "🗄️ Ledger RocksDB initialized successfully / 账本 RocksDB 初始化成功, path: {}",
            config.rocksdb_path
        );
        info!(
            "📊 Ledger DB config: write_buffer={}MB, max_buffers={}, fsync={}, paranoid_checks={}, bg_jobs={}, lock_timeout={}ms",
            config.write_buffer_size_mb,
            config.max_write_buffer_number,
            config.use_fsync,
            config.paranoid_checks,
            config.max_background_jobs,
            config.lock_timeout_ms
        );

        Ok(Self {
            db: Arc::new(db),
            lock_timeout_ms: config.lock_timeout_ms,
        })
    }

    /// 在单个原子事务中执行 `f`
    /// Run `f` inside a single atomic transaction
    ///
    /// `f` 返回 Ok 时提交,返回 Err 时回滚并原样返回第一个错误。
    /// 提交失败(例如锁冲突)同样意味着没有任何写入生效。
    /// Commits when `f` returns Ok; on Err rolls back and returns that first
    /// error unchanged. A failed commit likewise leaves no write applied.
    pub fn with_transaction<T, E, F>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&LedgerTx<'_>) -> std::result::Result<T, E>,
        E: From<StorageError>,
    {
        let mut txn_opts = TransactionOptions::default();
        txn_opts.set_lock_timeout(self.lock_timeout_ms);
        txn_opts.set_deadlock_detect(true);

        let tx = LedgerTx::new(self.db.transaction_opt(&WriteOptions::default(), &txn_opts));

        match f(&tx) {
            Ok(value) => {
                if let Err(e) = tx.commit() {
                    warn!("⚠️ Transaction commit failed / 事务提交失败: {}", e);
                    return Err(e.into());
                }
                Ok(value)
            }
            Err(err) => {
                if let Err(e) = tx.rollback() {
                    warn!("⚠️ Transaction rollback failed / 事务回滚失败: {}", e);
                }
                Err(err)
            }
        }
    }

    // ==================== 只读查询 / Read-only Queries ====================

    /// 扫描某个前缀下的所有值 / Scan every value under a key prefix
    fn scan<T: DeserializeOwned>(&self, prefix: &str) -> StorageResult<Vec<T>> {
        let snapshot = self.db.snapshot();
        let mut values = Vec::new();

        for item in snapshot.iterator(IteratorMode::From(prefix.as_bytes(), Direction::Forward)) {
            let (key, value) = item?;
            if !key.starts_with(prefix.as_bytes()) {
                break;
            }
            values.push(serde_json::from_slice(&value)?);
        }

        Ok(values)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        match self.db.get(key.as_bytes())? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    pub fn user(&self, id: UserId) -> StorageResult<Option<User>> {
        self.read(&keys::user_key(id))
    }

    pub fn list_users(&self) -> StorageResult<Vec<User>> {
        self.scan(keys::USER_PREFIX)
    }

    pub fn list_assets(&self) -> StorageResult<Vec<Asset>> {
        self.scan(keys::ASSET_PREFIX)
    }

    pub fn order(&self, id: OrderId) -> StorageResult<Option<Order>> {
        self.read(&keys::order_key(id))
    }

    /// 所有挂单,按 ID 升序 / All open orders, ascending by id
    pub fn list_orders(&self) -> StorageResult<Vec<Order>> {
        self.scan(keys::ORDER_PREFIX)
    }

    /// 某个用户的所有账户 / All accounts of one user
    pub fn list_accounts(&self, user_id: UserId) -> StorageResult<Vec<Account>> {
        let snapshot = self.db.snapshot();
        let prefix = keys::user_accounts_prefix(user_id);
        let mut accounts = Vec::new();

        for item in snapshot.iterator(IteratorMode::From(prefix.as_bytes(), Direction::Forward)) {
            let (key, value) = item?;
            if !key.starts_with(prefix.as_bytes()) {
                break;
            }
            let id: u64 = serde_json::from_slice(&value)?;
            let data = snapshot.get(keys::account_key(id).as_bytes())?.ok_or_else(|| {
                StorageError::Corrupted(format!("index points to missing account {}", id))
            })?;
            accounts.push(serde_json::from_slice(&data)?);
        }

        Ok(accounts)
    }

    /// 按 (user, ticker) 查询账户 / Look up an account by (user, ticker)
    pub fn find_account(&self, user_id: UserId, ticker: &Ticker) -> StorageResult<Option<Account>> {
        let snapshot = self.db.snapshot();
        let id: u64 = match snapshot.get(keys::account_index_key(user_id, ticker).as_bytes())? {
            Some(data) => serde_json::from_slice(&data)?,
            None => return Ok(None),
        };
        let data = snapshot.get(keys::account_key(id).as_bytes())?.ok_or_else(|| {
            StorageError::Corrupted(format!("index points to missing account {}", id))
        })?;
        Ok(Some(serde_json::from_slice(&data)?))
    }
}
