// 存储层错误定义 / Storage error definitions
use rocksdb::ErrorKind;
use thiserror::Error;

use crate::ledger::types::{Ticker, UserId};

/// 约束冲突(相当于关系型数据库的唯一/外键约束)
/// Constraint violation (the equivalent of unique / foreign key constraints)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintViolation {
    #[error("Unknown user: {0}")]
    UnknownUser(UserId),

    #[error("Unknown asset: {0}")]
    UnknownAsset(Ticker),

    #[error("User name already taken: {0}")]
    DuplicateUserName(String),

    #[error("Asset already registered: {0}")]
    DuplicateAsset(Ticker),

    #[error("Asset still referenced by accounts: {0}")]
    AssetInUse(Ticker),

    #[error("User name must not be empty")]
    EmptyUserName,
}

#[derive(Error, Debug)]
pub enum StorageError {
    /// RocksDB 错误 / RocksDB error
    #[error("RocksDB error: {0}")]
    RocksDb(rocksdb::Error),

    /// 锁等待超时或死锁,事务已中止 / Lock timeout or deadlock, transaction aborted
    #[error("Transaction conflict: {0}")]
    Conflict(rocksdb::Error),

    /// 序列化/反序列化错误 / Serialization/Deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Constraint violation: {0}")]
    Constraint(#[from] ConstraintViolation),

    /// 索引损坏 / Index corrupted
    #[error("Index corrupted: {0}")]
    Corrupted(String),
}

impl From<rocksdb::Error> for StorageError {
    fn from(e: rocksdb::Error) -> Self {
        match e.kind() {
            ErrorKind::Busy | ErrorKind::TimedOut | ErrorKind::TryAgain => Self::Conflict(e),
            _ => Self::RocksDb(e),
        }
    }
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;
