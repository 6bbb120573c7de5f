// 键生成辅助函数 / Key generation helpers
//
// 数字 ID 补零到 10 位,使字典序等于数值序
// Numeric ids are zero-padded to 10 digits so lexicographic order equals numeric order

use crate::ledger::types::{AccountId, OrderId, Ticker, UserId};

pub const USER_PREFIX: &str = "user:";
pub const ASSET_PREFIX: &str = "asset:";
pub const ACCOUNT_PREFIX: &str = "account:";
pub const ORDER_PREFIX: &str = "order:";

pub const SEQ_USER: &str = "seq:user";
pub const SEQ_ACCOUNT: &str = "seq:account";
pub const SEQ_ORDER: &str = "seq:order";

pub fn user_key(id: UserId) -> String {
    format!("{}{:010}", USER_PREFIX, id)
}

pub fn user_name_key(name: &str) -> String {
    format!("user_name:{}", name)
}

pub fn asset_key(ticker: &Ticker) -> String {
    format!("{}{}", ASSET_PREFIX, ticker)
}

pub fn account_key(id: AccountId) -> String {
    format!("{}{:010}", ACCOUNT_PREFIX, id)
}

/// (user, ticker) 唯一索引 / (user, ticker) unique index
pub fn account_index_key(user_id: UserId, ticker: &Ticker) -> String {
    format!("account_index:{:010}:{}", user_id, ticker)
}

pub fn user_accounts_prefix(user_id: UserId) -> String {
    format!("account_index:{:010}:", user_id)
}

pub fn order_key(id: OrderId) -> String {
    format!("{}{:010}", ORDER_PREFIX, id)
}

/// 引用该资产的账户数量 / Number of accounts referencing the asset
pub fn asset_refs_key(ticker: &Ticker) -> String {
    format!("asset_refs:{}", ticker)
}
