// Ledger 数据结构定义
// Ledger Data Structure Definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

/// 用户 ID / User identifier
pub type UserId = u64;

/// 账户 ID / Account identifier
pub type AccountId = u64;

/// 订单 ID / Order identifier
pub type OrderId = u64;

/// 余额数量(最小单位,无符号) / Balance amount (smallest unit, unsigned)
pub type Amount = u64;

/// 当前 Unix 时间戳(秒) / Current Unix timestamp (seconds)
pub(crate) fn now_ts() -> i64 {
    chrono::Utc::now().timestamp()
}

/// 非法 ticker / Invalid ticker
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid ticker {0:?}: expected {len} ASCII uppercase letters or digits", len = Ticker::LEN)]
pub struct InvalidTicker(pub String);

/// 资产代码,固定 3 个字符 (例如 "USD")
/// Asset ticker, fixed 3 characters (e.g. "USD")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "USD")]
pub struct Ticker(String);

impl Ticker {
    /// Ticker 长度 / Ticker length
    pub const LEN: usize = 3;

    pub fn new(code: impl Into<String>) -> Result<Self, InvalidTicker> {
        let code = code.into();
        let valid = code.len() == Self::LEN
            && code
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());
        if valid {
            Ok(Self(code))
        } else {
            Err(InvalidTicker(code))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Ticker {
    type Err = InvalidTicker;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Ticker {
    type Error = InvalidTicker;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

/// 用户 / User
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// 用户 ID / User ID
    pub id: UserId,

    /// 唯一的显示名称 / Unique display name
    #[schema(example = "alice")]
    pub name: String,

    /// 创建时间戳(Unix timestamp,秒) / Created timestamp (Unix timestamp, seconds)
    pub created_at: i64,
}

/// 已注册资产 / Registered asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Asset {
    pub ticker: Ticker,
    pub created_at: i64,
}

/// 账户: 某个用户持有的某种资产余额
/// Account: balance of one asset held by one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Account {
    /// 账户 ID / Account ID
    pub id: AccountId,

    /// 所属用户 / Owner
    pub user_id: UserId,

    /// 资产代码 / Asset ticker
    pub ticker: Ticker,

    /// 余额 / Balance
    pub amount: Amount,

    /// 创建时间戳 / Created timestamp
    pub created_at: i64,

    /// 最后修改时间戳 / Last modified timestamp
    pub updated_at: i64,
}

impl Account {
    /// 账户身份引用(不含余额) / Identity reference (without balance)
    pub fn reference(&self) -> AccountRef {
        AccountRef {
            account_id: self.id,
            user_id: self.user_id,
            ticker: self.ticker.clone(),
        }
    }
}

/// 订单中保存的账户引用,只记录身份,余额始终从账户行重新读取
/// Account reference stored on an order. Identity only; balances are always
/// re-read from the account row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccountRef {
    pub account_id: AccountId,
    pub user_id: UserId,
    pub ticker: Ticker,
}

/// 挂单: 固定数量的双边兑换报价
/// Open order: a fixed-amount bilateral swap offer
///
/// `seller` 的 `sell_amount` 在创建时已被托管扣除;
/// `buyer` 是挂单者接收 `buy_amount` 的账户。
/// The `sell_amount` of `seller` is escrowed at creation time;
/// `buyer` is the maker's account that will receive `buy_amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: OrderId,

    /// 挂单者的买入目标账户 / Maker's buy-target account
    pub buyer: AccountRef,

    /// 挂单者希望收到的数量 / Amount the maker wants to receive
    pub buy_amount: Amount,

    /// 挂单者的卖出来源账户 / Maker's sell-source account
    pub seller: AccountRef,

    /// 已托管的卖出数量 / Escrowed sell amount
    pub sell_amount: Amount,

    pub created_at: i64,
}

impl Order {
    /// 挂单者用户 ID / Maker's user ID
    pub fn maker(&self) -> UserId {
        self.seller.user_id
    }

    /// 挂单者想要的资产 / Asset the maker wants
    pub fn buy_ticker(&self) -> &Ticker {
        &self.buyer.ticker
    }

    /// 挂单者给出的资产 / Asset the maker gives up
    pub fn sell_ticker(&self) -> &Ticker {
        &self.seller.ticker
    }
}

/// 成交结果 / Fulfillment result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Settlement {
    /// 已成交(已删除)的订单 / The fulfilled (deleted) order
    pub order: Order,

    /// 吃单者付款账户(已扣除 buy_amount) / Taker's paying account (debited buy_amount)
    pub taker_paid: Account,

    /// 吃单者收款账户(已入账 sell_amount) / Taker's receiving account (credited sell_amount)
    pub taker_received: Account,

    /// 挂单者收款账户(已入账 buy_amount) / Maker's receiving account (credited buy_amount)
    pub maker_received: Account,
}
