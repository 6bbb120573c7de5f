pub mod accounts;
pub mod health;
pub mod orders;
pub mod registry;

use axum::Router;
use std::sync::Arc;

use crate::ledger::{self, LedgerManager, Ticker};
use crate::util::ApiError;

/// 创建所有路由
pub fn create_router(ledger: Arc<LedgerManager>) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(registry::routes().with_state(ledger.clone()))
        .merge(accounts::routes().with_state(ledger.clone()))
        .merge(orders::routes().with_state(ledger))
}

/// 在 tokio 阻塞线程池上执行账本操作(RocksDB 事务可能等待行锁)
/// Run a ledger operation on tokio's blocking pool (RocksDB transactions may wait on row locks)
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> ledger::Result<T> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await??)
}

/// 解析 ticker 参数 / Parse a ticker parameter
pub(crate) fn parse_ticker(field: &str, value: &str) -> Result<Ticker, ApiError> {
    value
        .parse()
        .map_err(|e| ApiError::RequestParamError(format!("{}: {}", field, e)))
}

/// 数量必须大于 0 / Amounts must be non-zero
pub(crate) fn require_amount(field: &str, value: u64) -> Result<u64, ApiError> {
    if value == 0 {
        return Err(ApiError::RequestParamError(format!(
            "{} must be greater than 0",
            field
        )));
    }
    Ok(value)
}
