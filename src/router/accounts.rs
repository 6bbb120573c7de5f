// 充值 / 提现 / 账户查询接口
// Deposit / withdraw / account query endpoints
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use super::{parse_ticker, require_amount, run_blocking};
use crate::ledger::{Account, LedgerManager, UserId};
use crate::util::{ok_result, ApiResult};

/// 创建账户路由 / Create account routes
pub fn routes() -> Router<Arc<LedgerManager>> {
    Router::new()
        .route("/api/deposit", post(deposit))
        .route("/api/withdraw", post(withdraw))
        .route("/api/accounts", get(list_accounts))
}

/// 充值/提现请求 / Deposit or withdraw request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FundingRequest {
    /// 用户 ID / User ID
    #[schema(example = 1)]
    pub user: UserId,

    /// 资产代码 / Asset ticker
    #[schema(example = "USD")]
    pub ticker: String,

    /// 数量(大于 0) / Amount (greater than 0)
    #[schema(example = 100)]
    pub amount: u64,
}

/// 账户查询参数 / Account query parameters
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AccountQueryParams {
    /// 用户 ID / User ID
    #[param(example = 1)]
    pub user: UserId,
}

/// 账户列表 / Account list
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountList {
    pub accounts: Vec<Account>,
}

/// 充值 / Deposit
///
/// 首次充值某种资产时自动创建账户
/// Creates the account on the first deposit of an asset
#[utoipa::path(
    post,
    path = "/api/deposit",
    tag = "ledger",
    request_body = FundingRequest,
    responses(
        (status = 200, description = "充值成功 / Deposited", body = crate::docs::ApiResponse<Account>),
        (status = 400, description = "参数错误或用户/资产不存在 / Bad request, unknown user or asset", body = crate::docs::ErrorApiResponse),
        (status = 500, description = "服务器错误 / Server error", body = crate::docs::ErrorApiResponse)
    )
)]
pub async fn deposit(
    State(ledger): State<Arc<LedgerManager>>,
    Json(req): Json<FundingRequest>,
) -> ApiResult {
    let ticker = parse_ticker("ticker", &req.ticker)?;
    let amount = require_amount("amount", req.amount)?;

    let account = run_blocking(move || ledger.deposit(req.user, &ticker, amount)).await?;
    info!(
        "💰 Deposit / 充值: user={}, ticker={}, amount={}, balance={}",
        account.user_id, account.ticker, amount, account.amount
    );
    Ok(ok_result::<Account>(Ok(account)))
}

/// 提现 / Withdraw
#[utoipa::path(
    post,
    path = "/api/withdraw",
    tag = "ledger",
    request_body = FundingRequest,
    responses(
        (status = 200, description = "提现成功 / Withdrawn", body = crate::docs::ApiResponse<Account>),
        (status = 400, description = "参数错误 / Bad request", body = crate::docs::ErrorApiResponse),
        (status = 402, description = "余额不足 / Insufficient funds", body = crate::docs::ErrorApiResponse)
    )
)]
pub async fn withdraw(
    State(ledger): State<Arc<LedgerManager>>,
    Json(req): Json<FundingRequest>,
) -> ApiResult {
    let ticker = parse_ticker("ticker", &req.ticker)?;
    let amount = require_amount("amount", req.amount)?;

    let account = run_blocking(move || ledger.withdraw(req.user, &ticker, amount)).await?;
    info!(
        "💸 Withdraw / 提现: user={}, ticker={}, amount={}, balance={}",
        account.user_id, account.ticker, amount, account.amount
    );
    Ok(ok_result::<Account>(Ok(account)))
}

/// 查询用户的所有账户 / List a user's accounts
#[utoipa::path(
    get,
    path = "/api/accounts",
    tag = "ledger",
    params(AccountQueryParams),
    responses(
        (status = 200, description = "查询成功 / Query successful", body = crate::docs::ApiResponse<AccountList>),
        (status = 404, description = "用户不存在 / User not found", body = crate::docs::ErrorApiResponse)
    )
)]
pub async fn list_accounts(
    State(ledger): State<Arc<LedgerManager>>,
    Query(params): Query<AccountQueryParams>,
) -> ApiResult {
    let accounts = run_blocking(move || ledger.list_accounts(params.user)).await?;
    Ok(ok_result::<AccountList>(Ok(AccountList { accounts })))
}
