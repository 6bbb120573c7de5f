// 用户与资产注册接口 / User and asset registry endpoints
use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use super::{parse_ticker, run_blocking};
use crate::ledger::{Asset, LedgerManager, User};
use crate::util::{ok_result, ApiResult};

/// 创建注册路由 / Create registry routes
pub fn routes() -> Router<Arc<LedgerManager>> {
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/assets", get(list_assets).post(create_asset))
        .route("/api/assets/:ticker", delete(remove_asset))
}

/// 创建用户请求 / Create user request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    /// 唯一的显示名称 / Unique display name
    #[schema(example = "alice")]
    pub name: String,
}

/// 注册资产请求 / Register asset request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateAssetRequest {
    /// 3 位资产代码 / 3-character ticker
    #[schema(example = "USD")]
    pub ticker: String,
}

/// 用户列表 / User list
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserList {
    pub users: Vec<User>,
}

/// 资产列表 / Asset list
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssetList {
    pub assets: Vec<Asset>,
}

/// 创建用户 / Create a user
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "registry",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "创建成功 / Created", body = crate::docs::ApiResponse<User>),
        (status = 400, description = "名称为空或已被占用 / Empty or duplicate name", body = crate::docs::ErrorApiResponse)
    )
)]
pub async fn create_user(
    State(ledger): State<Arc<LedgerManager>>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult {
    let user = run_blocking(move || ledger.register_user(&req.name)).await?;
    info!("👤 User registered / 用户已注册: id={}, name={}", user.id, user.name);
    Ok(ok_result::<User>(Ok(user)))
}

/// 查询所有用户 / List users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "registry",
    responses(
        (status = 200, description = "查询成功 / Query successful", body = crate::docs::ApiResponse<UserList>)
    )
)]
pub async fn list_users(State(ledger): State<Arc<LedgerManager>>) -> ApiResult {
    let users = run_blocking(move || ledger.list_users()).await?;
    Ok(ok_result::<UserList>(Ok(UserList { users })))
}

/// 注册资产 / Register an asset
#[utoipa::path(
    post,
    path = "/api/assets",
    tag = "registry",
    request_body = CreateAssetRequest,
    responses(
        (status = 200, description = "注册成功 / Registered", body = crate::docs::ApiResponse<Asset>),
        (status = 400, description = "代码非法或已存在 / Invalid or duplicate ticker", body = crate::docs::ErrorApiResponse)
    )
)]
pub async fn create_asset(
    State(ledger): State<Arc<LedgerManager>>,
    Json(req): Json<CreateAssetRequest>,
) -> ApiResult {
    let ticker = parse_ticker("ticker", &req.ticker)?;
    let asset = run_blocking(move || ledger.register_asset(&ticker)).await?;
    info!("🪙 Asset registered / 资产已注册: {}", asset.ticker);
    Ok(ok_result::<Asset>(Ok(asset)))
}

/// 查询所有资产 / List assets
#[utoipa::path(
    get,
    path = "/api/assets",
    tag = "registry",
    responses(
        (status = 200, description = "查询成功 / Query successful", body = crate::docs::ApiResponse<AssetList>)
    )
)]
pub async fn list_assets(State(ledger): State<Arc<LedgerManager>>) -> ApiResult {
    let assets = run_blocking(move || ledger.list_assets()).await?;
    Ok(ok_result::<AssetList>(Ok(AssetList { assets })))
}

/// 删除未被引用的资产 / Remove an unreferenced asset
#[utoipa::path(
    delete,
    path = "/api/assets/{ticker}",
    tag = "registry",
    params(("ticker" = String, Path, description = "资产代码 / Asset ticker")),
    responses(
        (status = 200, description = "删除成功 / Removed", body = crate::docs::ApiResponse<Asset>),
        (status = 400, description = "资产不存在或仍被账户引用 / Unknown or still referenced", body = crate::docs::ErrorApiResponse)
    )
)]
pub async fn remove_asset(
    State(ledger): State<Arc<LedgerManager>>,
    Path(ticker): Path<String>,
) -> ApiResult {
    let ticker = parse_ticker("ticker", &ticker)?;
    let asset = run_blocking(move || ledger.remove_asset(&ticker)).await?;
    info!("🗑️ Asset removed / 资产已删除: {}", asset.ticker);
    Ok(ok_result::<Asset>(Ok(asset)))
}
