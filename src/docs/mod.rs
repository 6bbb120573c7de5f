use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{OpenApi, ToSchema};

/// API 统一响应格式（用于 Swagger 文档）
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(title = "ApiResponse", description = "API 统一响应格式")]
pub struct ApiResponse<T>
where
    T: ToSchema + Serialize,
{
    /// 响应状态码：200=成功，其他=错误
    #[schema(example = 200)]
    pub code: u32,

    /// 响应消息
    #[schema(example = "success")]
    pub msg: String,

    /// 响应数据，成功时包含具体数据，失败时为 null
    pub data: Option<T>,
}

/// 错误响应格式（用于 Swagger 文档）
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(
    title = "ErrorApiResponse",
    description = "错误响应格式",
    example = json!({
        "code": 402,
        "msg": "余额不足: Insufficient funds: user=1, ticker=USD, available=50, requested=100",
        "data": null
    })
)]
pub struct ErrorApiResponse {
    /// 响应状态码：非200表示错误
    pub code: u32,

    /// 错误消息
    pub msg: String,

    /// 错误时数据为空
    pub data: Option<Value>,
}

/// OpenAPI 文档配置
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::router::health::health,
        crate::router::registry::create_user,
        crate::router::registry::list_users,
        crate::router::registry::create_asset,
        crate::router::registry::list_assets,
        crate::router::registry::remove_asset,
        crate::router::accounts::deposit,
        crate::router::accounts::withdraw,
        crate::router::accounts::list_accounts,
        crate::router::orders::make_order,
        crate::router::orders::list_orders,
        crate::router::orders::get_order,
        crate::router::orders::take_order,
        crate::router::orders::cancel_order,
    ),
    components(
        schemas(
            crate::router::health::HealthResponse,
            crate::router::registry::CreateUserRequest,
            crate::router::registry::CreateAssetRequest,
            crate::router::registry::UserList,
            crate::router::registry::AssetList,
            crate::router::accounts::FundingRequest,
            crate::router::accounts::AccountList,
            crate::router::orders::MakeOrderRequest,
            crate::router::orders::TakeOrderRequest,
            crate::router::orders::OrderList,
            crate::ledger::User,
            crate::ledger::Asset,
            crate::ledger::Ticker,
            crate::ledger::Account,
            crate::ledger::AccountRef,
            crate::ledger::Order,
            crate::ledger::Settlement,
            ErrorApiResponse,
        )
    ),
    tags(
        (name = "system", description = "系统相关接口"),
        (name = "registry", description = "用户与资产注册 / User and asset registry"),
        (name = "ledger", description = "充值、提现与账户查询 / Funding and accounts"),
        (name = "orders", description = "挂单、吃单与撤单 / Make, take and cancel orders"),
    ),
    info(
        title = "Swap Ledger Server API",
        version = "0.1.0",
        description = "多资产账本与点对点兑换 API 文档 / Multi-asset ledger and peer-to-peer swap API"
    )
)]
pub struct ApiDoc;
