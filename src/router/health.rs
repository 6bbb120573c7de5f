use axum::{routing::get, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::util::{ok_result, ApiResult};

/// 健康检查响应数据 / Health check response data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(
    title = "HealthResponse",
    description = "健康检查响应数据",
    example = json!({
        "status": "ok",
        "version": "0.1.0"
    })
)]
pub struct HealthResponse {
    /// 服务状态 / Service status
    #[schema(example = "ok")]
    pub status: String,

    /// 服务版本 / Service version
    #[schema(example = "0.1.0")]
    pub version: String,
}

/// 健康检查接口 / Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    summary = "健康检查",
    description = "检查服务是否正常运行 / Check that the service is running",
    responses(
        (status = 200, description = "服务正常",
         body = crate::docs::ApiResponse<HealthResponse>)
    )
)]
pub async fn health() -> ApiResult {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    Ok(ok_result(Ok(response)))
}

/// 创建健康检查路由 / Build the health check routes
pub fn routes() -> Router {
    Router::new().route("/health", get(health))
}
