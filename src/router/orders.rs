// 订单接口 / Order endpoints
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use super::{parse_ticker, require_amount, run_blocking};
use crate::ledger::{Account, LedgerManager, MakeOrder, Order, OrderId, Settlement, UserId};
use crate::util::{ok_result, ApiError, ApiResult};

/// 创建订单路由 / Create order routes
pub fn routes() -> Router<Arc<LedgerManager>> {
    Router::new()
        .route("/api/orders", get(list_orders).post(make_order))
        .route("/api/orders/:id", get(get_order))
        .route("/api/orders/:id/take", post(take_order))
        .route("/api/orders/:id/cancel", post(cancel_order))
}

/// 挂单请求 / Make order request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MakeOrderRequest {
    /// 挂单用户 ID / Maker user ID
    #[schema(example = 1)]
    pub user: UserId,

    /// 卖出资产 / Asset to sell
    #[schema(example = "USD")]
    pub sell_ticker: String,

    /// 卖出数量(立即托管) / Amount to sell (escrowed immediately)
    #[schema(example = 100)]
    pub sell_amount: u64,

    /// 买入资产 / Asset to buy
    #[schema(example = "EUR")]
    pub buy_ticker: String,

    /// 买入数量 / Amount to buy
    #[schema(example = 80)]
    pub buy_amount: u64,
}

impl MakeOrderRequest {
    fn validate(&self) -> Result<MakeOrder, ApiError> {
        let sell_ticker = parse_ticker("sell_ticker", &self.sell_ticker)?;
        let buy_ticker = parse_ticker("buy_ticker", &self.buy_ticker)?;
        if sell_ticker == buy_ticker {
            return Err(ApiError::RequestParamError(
                "sell_ticker and buy_ticker must differ".to_string(),
            ));
        }
        Ok(MakeOrder {
            user_id: self.user,
            sell_ticker,
            sell_amount: require_amount("sell_amount", self.sell_amount)?,
            buy_ticker,
            buy_amount: require_amount("buy_amount", self.buy_amount)?,
        })
    }
}

/// 吃单请求 / Take order request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TakeOrderRequest {
    /// 吃单用户 ID / Taker user ID
    #[schema(example = 2)]
    pub user: UserId,
}

/// 订单列表 / Order list
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderList {
    pub orders: Vec<Order>,
}

/// 挂单 / Make an order
///
/// 卖出数量在创建时即从卖方账户托管扣除
/// The sell amount is escrowed from the seller's account at creation
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "orders",
    request_body = MakeOrderRequest,
    responses(
        (status = 200, description = "挂单成功 / Order created", body = crate::docs::ApiResponse<Order>),
        (status = 400, description = "参数错误 / Bad request", body = crate::docs::ErrorApiResponse),
        (status = 402, description = "余额不足 / Insufficient funds", body = crate::docs::ErrorApiResponse)
    )
)]
pub async fn make_order(
    State(ledger): State<Arc<LedgerManager>>,
    Json(req): Json<MakeOrderRequest>,
) -> ApiResult {
    let order_req = req.validate()?;
    let order = run_blocking(move || ledger.make_order(&order_req)).await?;
    info!(
        "📝 Order created / 挂单: id={}, maker={}, sell {} {}, buy {} {}",
        order.id,
        order.maker(),
        order.sell_amount,
        order.sell_ticker(),
        order.buy_amount,
        order.buy_ticker()
    );
    Ok(ok_result::<Order>(Ok(order)))
}

/// 查询所有挂单 / List open orders
#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "orders",
    responses(
        (status = 200, description = "查询成功 / Query successful", body = crate::docs::ApiResponse<OrderList>)
    )
)]
pub async fn list_orders(State(ledger): State<Arc<LedgerManager>>) -> ApiResult {
    let orders = run_blocking(move || ledger.list_orders()).await?;
    Ok(ok_result::<OrderList>(Ok(OrderList { orders })))
}

/// 查询单个挂单 / Get an open order
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "orders",
    params(("id" = u64, Path, description = "订单 ID / Order ID")),
    responses(
        (status = 200, description = "查询成功 / Query successful", body = crate::docs::ApiResponse<Order>),
        (status = 404, description = "订单不存在 / Order not found", body = crate::docs::ErrorApiResponse)
    )
)]
pub async fn get_order(
    State(ledger): State<Arc<LedgerManager>>,
    Path(id): Path<OrderId>,
) -> ApiResult {
    let order = run_blocking(move || ledger.order(id)).await?;
    Ok(ok_result::<Order>(Ok(order)))
}

/// 吃单 / Take an order
#[utoipa::path(
    post,
    path = "/api/orders/{id}/take",
    tag = "orders",
    params(("id" = u64, Path, description = "订单 ID / Order ID")),
    request_body = TakeOrderRequest,
    responses(
        (status = 200, description = "成交 / Fulfilled", body = crate::docs::ApiResponse<Settlement>),
        (status = 402, description = "余额不足 / Insufficient funds", body = crate::docs::ErrorApiResponse),
        (status = 404, description = "订单不存在 / Order not found", body = crate::docs::ErrorApiResponse),
        (status = 409, description = "事务冲突,可重试 / Transaction conflict, retry", body = crate::docs::ErrorApiResponse)
    )
)]
pub async fn take_order(
    State(ledger): State<Arc<LedgerManager>>,
    Path(id): Path<OrderId>,
    Json(req): Json<TakeOrderRequest>,
) -> ApiResult {
    let taker = req.user;
    let settlement = run_blocking(move || ledger.take_order(taker, id)).await?;
    info!(
        "🤝 Order fulfilled / 成交: id={}, maker={}, taker={}",
        settlement.order.id,
        settlement.order.maker(),
        taker
    );
    Ok(ok_result::<Settlement>(Ok(settlement)))
}

/// 撤单并退还托管资金 / Cancel an order and refund the escrow
#[utoipa::path(
    post,
    path = "/api/orders/{id}/cancel",
    tag = "orders",
    params(("id" = u64, Path, description = "订单 ID / Order ID")),
    responses(
        (status = 200, description = "已撤单 / Canceled", body = crate::docs::ApiResponse<Account>),
        (status = 404, description = "订单不存在 / Order not found", body = crate::docs::ErrorApiResponse)
    )
)]
pub async fn cancel_order(
    State(ledger): State<Arc<LedgerManager>>,
    Path(id): Path<OrderId>,
) -> ApiResult {
    let seller = run_blocking(move || ledger.cancel_order(id)).await?;
    info!(
        "↩️ Order canceled / 撤单: id={}, refunded user={}, ticker={}, balance={}",
        id, seller.user_id, seller.ticker, seller.amount
    );
    Ok(ok_result::<Account>(Ok(seller)))
}
