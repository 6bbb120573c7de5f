use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::error;

use crate::ledger::{ErrorKind, LedgerError};

/// API 统一响应结果类型
pub type ApiResult = Result<Response, ApiError>;

/// 统一响应格式
#[derive(Debug, Serialize, Deserialize)]
pub struct CommonResult<T: Serialize> {
    /// 响应状态码(与 HTTP 状态码一致)
    pub code: u32,
    /// 响应消息
    pub msg: String,
    /// 响应数据（成功时包含数据，失败时为 None）
    pub data: Option<T>,
}

impl<T: Serialize> CommonResult<T> {
    /// 自定义响应
    pub fn default(code: u32, msg: String, data: Option<T>) -> Self {
        CommonResult { code, msg, data }
    }

    /// 成功响应（带数据）
    pub fn ok(data: T) -> Self {
        Self::default(200, "success".to_string(), Some(data))
    }

    /// 错误响应（无数据）
    pub fn error(code: u32, msg: String) -> Self {
        Self::default(code, msg, None)
    }
}

impl<T: Serialize> IntoResponse for CommonResult<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.code as u16).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// 处理 Result 类型，自动将 Result<T, ApiError> 转换为响应
pub fn ok_result<T: Serialize>(result: Result<T, ApiError>) -> Response {
    match result {
        Ok(data) => CommonResult::ok(data).into_response(),
        Err(err) => err.into_response(),
    }
}

/// API 错误枚举
#[derive(Debug)]
pub enum ApiError {
    /// 请求参数错误
    RequestParamError(String),
    /// 资源不存在
    NotFound(String),
    /// 余额不足
    InsufficientFunds(String),
    /// 约束冲突(未知用户/资产、重复注册、资产仍被引用)
    Constraint(String),
    /// 锁超时或死锁,可重试
    Conflict(String),
    /// 余额溢出
    Overflow(String),
    /// 内部错误
    InternalError(String),
}

impl ApiError {
    /// 判断是否为业务错误（不需要打印堆栈）
    pub fn is_business_error(&self) -> bool {
        !matches!(self, ApiError::InternalError(_))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::RequestParamError(_) | Self::Constraint(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InsufficientFunds(_) => StatusCode::PAYMENT_REQUIRED,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Overflow(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::RequestParamError(e) => write!(f, "参数错误: {}", e),
            ApiError::NotFound(e) => write!(f, "未找到: {}", e),
            ApiError::InsufficientFunds(e) => write!(f, "余额不足: {}", e),
            ApiError::Constraint(e) => write!(f, "约束冲突: {}", e),
            ApiError::Conflict(e) => write!(f, "事务冲突: {}", e),
            ApiError::Overflow(e) => write!(f, "余额溢出: {}", e),
            ApiError::InternalError(e) => write!(f, "内部错误: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}

/// Ledger 错误转换
impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        let msg = e.to_string();
        if e.constraint().is_some() {
            return Self::Constraint(msg);
        }
        if e.is_conflict() {
            return Self::Conflict(msg);
        }
        match e.kind() {
            ErrorKind::NotFound => Self::NotFound(msg),
            ErrorKind::InsufficientFunds => Self::InsufficientFunds(msg),
            ErrorKind::BalanceOverflow => Self::Overflow(msg),
            ErrorKind::StorageFailure => Self::InternalError(msg),
        }
    }
}

/// 阻塞任务失败(panic 或被取消)
impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::InternalError(format!("blocking task failed: {}", e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // 记录系统错误的详细信息
        if !self.is_business_error() {
            error!("系统错误: {:?}", self);
        }

        let status = self.status();
        CommonResult::<()>::error(status.as_u16() as u32, self.to_string()).into_response()
    }
}
