//! # API エラー定義
//!
//! API サーバー固有のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! ## 設計方針
//!
//! - レスポンス形式は RFC 9457 Problem Details
//!   （[`khidmat_shared::ErrorResponse`]）に統一
//! - ドメイン層・インフラ層のエラーは `From` で変換し、ハンドラでは
//!   `?` で伝播するだけにする
//! - 500 系の detail は固定メッセージ（内部情報を漏らさない）

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use khidmat_domain::DomainError;
use khidmat_infra::InfraError;
use khidmat_shared::ErrorResponse;
use thiserror::Error;

/// API サーバーで発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
    /// 入力値の検証エラー（400）
    #[error("検証エラー: {0}")]
    Validation(String),

    /// 不正なリクエスト（400）
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// 認証失敗（401）
    #[error("認証に失敗しました")]
    Unauthorized(String),

    /// 権限不足（403）
    #[error("権限がありません: {0}")]
    Forbidden(String),

    /// リソースが見つからない（404）
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// 一意制約の競合（409）
    #[error("競合が発生しました: {0}")]
    Conflict(String),

    /// インフラ層のエラー（500）
    #[error("インフラエラー: {0}")]
    Infra(#[from] InfraError),

    /// 内部エラー（500）
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::Validation(msg),
            DomainError::NotFound { entity_type, id } => {
                Self::NotFound(format!("{entity_type} が見つかりません: {id}"))
            }
            DomainError::Conflict(msg) => Self::Conflict(msg),
            DomainError::Forbidden(msg) => Self::Forbidden(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = match &self {
            ApiError::Validation(msg) => ErrorResponse::validation_error(msg.clone()),
            ApiError::BadRequest(msg) => ErrorResponse::bad_request(msg.clone()),
            ApiError::Unauthorized(msg) => ErrorResponse::unauthorized(msg.clone()),
            ApiError::Forbidden(msg) => ErrorResponse::forbidden(msg.clone()),
            ApiError::NotFound(msg) => ErrorResponse::not_found(msg.clone()),
            ApiError::Conflict(msg) => ErrorResponse::conflict(msg.clone()),
            ApiError::Infra(e) => {
                tracing::error!("インフラエラー: {}", e);
                ErrorResponse::internal_error()
            }
            ApiError::Internal(msg) => {
                tracing::error!("内部エラー: {}", msg);
                ErrorResponse::internal_error()
            }
        };

        let status = StatusCode::from_u16(error.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(error)).into_response()
    }
}
