//! # ヘルスチェックハンドラ
//!
//! API サーバーの稼働状態を確認するためのエンドポイント。
//!
//! ## 用途
//!
//! - **ロードバランサー**: ターゲットグループヘルスチェック
//! - **コンテナオーケストレーター**: liveness/readiness probe
//!
//! ## エンドポイント
//!
//! - `GET /health` - 死活確認（依存先を確認しない）
//! - `GET /health/ready` - レディネス確認（DB 接続を確認する）

use std::collections::HashMap;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use khidmat_shared::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
use sqlx::PgPool;

/// レディネスチェックハンドラの共有状態
#[derive(Clone)]
pub struct ReadinessState {
    pub pool: PgPool,
}

/// GET /health
///
/// サーバーが正常に稼働していることを確認する。依存先の状態は見ない。
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status:  "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /health/ready
///
/// データベースへの接続を確認し、リクエストを受け付けられる状態か
/// どうかを返す。接続できない場合は 503 を返す。
pub async fn readiness_check(State(state): State<ReadinessState>) -> impl IntoResponse {
    let database_status = match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.pool)
        .await
    {
        Ok(_) => CheckStatus::Ok,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed: database unreachable");
            CheckStatus::Error
        }
    };

    let mut checks = HashMap::new();
    checks.insert("database".to_string(), database_status);

    let all_ok = checks.values().all(|s| matches!(s, CheckStatus::Ok));
    let (status_code, status) = if all_ok {
        (StatusCode::OK, ReadinessStatus::Ready)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, ReadinessStatus::NotReady)
    };

    (status_code, Json(ReadinessResponse { status, checks }))
}
