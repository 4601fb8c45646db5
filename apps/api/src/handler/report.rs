//! # レポートハンドラ
//!
//! 集計レポートのエンドポイントを提供する。
//!
//! ## エンドポイント
//!
//! - `GET /api/reports/admin-payments` - 管理者別の当月集金サマリ
//! - `GET /api/reports/paid-members` - 当月納付済みメンバー
//! - `GET /api/reports/unpaid-members` - 当月未納メンバー
//! - `GET /api/reports/monthly-collection` - 月別集金合計（直近12か月）
//! - `GET /api/reports/monthly-donations` - 月別寄付合計（直近12か月）
//! - `GET /api/reports/monthly-collection-details?month=YYYY-MM` - 集金明細
//! - `GET /api/reports/monthly-donation-details?month=YYYY-MM` - 寄付明細
//! - `GET /api/reports/pool-balance` - プール残高
//!
//! 全て認証必須。納付済み・未納レポートはアカウント管理者の場合
//! 自分の担当分のみに絞り込まれる。

use std::sync::Arc;

use axum::{
    Extension,
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::Utc;
use khidmat_shared::ApiResponse;
use serde::Deserialize;

use crate::{error::ApiError, middleware::AuthenticatedAdmin, usecase::ReportUseCase};

/// レポートハンドラの共有状態
pub struct ReportState {
    pub usecase: Arc<dyn ReportUseCase>,
}

/// 月指定クエリパラメータ（`?month=YYYY-MM`）
#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

// --- ハンドラ ---

/// GET /api/reports/admin-payments
///
/// アカウント管理者ごとの当月の集金状況（納付済み・未納の人数と
/// 合計金額）を返す。
pub async fn admin_payments(
    State(state): State<Arc<ReportState>>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state.usecase.admin_payments(Utc::now()).await?;
    Ok(Json(ApiResponse::new(summary)))
}

/// GET /api/reports/paid-members
///
/// 当月に納付したメンバーの一覧を返す。
pub async fn paid_members(
    State(state): State<Arc<ReportState>>,
    Extension(admin): Extension<AuthenticatedAdmin>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .usecase
        .paid_members(admin.admin_id, admin.role, Utc::now())
        .await?;
    Ok(Json(ApiResponse::new(rows)))
}

/// GET /api/reports/unpaid-members
///
/// 当月に納付のないアクティブメンバーの一覧を返す。
pub async fn unpaid_members(
    State(state): State<Arc<ReportState>>,
    Extension(admin): Extension<AuthenticatedAdmin>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .usecase
        .unpaid_members(admin.admin_id, admin.role, Utc::now())
        .await?;
    Ok(Json(ApiResponse::new(rows)))
}

/// GET /api/reports/monthly-collection
///
/// 直近12か月の月別集金合計を返す。
pub async fn monthly_collection(
    State(state): State<Arc<ReportState>>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state.usecase.monthly_collection().await?;
    Ok(Json(ApiResponse::new(rows)))
}

/// GET /api/reports/monthly-donations
///
/// 直近12か月の月別寄付合計を返す。
pub async fn monthly_donations(
    State(state): State<Arc<ReportState>>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state.usecase.monthly_donations().await?;
    Ok(Json(ApiResponse::new(rows)))
}

/// GET /api/reports/monthly-collection-details
///
/// 指定月（未指定時は当月）の集金明細と合計を返す。
/// 月の形式が不正な場合は 400 を返す。
pub async fn collection_details(
    State(state): State<Arc<ReportState>>,
    Query(query): Query<MonthQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let details = state
        .usecase
        .collection_details(query.month, Utc::now())
        .await?;
    Ok(Json(ApiResponse::new(details)))
}

/// GET /api/reports/monthly-donation-details
///
/// 指定月（未指定時は当月）の寄付明細と合計を返す。
pub async fn donation_details(
    State(state): State<Arc<ReportState>>,
    Query(query): Query<MonthQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let details = state
        .usecase
        .donation_details(query.month, Utc::now())
        .await?;
    Ok(Json(ApiResponse::new(details)))
}

/// GET /api/reports/pool-balance
///
/// 基金のプール残高（集金総額 − 寄付総額）を返す。
pub async fn pool_balance(
    State(state): State<Arc<ReportState>>,
) -> Result<impl IntoResponse, ApiError> {
    let balance = state.usecase.pool_balance().await?;
    Ok(Json(ApiResponse::new(balance)))
}
