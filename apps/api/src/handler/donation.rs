//! # 寄付ハンドラ
//!
//! 基金から受給者への寄付（支出）の記録・一覧を提供する。
//!
//! ## エンドポイント
//!
//! - `POST /api/donations` - 寄付の記録
//! - `GET /api/donations` - 寄付一覧（記録者名付き）

use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use khidmat_domain::donation::{Donation, DonationId};
use khidmat_shared::ApiResponse;
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    middleware::AuthenticatedAdmin,
    usecase::{DonationInput, DonationUseCase},
};

/// 寄付ハンドラの共有状態
pub struct DonationState {
    pub usecase: Arc<dyn DonationUseCase>,
}

// --- リクエスト/レスポンス型 ---

/// 寄付記録リクエスト
#[derive(Debug, Deserialize)]
pub struct RecordDonationRequest {
    pub beneficiary_name: String,
    pub contact_no:       String,
    pub amount:           f64,
}

/// 寄付レスポンス
#[derive(Debug, Serialize)]
pub struct DonationResponse {
    pub id:               DonationId,
    pub beneficiary_name: String,
    pub contact_no:       String,
    pub amount:           f64,
    pub admin_id:         i32,
    pub donation_date:    DateTime<Utc>,
    pub created_at:       DateTime<Utc>,
}

impl From<Donation> for DonationResponse {
    fn from(donation: Donation) -> Self {
        Self {
            id:               donation.id(),
            beneficiary_name: donation.beneficiary_name().as_str().to_string(),
            contact_no:       donation.contact_no().as_str().to_string(),
            amount:           donation.amount().value(),
            admin_id:         donation.admin_id().value(),
            donation_date:    donation.donation_date(),
            created_at:       donation.created_at(),
        }
    }
}

// --- ハンドラ ---

/// POST /api/donations
///
/// 寄付を記録する。記録者は認証済み管理者になる。
pub async fn record_donation(
    State(state): State<Arc<DonationState>>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Json(req): Json<RecordDonationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let donation = state
        .usecase
        .record_donation(
            DonationInput {
                beneficiary_name: req.beneficiary_name,
                contact_no:       req.contact_no,
                amount:           req.amount,
            },
            admin.admin_id,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(DonationResponse::from(donation))),
    ))
}

/// GET /api/donations
///
/// 全寄付記録を記録者名付きで返す（寄付日の降順）。
pub async fn list_donations(
    State(state): State<Arc<DonationState>>,
) -> Result<impl IntoResponse, ApiError> {
    let donations = state.usecase.list_donations().await?;
    Ok(Json(ApiResponse::new(donations)))
}
