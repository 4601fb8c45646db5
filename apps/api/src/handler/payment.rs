//! # 集金ハンドラ
//!
//! メンバーからの月次集金の記録・一覧を提供する。
//!
//! ## エンドポイント
//!
//! - `POST /api/payments` - 集金の記録
//! - `GET /api/payments` - 集金一覧（記録者名付き）

use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use khidmat_domain::{
    member::MemberId,
    payment::{Payment, PaymentId},
};
use khidmat_shared::ApiResponse;
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    middleware::AuthenticatedAdmin,
    usecase::{PaymentInput, PaymentUseCase},
};

/// 集金ハンドラの共有状態
pub struct PaymentState {
    pub usecase: Arc<dyn PaymentUseCase>,
}

// --- リクエスト/レスポンス型 ---

/// 集金記録リクエスト
#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    pub member_id:   i32,
    pub member_name: String,
    pub contact_no:  String,
    pub amount:      f64,
}

/// 集金レスポンス
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id:           PaymentId,
    pub member_id:    MemberId,
    pub member_name:  String,
    pub contact_no:   String,
    pub amount:       f64,
    pub admin_id:     i32,
    pub payment_date: DateTime<Utc>,
    pub created_at:   DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id:           payment.id(),
            member_id:    payment.member_id(),
            member_name:  payment.member_name().as_str().to_string(),
            contact_no:   payment.contact_no().as_str().to_string(),
            amount:       payment.amount().value(),
            admin_id:     payment.admin_id().value(),
            payment_date: payment.payment_date(),
            created_at:   payment.created_at(),
        }
    }
}

// --- ハンドラ ---

/// POST /api/payments
///
/// 集金を記録する。記録者は認証済み管理者になる。
/// 指定されたメンバーが存在しない場合は 400 を返す。
pub async fn record_payment(
    State(state): State<Arc<PaymentState>>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Json(req): Json<RecordPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let payment = state
        .usecase
        .record_payment(
            PaymentInput {
                member_id:   req.member_id,
                member_name: req.member_name,
                contact_no:  req.contact_no,
                amount:      req.amount,
            },
            admin.admin_id,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(PaymentResponse::from(payment))),
    ))
}

/// GET /api/payments
///
/// 全集金記録を記録者名付きで返す（集金日の降順）。
pub async fn list_payments(
    State(state): State<Arc<PaymentState>>,
) -> Result<impl IntoResponse, ApiError> {
    let payments = state.usecase.list_payments().await?;
    Ok(Json(ApiResponse::new(payments)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        Router,
        body::Body,
        http::{Method, Request},
        middleware::from_fn,
        routing::{get, post},
    };
    use khidmat_domain::{
        admin::{AdminId, AdminRole},
        member::{MemberName, MobileNo},
        value_objects::Amount,
    };
    use khidmat_infra::repository::PaymentWithAdmin;
    use tower::ServiceExt;

    use super::*;

    // テスト用スタブ
    struct StubPaymentUseCase {
        member_exists: bool,
    }

    #[async_trait]
    impl PaymentUseCase for StubPaymentUseCase {
        async fn record_payment(
            &self,
            input: PaymentInput,
            admin_id: AdminId,
        ) -> Result<Payment, ApiError> {
            if !self.member_exists {
                return Err(ApiError::BadRequest(
                    "指定されたメンバーが存在しません".to_string(),
                ));
            }
            let now = Utc::now();
            Ok(Payment::from_db(
                PaymentId::new(1),
                MemberId::new(input.member_id),
                MemberName::new(&input.member_name)?,
                MobileNo::new(&input.contact_no)?,
                Amount::new(input.amount)?,
                admin_id,
                now,
                now,
            ))
        }

        async fn list_payments(&self) -> Result<Vec<PaymentWithAdmin>, ApiError> {
            Ok(vec![PaymentWithAdmin {
                id:           1,
                member_id:    1,
                member_name:  "山田太郎".to_string(),
                contact_no:   "090-1234-5678".to_string(),
                amount:       1000.0,
                admin_id:     1,
                admin_name:   "tanaka".to_string(),
                payment_date: Utc::now(),
                created_at:   Utc::now(),
            }])
        }
    }

    fn create_test_app(usecase: StubPaymentUseCase) -> Router {
        let state = Arc::new(PaymentState {
            usecase: Arc::new(usecase),
        });

        Router::new()
            .route("/api/payments", post(record_payment))
            .route("/api/payments", get(list_payments))
            .layer(from_fn(|mut req: Request<Body>, next: axum::middleware::Next| async {
                req.extensions_mut().insert(AuthenticatedAdmin {
                    admin_id: AdminId::new(1),
                    role:     AdminRole::AccountAdmin,
                });
                next.run(req).await
            }))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_record_payment_201で記録を返す() {
        // Given
        let sut = create_test_app(StubPaymentUseCase {
            member_exists: true,
        });

        let body = serde_json::json!({
            "member_id": 1,
            "member_name": "山田太郎",
            "contact_no": "090-1234-5678",
            "amount": 1000.0
        });

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/payments")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap();

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["data"]["amount"], 1000.0);
        assert_eq!(json["data"]["admin_id"], 1);
    }

    #[tokio::test]
    async fn test_record_payment_存在しないメンバーは400() {
        // Given
        let sut = create_test_app(StubPaymentUseCase {
            member_exists: false,
        });

        let body = serde_json::json!({
            "member_id": 999,
            "member_name": "山田太郎",
            "contact_no": "090-1234-5678",
            "amount": 1000.0
        });

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/payments")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap();

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_payments_一覧を返す() {
        // Given
        let sut = create_test_app(StubPaymentUseCase {
            member_exists: true,
        });

        let request = Request::builder()
            .uri("/api/payments")
            .body(Body::empty())
            .unwrap();

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["data"][0]["member_name"], "山田太郎");
        assert_eq!(json["data"][0]["admin_name"], "tanaka");
    }
}
