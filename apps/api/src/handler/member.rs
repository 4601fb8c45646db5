//! # メンバーハンドラ
//!
//! メンバー（基金加入者）の登録・一覧・ステータス切り替えを提供する。
//!
//! ## エンドポイント
//!
//! - `POST /api/members` - メンバー登録
//! - `GET /api/members` - メンバー一覧（担当管理者名付き）
//! - `PUT /api/members/{id}/toggle-status` - アクティブ状態の反転
//!
//! いずれも認証必須。登録時の担当管理者はトークンの管理者になる。

use std::sync::Arc;

use axum::{
    Extension,
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use khidmat_domain::member::{Member, MemberId};
use khidmat_shared::ApiResponse;
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    middleware::AuthenticatedAdmin,
    usecase::{MemberInput, MemberUseCase},
};

/// メンバーハンドラの共有状態
pub struct MemberState {
    pub usecase: Arc<dyn MemberUseCase>,
}

// --- リクエスト/レスポンス型 ---

/// メンバー登録リクエスト
#[derive(Debug, Deserialize)]
pub struct CreateMemberRequest {
    pub name:      String,
    pub mobile_no: String,
    pub address:   String,
}

/// メンバーレスポンス
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id:         MemberId,
    pub name:       String,
    pub mobile_no:  String,
    pub address:    String,
    pub admin_id:   i32,
    pub is_active:  bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            id:         member.id(),
            name:       member.name().as_str().to_string(),
            mobile_no:  member.mobile_no().as_str().to_string(),
            address:    member.address().to_string(),
            admin_id:   member.admin_id().value(),
            is_active:  member.is_active(),
            created_at: member.created_at(),
            updated_at: member.updated_at(),
        }
    }
}

// --- ハンドラ ---

/// POST /api/members
///
/// メンバーを登録する。担当管理者は認証済み管理者になる。
pub async fn create_member(
    State(state): State<Arc<MemberState>>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Json(req): Json<CreateMemberRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let member = state
        .usecase
        .create_member(
            MemberInput {
                name:      req.name,
                mobile_no: req.mobile_no,
                address:   req.address,
            },
            admin.admin_id,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(MemberResponse::from(member))),
    ))
}

/// GET /api/members
///
/// 全メンバーを担当管理者名付きで返す（登録日時の降順）。
pub async fn list_members(
    State(state): State<Arc<MemberState>>,
) -> Result<impl IntoResponse, ApiError> {
    let members = state.usecase.list_members().await?;
    Ok(Json(ApiResponse::new(members)))
}

/// PUT /api/members/{id}/toggle-status
///
/// メンバーのアクティブ状態を反転し、反転後の状態を返す。
/// メンバーが存在しない場合は 404 を返す。
pub async fn toggle_member_status(
    State(state): State<Arc<MemberState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state.usecase.toggle_status(MemberId::new(id)).await?;
    Ok(Json(ApiResponse::new(result)))
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
        routing::{get, post, put},
    };
    use chrono::Utc;
    use khidmat_domain::{
        admin::{AdminId, AdminRole},
        member::{MemberName, MobileNo, NewMember},
    };
    use khidmat_infra::repository::MemberWithAdmin;
    use tower::ServiceExt;

    use super::*;
    use crate::usecase::ToggleStatusResult;

    // テスト用スタブ
    struct StubMemberUseCase {
        member_exists: bool,
    }

    #[async_trait]
    impl MemberUseCase for StubMemberUseCase {
        async fn create_member(
            &self,
            input: MemberInput,
            admin_id: AdminId,
        ) -> Result<Member, ApiError> {
            let new_member = NewMember::new(
                MemberName::new(&input.name)?,
                MobileNo::new(&input.mobile_no)?,
                input.address,
                admin_id,
            )?;
            let now = Utc::now();
            Ok(Member::from_db(
                MemberId::new(1),
                new_member.name,
                new_member.mobile_no,
                new_member.address,
                new_member.admin_id,
                true,
                now,
                now,
            ))
        }

        async fn list_members(&self) -> Result<Vec<MemberWithAdmin>, ApiError> {
            Ok(vec![MemberWithAdmin {
                id:         1,
                name:       "山田太郎".to_string(),
                mobile_no:  "090-1234-5678".to_string(),
                address:    "東京都".to_string(),
                admin_id:   1,
                admin_name: "tanaka".to_string(),
                is_active:  true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }])
        }

        async fn toggle_status(&self, id: MemberId) -> Result<ToggleStatusResult, ApiError> {
            if self.member_exists {
                Ok(ToggleStatusResult {
                    id,
                    is_active: false,
                })
            } else {
                Err(ApiError::NotFound("メンバーが見つかりません".to_string()))
            }
        }
    }

    fn create_test_app(usecase: StubMemberUseCase) -> Router {
        let state = Arc::new(MemberState {
            usecase: Arc::new(usecase),
        });

        // 認証ミドルウェアの代わりに管理者情報を固定で注入する
        Router::new()
            .route("/api/members", post(create_member))
            .route("/api/members", get(list_members))
            .route("/api/members/{id}/toggle-status", put(toggle_member_status))
            .layer(from_fn(|mut req: Request<Body>, next: axum::middleware::Next| async {
                req.extensions_mut().insert(AuthenticatedAdmin {
                    admin_id: AdminId::new(1),
                    role:     AdminRole::MasterAdmin,
                });
                next.run(req).await
            }))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_create_member_201でメンバーを返す() {
        // Given
        let sut = create_test_app(StubMemberUseCase {
            member_exists: true,
        });

        let body = serde_json::json!({
            "name": "山田太郎",
            "mobile_no": "090-1234-5678",
            "address": "東京都"
        });

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/members")
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

        assert_eq!(json["data"]["name"], "山田太郎");
        assert_eq!(json["data"]["is_active"], true);
        assert_eq!(json["data"]["admin_id"], 1);
    }

    #[tokio::test]
    async fn test_list_members_一覧を返す() {
        // Given
        let sut = create_test_app(StubMemberUseCase {
            member_exists: true,
        });

        let request = Request::builder()
            .uri("/api/members")
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

        assert_eq!(json["data"].as_array().unwrap().len(), 1);
        assert_eq!(json["data"][0]["admin_name"], "tanaka");
    }

    #[tokio::test]
    async fn test_toggle_member_status_反転後の状態を返す() {
        // Given
        let sut = create_test_app(StubMemberUseCase {
            member_exists: true,
        });

        let request = Request::builder()
            .method(Method::PUT)
            .uri("/api/members/1/toggle-status")
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

        assert_eq!(json["data"]["id"], 1);
        assert_eq!(json["data"]["is_active"], false);
    }

    #[tokio::test]
    async fn test_toggle_member_status_存在しないメンバーは404() {
        // Given
        let sut = create_test_app(StubMemberUseCase {
            member_exists: false,
        });

        let request = Request::builder()
            .method(Method::PUT)
            .uri("/api/members/999/toggle-status")
            .body(Body::empty())
            .unwrap();

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
