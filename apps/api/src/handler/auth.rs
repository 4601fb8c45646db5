//! # 認証ハンドラ
//!
//! ログインとサインアップのエンドポイントを提供する。
//!
//! ## エンドポイント
//!
//! - `POST /api/auth/login` - ログイン（トークン発行）
//! - `POST /api/auth/signup` - 管理者登録（トークン発行）
//!
//! いずれも認証不要の公開エンドポイント。発行されたトークンを
//! `Authorization: Bearer` ヘッダに付けることで保護された
//! エンドポイントにアクセスできる。

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use khidmat_domain::admin::AdminRole;
use khidmat_shared::ApiResponse;
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    usecase::{AuthUseCase, LoginInput, SignupInput},
};

/// 認証ハンドラの共有状態
pub struct AuthState {
    pub usecase: Arc<dyn AuthUseCase>,
}

// --- リクエスト/レスポンス型 ---

/// ログインリクエスト
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// サインアップリクエスト
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username:  String,
    pub email:     String,
    pub password:  String,
    pub user_type: String,
}

/// 認証レスポンス（ログイン・サインアップ共通）
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token:     String,
    pub user_id:   i32,
    pub user_type: AdminRole,
}

// --- ハンドラ ---

/// POST /api/auth/login
///
/// ユーザー名とパスワードで認証し、JWT を発行する。
///
/// 認証失敗時は、ユーザーが存在しない場合もパスワードが誤っている
/// 場合も同一の 401 レスポンスを返す。
pub async fn login(
    State(state): State<Arc<AuthState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let output = state
        .usecase
        .login(LoginInput {
            username: req.username,
            password: req.password,
        })
        .await?;

    Ok(Json(ApiResponse::new(AuthResponse {
        token:     output.token,
        user_id:   output.user_id,
        user_type: output.role,
    })))
}

/// POST /api/auth/signup
///
/// 新規管理者を登録し、JWT を発行する。
///
/// ユーザー名またはメールアドレスが重複している場合は、どちらが
/// 重複したかを示す 409 を返す。
pub async fn signup(
    State(state): State<Arc<AuthState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let output = state
        .usecase
        .signup(SignupInput {
            username:  req.username,
            email:     req.email,
            password:  req.password,
            user_type: req.user_type,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(AuthResponse {
            token:     output.token,
            user_id:   output.user_id,
            user_type: output.role,
        })),
    ))
}
