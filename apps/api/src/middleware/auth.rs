//! # 認証ミドルウェア
//!
//! JWT ベアラートークンの発行・検証と、保護ルートの認証ゲートを提供する。
//!
//! ## トークン仕様
//!
//! - 署名: HS256（`JWT_SECRET` 環境変数の共有シークレット）
//! - クレーム: `sub`（管理者 ID）、`role`（管理者区分）、`iat`、`exp`
//!   （発行から24時間）、`jti`（UUID v4）
//!
//! ## 使い方
//!
//! ```rust,ignore
//! use axum::middleware::from_fn_with_state;
//!
//! Router::new()
//!     .route("/api/members", get(list_members))
//!     .layer(from_fn_with_state(jwt_keys, require_auth))
//! ```
//!
//! 検証を通過したリクエストには [`AuthenticatedAdmin`] が Extension
//! として格納され、ハンドラはそこから操作主体を取得する。

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use khidmat_domain::admin::{AdminId, AdminRole};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// トークンの有効期間（時間）
const TOKEN_TTL_HOURS: i64 = 24;

/// JWT クレーム
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 管理者 ID
    pub sub:  i32,
    /// 管理者区分
    pub role: AdminRole,
    /// 発行日時（UNIX 秒）
    pub iat:  i64,
    /// 有効期限（UNIX 秒）
    pub exp:  i64,
    /// トークン識別子
    pub jti:  String,
}

/// JWT の署名・検証鍵
///
/// 起動時に一度だけ生成し、`Arc` で共有する。
pub struct JwtKeys {
    encoding:   EncodingKey,
    decoding:   DecodingKey,
    validation: Validation,
}

impl JwtKeys {
    /// 共有シークレットから鍵ペアを作成する
    pub fn new(secret: &str) -> Self {
        Self {
            encoding:   EncodingKey::from_secret(secret.as_bytes()),
            decoding:   DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// 管理者向けのトークンを発行する
    ///
    /// # Errors
    ///
    /// - JWT のエンコードに失敗した場合
    pub fn issue(
        &self,
        admin_id: AdminId,
        role: AdminRole,
        now: DateTime<Utc>,
    ) -> Result<String, ApiError> {
        let claims = Claims {
            sub:  admin_id.value(),
            role,
            iat:  now.timestamp(),
            exp:  (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
            jti:  Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| ApiError::Internal(format!("トークンの発行に失敗: {e}")))
    }

    /// トークンを検証してクレームを取り出す
    ///
    /// 署名不一致・期限切れ・形式不正はすべて 401 として扱う。
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| ApiError::Unauthorized("トークンが無効です".to_string()))
    }
}

/// 認証済み管理者（リクエスト Extension）
///
/// ミドルウェアで検証したトークンのクレームから復元し、
/// ハンドラが操作主体として参照する。
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedAdmin {
    pub admin_id: AdminId,
    pub role:     AdminRole,
}

/// 認証ミドルウェア
///
/// `Authorization: Bearer <token>` ヘッダを検証し、認証済み管理者を
/// リクエスト Extension に格納する。ヘッダ欠落・形式不正・検証失敗は
/// いずれも 401 を返す。
pub async fn require_auth(
    State(keys): State<Arc<JwtKeys>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(auth_header) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        return ApiError::Unauthorized("Authorization ヘッダが必要です".to_string())
            .into_response();
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        return ApiError::Unauthorized("Bearer トークンが必要です".to_string()).into_response();
    };

    let claims = match keys.verify(token) {
        Ok(c) => c,
        Err(e) => return e.into_response(),
    };

    request.extensions_mut().insert(AuthenticatedAdmin {
        admin_id: AdminId::new(claims.sub),
        role:     claims.role,
    });

    next.run(request).await
}
