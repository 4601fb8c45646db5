//! # AdminRepository
//!
//! 管理者情報の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **認証用の取得**: ログイン時はエンティティとパスワードハッシュを
//!   同時に取得する（ハッシュはエンティティに含めない）
//! - **一意制約違反の伝播**: username / email の重複は
//!   [`InfraError::UniqueViolation`] として制約名付きで返す

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use khidmat_domain::{
    admin::{Admin, AdminId, AdminRole, Email, NewAdmin, Username},
    password::PasswordHash,
};
use sqlx::PgPool;

use crate::error::InfraError;

/// 管理者リポジトリトレイト
#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// 新規管理者を登録する
    ///
    /// # 戻り値
    ///
    /// - `Ok(admin)`: 採番済み ID を含む登録後のエンティティ
    /// - `Err(InfraError::UniqueViolation { .. })`: username / email の重複
    async fn insert(&self, new_admin: &NewAdmin) -> Result<Admin, InfraError>;

    /// ユーザー名で管理者を検索する
    ///
    /// # 戻り値
    ///
    /// - `Ok(Some((admin, hash)))`: 管理者が見つかった場合
    /// - `Ok(None)`: 管理者が見つからない場合
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<(Admin, PasswordHash)>, InfraError>;
}

/// admins テーブルの行
#[derive(sqlx::FromRow)]
struct AdminRow {
    id:            i32,
    username:      String,
    email:         String,
    password_hash: String,
    role:          String,
    created_at:    DateTime<Utc>,
    updated_at:    DateTime<Utc>,
}

impl AdminRow {
    /// 行をドメインエンティティに復元する
    ///
    /// データベース上の値はバリデーション済みのため、復元に失敗した
    /// 場合はデータ不整合として [`InfraError::Unexpected`] にする。
    fn into_admin(self) -> Result<(Admin, PasswordHash), InfraError> {
        let admin = Admin::from_db(
            AdminId::new(self.id),
            Username::new(self.username).map_err(|e| InfraError::unexpected(e.to_string()))?,
            Email::new(self.email).map_err(|e| InfraError::unexpected(e.to_string()))?,
            self.role
                .parse::<AdminRole>()
                .map_err(|e| InfraError::unexpected(e.to_string()))?,
            self.created_at,
            self.updated_at,
        );

        Ok((admin, PasswordHash::new(self.password_hash)))
    }
}

/// PostgreSQL 実装の AdminRepository
#[derive(Debug, Clone)]
pub struct PostgresAdminRepository {
    pool: PgPool,
}

impl PostgresAdminRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminRepository for PostgresAdminRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn insert(&self, new_admin: &NewAdmin) -> Result<Admin, InfraError> {
        let row = sqlx::query_as::<_, AdminRow>(
            r#"
            INSERT INTO admins (username, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(new_admin.username.as_str())
        .bind(new_admin.email.as_str())
        .bind(new_admin.password_hash.as_str())
        .bind(<&'static str>::from(new_admin.role))
        .fetch_one(&self.pool)
        .await?;

        let (admin, _) = row.into_admin()?;
        Ok(admin)
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<(Admin, PasswordHash)>, InfraError> {
        let row = sqlx::query_as::<_, AdminRow>(
            r#"
            SELECT id, username, email, password_hash, role, created_at, updated_at
            FROM admins
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AdminRow::into_admin).transpose()
    }
}
