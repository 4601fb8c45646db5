//! # MemberRepository
//!
//! メンバー情報の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **一覧は読み取りモデル**: 登録管理者のユーザー名を JOIN した
//!   [`MemberWithAdmin`] を返す（画面表示用）
//! - **ステータス切り替え**: 現在値の取得と反転更新を分離する
//!   （存在しないメンバーを 404 として区別するため）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use khidmat_domain::{
    admin::AdminId,
    member::{Member, MemberId, MemberName, MobileNo, NewMember},
};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::InfraError;

/// メンバーリポジトリトレイト
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// 新規メンバーを登録する
    async fn insert(&self, new_member: &NewMember) -> Result<Member, InfraError>;

    /// 全メンバーを登録管理者名付きで取得する（登録日時の降順）
    async fn list_all(&self) -> Result<Vec<MemberWithAdmin>, InfraError>;

    /// メンバーの現在のアクティブフラグを取得する
    ///
    /// # 戻り値
    ///
    /// - `Ok(Some(flag))`: メンバーが存在する場合
    /// - `Ok(None)`: メンバーが存在しない場合
    async fn find_active_flag(&self, id: MemberId) -> Result<Option<bool>, InfraError>;

    /// メンバーのアクティブフラグを更新する
    async fn set_active_flag(&self, id: MemberId, is_active: bool) -> Result<(), InfraError>;
}

/// メンバー一覧の読み取りモデル（登録管理者名付き）
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MemberWithAdmin {
    pub id:         i32,
    pub name:       String,
    pub mobile_no:  String,
    pub address:    String,
    pub admin_id:   i32,
    pub admin_name: String,
    pub is_active:  bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// members テーブルの行
#[derive(sqlx::FromRow)]
struct MemberRow {
    id:         i32,
    name:       String,
    mobile_no:  String,
    address:    String,
    admin_id:   i32,
    is_active:  bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MemberRow {
    fn into_member(self) -> Result<Member, InfraError> {
        Ok(Member::from_db(
            MemberId::new(self.id),
            MemberName::new(self.name).map_err(|e| InfraError::unexpected(e.to_string()))?,
            MobileNo::new(self.mobile_no).map_err(|e| InfraError::unexpected(e.to_string()))?,
            self.address,
            AdminId::new(self.admin_id),
            self.is_active,
            self.created_at,
            self.updated_at,
        ))
    }
}

/// PostgreSQL 実装の MemberRepository
#[derive(Debug, Clone)]
pub struct PostgresMemberRepository {
    pool: PgPool,
}

impl PostgresMemberRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for PostgresMemberRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn insert(&self, new_member: &NewMember) -> Result<Member, InfraError> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            INSERT INTO members (name, mobile_no, address, admin_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, mobile_no, address, admin_id, is_active, created_at, updated_at
            "#,
        )
        .bind(new_member.name.as_str())
        .bind(new_member.mobile_no.as_str())
        .bind(new_member.address.as_str())
        .bind(new_member.admin_id.value())
        .fetch_one(&self.pool)
        .await?;

        row.into_member()
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn list_all(&self) -> Result<Vec<MemberWithAdmin>, InfraError> {
        let rows = sqlx::query_as::<_, MemberWithAdmin>(
            r#"
            SELECT
                m.id,
                m.name,
                m.mobile_no,
                m.address,
                m.admin_id,
                COALESCE(a.username, '') AS admin_name,
                m.is_active,
                m.created_at,
                m.updated_at
            FROM members m
            LEFT JOIN admins a ON m.admin_id = a.id
            ORDER BY m.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_active_flag(&self, id: MemberId) -> Result<Option<bool>, InfraError> {
        let flag = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT is_active FROM members WHERE id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(flag)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id, is_active))]
    async fn set_active_flag(&self, id: MemberId, is_active: bool) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            UPDATE members
            SET is_active = $1, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(is_active)
        .bind(id.value())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
