//! # ReportRepository
//!
//! 集計レポート用の読み取り専用リポジトリ。
//!
//! ## 設計方針
//!
//! - **集計は SQL 側で実行**: 各レポートは1本のクエリに対応する
//! - **月次範囲は半開区間**: `[月初, 翌月初)` を引数で受け取る
//!   （範囲導出はドメイン層の `MonthKey` が担当）
//! - **担当者の絞り込み**: `Option<AdminId>` が `Some` の場合のみ
//!   `admin_id` で絞り込む（`$n IS NULL OR ...` パターン）
//! - **欠損集計値はゼロ**: COALESCE で 0 に畳み込む

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use khidmat_domain::admin::AdminId;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::InfraError;

/// レポートリポジトリトレイト
///
/// 月次範囲を取る操作はすべて半開区間 `[start, end)` で受け取る。
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// アカウント管理者ごとの当月集金サマリを取得する
    ///
    /// 集金実績のない管理者もゼロ値の行として含まれる。
    async fn admin_payment_summary(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<AdminPaymentSummary>, InfraError>;

    /// 期間内に納付したメンバーの一覧を取得する
    async fn paid_members(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        admin_id: Option<AdminId>,
    ) -> Result<Vec<PaidMemberRow>, InfraError>;

    /// 期間内に納付のないアクティブメンバーの一覧を取得する
    async fn unpaid_members(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        admin_id: Option<AdminId>,
    ) -> Result<Vec<UnpaidMemberRow>, InfraError>;

    /// 直近12か月の月別集金合計を取得する（新しい月が先頭）
    async fn monthly_collection(&self) -> Result<Vec<MonthlyTotal>, InfraError>;

    /// 直近12か月の月別寄付合計を取得する（新しい月が先頭）
    async fn monthly_donations(&self) -> Result<Vec<MonthlyTotal>, InfraError>;

    /// 期間内の集金明細を取得する
    async fn collection_details(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CollectionDetailRow>, InfraError>;

    /// 期間内の寄付明細を取得する
    async fn donation_details(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DonationDetailRow>, InfraError>;

    /// プール残高（集金合計・寄付合計・差額）を取得する
    async fn pool_balance(&self) -> Result<PoolBalance, InfraError>;
}

/// 管理者別の集金サマリ行
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AdminPaymentSummary {
    pub admin_id:        i32,
    pub admin_name:      String,
    pub paid_members:    i64,
    pub pending_members: i64,
    pub total_amount:    f64,
}

/// 納付済みメンバーの行
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PaidMemberRow {
    pub member_name:  String,
    pub mobile_no:    String,
    pub paid_amount:  f64,
    pub payment_date: String,
    pub admin_name:   String,
}

/// 未納メンバーの行
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UnpaidMemberRow {
    pub member_name: String,
    pub mobile_no:   String,
    pub admin_name:  String,
}

/// 月別合計の行（`month` は `YYYY-MM` 形式）
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MonthlyTotal {
    pub month: String,
    pub total: f64,
}

/// 集金明細の行（`payment_date` は `YYYY-MM-DD` 形式）
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CollectionDetailRow {
    pub member_name:  String,
    pub contact_no:   String,
    pub amount:       f64,
    pub admin_name:   String,
    pub payment_date: String,
}

/// 寄付明細の行（`donation_date` は `YYYY-MM-DD` 形式）
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DonationDetailRow {
    pub beneficiary_name: String,
    pub contact_no:       String,
    pub amount:           f64,
    pub admin_name:       String,
    pub donation_date:    String,
}

/// プール残高
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PoolBalance {
    pub total_payments:  f64,
    pub total_donations: f64,
    pub balance:         f64,
}

/// PostgreSQL 実装の ReportRepository
#[derive(Debug, Clone)]
pub struct PostgresReportRepository {
    pool: PgPool,
}

impl PostgresReportRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for PostgresReportRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn admin_payment_summary(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<AdminPaymentSummary>, InfraError> {
        let rows = sqlx::query_as::<_, AdminPaymentSummary>(
            r#"
            WITH admin_members AS (
                SELECT a.id AS admin_id, a.username AS admin_name, COUNT(m.id) AS total_members
                FROM admins a
                LEFT JOIN members m ON a.id = m.admin_id AND m.is_active = true
                WHERE a.role = 'account_admin'
                GROUP BY a.id, a.username
            ),
            paid_members AS (
                SELECT
                    p.admin_id,
                    COUNT(DISTINCT p.member_id) AS paid_count,
                    COALESCE(SUM(p.amount), 0) AS total_amount
                FROM payments p
                WHERE p.payment_date >= $1 AND p.payment_date < $2
                GROUP BY p.admin_id
            )
            SELECT
                am.admin_id,
                am.admin_name,
                COALESCE(pm.paid_count, 0) AS paid_members,
                (am.total_members - COALESCE(pm.paid_count, 0)) AS pending_members,
                COALESCE(pm.total_amount, 0)::float8 AS total_amount
            FROM admin_members am
            LEFT JOIN paid_members pm ON am.admin_id = pm.admin_id
            ORDER BY am.admin_name
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn paid_members(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        admin_id: Option<AdminId>,
    ) -> Result<Vec<PaidMemberRow>, InfraError> {
        let rows = sqlx::query_as::<_, PaidMemberRow>(
            r#"
            SELECT
                p.member_name,
                p.contact_no AS mobile_no,
                p.amount::float8 AS paid_amount,
                TO_CHAR(p.payment_date, 'YYYY-MM-DD') AS payment_date,
                COALESCE(a.username, '') AS admin_name
            FROM payments p
            LEFT JOIN admins a ON p.admin_id = a.id
            WHERE p.payment_date >= $1 AND p.payment_date < $2
                AND ($3::int4 IS NULL OR p.admin_id = $3)
            ORDER BY p.payment_date DESC, p.member_name
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(admin_id.map(|id| id.value()))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn unpaid_members(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        admin_id: Option<AdminId>,
    ) -> Result<Vec<UnpaidMemberRow>, InfraError> {
        let rows = sqlx::query_as::<_, UnpaidMemberRow>(
            r#"
            SELECT DISTINCT
                m.name AS member_name,
                m.mobile_no,
                a.username AS admin_name
            FROM members m
            INNER JOIN admins a ON m.admin_id = a.id
            WHERE m.is_active = true
                AND ($3::int4 IS NULL OR m.admin_id = $3)
                AND m.id NOT IN (
                    SELECT DISTINCT p.member_id
                    FROM payments p
                    WHERE p.payment_date >= $1 AND p.payment_date < $2
                )
            ORDER BY a.username, m.name
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(admin_id.map(|id| id.value()))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn monthly_collection(&self) -> Result<Vec<MonthlyTotal>, InfraError> {
        let rows = sqlx::query_as::<_, MonthlyTotal>(
            r#"
            SELECT
                TO_CHAR(payment_date, 'YYYY-MM') AS month,
                SUM(amount)::float8 AS total
            FROM payments
            GROUP BY TO_CHAR(payment_date, 'YYYY-MM')
            ORDER BY month DESC
            LIMIT 12
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn monthly_donations(&self) -> Result<Vec<MonthlyTotal>, InfraError> {
        let rows = sqlx::query_as::<_, MonthlyTotal>(
            r#"
            SELECT
                TO_CHAR(donation_date, 'YYYY-MM') AS month,
                SUM(amount)::float8 AS total
            FROM donations
            GROUP BY TO_CHAR(donation_date, 'YYYY-MM')
            ORDER BY month DESC
            LIMIT 12
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn collection_details(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CollectionDetailRow>, InfraError> {
        let rows = sqlx::query_as::<_, CollectionDetailRow>(
            r#"
            SELECT
                p.member_name,
                p.contact_no,
                p.amount::float8 AS amount,
                COALESCE(a.username, '') AS admin_name,
                TO_CHAR(p.payment_date, 'YYYY-MM-DD') AS payment_date
            FROM payments p
            LEFT JOIN admins a ON p.admin_id = a.id
            WHERE p.payment_date >= $1 AND p.payment_date < $2
            ORDER BY p.payment_date DESC, p.member_name
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn donation_details(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DonationDetailRow>, InfraError> {
        let rows = sqlx::query_as::<_, DonationDetailRow>(
            r#"
            SELECT
                d.beneficiary_name,
                d.contact_no,
                d.amount::float8 AS amount,
                COALESCE(a.username, '') AS admin_name,
                TO_CHAR(d.donation_date, 'YYYY-MM-DD') AS donation_date
            FROM donations d
            LEFT JOIN admins a ON d.admin_id = a.id
            WHERE d.donation_date >= $1 AND d.donation_date < $2
            ORDER BY d.donation_date DESC, d.beneficiary_name
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn pool_balance(&self) -> Result<PoolBalance, InfraError> {
        let rows = sqlx::query_as::<_, PoolBalance>(
            r#"
            SELECT
                total_payments,
                total_donations,
                (total_payments - total_donations) AS balance
            FROM (
                SELECT
                    (SELECT COALESCE(SUM(amount), 0) FROM payments)::float8 AS total_payments,
                    (SELECT COALESCE(SUM(amount), 0) FROM donations)::float8 AS total_donations
            ) totals
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(rows)
    }
}
