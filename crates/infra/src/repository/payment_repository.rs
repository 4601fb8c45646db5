//! # PaymentRepository
//!
//! 集金記録の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **金額の取得**: NUMERIC(10,2) カラムは `::float8` にキャストして
//!   取得する（JSON 表現と揃える）
//! - **外部キー制約の伝播**: 存在しないメンバーへの記録は
//!   [`InfraError::ForeignKeyViolation`] として返す

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use khidmat_domain::{
    admin::AdminId,
    member::{MemberId, MemberName, MobileNo},
    payment::{NewPayment, Payment, PaymentId},
    value_objects::Amount,
};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::InfraError;

/// 集金リポジトリトレイト
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// 新規集金を記録する
    ///
    /// # 戻り値
    ///
    /// - `Err(InfraError::ForeignKeyViolation { .. })`: member_id が存在しない場合
    async fn insert(&self, new_payment: &NewPayment) -> Result<Payment, InfraError>;

    /// 全集金記録を管理者名付きで取得する（記録日時の降順）
    async fn list_all(&self) -> Result<Vec<PaymentWithAdmin>, InfraError>;
}

/// 集金一覧の読み取りモデル（担当管理者名付き）
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PaymentWithAdmin {
    pub id:           i32,
    pub member_id:    i32,
    pub member_name:  String,
    pub contact_no:   String,
    pub amount:       f64,
    pub admin_id:     i32,
    pub admin_name:   String,
    pub payment_date: DateTime<Utc>,
    pub created_at:   DateTime<Utc>,
}

/// payments テーブルの行
#[derive(sqlx::FromRow)]
struct PaymentRow {
    id:           i32,
    member_id:    i32,
    member_name:  String,
    contact_no:   String,
    amount:       f64,
    admin_id:     i32,
    payment_date: DateTime<Utc>,
    created_at:   DateTime<Utc>,
}

impl PaymentRow {
    fn into_payment(self) -> Result<Payment, InfraError> {
        Ok(Payment::from_db(
            PaymentId::new(self.id),
            MemberId::new(self.member_id),
            MemberName::new(self.member_name)
                .map_err(|e| InfraError::unexpected(e.to_string()))?,
            MobileNo::new(self.contact_no).map_err(|e| InfraError::unexpected(e.to_string()))?,
            Amount::new(self.amount).map_err(|e| InfraError::unexpected(e.to_string()))?,
            AdminId::new(self.admin_id),
            self.payment_date,
            self.created_at,
        ))
    }
}

/// PostgreSQL 実装の PaymentRepository
#[derive(Debug, Clone)]
pub struct PostgresPaymentRepository {
    pool: PgPool,
}

impl PostgresPaymentRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn insert(&self, new_payment: &NewPayment) -> Result<Payment, InfraError> {
        let row = sqlx::query_as::<_, PaymentRow>(
            r#"
            INSERT INTO payments (member_id, member_name, contact_no, amount, admin_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING
                id,
                member_id,
                member_name,
                contact_no,
                amount::float8 AS amount,
                admin_id,
                payment_date,
                created_at
            "#,
        )
        .bind(new_payment.member_id.value())
        .bind(new_payment.member_name.as_str())
        .bind(new_payment.contact_no.as_str())
        .bind(new_payment.amount.value())
        .bind(new_payment.admin_id.value())
        .fetch_one(&self.pool)
        .await?;

        row.into_payment()
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn list_all(&self) -> Result<Vec<PaymentWithAdmin>, InfraError> {
        let rows = sqlx::query_as::<_, PaymentWithAdmin>(
            r#"
            SELECT
                p.id,
                p.member_id,
                p.member_name,
                p.contact_no,
                p.amount::float8 AS amount,
                p.admin_id,
                COALESCE(a.username, '') AS admin_name,
                p.payment_date,
                p.created_at
            FROM payments p
            LEFT JOIN admins a ON p.admin_id = a.id
            ORDER BY p.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgresPaymentRepository>();
    }

    #[test]
    fn test_行をエンティティに復元できる() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let row = PaymentRow {
            id:           5,
            member_id:    10,
            member_name:  "山田太郎".to_string(),
            contact_no:   "090-1234-5678".to_string(),
            amount:       1000.0,
            admin_id:     1,
            payment_date: now,
            created_at:   now,
        };

        let payment = row.into_payment().unwrap();

        assert_eq!(payment.id().value(), 5);
        assert_eq!(payment.amount().value(), 1000.0);
    }
}
