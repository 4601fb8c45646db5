//! # DonationRepository
//!
//! 寄付記録の永続化を担当するリポジトリ。
//!
//! 集金リポジトリと同じ形だが、寄付はメンバーに紐づかない
//! （受給者はメンバー外の場合がある）。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use khidmat_domain::{
    admin::AdminId,
    donation::{BeneficiaryName, Donation, DonationId, NewDonation},
    member::MobileNo,
    value_objects::Amount,
};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::InfraError;

/// 寄付リポジトリトレイト
#[async_trait]
pub trait DonationRepository: Send + Sync {
    /// 新規寄付を記録する
    async fn insert(&self, new_donation: &NewDonation) -> Result<Donation, InfraError>;

    /// 全寄付記録を管理者名付きで取得する（記録日時の降順）
    async fn list_all(&self) -> Result<Vec<DonationWithAdmin>, InfraError>;
}

/// 寄付一覧の読み取りモデル（担当管理者名付き）
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DonationWithAdmin {
    pub id:               i32,
    pub beneficiary_name: String,
    pub contact_no:       String,
    pub amount:           f64,
    pub admin_id:         i32,
    pub admin_name:       String,
    pub donation_date:    DateTime<Utc>,
    pub created_at:       DateTime<Utc>,
}

/// donations テーブルの行
#[derive(sqlx::FromRow)]
struct DonationRow {
    id:               i32,
    beneficiary_name: String,
    contact_no:       String,
    amount:           f64,
    admin_id:         i32,
    donation_date:    DateTime<Utc>,
    created_at:       DateTime<Utc>,
}

impl DonationRow {
    fn into_donation(self) -> Result<Donation, InfraError> {
        Ok(Donation::from_db(
            DonationId::new(self.id),
            BeneficiaryName::new(self.beneficiary_name)
                .map_err(|e| InfraError::unexpected(e.to_string()))?,
            MobileNo::new(self.contact_no).map_err(|e| InfraError::unexpected(e.to_string()))?,
            Amount::new(self.amount).map_err(|e| InfraError::unexpected(e.to_string()))?,
            AdminId::new(self.admin_id),
            self.donation_date,
            self.created_at,
        ))
    }
}

/// PostgreSQL 実装の DonationRepository
#[derive(Debug, Clone)]
pub struct PostgresDonationRepository {
    pool: PgPool,
}

impl PostgresDonationRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DonationRepository for PostgresDonationRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn insert(&self, new_donation: &NewDonation) -> Result<Donation, InfraError> {
        let row = sqlx::query_as::<_, DonationRow>(
            r#"
            INSERT INTO donations (beneficiary_name, contact_no, amount, admin_id)
            VALUES ($1, $2, $3, $4)
            RETURNING
                id,
                beneficiary_name,
                contact_no,
                amount::float8 AS amount,
                admin_id,
                donation_date,
                created_at
            "#,
        )
        .bind(new_donation.beneficiary_name.as_str())
        .bind(new_donation.contact_no.as_str())
        .bind(new_donation.amount.value())
        .bind(new_donation.admin_id.value())
        .fetch_one(&self.pool)
        .await?;

        row.into_donation()
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn list_all(&self) -> Result<Vec<DonationWithAdmin>, InfraError> {
        let rows = sqlx::query_as::<_, DonationWithAdmin>(
            r#"
            SELECT
                d.id,
                d.beneficiary_name,
                d.contact_no,
                d.amount::float8 AS amount,
                d.admin_id,
                COALESCE(a.username, '') AS admin_name,
                d.donation_date,
                d.created_at
            FROM donations d
            LEFT JOIN admins a ON d.admin_id = a.id
            ORDER BY d.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
