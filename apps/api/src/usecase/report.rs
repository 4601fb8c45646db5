//! # レポートユースケース
//!
//! 集計レポートの取得を実装する。
//!
//! ## 権限による絞り込み
//!
//! 納付済み・未納レポートはマスター管理者が全件、アカウント管理者が
//! 自分の担当分のみを閲覧できる。絞り込みの条件はここで決定し、
//! リポジトリには `Option<AdminId>` として渡す。
//!
//! ## 対象月
//!
//! 「当月」依存のレポートは `now` を引数で受け取り、ドメインの
//! `MonthKey` で半開区間 `[月初, 翌月初)` に変換する。

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use khidmat_domain::{
    admin::{AdminId, AdminRole},
    value_objects::MonthKey,
};
use khidmat_infra::repository::{
    AdminPaymentSummary, CollectionDetailRow, DonationDetailRow, MonthlyTotal, PaidMemberRow,
    PoolBalance, ReportRepository, UnpaidMemberRow,
};
use serde::Serialize;

use crate::error::ApiError;

/// 月次明細レスポンス（明細・合計・対象月）
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyDetails<T> {
    pub details: Vec<T>,
    pub total:   f64,
    pub month:   String,
}

/// レポートユースケーストレイト
#[async_trait]
pub trait ReportUseCase: Send + Sync {
    /// アカウント管理者ごとの当月集金サマリを取得する
    async fn admin_payments(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<AdminPaymentSummary>, ApiError>;

    /// 当月に納付したメンバーの一覧を取得する
    ///
    /// アカウント管理者は自分の担当分のみ閲覧できる。
    async fn paid_members(
        &self,
        admin_id: AdminId,
        role: AdminRole,
        now: DateTime<Utc>,
    ) -> Result<Vec<PaidMemberRow>, ApiError>;

    /// 当月に納付のないアクティブメンバーの一覧を取得する
    async fn unpaid_members(
        &self,
        admin_id: AdminId,
        role: AdminRole,
        now: DateTime<Utc>,
    ) -> Result<Vec<UnpaidMemberRow>, ApiError>;

    /// 直近12か月の月別集金合計を取得する
    async fn monthly_collection(&self) -> Result<Vec<MonthlyTotal>, ApiError>;

    /// 直近12か月の月別寄付合計を取得する
    async fn monthly_donations(&self) -> Result<Vec<MonthlyTotal>, ApiError>;

    /// 指定月（未指定時は当月）の集金明細と合計を取得する
    async fn collection_details(
        &self,
        month: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<MonthlyDetails<CollectionDetailRow>, ApiError>;

    /// 指定月（未指定時は当月）の寄付明細と合計を取得する
    async fn donation_details(
        &self,
        month: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<MonthlyDetails<DonationDetailRow>, ApiError>;

    /// プール残高を取得する
    async fn pool_balance(&self) -> Result<PoolBalance, ApiError>;
}

/// レポートユースケースの実装
pub struct ReportUseCaseImpl {
    report_repository: Arc<dyn ReportRepository>,
}

impl ReportUseCaseImpl {
    /// 新しいユースケースインスタンスを作成
    pub fn new(report_repository: Arc<dyn ReportRepository>) -> Self {
        Self { report_repository }
    }

    /// 権限に応じた絞り込み条件を返す
    ///
    /// マスター管理者は全件（`None`）、アカウント管理者は自分の
    /// 担当分のみ（`Some`）。
    fn scope(admin_id: AdminId, role: AdminRole) -> Option<AdminId> {
        if role.is_master() {
            None
        } else {
            Some(admin_id)
        }
    }

    /// 月指定（`YYYY-MM`）または現在時刻から対象月を決定する
    fn resolve_month(month: Option<String>, now: DateTime<Utc>) -> Result<MonthKey, ApiError> {
        match month {
            Some(s) => Ok(s.parse::<MonthKey>()?),
            None => Ok(MonthKey::containing(now)),
        }
    }
}

#[async_trait]
impl ReportUseCase for ReportUseCaseImpl {
    async fn admin_payments(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<AdminPaymentSummary>, ApiError> {
        let (start, end) = MonthKey::containing(now).range();
        let summary = self.report_repository.admin_payment_summary(start, end).await?;
        Ok(summary)
    }

    async fn paid_members(
        &self,
        admin_id: AdminId,
        role: AdminRole,
        now: DateTime<Utc>,
    ) -> Result<Vec<PaidMemberRow>, ApiError> {
        let (start, end) = MonthKey::containing(now).range();
        let rows = self
            .report_repository
            .paid_members(start, end, Self::scope(admin_id, role))
            .await?;
        Ok(rows)
    }

    async fn unpaid_members(
        &self,
        admin_id: AdminId,
        role: AdminRole,
        now: DateTime<Utc>,
    ) -> Result<Vec<UnpaidMemberRow>, ApiError> {
        let (start, end) = MonthKey::containing(now).range();
        let rows = self
            .report_repository
            .unpaid_members(start, end, Self::scope(admin_id, role))
            .await?;
        Ok(rows)
    }

    async fn monthly_collection(&self) -> Result<Vec<MonthlyTotal>, ApiError> {
        let rows = self.report_repository.monthly_collection().await?;
        Ok(rows)
    }

    async fn monthly_donations(&self) -> Result<Vec<MonthlyTotal>, ApiError> {
        let rows = self.report_repository.monthly_donations().await?;
        Ok(rows)
    }

    async fn collection_details(
        &self,
        month: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<MonthlyDetails<CollectionDetailRow>, ApiError> {
        let month = Self::resolve_month(month, now)?;
        let (start, end) = month.range();

        let details = self.report_repository.collection_details(start, end).await?;
        let total = details.iter().map(|d| d.amount).sum();

        Ok(MonthlyDetails {
            details,
            total,
            month: month.to_string(),
        })
    }

    async fn donation_details(
        &self,
        month: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<MonthlyDetails<DonationDetailRow>, ApiError> {
        let month = Self::resolve_month(month, now)?;
        let (start, end) = month.range();

        let details = self.report_repository.donation_details(start, end).await?;
        let total = details.iter().map(|d| d.amount).sum();

        Ok(MonthlyDetails {
            details,
            total,
            month: month.to_string(),
        })
    }

    async fn pool_balance(&self) -> Result<PoolBalance, ApiError> {
        let balance = self.report_repository.pool_balance().await?;
        Ok(balance)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use khidmat_infra::InfraError;

    use super::*;

    /// 渡された絞り込み条件と期間を記録するモック
    struct MockReportRepository {
        paid_calls:   Mutex<Vec<Option<i32>>>,
        detail_calls: Mutex<Vec<(DateTime<Utc>, DateTime<Utc>)>>,
        details:      Vec<CollectionDetailRow>,
    }

    impl MockReportRepository {
        fn new() -> Self {
            Self {
                paid_calls:   Mutex::new(Vec::new()),
                detail_calls: Mutex::new(Vec::new()),
                details:      Vec::new(),
            }
        }

        fn with_details(details: Vec<CollectionDetailRow>) -> Self {
            Self {
                paid_calls: Mutex::new(Vec::new()),
                detail_calls: Mutex::new(Vec::new()),
                details,
            }
        }
    }

    #[async_trait]
    impl ReportRepository for MockReportRepository {
        async fn admin_payment_summary(
            &self,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
        ) -> Result<Vec<AdminPaymentSummary>, InfraError> {
            Ok(Vec::new())
        }

        async fn paid_members(
            &self,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
            admin_id: Option<AdminId>,
        ) -> Result<Vec<PaidMemberRow>, InfraError> {
            self.paid_calls
                .lock()
                .unwrap()
                .push(admin_id.map(|id| id.value()));
            Ok(Vec::new())
        }

        async fn unpaid_members(
            &self,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
            _admin_id: Option<AdminId>,
        ) -> Result<Vec<UnpaidMemberRow>, InfraError> {
            Ok(Vec::new())
        }

        async fn monthly_collection(&self) -> Result<Vec<MonthlyTotal>, InfraError> {
            Ok(Vec::new())
        }

        async fn monthly_donations(&self) -> Result<Vec<MonthlyTotal>, InfraError> {
            Ok(Vec::new())
        }

        async fn collection_details(
            &self,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> Result<Vec<CollectionDetailRow>, InfraError> {
            self.detail_calls.lock().unwrap().push((start, end));
            Ok(self.details.clone())
        }

        async fn donation_details(
            &self,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
        ) -> Result<Vec<DonationDetailRow>, InfraError> {
            Ok(Vec::new())
        }

        async fn pool_balance(&self) -> Result<PoolBalance, InfraError> {
            Ok(PoolBalance {
                total_payments:  10000.0,
                total_donations: 4000.0,
                balance:         6000.0,
            })
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-07-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn detail_row(amount: f64) -> CollectionDetailRow {
        CollectionDetailRow {
            member_name:  "山田太郎".to_string(),
            contact_no:   "090-1234-5678".to_string(),
            amount,
            admin_name:   "tanaka".to_string(),
            payment_date: "2024-07-01".to_string(),
        }
    }

    #[tokio::test]
    async fn test_paid_members_マスター管理者は全件を閲覧できる() {
        // Given
        let repo = Arc::new(MockReportRepository::new());
        let sut = ReportUseCaseImpl::new(repo.clone());

        // When
        sut.paid_members(AdminId::new(1), AdminRole::MasterAdmin, fixed_now())
            .await
            .unwrap();

        // Then
        assert_eq!(repo.paid_calls.lock().unwrap().as_slice(), &[None]);
    }

    #[tokio::test]
    async fn test_paid_members_アカウント管理者は担当分のみ() {
        // Given
        let repo = Arc::new(MockReportRepository::new());
        let sut = ReportUseCaseImpl::new(repo.clone());

        // When
        sut.paid_members(AdminId::new(7), AdminRole::AccountAdmin, fixed_now())
            .await
            .unwrap();

        // Then
        assert_eq!(repo.paid_calls.lock().unwrap().as_slice(), &[Some(7)]);
    }

    #[tokio::test]
    async fn test_collection_details_月指定なしは当月が対象になる() {
        // Given
        let repo = Arc::new(MockReportRepository::new());
        let sut = ReportUseCaseImpl::new(repo.clone());

        // When
        let result = sut.collection_details(None, fixed_now()).await.unwrap();

        // Then
        assert_eq!(result.month, "2024-07");
        let calls = repo.detail_calls.lock().unwrap();
        assert_eq!(calls[0].0.to_rfc3339(), "2024-07-01T00:00:00+00:00");
        assert_eq!(calls[0].1.to_rfc3339(), "2024-08-01T00:00:00+00:00");
    }

    #[tokio::test]
    async fn test_collection_details_月指定ありはその月が対象になる() {
        // Given
        let repo = Arc::new(MockReportRepository::new());
        let sut = ReportUseCaseImpl::new(repo.clone());

        // When
        let result = sut
            .collection_details(Some("2024-01".to_string()), fixed_now())
            .await
            .unwrap();

        // Then
        assert_eq!(result.month, "2024-01");
    }

    #[tokio::test]
    async fn test_collection_details_不正な月形式は400() {
        // Given
        let sut = ReportUseCaseImpl::new(Arc::new(MockReportRepository::new()));

        // When
        let result = sut
            .collection_details(Some("2024/01".to_string()), fixed_now())
            .await;

        // Then
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_collection_details_合計は明細の総和() {
        // Given
        let repo = MockReportRepository::with_details(vec![detail_row(1000.0), detail_row(2500.0)]);
        let sut = ReportUseCaseImpl::new(Arc::new(repo));

        // When
        let result = sut.collection_details(None, fixed_now()).await.unwrap();

        // Then
        assert_eq!(result.total, 3500.0);
        assert_eq!(result.details.len(), 2);
    }

    #[tokio::test]
    async fn test_pool_balance_残高を取得できる() {
        // Given
        let sut = ReportUseCaseImpl::new(Arc::new(MockReportRepository::new()));

        // When
        let balance = sut.pool_balance().await.unwrap();

        // Then
        assert_eq!(balance.balance, 6000.0);
    }
}
