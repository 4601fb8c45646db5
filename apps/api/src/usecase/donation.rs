//! # 寄付ユースケース
//!
//! 受給者への寄付の記録・一覧を実装する。

use std::sync::Arc;

use async_trait::async_trait;
use khidmat_domain::{
    admin::AdminId,
    donation::{BeneficiaryName, Donation, NewDonation},
    member::MobileNo,
    value_objects::Amount,
};
use khidmat_infra::repository::{DonationRepository, DonationWithAdmin};

use crate::error::ApiError;

/// 寄付記録入力
#[derive(Debug, Clone)]
pub struct DonationInput {
    pub beneficiary_name: String,
    pub contact_no:       String,
    pub amount:           f64,
}

/// 寄付ユースケーストレイト
#[async_trait]
pub trait DonationUseCase: Send + Sync {
    /// 新規寄付を記録する
    async fn record_donation(
        &self,
        input: DonationInput,
        admin_id: AdminId,
    ) -> Result<Donation, ApiError>;

    /// 全寄付記録を管理者名付きで取得する
    async fn list_donations(&self) -> Result<Vec<DonationWithAdmin>, ApiError>;
}

/// 寄付ユースケースの実装
pub struct DonationUseCaseImpl {
    donation_repository: Arc<dyn DonationRepository>,
}

impl DonationUseCaseImpl {
    /// 新しいユースケースインスタンスを作成
    pub fn new(donation_repository: Arc<dyn DonationRepository>) -> Self {
        Self {
            donation_repository,
        }
    }
}

#[async_trait]
impl DonationUseCase for DonationUseCaseImpl {
    async fn record_donation(
        &self,
        input: DonationInput,
        admin_id: AdminId,
    ) -> Result<Donation, ApiError> {
        let new_donation = NewDonation {
            beneficiary_name: BeneficiaryName::new(input.beneficiary_name)?,
            contact_no: MobileNo::new(input.contact_no)?,
            amount: Amount::new(input.amount)?,
            admin_id,
        };

        let donation = self.donation_repository.insert(&new_donation).await?;
        Ok(donation)
    }

    async fn list_donations(&self) -> Result<Vec<DonationWithAdmin>, ApiError> {
        let donations = self.donation_repository.list_all().await?;
        Ok(donations)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use khidmat_domain::donation::DonationId;
    use khidmat_infra::InfraError;

    use super::*;

    struct StubDonationRepository;

    #[async_trait]
    impl DonationRepository for StubDonationRepository {
        async fn insert(&self, new_donation: &NewDonation) -> Result<Donation, InfraError> {
            let now = Utc::now();
            Ok(Donation::from_db(
                DonationId::new(1),
                new_donation.beneficiary_name.clone(),
                new_donation.contact_no.clone(),
                new_donation.amount,
                new_donation.admin_id,
                now,
                now,
            ))
        }

        async fn list_all(&self) -> Result<Vec<DonationWithAdmin>, InfraError> {
            Ok(Vec::new())
        }
    }

    fn donation_input() -> DonationInput {
        DonationInput {
            beneficiary_name: "田中花子".to_string(),
            contact_no:       "080-9876-5432".to_string(),
            amount:           5000.0,
        }
    }

    #[tokio::test]
    async fn test_record_donation_成功() {
        // Given
        let sut = DonationUseCaseImpl::new(Arc::new(StubDonationRepository));

        // When
        let donation = sut
            .record_donation(donation_input(), AdminId::new(2))
            .await
            .unwrap();

        // Then
        assert_eq!(donation.admin_id().value(), 2);
        assert_eq!(donation.amount().value(), 5000.0);
    }

    #[tokio::test]
    async fn test_record_donation_受給者名が空の場合は400() {
        // Given
        let sut = DonationUseCaseImpl::new(Arc::new(StubDonationRepository));
        let input = DonationInput {
            beneficiary_name: String::new(),
            ..donation_input()
        };

        // When
        let result = sut.record_donation(input, AdminId::new(2)).await;

        // Then
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_record_donation_負の金額は400() {
        // Given
        let sut = DonationUseCaseImpl::new(Arc::new(StubDonationRepository));
        let input = DonationInput {
            amount: -100.0,
            ..donation_input()
        };

        // When
        let result = sut.record_donation(input, AdminId::new(2)).await;

        // Then
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}
