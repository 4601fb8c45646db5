//! # 集金ユースケース
//!
//! 月次会費の記録・一覧を実装する。

use std::sync::Arc;

use async_trait::async_trait;
use khidmat_domain::{
    admin::AdminId,
    member::{MemberId, MemberName, MobileNo},
    payment::{NewPayment, Payment},
    value_objects::Amount,
};
use khidmat_infra::repository::{PaymentRepository, PaymentWithAdmin};

use crate::error::ApiError;

/// 集金記録入力
#[derive(Debug, Clone)]
pub struct PaymentInput {
    pub member_id:   i32,
    pub member_name: String,
    pub contact_no:  String,
    pub amount:      f64,
}

/// 集金ユースケーストレイト
#[async_trait]
pub trait PaymentUseCase: Send + Sync {
    /// 新規集金を記録する
    ///
    /// # 戻り値
    ///
    /// - `Err(ApiError::BadRequest)`: member_id が存在しない場合
    async fn record_payment(
        &self,
        input: PaymentInput,
        admin_id: AdminId,
    ) -> Result<Payment, ApiError>;

    /// 全集金記録を管理者名付きで取得する
    async fn list_payments(&self) -> Result<Vec<PaymentWithAdmin>, ApiError>;
}

/// 集金ユースケースの実装
pub struct PaymentUseCaseImpl {
    payment_repository: Arc<dyn PaymentRepository>,
}

impl PaymentUseCaseImpl {
    /// 新しいユースケースインスタンスを作成
    pub fn new(payment_repository: Arc<dyn PaymentRepository>) -> Self {
        Self { payment_repository }
    }
}

#[async_trait]
impl PaymentUseCase for PaymentUseCaseImpl {
    async fn record_payment(
        &self,
        input: PaymentInput,
        admin_id: AdminId,
    ) -> Result<Payment, ApiError> {
        let new_payment = NewPayment {
            member_id: MemberId::new(input.member_id),
            member_name: MemberName::new(input.member_name)?,
            contact_no: MobileNo::new(input.contact_no)?,
            amount: Amount::new(input.amount)?,
            admin_id,
        };

        match self.payment_repository.insert(&new_payment).await {
            Ok(payment) => Ok(payment),
            // 存在しないメンバーへの参照は入力不備として 400 で返す
            Err(e) if e.is_foreign_key_violation() => Err(ApiError::BadRequest(
                "指定されたメンバーが存在しません".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_payments(&self) -> Result<Vec<PaymentWithAdmin>, ApiError> {
        let payments = self.payment_repository.list_all().await?;
        Ok(payments)
    }
}
