//! # 寄付
//!
//! 受給者へ支出した寄付のエンティティを定義する。
//!
//! プールの残高は集金合計から寄付合計を引いた値になる。

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{
   DomainError,
   admin::AdminId,
   member::MobileNo,
   value_objects::Amount,
};

/// 寄付 ID（一意識別子）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct DonationId(i32);

impl DonationId {
   /// 採番済みの値から寄付 ID を作成する
   pub fn new(value: i32) -> Self {
      Self(value)
   }

   /// 内部の整数値を取得する
   pub fn value(&self) -> i32 {
      self.0
   }
}

/// 受給者名（値オブジェクト）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct BeneficiaryName(String);

impl BeneficiaryName {
   /// 受給者名を作成する
   ///
   /// # バリデーション
   ///
   /// - 空文字列ではない
   /// - 最大 255 文字
   pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
      let value = value.into();

      if value.is_empty() {
         return Err(DomainError::Validation(
            "受給者名は必須です".to_string(),
         ));
      }

      if value.len() > 255 {
         return Err(DomainError::Validation(
            "受給者名は255文字以内である必要があります".to_string(),
         ));
      }

      Ok(Self(value))
   }

   /// 文字列参照を取得する
   pub fn as_str(&self) -> &str {
      &self.0
   }
}

/// 寄付エンティティ
///
/// プールから受給者へ支出した1回分の寄付を表現する。
#[derive(Debug, Clone, PartialEq)]
pub struct Donation {
   id:               DonationId,
   beneficiary_name: BeneficiaryName,
   contact_no:       MobileNo,
   amount:           Amount,
   admin_id:         AdminId,
   donation_date:    DateTime<Utc>,
   created_at:       DateTime<Utc>,
}

impl Donation {
   /// 既存のデータから寄付を復元する（データベースから取得時）
   #[allow(clippy::too_many_arguments)]
   pub fn from_db(
      id: DonationId,
      beneficiary_name: BeneficiaryName,
      contact_no: MobileNo,
      amount: Amount,
      admin_id: AdminId,
      donation_date: DateTime<Utc>,
      created_at: DateTime<Utc>,
   ) -> Self {
      Self {
         id,
         beneficiary_name,
         contact_no,
         amount,
         admin_id,
         donation_date,
         created_at,
      }
   }

   // Getter メソッド

   pub fn id(&self) -> DonationId {
      self.id
   }

   pub fn beneficiary_name(&self) -> &BeneficiaryName {
      &self.beneficiary_name
   }

   pub fn contact_no(&self) -> &MobileNo {
      &self.contact_no
   }

   pub fn amount(&self) -> Amount {
      self.amount
   }

   pub fn admin_id(&self) -> AdminId {
      self.admin_id
   }

   pub fn donation_date(&self) -> DateTime<Utc> {
      self.donation_date
   }

   pub fn created_at(&self) -> DateTime<Utc> {
      self.created_at
   }
}

/// 新規寄付（記録時の挿入用データ）
#[derive(Debug, Clone)]
pub struct NewDonation {
   pub beneficiary_name: BeneficiaryName,
   pub contact_no:       MobileNo,
   pub amount:           Amount,
   pub admin_id:         AdminId,
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::rstest;

   use super::*;

   #[rstest]
   #[case("", "空文字列")]
   #[case(&"a".repeat(256), "256文字")]
   fn test_受給者名は不正な値を拒否する(#[case] value: &str, #[case] _desc: &str) {
      assert!(BeneficiaryName::new(value).is_err());
   }

   #[test]
   fn test_from_dbで寄付を復元できる() {
      let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
      let donation = Donation::from_db(
         DonationId::new(3),
         BeneficiaryName::new("田中花子").unwrap(),
         MobileNo::new("080-9876-5432").unwrap(),
         Amount::new(5000.0).unwrap(),
         AdminId::new(2),
         now,
         now,
      );

      assert_eq!(donation.id().value(), 3);
      assert_eq!(donation.amount().value(), 5000.0);
   }
}
