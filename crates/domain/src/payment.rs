//! # 集金
//!
//! メンバーから集めた月次会費のエンティティを定義する。
//!
//! 集金時点のメンバー名・連絡先をスナップショットとして保持する
//! （メンバー情報が後から変更されても記録は変わらない）。

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{
   admin::AdminId,
   member::{MemberId, MemberName, MobileNo},
   value_objects::Amount,
};

/// 集金 ID（一意識別子）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct PaymentId(i32);

impl PaymentId {
   /// 採番済みの値から集金 ID を作成する
   pub fn new(value: i32) -> Self {
      Self(value)
   }

   /// 内部の整数値を取得する
   pub fn value(&self) -> i32 {
      self.0
   }
}

/// 集金エンティティ
///
/// メンバーから受け取った1回分の会費を表現する。
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
   id:           PaymentId,
   member_id:    MemberId,
   member_name:  MemberName,
   contact_no:   MobileNo,
   amount:       Amount,
   admin_id:     AdminId,
   payment_date: DateTime<Utc>,
   created_at:   DateTime<Utc>,
}

impl Payment {
   /// 既存のデータから集金を復元する（データベースから取得時）
   #[allow(clippy::too_many_arguments)]
   pub fn from_db(
      id: PaymentId,
      member_id: MemberId,
      member_name: MemberName,
      contact_no: MobileNo,
      amount: Amount,
      admin_id: AdminId,
      payment_date: DateTime<Utc>,
      created_at: DateTime<Utc>,
   ) -> Self {
      Self {
         id,
         member_id,
         member_name,
         contact_no,
         amount,
         admin_id,
         payment_date,
         created_at,
      }
   }

   // Getter メソッド

   pub fn id(&self) -> PaymentId {
      self.id
   }

   pub fn member_id(&self) -> MemberId {
      self.member_id
   }

   pub fn member_name(&self) -> &MemberName {
      &self.member_name
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

   pub fn payment_date(&self) -> DateTime<Utc> {
      self.payment_date
   }

   pub fn created_at(&self) -> DateTime<Utc> {
      self.created_at
   }
}

/// 新規集金（記録時の挿入用データ）
///
/// ID と集金日時（デフォルトは記録時刻）はデータベース側で決まる。
#[derive(Debug, Clone)]
pub struct NewPayment {
   pub member_id:   MemberId,
   pub member_name: MemberName,
   pub contact_no:  MobileNo,
   pub amount:      Amount,
   pub admin_id:    AdminId,
}
