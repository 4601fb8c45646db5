//! # メンバー
//!
//! 会費を納めるメンバーのエンティティと値オブジェクトを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`Member`] | メンバー | 月次の会費を納める構成員 |
//! | [`MemberName`] | メンバー名 | 表示名 |
//! | [`MobileNo`] | 携帯番号 | 連絡先 |

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{DomainError, admin::AdminId};

/// メンバー ID（一意識別子）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct MemberId(i32);

impl MemberId {
   /// 採番済みの値からメンバー ID を作成する
   pub fn new(value: i32) -> Self {
      Self(value)
   }

   /// 内部の整数値を取得する
   pub fn value(&self) -> i32 {
      self.0
   }
}

/// メンバー名（値オブジェクト）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct MemberName(String);

impl MemberName {
   /// メンバー名を作成する
   ///
   /// # バリデーション
   ///
   /// - 空文字列ではない
   /// - 最大 255 文字
   pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
      let value = value.into();

      if value.is_empty() {
         return Err(DomainError::Validation(
            "メンバー名は必須です".to_string(),
         ));
      }

      if value.len() > 255 {
         return Err(DomainError::Validation(
            "メンバー名は255文字以内である必要があります".to_string(),
         ));
      }

      Ok(Self(value))
   }

   /// 文字列参照を取得する
   pub fn as_str(&self) -> &str {
      &self.0
   }
}

/// 携帯番号（値オブジェクト）
///
/// VARCHAR(20) カラムに保存可能な範囲のみ受け入れる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct MobileNo(String);

impl MobileNo {
   /// 携帯番号を作成する
   ///
   /// # バリデーション
   ///
   /// - 空文字列ではない
   /// - 最大 20 文字
   pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
      let value = value.into();

      if value.is_empty() {
         return Err(DomainError::Validation(
            "携帯番号は必須です".to_string(),
         ));
      }

      if value.len() > 20 {
         return Err(DomainError::Validation(
            "携帯番号は20文字以内である必要があります".to_string(),
         ));
      }

      Ok(Self(value))
   }

   /// 文字列参照を取得する
   pub fn as_str(&self) -> &str {
      &self.0
   }
}

/// メンバーエンティティ
///
/// 月次の会費を納める構成員を表現する。
/// 登録した管理者（`admin_id`）に紐づき、退会時は `is_active` を
/// 落として論理的に集計対象から外す。
///
/// # 不変条件
///
/// - `admin_id` は既存の管理者を参照する
/// - 非アクティブのメンバーは未納レポートの対象外
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
   id:         MemberId,
   name:       MemberName,
   mobile_no:  MobileNo,
   address:    String,
   admin_id:   AdminId,
   is_active:  bool,
   created_at: DateTime<Utc>,
   updated_at: DateTime<Utc>,
}

impl Member {
   /// 既存のデータからメンバーを復元する（データベースから取得時）
   #[allow(clippy::too_many_arguments)]
   pub fn from_db(
      id: MemberId,
      name: MemberName,
      mobile_no: MobileNo,
      address: String,
      admin_id: AdminId,
      is_active: bool,
      created_at: DateTime<Utc>,
      updated_at: DateTime<Utc>,
   ) -> Self {
      Self {
         id,
         name,
         mobile_no,
         address,
         admin_id,
         is_active,
         created_at,
         updated_at,
      }
   }

   // Getter メソッド

   pub fn id(&self) -> MemberId {
      self.id
   }

   pub fn name(&self) -> &MemberName {
      &self.name
   }

   pub fn mobile_no(&self) -> &MobileNo {
      &self.mobile_no
   }

   pub fn address(&self) -> &str {
      &self.address
   }

   pub fn admin_id(&self) -> AdminId {
      self.admin_id
   }

   pub fn is_active(&self) -> bool {
      self.is_active
   }

   pub fn created_at(&self) -> DateTime<Utc> {
      self.created_at
   }

   pub fn updated_at(&self) -> DateTime<Utc> {
      self.updated_at
   }
}

/// 新規メンバー（登録時の挿入用データ）
///
/// ID と `is_active`（登録時は常にアクティブ）はデータベース側で決まる。
#[derive(Debug, Clone)]
pub struct NewMember {
   pub name:      MemberName,
   pub mobile_no: MobileNo,
   pub address:   String,
   pub admin_id:  AdminId,
}

impl NewMember {
   /// 入力値から新規メンバーを作成する
   ///
   /// # バリデーション
   ///
   /// 住所は空文字列を拒否する。名前・携帯番号は各値オブジェクトで検証する。
   pub fn new(
      name: MemberName,
      mobile_no: MobileNo,
      address: impl Into<String>,
      admin_id: AdminId,
   ) -> Result<Self, DomainError> {
      let address = address.into();

      if address.is_empty() {
         return Err(DomainError::Validation("住所は必須です".to_string()));
      }

      Ok(Self {
         name,
         mobile_no,
         address,
         admin_id,
      })
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::rstest;

   use super::*;

   fn member_name() -> MemberName {
      MemberName::new("山田太郎").unwrap()
   }

   fn mobile_no() -> MobileNo {
      MobileNo::new("090-1234-5678").unwrap()
   }

   // MemberName のテスト

   #[rstest]
   #[case("", "空文字列")]
   #[case(&"a".repeat(256), "256文字")]
   fn test_メンバー名は不正な値を拒否する(#[case] value: &str, #[case] _desc: &str) {
      assert!(MemberName::new(value).is_err());
   }

   // MobileNo のテスト

   #[test]
   fn test_携帯番号は20文字以内を受け入れる() {
      assert!(MobileNo::new("090-1234-5678").is_ok());
   }

   #[rstest]
   #[case("", "空文字列")]
   #[case("123456789012345678901", "21文字")]
   fn test_携帯番号は不正な値を拒否する(#[case] value: &str, #[case] _desc: &str) {
      assert!(MobileNo::new(value).is_err());
   }

   // NewMember のテスト

   #[test]
   fn test_新規メンバーを作成できる() {
      let new_member =
         NewMember::new(member_name(), mobile_no(), "東京都新宿区1-2-3", AdminId::new(1)).unwrap();

      assert_eq!(new_member.address, "東京都新宿区1-2-3");
      assert_eq!(new_member.admin_id.value(), 1);
   }

   #[test]
   fn test_住所が空の新規メンバーは拒否する() {
      let result = NewMember::new(member_name(), mobile_no(), "", AdminId::new(1));
      assert!(result.is_err());
   }

   // Member のテスト

   #[test]
   fn test_from_dbでメンバーを復元できる() {
      let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
      let member = Member::from_db(
         MemberId::new(10),
         member_name(),
         mobile_no(),
         "東京都新宿区1-2-3".to_string(),
         AdminId::new(1),
         true,
         now,
         now,
      );

      assert_eq!(member.id().value(), 10);
      assert!(member.is_active());
   }
}
