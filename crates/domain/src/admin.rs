//! # 管理者
//!
//! 管理者エンティティとそれに関連する値オブジェクトを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`Admin`] | 管理者 | メンバー登録・集金を行う運用ユーザー |
//! | [`AdminRole`] | 管理者区分 | マスター管理者とアカウント管理者の2区分 |
//!
//! ## 設計方針
//!
//! - **Newtype パターン**: AdminId は整数（SERIAL 採番値）をラップし、型安全性を確保
//! - **不変性**: エンティティフィールドは不変、変更はメソッド経由
//! - **バリデーション**: 値オブジェクトの生成時に検証ロジックを実行

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::{DomainError, password::PasswordHash};

/// 管理者 ID（一意識別子）
///
/// データベースの SERIAL 採番値をラップする。
/// Newtype パターンで型安全性を確保。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct AdminId(i32);

impl AdminId {
   /// 採番済みの値から管理者 ID を作成する
   pub fn new(value: i32) -> Self {
      Self(value)
   }

   /// 内部の整数値を取得する
   pub fn value(&self) -> i32 {
      self.0
   }
}

/// ユーザー名（値オブジェクト）
///
/// ログイン識別子。データベースで一意。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct Username(String);

impl Username {
   /// ユーザー名を作成する
   ///
   /// # バリデーション
   ///
   /// - 空文字列ではない
   /// - 最大 255 文字
   pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
      let value = value.into();

      if value.is_empty() {
         return Err(DomainError::Validation(
            "ユーザー名は必須です".to_string(),
         ));
      }

      if value.len() > 255 {
         return Err(DomainError::Validation(
            "ユーザー名は255文字以内である必要があります".to_string(),
         ));
      }

      Ok(Self(value))
   }

   /// 文字列参照を取得する
   pub fn as_str(&self) -> &str {
      &self.0
   }
}

/// メールアドレス（値オブジェクト）
///
/// 生成時にバリデーションを実行し、不正な値の作成を防ぐ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
   /// メールアドレスを作成する
   ///
   /// # バリデーション
   ///
   /// - 空文字列ではない
   /// - `local@domain` の形式であること
   /// - 最大 255 文字
   pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
      let value = value.into();

      if value.is_empty() {
         return Err(DomainError::Validation(
            "メールアドレスは必須です".to_string(),
         ));
      }

      let Some((local, domain)) = value.split_once('@') else {
         return Err(DomainError::Validation(
            "メールアドレスの形式が不正です".to_string(),
         ));
      };

      if local.is_empty() || domain.is_empty() {
         return Err(DomainError::Validation(
            "メールアドレスの形式が不正です".to_string(),
         ));
      }

      if value.len() > 255 {
         return Err(DomainError::Validation(
            "メールアドレスは255文字以内である必要があります".to_string(),
         ));
      }

      Ok(Self(value))
   }

   /// 文字列参照を取得する
   pub fn as_str(&self) -> &str {
      &self.0
   }
}

impl std::fmt::Display for Email {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      write!(f, "{}", self.0)
   }
}

/// 管理者区分
///
/// マスター管理者は全管理者のデータを閲覧できる。
/// アカウント管理者は自分が登録したメンバーのみを扱う。
#[derive(
   Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AdminRole {
   /// マスター管理者（全体の閲覧権限を持つ）
   MasterAdmin,
   /// アカウント管理者（自分の担当分のみ）
   AccountAdmin,
}

impl AdminRole {
   /// マスター管理者かどうかを判定する
   pub fn is_master(&self) -> bool {
      matches!(self, Self::MasterAdmin)
   }
}

impl std::str::FromStr for AdminRole {
   type Err = DomainError;

   fn from_str(s: &str) -> Result<Self, Self::Err> {
      match s {
         "master_admin" => Ok(Self::MasterAdmin),
         "account_admin" => Ok(Self::AccountAdmin),
         _ => Err(DomainError::Validation(format!(
            "不正な管理者区分: {}",
            s
         ))),
      }
   }
}

/// 管理者エンティティ
///
/// メンバー登録・集金・寄付記録を行う運用ユーザーを表現する。
/// 認証はユーザー名とパスワード（bcrypt ハッシュ）で行う。
///
/// # 不変条件
///
/// - `username` と `email` はデータベースで一意
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admin {
   id:         AdminId,
   username:   Username,
   email:      Email,
   role:       AdminRole,
   created_at: DateTime<Utc>,
   updated_at: DateTime<Utc>,
}

impl Admin {
   /// 既存のデータから管理者を復元する（データベースから取得時）
   pub fn from_db(
      id: AdminId,
      username: Username,
      email: Email,
      role: AdminRole,
      created_at: DateTime<Utc>,
      updated_at: DateTime<Utc>,
   ) -> Self {
      Self {
         id,
         username,
         email,
         role,
         created_at,
         updated_at,
      }
   }

   // Getter メソッド

   pub fn id(&self) -> AdminId {
      self.id
   }

   pub fn username(&self) -> &Username {
      &self.username
   }

   pub fn email(&self) -> &Email {
      &self.email
   }

   pub fn role(&self) -> AdminRole {
      self.role
   }

   pub fn created_at(&self) -> DateTime<Utc> {
      self.created_at
   }

   pub fn updated_at(&self) -> DateTime<Utc> {
      self.updated_at
   }
}

/// 新規管理者（サインアップ時の挿入用データ）
///
/// ID はデータベースが採番するため持たない。
#[derive(Debug, Clone)]
pub struct NewAdmin {
   pub username:      Username,
   pub email:         Email,
   pub password_hash: PasswordHash,
   pub role:          AdminRole,
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::rstest;

   use super::*;

   // Username のテスト

   #[test]
   fn test_ユーザー名は正常な値を受け入れる() {
      assert!(Username::new("tanaka").is_ok());
   }

   #[rstest]
   #[case("", "空文字列")]
   #[case(&"a".repeat(256), "256文字")]
   fn test_ユーザー名は不正な値を拒否する(#[case] value: &str, #[case] _desc: &str) {
      assert!(Username::new(value).is_err());
   }

   // Email のテスト

   #[test]
   fn test_メールアドレスは正常な形式を受け入れる() {
      assert!(Email::new("admin@example.com").is_ok());
   }

   #[rstest]
   #[case("", "空文字列")]
   #[case("no-at-mark", "@なし")]
   #[case("@example.com", "ローカル部なし")]
   #[case("admin@", "ドメイン部なし")]
   fn test_メールアドレスは不正な形式を拒否する(#[case] value: &str, #[case] _desc: &str) {
      assert!(Email::new(value).is_err());
   }

   // AdminRole のテスト

   #[rstest]
   #[case("master_admin", AdminRole::MasterAdmin)]
   #[case("account_admin", AdminRole::AccountAdmin)]
   fn test_管理者区分をパースできる(#[case] input: &str, #[case] expected: AdminRole) {
      assert_eq!(input.parse::<AdminRole>().unwrap(), expected);
   }

   #[test]
   fn test_不正な管理者区分はエラー() {
      assert!("super_admin".parse::<AdminRole>().is_err());
   }

   #[test]
   fn test_管理者区分のserializeはsnake_case() {
      let json = serde_json::to_value(AdminRole::MasterAdmin).unwrap();
      assert_eq!(json, serde_json::json!("master_admin"));
   }

   #[test]
   fn test_管理者区分のdisplayはsnake_case() {
      assert_eq!(AdminRole::AccountAdmin.to_string(), "account_admin");
   }

   #[test]
   fn test_マスター管理者の判定() {
      assert!(AdminRole::MasterAdmin.is_master());
      assert!(!AdminRole::AccountAdmin.is_master());
   }

   // Admin のテスト

   #[test]
   fn test_from_dbで管理者を復元できる() {
      let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
      let admin = Admin::from_db(
         AdminId::new(1),
         Username::new("tanaka").unwrap(),
         Email::new("tanaka@example.com").unwrap(),
         AdminRole::AccountAdmin,
         now,
         now,
      );

      assert_eq!(admin.id().value(), 1);
      assert_eq!(admin.username().as_str(), "tanaka");
      assert_eq!(admin.role(), AdminRole::AccountAdmin);
   }
}
