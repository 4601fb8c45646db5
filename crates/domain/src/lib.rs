//! # Khidmat ドメイン層
//!
//! 会費管理のエンティティ・値オブジェクト・ドメインエラーを定義する。
//!
//! ## 設計方針
//!
//! - **Newtype パターン**: ID は整数をラップし、型安全性を確保
//! - **不変性**: エンティティフィールドは不変、変更はメソッド経由
//! - **バリデーション**: 値オブジェクトの生成時に検証ロジックを実行
//!
//! ## 依存関係
//!
//! ```text
//! api → infra → domain → shared
//! ```
//!
//! ドメイン層はインフラ層に依存しない（依存性逆転の原則）。

pub mod admin;
pub mod donation;
pub mod error;
pub mod member;
pub mod password;
pub mod payment;
pub mod value_objects;

pub use error::DomainError;
