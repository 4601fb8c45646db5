//! # インフラ層エラー定義
//!
//! データベースや外部ライブラリとの境界で発生するエラーを表現する。
//!
//! ## 設計方針
//!
//! - **エラーの変換**: sqlx::Error をラップし、制約違反は専用バリアントに分類
//! - **ドメインエラーとの分離**: インフラ固有のエラーを明示
//! - **制約違反の識別**: 一意制約（SQLSTATE 23505）・外部キー制約（23503）は
//!   制約名を保持し、API 層で具体的なエラーメッセージに変換できるようにする

use thiserror::Error;

/// PostgreSQL の一意制約違反（unique_violation）
const SQLSTATE_UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL の外部キー制約違反（foreign_key_violation）
const SQLSTATE_FOREIGN_KEY_VIOLATION: &str = "23503";

/// インフラ層で発生するエラー
///
/// データベースクエリの実行やパスワードハッシュ処理で発生するエラー。
/// API 層でこのエラー種別に応じて適切な HTTP レスポンスに変換する。
#[derive(Debug, Error)]
pub enum InfraError {
    /// 一意制約違反
    ///
    /// `constraint` にはデータベースの制約名（例: `admins_username_key`）が入る。
    /// API 層で制約名からどのフィールドが重複したかを判別する。
    #[error("一意制約違反: {constraint}")]
    UniqueViolation {
        /// 違反した制約名
        constraint: String,
    },

    /// 外部キー制約違反
    ///
    /// 存在しないメンバー・管理者への参照を挿入しようとした場合に発生する。
    #[error("外部キー制約違反: {constraint}")]
    ForeignKeyViolation {
        /// 違反した制約名
        constraint: String,
    },

    /// データベースエラー
    ///
    /// 制約違反以外の SQL 実行失敗、接続エラーなど。
    #[error("データベースエラー: {0}")]
    Database(#[source] sqlx::Error),

    /// パスワードハッシュエラー
    ///
    /// 不正なハッシュ形式、ハッシュ化の失敗など。
    #[error("パスワードハッシュエラー: {0}")]
    PasswordHash(String),

    /// 予期しないエラー
    ///
    /// 上記に分類できない予期しないエラー。
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

impl InfraError {
    /// パスワードハッシュエラーを生成する
    pub fn password_hash(msg: impl Into<String>) -> Self {
        Self::PasswordHash(msg.into())
    }

    /// 予期しないエラーを生成する
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::Unexpected(msg.into())
    }

    /// 一意制約違反の場合、制約名を返す
    pub fn as_unique_violation(&self) -> Option<&str> {
        match self {
            Self::UniqueViolation { constraint } => Some(constraint),
            _ => None,
        }
    }

    /// 外部キー制約違反かどうかを判定する
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(self, Self::ForeignKeyViolation { .. })
    }
}

impl From<sqlx::Error> for InfraError {
    /// sqlx のエラーを分類して変換する
    ///
    /// SQLSTATE を見て制約違反を専用バリアントに振り分ける。
    /// 制約名が取得できない場合は空文字列とする。
    fn from(source: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = source {
            let constraint = || db_err.constraint().unwrap_or_default().to_string();

            match db_err.code().as_deref() {
                Some(SQLSTATE_UNIQUE_VIOLATION) => {
                    return Self::UniqueViolation {
                        constraint: constraint(),
                    };
                }
                Some(SQLSTATE_FOREIGN_KEY_VIOLATION) => {
                    return Self::ForeignKeyViolation {
                        constraint: constraint(),
                    };
                }
                _ => {}
            }
        }

        Self::Database(source)
    }
}
