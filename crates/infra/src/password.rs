//! # パスワードハッシュ
//!
//! bcrypt によるパスワードのハッシュ化・検証を提供する。
//!
//! 既存データベースの `password_hash` カラムは bcrypt 形式
//! （`$2b$` プレフィックス）で保存されているため、ハッシュ方式は
//! bcrypt に固定する。

use bcrypt::DEFAULT_COST;
use khidmat_domain::password::{PasswordHash, PasswordVerifyResult, PlainPassword};

use crate::InfraError;

/// パスワードのハッシュ化・検証を担当するトレイト
pub trait PasswordHasher: Send + Sync {
    /// 平文パスワードをハッシュ化する
    ///
    /// # Errors
    ///
    /// - bcrypt のハッシュ生成に失敗した場合
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, InfraError>;

    /// パスワードを検証する
    ///
    /// 不一致は [`PasswordVerifyResult::Mismatch`] として正常系で返す。
    ///
    /// # Errors
    ///
    /// - 保存されたハッシュが不正な形式の場合
    fn verify(
        &self,
        password: &PlainPassword,
        hash: &PasswordHash,
    ) -> Result<PasswordVerifyResult, InfraError>;
}

/// bcrypt によるパスワードハッシュの実装
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// デフォルトコスト（bcrypt::DEFAULT_COST = 12）でインスタンスを作成する
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    /// コストを指定してインスタンスを作成する
    ///
    /// テストではハッシュ計算を速くするため最小コストを使用する。
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, InfraError> {
        let hashed = bcrypt::hash(password.as_str(), self.cost)
            .map_err(|e| InfraError::password_hash(format!("ハッシュ化に失敗: {e}")))?;

        Ok(PasswordHash::new(hashed))
    }

    fn verify(
        &self,
        password: &PlainPassword,
        hash: &PasswordHash,
    ) -> Result<PasswordVerifyResult, InfraError> {
        let matched = bcrypt::verify(password.as_str(), hash.as_str())
            .map_err(|e| InfraError::password_hash(format!("不正なハッシュ形式: {e}")))?;

        Ok(PasswordVerifyResult::from(matched))
    }
}
