//! # 認証ユースケース
//!
//! ログイン・サインアップのビジネスロジックを実装する。
//!
//! ## タイミング攻撃対策
//!
//! ログインでは、ユーザーが存在しない場合もダミーハッシュで検証を
//! 実行し、処理時間を均一化する。ユーザー名の存在有無で応答が
//! 変わらないよう、失敗理由はすべて同じ 401 にする。

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use khidmat_domain::{
    admin::{AdminId, AdminRole, Email, NewAdmin, Username},
    password::{PasswordHash, PlainPassword},
};
use khidmat_infra::{PasswordHasher, repository::AdminRepository};

use crate::{error::ApiError, middleware::JwtKeys};

/// 認証失敗時の共通メッセージ
///
/// ユーザー名の存在有無を区別できないよう、全失敗で同一にする。
const INVALID_CREDENTIALS: &str = "認証情報が正しくありません";

/// ログイン入力
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// サインアップ入力
#[derive(Debug, Clone)]
pub struct SignupInput {
    pub username:  String,
    pub email:     String,
    pub password:  String,
    pub user_type: String,
}

/// 認証成功時の出力（トークンと管理者情報）
#[derive(Debug, Clone)]
pub struct AuthOutput {
    pub token:   String,
    pub user_id: i32,
    pub role:    AdminRole,
}

/// 認証ユースケーストレイト
#[async_trait]
pub trait AuthUseCase: Send + Sync {
    /// ユーザー名とパスワードでログインし、トークンを発行する
    ///
    /// # 戻り値
    ///
    /// - `Err(ApiError::Unauthorized)`: ユーザー名不明・パスワード不一致
    ///   （両者は区別できない）
    async fn login(&self, input: LoginInput) -> Result<AuthOutput, ApiError>;

    /// 新規管理者を登録し、トークンを発行する
    ///
    /// # 戻り値
    ///
    /// - `Err(ApiError::Validation)`: user_type が不正
    /// - `Err(ApiError::Conflict)`: username / email の重複
    async fn signup(&self, input: SignupInput) -> Result<AuthOutput, ApiError>;
}

/// 認証ユースケースの実装
pub struct AuthUseCaseImpl {
    admin_repository: Arc<dyn AdminRepository>,
    password_hasher:  Arc<dyn PasswordHasher>,
    jwt_keys:         Arc<JwtKeys>,
}

impl AuthUseCaseImpl {
    /// 新しいユースケースインスタンスを作成
    pub fn new(
        admin_repository: Arc<dyn AdminRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        jwt_keys: Arc<JwtKeys>,
    ) -> Self {
        Self {
            admin_repository,
            password_hasher,
            jwt_keys,
        }
    }

    /// ダミーハッシュで検証を実行する（タイミング攻撃対策）
    ///
    /// ユーザーが存在しない場合も実際のパスワード検証と同等の時間を
    /// 消費し、応答時間からユーザー名の存在を推測できないようにする。
    fn dummy_verification(&self, password: &PlainPassword) {
        // ダミーハッシュ（有効な bcrypt 形式、cost 12）
        let dummy_hash = PasswordHash::new(
            "$2b$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW",
        );
        // 結果は無視（エラーでも問題ない）
        let _ = self.password_hasher.verify(password, &dummy_hash);
    }

    fn issue_token(
        &self,
        admin_id: AdminId,
        role: AdminRole,
        now: DateTime<Utc>,
    ) -> Result<String, ApiError> {
        self.jwt_keys.issue(admin_id, role, now)
    }
}

#[async_trait]
impl AuthUseCase for AuthUseCaseImpl {
    async fn login(&self, input: LoginInput) -> Result<AuthOutput, ApiError> {
        let plain_password = PlainPassword::new(&input.password);

        // ユーザー名が値オブジェクトとして不正な場合も、存在しない
        // ユーザーと同じ経路（ダミー検証 + 401）をたどる
        let Ok(username) = Username::new(&input.username) else {
            self.dummy_verification(&plain_password);
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        let Some((admin, password_hash)) =
            self.admin_repository.find_by_username(&username).await?
        else {
            self.dummy_verification(&plain_password);
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        let result = self
            .password_hasher
            .verify(&plain_password, &password_hash)?;

        if result.is_mismatch() {
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.issue_token(admin.id(), admin.role(), Utc::now())?;

        Ok(AuthOutput {
            token,
            user_id: admin.id().value(),
            role: admin.role(),
        })
    }

    async fn signup(&self, input: SignupInput) -> Result<AuthOutput, ApiError> {
        let role = input
            .user_type
            .parse::<AdminRole>()
            .map_err(|_| ApiError::Validation("不正な管理者区分です".to_string()))?;

        let username = Username::new(&input.username)?;
        let email = Email::new(&input.email)?;

        let password_hash = self
            .password_hasher
            .hash(&PlainPassword::new(&input.password))?;

        let new_admin = NewAdmin {
            username,
            email,
            password_hash,
            role,
        };

        let admin = match self.admin_repository.insert(&new_admin).await {
            Ok(admin) => admin,
            // 一意制約違反は制約名からフィールドを特定し、409 で返す
            Err(e) => {
                if let Some(constraint) = e.as_unique_violation() {
                    let detail = if constraint.contains("username") {
                        "ユーザー名は既に使用されています"
                    } else if constraint.contains("email") {
                        "メールアドレスは既に使用されています"
                    } else {
                        "登録内容が既存の管理者と重複しています"
                    };
                    return Err(ApiError::Conflict(detail.to_string()));
                }
                return Err(e.into());
            }
        };

        let token = self.issue_token(admin.id(), admin.role(), Utc::now())?;

        Ok(AuthOutput {
            token,
            user_id: admin.id().value(),
            role: admin.role(),
        })
    }
}
