//! # API サーバー設定
//!
//! 環境変数から API サーバーの設定を読み込む。

use std::env;

/// API サーバーの設定
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// バインドアドレス
    pub host:              String,
    /// ポート番号
    pub port:              u16,
    /// データベース接続 URL
    pub database_url:      String,
    /// JWT 署名シークレット
    pub jwt_secret:        String,
    /// CORS で許可するオリジン（`*` で全許可）
    pub cors_allow_origin: String,
}

impl ApiConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            host:              env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port:              env::var("API_PORT")
                .expect("API_PORT が設定されていません（.env.example を参照してください）")
                .parse()
                .expect("API_PORT は有効なポート番号である必要があります"),
            database_url:      env::var("DATABASE_URL")
                .expect("DATABASE_URL が設定されていません（.env.example を参照してください）"),
            jwt_secret:        env::var("JWT_SECRET")
                .expect("JWT_SECRET が設定されていません（.env.example を参照してください）"),
            cors_allow_origin: env::var("CORS_ALLOW_ORIGIN").unwrap_or_else(|_| "*".to_string()),
        })
    }
}
