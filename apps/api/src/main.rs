//! # Khidmat API サーバー
//!
//! 互助基金（khidmat）のメンバー・集金・寄付を管理する REST API サーバー。
//!
//! ## 役割
//!
//! - **認証**: 管理者のログイン・サインアップと JWT 発行
//! - **メンバー管理**: 基金加入者の登録・一覧・ステータス管理
//! - **収支記録**: メンバーからの集金と受給者への寄付の記録
//! - **レポート**: 月次の集金・寄付の集計とプール残高
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `API_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `API_PORT` | **Yes** | ポート番号 |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `JWT_SECRET` | **Yes** | トークン署名鍵 |
//! | `CORS_ALLOW_ORIGIN` | No | 許可するオリジン（デフォルト: `*`） |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境
//! cargo run -p khidmat-api
//!
//! # 本番環境
//! API_PORT=8080 DATABASE_URL=postgres://... JWT_SECRET=... cargo run -p khidmat-api --release
//! ```

mod config;
mod error;
mod handler;
mod middleware;
mod usecase;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post, put},
};
use config::ApiConfig;
use handler::{
    AuthState,
    DonationState,
    MemberState,
    PaymentState,
    ReadinessState,
    ReportState,
    admin_payments,
    collection_details,
    create_member,
    donation_details,
    health_check,
    list_donations,
    list_members,
    list_payments,
    login,
    monthly_collection,
    monthly_donations,
    paid_members,
    pool_balance,
    readiness_check,
    record_donation,
    record_payment,
    signup,
    toggle_member_status,
    unpaid_members,
};
use khidmat_infra::{
    BcryptPasswordHasher,
    PasswordHasher,
    db,
    repository::{
        AdminRepository,
        DonationRepository,
        MemberRepository,
        PaymentRepository,
        PostgresAdminRepository,
        PostgresDonationRepository,
        PostgresMemberRepository,
        PostgresPaymentRepository,
        PostgresReportRepository,
        ReportRepository,
    },
};
use khidmat_shared::{canonical_log::CanonicalLogLineLayer, observability::TracingConfig};
use middleware::{JwtKeys, require_auth};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use usecase::{
    AuthUseCaseImpl,
    DonationUseCaseImpl,
    MemberUseCaseImpl,
    PaymentUseCaseImpl,
    ReportUseCaseImpl,
};

/// API サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    let tracing_config = TracingConfig::from_env("api");
    khidmat_shared::observability::init_tracing(tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = "api").entered();

    // 設定読み込み
    let config = ApiConfig::from_env().expect("設定の読み込みに失敗しました");

    tracing::info!(
        "API サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // データベース接続プールを作成
    let pool = db::create_pool(&config.database_url)
        .await
        .expect("データベース接続に失敗しました");
    tracing::info!("データベースに接続しました");

    // マイグレーション実行
    db::run_migrations(&pool)
        .await
        .expect("マイグレーションの実行に失敗しました");
    tracing::info!("マイグレーションを適用しました");

    // Readiness Check 用 State（pool が move される前に clone）
    let readiness_state = ReadinessState { pool: pool.clone() };

    // 依存コンポーネントを初期化
    let jwt_keys = Arc::new(JwtKeys::new(&config.jwt_secret));

    let admin_repo: Arc<dyn AdminRepository> =
        Arc::new(PostgresAdminRepository::new(pool.clone()));
    let member_repo: Arc<dyn MemberRepository> =
        Arc::new(PostgresMemberRepository::new(pool.clone()));
    let payment_repo: Arc<dyn PaymentRepository> =
        Arc::new(PostgresPaymentRepository::new(pool.clone()));
    let donation_repo: Arc<dyn DonationRepository> =
        Arc::new(PostgresDonationRepository::new(pool.clone()));
    let report_repo: Arc<dyn ReportRepository> = Arc::new(PostgresReportRepository::new(pool));
    let password_hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptPasswordHasher::new());

    let auth_state = Arc::new(AuthState {
        usecase: Arc::new(AuthUseCaseImpl::new(
            admin_repo,
            password_hasher,
            jwt_keys.clone(),
        )),
    });
    let member_state = Arc::new(MemberState {
        usecase: Arc::new(MemberUseCaseImpl::new(member_repo)),
    });
    let payment_state = Arc::new(PaymentState {
        usecase: Arc::new(PaymentUseCaseImpl::new(payment_repo)),
    });
    let donation_state = Arc::new(DonationState {
        usecase: Arc::new(DonationUseCaseImpl::new(donation_repo)),
    });
    let report_state = Arc::new(ReportState {
        usecase: Arc::new(ReportUseCaseImpl::new(report_repo)),
    });

    // 認証必須のルート
    let protected = Router::new()
        .merge(
            Router::new()
                .route("/api/members", post(create_member).get(list_members))
                .route("/api/members/{id}/toggle-status", put(toggle_member_status))
                .with_state(member_state),
        )
        .merge(
            Router::new()
                .route("/api/payments", post(record_payment).get(list_payments))
                .with_state(payment_state),
        )
        .merge(
            Router::new()
                .route("/api/donations", post(record_donation).get(list_donations))
                .with_state(donation_state),
        )
        .merge(
            Router::new()
                .route("/api/reports/admin-payments", get(admin_payments))
                .route("/api/reports/paid-members", get(paid_members))
                .route("/api/reports/unpaid-members", get(unpaid_members))
                .route("/api/reports/monthly-collection", get(monthly_collection))
                .route("/api/reports/monthly-donations", get(monthly_donations))
                .route(
                    "/api/reports/monthly-collection-details",
                    get(collection_details),
                )
                .route(
                    "/api/reports/monthly-donation-details",
                    get(donation_details),
                )
                .route("/api/reports/pool-balance", get(pool_balance))
                .with_state(report_state),
        )
        .layer(axum::middleware::from_fn_with_state(
            jwt_keys,
            require_auth,
        ));

    // ルーター構築
    let app = Router::new()
        .route("/health", get(health_check))
        .merge(
            Router::new()
                .route("/health/ready", get(readiness_check))
                .with_state(readiness_state),
        )
        .merge(
            Router::new()
                .route("/api/auth/login", post(login))
                .route("/api/auth/signup", post(signup))
                .with_state(auth_state),
        )
        .merge(protected)
        .layer(build_cors_layer(&config.cors_allow_origin))
        .layer(CanonicalLogLineLayer)
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("アドレスのパースに失敗しました");

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("API サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// CORS レイヤーを構築する
///
/// `CORS_ALLOW_ORIGIN` が `*` の場合は全オリジンを許可する。
fn build_cors_layer(allow_origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if allow_origin == "*" {
        layer.allow_origin(tower_http::cors::Any)
    } else {
        let origin = allow_origin
            .parse::<HeaderValue>()
            .expect("CORS_ALLOW_ORIGIN のパースに失敗しました");
        layer.allow_origin(origin)
    }
}
