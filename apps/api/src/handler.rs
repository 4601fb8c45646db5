//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュールで re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、ビジネスロジックは usecase 層に委譲
//! - レスポンスは `{ "data": ... }` エンベロープで統一
//!
//! ## ハンドラ一覧
//!
//! - `health`: ヘルスチェック
//! - `auth`: 認証（ログイン・サインアップ）
//! - `member`: メンバー管理
//! - `payment`: 集金記録
//! - `donation`: 寄付記録
//! - `report`: 集計レポート

pub mod auth;
pub mod donation;
pub mod health;
pub mod member;
pub mod payment;
pub mod report;

pub use auth::{AuthState, login, signup};
pub use donation::{DonationState, list_donations, record_donation};
pub use health::{ReadinessState, health_check, readiness_check};
pub use member::{MemberState, create_member, list_members, toggle_member_status};
pub use payment::{PaymentState, list_payments, record_payment};
pub use report::{
    ReportState,
    admin_payments,
    collection_details,
    donation_details,
    monthly_collection,
    monthly_donations,
    paid_members,
    pool_balance,
    unpaid_members,
};
