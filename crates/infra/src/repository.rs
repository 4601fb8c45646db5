//! # リポジトリ
//!
//! ドメインエンティティの永続化を担当するリポジトリを集約する。
//!
//! ## 設計方針
//!
//! - **トレイトと実装の分離**: ユースケース層はトレイトに依存し、
//!   PostgreSQL 実装はインフラ層に閉じる
//! - **読み取りモデル**: 一覧・レポート系は JOIN 済みの読み取り専用
//!   構造体を返す（エンティティへの復元は行わない）

pub mod admin_repository;
pub mod donation_repository;
pub mod member_repository;
pub mod payment_repository;
pub mod report_repository;

pub use admin_repository::{AdminRepository, PostgresAdminRepository};
pub use donation_repository::{DonationRepository, DonationWithAdmin, PostgresDonationRepository};
pub use member_repository::{MemberRepository, MemberWithAdmin, PostgresMemberRepository};
pub use payment_repository::{PaymentRepository, PaymentWithAdmin, PostgresPaymentRepository};
pub use report_repository::{
    AdminPaymentSummary, CollectionDetailRow, DonationDetailRow, MonthlyTotal, PaidMemberRow,
    PoolBalance, PostgresReportRepository, ReportRepository, UnpaidMemberRow,
};
