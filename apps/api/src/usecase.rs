//! # ユースケース層
//!
//! API サーバーのビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **トレイトベースの設計**: テスト可能性のためトレイトを定義し、
//!   ハンドラは `Arc<dyn …>` 経由で呼び出す
//! - **依存性注入**: リポジトリとパスワードハッシャーを外部から注入
//! - **薄いハンドラ**: ハンドラは薄く保ち、ロジックはユースケースに集約
//! - **時刻の注入**: 「当月」依存の処理は `now` を引数で受け取る
//!   （テストで固定時刻を使うため）

pub mod auth;
pub mod donation;
pub mod member;
pub mod payment;
pub mod report;

pub use auth::{AuthOutput, AuthUseCase, AuthUseCaseImpl, LoginInput, SignupInput};
pub use donation::{DonationInput, DonationUseCase, DonationUseCaseImpl};
pub use member::{MemberInput, MemberUseCase, MemberUseCaseImpl, ToggleStatusResult};
pub use payment::{PaymentInput, PaymentUseCase, PaymentUseCaseImpl};
pub use report::{MonthlyDetails, ReportUseCase, ReportUseCaseImpl};
