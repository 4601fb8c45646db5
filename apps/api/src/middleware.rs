//! # ミドルウェア
//!
//! 保護ルートの前段で動作するミドルウェアを定義する。

pub mod auth;

pub use auth::{AuthenticatedAdmin, Claims, JwtKeys, require_auth};
