//! # Mailgate インフラ層
//!
//! 外部メールプロバイダーとの通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **送信トレイト**: [`notification::NotificationSender`] でプロバイダー呼び出しを抽象化
//! - **プロバイダー API クライアント**: reqwest による HTTP POST 1 回の送信
//!
//! ## 依存関係
//!
//! ```text
//! email-service → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`notification`] - 送信トレイトとプロバイダー API 実装
//! - `mock` - テスト用モック（`test-utils` feature 有効時のみ）

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod notification;
