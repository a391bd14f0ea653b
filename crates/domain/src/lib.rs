//! # Mailgate ドメイン層
//!
//! メール送信リクエストを外部プロバイダーに渡すまでのドメインモデルを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! email-service → infra → domain
//! ```
//!
//! ドメイン層は HTTP クライアントやテンプレートエンジンに依存しない。
//!
//! ## モジュール構成
//!
//! - [`notification`] - 送信者・受信者・レンダリング結果・送信ペイロードとエラー

pub mod notification;

pub use notification::NotificationError;
