//! # 通知送信
//!
//! 組み立て済みペイロードを外部プロバイダーに送る。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `NotificationSender` でプロバイダー呼び出しを差し替え可能にする
//! - **1 リクエスト 1 送信**: リトライ・キューイングは行わない

mod api;

use async_trait::async_trait;
pub use api::ApiNotificationSender;
use mailgate_domain::notification::{NotificationError, OutboundPayload};

/// メール送信トレイト
///
/// 本番ではプロバイダー API 実装、テストではモックを注入する。
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// ペイロードを送信する
    async fn send(&self, payload: &OutboundPayload) -> Result<(), NotificationError>;
}
