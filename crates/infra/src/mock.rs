//! # テスト用モック送信
//!
//! ユースケース・ハンドラのテストで使用するインメモリ送信実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! mailgate-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mailgate_domain::notification::{NotificationError, OutboundPayload};

use crate::notification::NotificationSender;

/// 送信されたペイロードを記録するモック
///
/// `rejecting` で作成した場合は、常に指定ステータスで拒否する。
#[derive(Clone, Default)]
pub struct MockNotificationSender {
    sent:      Arc<Mutex<Vec<OutboundPayload>>>,
    rejection: Option<(u16, String)>,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 常に `NotificationError::Rejected` を返すモックを作成
    pub fn rejecting(status: u16, body: impl Into<String>) -> Self {
        Self {
            sent:      Arc::new(Mutex::new(Vec::new())),
            rejection: Some((status, body.into())),
        }
    }

    /// 受け付けたペイロード一覧
    pub fn sent(&self) -> Vec<OutboundPayload> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send(&self, payload: &OutboundPayload) -> Result<(), NotificationError> {
        if let Some((status, body)) = &self.rejection {
            return Err(NotificationError::Rejected {
                status: *status,
                body:   body.clone(),
            });
        }
        self.sent.lock().unwrap().push(payload.clone());
        Ok(())
    }
}
