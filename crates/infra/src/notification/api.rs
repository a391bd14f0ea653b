//! プロバイダー API 送信実装
//!
//! トランザクションメール API（Brevo `POST /v3/smtp/email` 互換）に
//! JSON ペイロードを POST する。

use std::fmt;

use async_trait::async_trait;
use mailgate_domain::notification::{NotificationError, OutboundPayload};
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use super::NotificationSender;

/// 認証ヘッダー名
const API_KEY_HEADER: &str = "api-key";

/// プロバイダー API 送信
///
/// `reqwest::Client` をラップする。タイムアウトはクライアントのデフォルトに従う。
#[derive(Clone)]
pub struct ApiNotificationSender {
    client:   reqwest::Client,
    endpoint: String,
    api_key:  String,
}

impl ApiNotificationSender {
    /// 新しい送信インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `endpoint`: プロバイダーの送信エンドポイント URL
    /// - `api_key`: `api-key` ヘッダーに載せる認証情報
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client:   reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key:  api_key.into(),
        }
    }
}

impl fmt::Debug for ApiNotificationSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiNotificationSender")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl NotificationSender for ApiNotificationSender {
    async fn send(&self, payload: &OutboundPayload) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?;

        check_status(response).await?;

        tracing::debug!(
            to = %payload.recipient(),
            endpoint = %self.endpoint,
            "プロバイダーが送信を受け付けました"
        );
        Ok(())
    }
}

/// プロバイダーレスポンスのステータスを検査する
///
/// 2xx 以外はステータスとボディを [`NotificationError::Rejected`] に載せて返す。
pub(crate) async fn check_status(response: reqwest::Response) -> Result<(), NotificationError> {
    let status = response.status();

    if status.is_success() {
        return Ok(());
    }

    let body = response.text().await.unwrap_or_default();

    Err(NotificationError::Rejected {
        status: status.as_u16(),
        body,
    })
}
