//! # メール送信ユースケース
//!
//! テンプレートレンダリング → ペイロード組み立て → プロバイダー送信を統合する。
//!
//! ## 設計方針
//!
//! - **同期送信**: プロバイダーの応答を待ってから結果を返す。キューイング・リトライはしない
//! - **依存性注入**: `NotificationSender` は trait で抽象化し、テストではモックを使う
//! - **失敗は呼び出し元へ**: どの段階の失敗も `NotificationError` としてそのまま返す

use std::sync::Arc;

use mailgate_domain::notification::{
    EmailRequest,
    NotificationError,
    OutboundPayload,
    Sender,
};
use mailgate_infra::notification::NotificationSender;

use super::TemplateRenderer;

/// メール送信ユースケース
pub struct EmailUseCase {
    sender:   Arc<dyn NotificationSender>,
    renderer: TemplateRenderer,
}

impl EmailUseCase {
    pub fn new(sender: Arc<dyn NotificationSender>, renderer: TemplateRenderer) -> Self {
        Self { sender, renderer }
    }

    /// リクエストをレンダリングしてプロバイダーに送信する
    pub async fn send(&self, request: &EmailRequest) -> Result<(), NotificationError> {
        let content = self
            .renderer
            .render(&request.template, &request.variables)
            .await?;

        let payload = OutboundPayload::assemble(
            Sender::NOTIFICATIONS,
            request.to.as_str(),
            request.subject.as_str(),
            content,
        );

        self.sender.send(&payload).await
    }
}
