//! # 通知
//!
//! メール送信に関するドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 |
//! |---|------------|
//! | [`EmailRequest`] | 送信リクエスト（宛先・件名・テンプレート名・変数） |
//! | [`RenderedContent`] | テンプレートバリアント（text / HTML）のレンダリング結果 |
//! | [`OutboundPayload`] | プロバイダーに送る JSON ボディ |
//! | [`Sender`] | 固定の送信者アイデンティティ |
//!
//! ## 設計方針
//!
//! - **単一受信者**: 送信ペイロードの `to` は常に 1 件
//! - **欠けたパートは省略**: text / HTML のうち存在しないものは空文字ではなく JSON から除外
//! - **アドレス検証はしない**: 宛先の構文チェックはプロバイダーの責務

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// 通知送信エラー
///
/// テンプレート解決・レンダリング・送信の各段階で発生するエラー。
/// 呼び出し元への返却時はいずれも同じ扱い（500）になる。
#[derive(Debug, Error)]
pub enum NotificationError {
    /// text / HTML どちらのテンプレートも存在しない
    #[error("テンプレートが見つかりません: {0}")]
    TemplateNotFound(String),

    /// テンプレートの読み込みまたはレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),

    /// 通信レベルの失敗（接続拒否、タイムアウト、名前解決失敗）
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    /// プロバイダーが 2xx 以外を返した
    #[error("プロバイダーが送信を拒否しました (status {status}): {body}")]
    Rejected { status: u16, body: String },
}

/// メール送信リクエスト
///
/// `variables` はテンプレートにそのまま渡される。ネストしたオブジェクトや配列も可。
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmailRequest {
    /// 宛先メールアドレス
    pub to:        String,
    /// 件名
    pub subject:   String,
    /// テンプレート名（例: `"welcome"`）
    pub template:  String,
    /// テンプレート変数
    #[serde(default)]
    pub variables: Map<String, Value>,
}

/// 送信者アイデンティティ
///
/// リクエストごとには変更できない。[`Sender::NOTIFICATIONS`] を使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Sender {
    pub name:  &'static str,
    pub email: &'static str,
}

impl Sender {
    /// 通知メールの送信者
    pub const NOTIFICATIONS: Sender = Sender {
        name:  "Jay0.dev Notifications",
        email: "noreply@jay0.dev",
    };
}

/// 受信者
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipient {
    pub email: String,
}

/// レンダリング済みのメール本文
///
/// text / HTML の少なくとも一方を必ず持つ。
/// 両方欠けた値は [`RenderedContent::from_parts`] で構築できない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedContent {
    #[serde(rename = "textContent", skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "htmlContent", skip_serializing_if = "Option::is_none")]
    html: Option<String>,
}

impl RenderedContent {
    /// text / HTML パートから構築する
    ///
    /// 両方 `None` の場合は `None` を返す。
    pub fn from_parts(text: Option<String>, html: Option<String>) -> Option<Self> {
        if text.is_none() && html.is_none() {
            return None;
        }
        Some(Self { text, html })
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }
}

/// プロバイダーへの送信ペイロード
///
/// ```json
/// {
///   "sender": {"name": "...", "email": "..."},
///   "to": [{"email": "a@b.com"}],
///   "subject": "Hi",
///   "textContent": "Hello Ann"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundPayload {
    sender:  Sender,
    to:      Vec<Recipient>,
    subject: String,
    #[serde(flatten)]
    content: RenderedContent,
}

impl OutboundPayload {
    /// 送信者・宛先・件名・本文から送信ペイロードを組み立てる
    pub fn assemble(
        sender: Sender,
        recipient: impl Into<String>,
        subject: impl Into<String>,
        content: RenderedContent,
    ) -> Self {
        Self {
            sender,
            to: vec![Recipient {
                email: recipient.into(),
            }],
            subject: subject.into(),
            content,
        }
    }

    pub fn sender(&self) -> &Sender {
        &self.sender
    }

    /// 宛先（常に 1 件）
    pub fn recipient(&self) -> &str {
        &self.to[0].email
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn content(&self) -> &RenderedContent {
        &self.content
    }
}
