//! # メール送信ハンドラ
//!
//! ```text
//! POST /send
//! ```
//!
//! ## リクエスト例
//!
//! ```json
//! {
//!   "to": "a@b.com",
//!   "subject": "Hi",
//!   "template": "welcome",
//!   "variables": {"name": "Ann"}
//! }
//! ```
//!
//! ## レスポンス例
//!
//! ```json
//! {"status": "sent", "to": "a@b.com", "template": "welcome"}
//! ```

use std::sync::Arc;

use axum::{Json, extract::State};
use mailgate_domain::notification::EmailRequest;
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, usecase::EmailUseCase};

/// メール送信 API の共有状態
pub struct EmailState {
    pub usecase: EmailUseCase,
}

/// 送信成功レスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendEmailResponse {
    pub status:   String,
    pub to:       String,
    pub template: String,
}

impl SendEmailResponse {
    fn sent(request: EmailRequest) -> Self {
        Self {
            status:   "sent".to_string(),
            to:       request.to,
            template: request.template,
        }
    }
}

/// POST /send
///
/// テンプレートをレンダリングしてプロバイダーに送信する。
/// 失敗時は原因にかかわらず 500 を返す。
#[tracing::instrument(
    name = "http.send_email",
    skip(state, request),
    fields(to = %request.to, template = %request.template)
)]
pub async fn send_email(
    State(state): State<Arc<EmailState>>,
    Json(request): Json<EmailRequest>,
) -> Result<Json<SendEmailResponse>, ApiError> {
    state.usecase.send(&request).await?;

    tracing::info!("メールを送信しました");

    Ok(Json(SendEmailResponse::sent(request)))
}
