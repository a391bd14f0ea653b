//! # Email Service エラー定義
//!
//! HTTP 境界でのエラーと、HTTP レスポンスへの変換を定義する。
//!
//! テンプレート未検出・レンダリング失敗・プロバイダー拒否・通信失敗は
//! すべて 500 に集約し、失敗原因のメッセージを `detail` に載せる。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mailgate_domain::NotificationError;
use mailgate_shared::ErrorResponse;
use thiserror::Error;

/// Email Service で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
    /// レンダリング・送信の失敗
    #[error(transparent)]
    Notification(#[from] NotificationError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = self.to_string();

        match &self {
            ApiError::Notification(NotificationError::Rejected { status, .. }) => {
                tracing::error!(provider.status = status, error = %detail, "メール送信に失敗");
            }
            ApiError::Notification(_) => {
                tracing::error!(error = %detail, "メール送信に失敗");
            }
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal_error(detail)),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(NotificationError::TemplateNotFound("welcome".to_string()), "welcome")]
    #[case(NotificationError::TemplateFailed("unexpected end".to_string()), "unexpected end")]
    #[case(NotificationError::SendFailed("connection refused".to_string()), "connection refused")]
    #[case(
        NotificationError::Rejected { status: 401, body: "Key not found".to_string() },
        "Key not found"
    )]
    #[tokio::test]
    async fn すべての失敗が500とdetailに変換される(
        #[case] error: NotificationError,
        #[case] expected_detail: &str,
    ) {
        let response = ApiError::from(error).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.status, 500);
        assert!(
            error.detail.contains(expected_detail),
            "detail: {}",
            error.detail
        );
    }
}
