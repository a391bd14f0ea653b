//! # ルーター構築
//!
//! main.rs と統合テストで同じレイヤー構成を使うため、ルーター構築をここに集約する。
//!
//! ## レイヤー配置
//!
//! ```text
//! SetRequestId → TraceLayer → PropagateRequestId → handler
//! ```

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use mailgate_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::handler::{EmailState, health_check, send_email};

/// アプリケーションのルーターを構築する
pub fn build_app(state: Arc<EmailState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/send", post(send_email))
        .with_state(state)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
