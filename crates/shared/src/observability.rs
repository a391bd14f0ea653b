//! # ログとリクエスト追跡
//!
//! Email Service のログ出力を初期化し、各リクエストに追跡用の ID を振る。
//! 出力形式は `LOG_FORMAT`（`json` / `pretty`）で選ぶ。

/// ログの出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 1 行 1 JSON。ログ収集基盤に流すとき用
    Json,
    /// 端末向けの整形出力
    #[default]
    Pretty,
}

impl LogFormat {
    /// `LOG_FORMAT` の値を解釈する
    ///
    /// 未設定なら `Pretty`。知らない値も `Pretty` とし、stderr に 1 行警告を出す。
    pub fn from_setting(value: Option<&str>) -> Self {
        match value {
            None => Self::default(),
            Some("json") => Self::Json,
            Some("pretty") => Self::Pretty,
            Some(other) => {
                eprintln!("LOG_FORMAT={other:?} is not supported; using pretty output");
                Self::Pretty
            }
        }
    }
}

/// ログ初期化の入力
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// ルートスパン `app` の `service` に載る名前
    pub service_name: String,
    pub log_format:   LogFormat,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
        }
    }

    /// 出力形式だけを `LOG_FORMAT` から決める
    pub fn from_env(service_name: impl Into<String>) -> Self {
        let setting = std::env::var("LOG_FORMAT").ok();
        Self::new(service_name, LogFormat::from_setting(setting.as_deref()))
    }
}

/// グローバル subscriber を登録し、ルートスパン `app` を返す
///
/// レベルは `RUST_LOG` で絞る（未設定時 `info,mailgate=debug`）。
/// サーバー本体を返り値のスパンで `instrument` すると、全ログに `service` が付く。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) -> tracing::Span {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,mailgate=debug".into());

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info_span!("app", service = %config.service_name)
}

/// UUID v7 で Request ID を生成する
///
/// `SetRequestIdLayer::x_request_id(MakeRequestUuidV7)` として使う。
/// クライアントが `x-request-id` を送ってきた場合は生成されない。
#[cfg(feature = "observability")]
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV7;

#[cfg(feature = "observability")]
impl tower_http::request_id::MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(
        &mut self,
        _request: &http::Request<B>,
    ) -> Option<tower_http::request_id::RequestId> {
        let value = http::HeaderValue::from_str(&uuid::Uuid::now_v7().to_string()).ok()?;
        Some(tower_http::request_id::RequestId::new(value))
    }
}

/// リクエストスパンを作成する
///
/// `TraceLayer::make_span_with` に渡す。`request_id` はヘッダーから取得する。
#[cfg(feature = "observability")]
pub fn make_request_span<B>(request: &http::Request<B>) -> tracing::Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}
