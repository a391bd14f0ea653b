//! # Email Service サーバー
//!
//! 名前付きテンプレートからメール本文を生成し、外部のトランザクションメール API
//! （Brevo 互換）に 1 回だけ POST する小さなサービス。
//!
//! ## 処理の流れ
//!
//! ```text
//! POST /send → テンプレートレンダリング → ペイロード組み立て → プロバイダー送信 → 応答
//! ```
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `API_KEY` | **Yes** | プロバイダーの認証情報 |
//! | `EMAIL_API_URL` | No | 送信エンドポイント（デフォルト: Brevo） |
//! | `EMAIL_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `EMAIL_PORT` | No | ポート番号（デフォルト: `8000`） |
//! | `TEMPLATE_DIR` | No | テンプレートディレクトリ（デフォルト: `templates`） |
//! | `TEMPLATE_EXTENSION` | No | テンプレート拡張子（デフォルト: `j2`） |
//! | `LOG_FORMAT` | No | `json` または `pretty` |
//!
//! ## 起動方法
//!
//! ```bash
//! API_KEY=xkeysib-... cargo run -p mailgate-email-service
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use mailgate_email_service::{
    app_builder::build_app,
    config::EmailServiceConfig,
    handler::EmailState,
    usecase::{EmailUseCase, TemplateRenderer},
};
use mailgate_infra::notification::ApiNotificationSender;
use mailgate_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;
use tracing::Instrument as _;

/// Email Service サーバーのエントリーポイント
///
/// `API_KEY` が無い場合は起動せずにエラー終了する。
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let app_span = init_tracing(&TracingConfig::from_env("email-service"));

    run().instrument(app_span).await
}

/// 設定を読み込み、サーバーを起動する
async fn run() -> anyhow::Result<()> {
    let config = EmailServiceConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        endpoint = %config.email_api_url,
        template_dir = %config.templates.dir.display(),
        "Email Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    let sender = ApiNotificationSender::new(&config.email_api_url, &config.api_key);
    let renderer = TemplateRenderer::new(&config.templates);
    let state = Arc::new(EmailState {
        usecase: EmailUseCase::new(Arc::new(sender), renderer),
    });

    let app = build_app(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Email Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
