//! # Email Service 設定
//!
//! 環境変数から Email Service サーバーの設定を読み込む。
//! 起動時に一度だけ構築し、以降は変更しない。

use std::{env, fmt, path::PathBuf};

use thiserror::Error;

/// プロバイダーエンドポイントのデフォルト
pub const DEFAULT_EMAIL_API_URL: &str = "https://api.brevo.com/v3/smtp/email";

/// 設定読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 必須の環境変数が未設定または空
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    /// ポート番号として解釈できない
    #[error("{name} は有効なポート番号である必要があります: {value:?}")]
    InvalidPort { name: &'static str, value: String },
}

/// Email Service サーバーの設定
#[derive(Clone)]
pub struct EmailServiceConfig {
    /// バインドアドレス
    pub host:          String,
    /// ポート番号
    pub port:          u16,
    /// プロバイダーの認証情報（`api-key` ヘッダー）
    pub api_key:       String,
    /// プロバイダーの送信エンドポイント URL
    pub email_api_url: String,
    /// テンプレート設定
    pub templates:     TemplateConfig,
}

/// テンプレートファイルの配置
///
/// `<dir>/<name>.txt.<extension>` と `<dir>/<name>.html.<extension>` を探す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateConfig {
    /// テンプレートディレクトリ
    pub dir:       PathBuf,
    /// テンプレートファイルの拡張子（ドットなし）
    pub extension: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            dir:       PathBuf::from("templates"),
            extension: "j2".to_string(),
        }
    }
}

impl EmailServiceConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意のキー参照関数から設定を読み込む
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("API_KEY")
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing("API_KEY"))?;

        let port = match lookup("EMAIL_PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidPort {
                name: "EMAIL_PORT",
                value,
            })?,
            None => 8000,
        };

        let defaults = TemplateConfig::default();

        Ok(Self {
            host: lookup("EMAIL_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            api_key,
            email_api_url: lookup("EMAIL_API_URL")
                .unwrap_or_else(|| DEFAULT_EMAIL_API_URL.to_string()),
            templates: TemplateConfig {
                dir:       lookup("TEMPLATE_DIR").map_or(defaults.dir, PathBuf::from),
                extension: lookup("TEMPLATE_EXTENSION").unwrap_or(defaults.extension),
            },
        })
    }
}

impl fmt::Debug for EmailServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailServiceConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &"[REDACTED]")
            .field("email_api_url", &self.email_api_url)
            .field("templates", &self.templates)
            .finish()
    }
}
