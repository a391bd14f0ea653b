//! # ユースケース
//!
//! メール送信の業務フローを実装する。
//!
//! - [`template_renderer`] - テンプレートファイルの解決とレンダリング
//! - [`email`] - レンダリング → ペイロード組み立て → 送信の統合

pub mod email;
pub mod template_renderer;

pub use email::EmailUseCase;
pub use template_renderer::TemplateRenderer;
