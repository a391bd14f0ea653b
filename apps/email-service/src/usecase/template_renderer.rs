//! # テンプレートレンダラー
//!
//! テンプレートディレクトリから text / HTML の 2 バリアントを探し、
//! tera テンプレートエンジンでリクエスト変数を埋め込む。
//!
//! ## 設計方針
//!
//! - **ファイル規約**: `<dir>/<name>.txt.<ext>` と `<dir>/<name>.html.<ext>`
//! - **自動エスケープ**: HTML バリアントのみ有効。text バリアントは無効
//! - **キャッシュなし**: 呼び出しごとにディスクから読み直してレンダリングする
//! - **未定義変数**: tera のデフォルト挙動に従う（レンダリングエラー）。
//!   省略されうる変数はテンプレート側で `default` フィルタを使う

use std::{
    error::Error as _,
    io,
    path::{Component, Path, PathBuf},
};

use mailgate_domain::notification::{NotificationError, RenderedContent};
use serde_json::{Map, Value};
use tera::{Context, Tera};

use crate::config::TemplateConfig;

/// テンプレートバリアント
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    Text,
    Html,
}

impl Variant {
    fn suffix(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Html => "html",
        }
    }

    fn autoescape(self) -> bool {
        matches!(self, Self::Html)
    }
}

/// テンプレートレンダラー
///
/// テンプレート名と変数から [`RenderedContent`] を生成する。
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    dir:       PathBuf,
    extension: String,
}

impl TemplateRenderer {
    pub fn new(config: &TemplateConfig) -> Self {
        Self {
            dir:       config.dir.clone(),
            extension: config.extension.clone(),
        }
    }

    /// テンプレートをレンダリングする
    ///
    /// 存在するバリアントのみを返す。どちらも無い場合は
    /// [`NotificationError::TemplateNotFound`] を返す。
    pub async fn render(
        &self,
        template_name: &str,
        variables: &Map<String, Value>,
    ) -> Result<RenderedContent, NotificationError> {
        if !is_safe_template_name(template_name) {
            return Err(NotificationError::TemplateNotFound(template_name.to_string()));
        }

        let context = Context::from_value(Value::Object(variables.clone()))
            .map_err(|e| NotificationError::TemplateFailed(error_chain(&e)))?;

        let text = self
            .render_variant(template_name, Variant::Text, &context)
            .await?;
        let html = self
            .render_variant(template_name, Variant::Html, &context)
            .await?;

        RenderedContent::from_parts(text, html)
            .ok_or_else(|| NotificationError::TemplateNotFound(template_name.to_string()))
    }

    /// 1 バリアント分を読み込んでレンダリングする
    ///
    /// ファイルが存在しなければ `Ok(None)`。
    async fn render_variant(
        &self,
        template_name: &str,
        variant: Variant,
        context: &Context,
    ) -> Result<Option<String>, NotificationError> {
        let path = self.variant_path(template_name, variant);

        let source = match tokio::fs::read_to_string(&path).await {
            Ok(source) => source,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(NotificationError::TemplateFailed(format!(
                    "{}: {e}",
                    path.display()
                )));
            }
        };

        let rendered = Tera::one_off(&source, context, variant.autoescape()).map_err(|e| {
            NotificationError::TemplateFailed(format!("{}: {}", path.display(), error_chain(&e)))
        })?;

        tracing::debug!(
            template = %template_name,
            variant = variant.suffix(),
            "テンプレートをレンダリングしました"
        );
        Ok(Some(rendered))
    }

    fn variant_path(&self, template_name: &str, variant: Variant) -> PathBuf {
        self.dir.join(format!(
            "{template_name}.{}.{}",
            variant.suffix(),
            self.extension
        ))
    }
}

/// テンプレートディレクトリの外を指さない名前かどうか
///
/// `auth/welcome` のようなサブディレクトリと `./welcome` の `.` は許可し、
/// 絶対パス・`..` を含む名前と、ファイル名部分を持たない名前（空文字・`.`）は拒否する。
fn is_safe_template_name(name: &str) -> bool {
    let mut has_name = false;
    for component in Path::new(name).components() {
        match component {
            Component::Normal(_) => has_name = true,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    has_name
}

/// tera のエラーは原因が source に積まれるため、連結して 1 行にする
fn error_chain(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    /// テンプレートファイルを書き込んだ一時ディレクトリとレンダラーを作る
    fn setup(files: &[(&str, &str)]) -> (TempDir, TemplateRenderer) {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, body).unwrap();
        }
        let renderer = TemplateRenderer::new(&TemplateConfig {
            dir:       dir.path().to_path_buf(),
            extension: "j2".to_string(),
        });
        (dir, renderer)
    }

    fn vars(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("オブジェクトを期待したが {other} を受け取った"),
        }
    }

    #[tokio::test]
    async fn 両バリアントがあれば両方をレンダリングする() {
        let (_dir, renderer) = setup(&[
            ("welcome.txt.j2", "Hello {{name}}"),
            ("welcome.html.j2", "<p>Hello {{ name }}</p>"),
        ]);

        let content = renderer
            .render("welcome", &vars(json!({"name": "Ann"})))
            .await
            .unwrap();

        assert_eq!(content.text(), Some("Hello Ann"));
        assert_eq!(content.html(), Some("<p>Hello Ann</p>"));
    }

    #[rstest]
    #[case::text_only("welcome.txt.j2", Some("Hello Ann"), None)]
    #[case::html_only("welcome.html.j2", None, Some("Hello Ann"))]
    #[tokio::test]
    async fn 片方のバリアントだけならそのパートだけを返す(
        #[case] file: &str,
        #[case] expected_text: Option<&str>,
        #[case] expected_html: Option<&str>,
    ) {
        let (_dir, renderer) = setup(&[(file, "Hello {{name}}")]);

        let content = renderer
            .render("welcome", &vars(json!({"name": "Ann"})))
            .await
            .unwrap();

        assert_eq!(content.text(), expected_text);
        assert_eq!(content.html(), expected_html);
    }

    #[tokio::test]
    async fn どちらも無ければテンプレート名付きのnot_foundを返す() {
        let (_dir, renderer) = setup(&[("other.txt.j2", "x")]);

        let result = renderer.render("welcome", &Map::new()).await;

        match result {
            Err(NotificationError::TemplateNotFound(name)) => assert_eq!(name, "welcome"),
            other => panic!("TemplateNotFound を期待したが {other:?} を受け取った"),
        }
    }

    #[tokio::test]
    async fn htmlは特殊文字をエスケープしtextはしない() {
        let (_dir, renderer) = setup(&[
            ("alert.txt.j2", "{{ payload }}"),
            ("alert.html.j2", "{{ payload }}"),
        ]);

        let content = renderer
            .render("alert", &vars(json!({"payload": "<script>"})))
            .await
            .unwrap();

        assert_eq!(content.text(), Some("<script>"));
        let html = content.html().unwrap();
        assert!(!html.contains("<script>"), "エスケープされていない: {html}");
        assert!(html.contains("&lt;script&gt;"), "html: {html}");
    }

    #[tokio::test]
    async fn ネストしたオブジェクトと配列を参照できる() {
        let (_dir, renderer) = setup(&[(
            "order.txt.j2",
            "{{ order.id }}:{% for item in order.items %}[{{ item }}]{% endfor %}:{{ vip }}",
        )]);

        let content = renderer
            .render(
                "order",
                &vars(json!({"order": {"id": 42, "items": ["pen", "ink"]}, "vip": true})),
            )
            .await
            .unwrap();

        assert_eq!(content.text(), Some("42:[pen][ink]:true"));
    }

    #[tokio::test]
    async fn 呼び出しごとにディスクから読み直す() {
        let (dir, renderer) = setup(&[("welcome.txt.j2", "v1 {{name}}")]);
        let variables = vars(json!({"name": "Ann"}));

        let first = renderer.render("welcome", &variables).await.unwrap();
        fs::write(dir.path().join("welcome.txt.j2"), "v2 {{name}}").unwrap();
        let second = renderer.render("welcome", &variables).await.unwrap();

        assert_eq!(first.text(), Some("v1 Ann"));
        assert_eq!(second.text(), Some("v2 Ann"));
    }

    #[tokio::test]
    async fn 未定義の変数はtemplate_failedになる() {
        let (_dir, renderer) = setup(&[("welcome.txt.j2", "Hello {{name}}")]);

        let result = renderer.render("welcome", &Map::new()).await;

        assert!(
            matches!(result, Err(NotificationError::TemplateFailed(_))),
            "TemplateFailed を期待したが {result:?} を受け取った"
        );
    }

    #[tokio::test]
    async fn defaultフィルタを付けた変数は省略できる() {
        let (_dir, renderer) = setup(&[(
            "welcome.txt.j2",
            r#"Hello {{ name | default(value="there") }}"#,
        )]);

        let content = renderer.render("welcome", &Map::new()).await.unwrap();

        assert_eq!(content.text(), Some("Hello there"));
    }

    #[tokio::test]
    async fn 同梱のwelcomeテンプレートは変数なしでもレンダリングできる() {
        let renderer = TemplateRenderer::new(&TemplateConfig {
            dir:       Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates"),
            extension: "j2".to_string(),
        });

        let content = renderer.render("welcome", &Map::new()).await.unwrap();

        assert!(content.text().unwrap().starts_with("Hello there,"));
        assert!(content.html().unwrap().contains("<p>Hello there,</p>"));
    }

    #[tokio::test]
    async fn 構文エラーはtemplate_failedになる() {
        let (_dir, renderer) = setup(&[("broken.html.j2", "{% if %}")]);

        let result = renderer.render("broken", &Map::new()).await;

        assert!(matches!(result, Err(NotificationError::TemplateFailed(_))));
    }

    #[tokio::test]
    async fn サブディレクトリのテンプレートを解決できる() {
        let (_dir, renderer) = setup(&[("auth/reset.txt.j2", "code={{ code }}")]);

        let content = renderer
            .render("auth/reset", &vars(json!({"code": "123456"})))
            .await
            .unwrap();

        assert_eq!(content.text(), Some("code=123456"));
    }

    #[rstest]
    #[case::leading_dot("./welcome")]
    #[case::inner_dot("auth/./reset")]
    #[tokio::test]
    async fn カレントディレクトリ表記を含む名前も解決できる(#[case] name: &str) {
        let (_dir, renderer) = setup(&[
            ("welcome.txt.j2", "Hello {{ name }}"),
            ("auth/reset.txt.j2", "Hello {{ name }}"),
        ]);

        let content = renderer
            .render(name, &vars(json!({"name": "Ann"})))
            .await
            .unwrap();

        assert_eq!(content.text(), Some("Hello Ann"));
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("./")]
    #[case("../secret")]
    #[case("/etc/passwd")]
    #[case("auth/../../secret")]
    #[tokio::test]
    async fn ディレクトリ外を指す名前はnot_foundになる(#[case] name: &str) {
        let (_dir, renderer) = setup(&[("welcome.txt.j2", "x")]);

        let result = renderer.render(name, &Map::new()).await;

        assert!(matches!(result, Err(NotificationError::TemplateNotFound(_))));
    }
}
