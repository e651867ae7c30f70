//! Template rendering

use std::sync::Arc;

#[cfg(test)]
use mockall::mock;

use crate::domain::notifications::{errors::TemplateError, request::TemplateParams};

/// Line breaks that escaping engines turn into text
const ESCAPED_LINE_BREAK: &str = "&lt;br /&gt;";

/// A line break
const LINE_BREAK: &str = "<br />";

/// External template engine
pub trait TemplateEngine: Send + Sync + 'static {
    /// Renders the template registered under `name` with `params`.
    ///
    /// # Returns
    /// - [`Ok`] with the rendered text.
    /// - [`Err`] with [`TemplateError::TemplateNotFound`] if no such template exists, or
    ///   [`TemplateError::RenderError`] if the engine fails.
    fn render(&self, name: &str, params: &TemplateParams) -> Result<String, TemplateError>;
}

#[cfg(test)]
mock! {
    pub TemplateEngine {}

    impl TemplateEngine for TemplateEngine {
        fn render(&self, name: &str, params: &TemplateParams) -> Result<String, TemplateError>;
    }
}

/// Renders templates through a [`TemplateEngine`]
#[derive(Debug)]
pub struct TemplateRenderer<E>
where
    E: TemplateEngine,
{
    engine: Arc<E>,
}

impl<E> Clone for TemplateRenderer<E>
where
    E: TemplateEngine,
{
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<E> TemplateRenderer<E>
where
    E: TemplateEngine,
{
    /// Creates a new renderer
    pub fn new(engine: Arc<E>) -> Self {
        Self { engine }
    }

    /// Renders `name` with `params`.
    ///
    /// Escaped `<br />` tags coming from raw parameter values are turned back
    /// into line breaks. No other entity is unescaped.
    pub fn render(&self, name: &str, params: &TemplateParams) -> Result<String, TemplateError> {
        let rendered = self.engine.render(name, params)?;

        Ok(rendered.replace(ESCAPED_LINE_BREAK, LINE_BREAK))
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use serde_json::json;
    use testresult::TestResult;

    use crate::domain::notifications::tests::MockTemplateEngine;

    use super::*;

    fn params() -> TemplateParams {
        let mut params = TemplateParams::new();
        params.insert("name".to_string(), json!("Ann"));
        params
    }

    #[test]
    fn test_render_passes_name_and_params() -> TestResult {
        let mut engine = MockTemplateEngine::new();

        engine
            .expect_render()
            .withf(|name, params| name == "welcome" && params.get("name") == Some(&json!("Ann")))
            .times(1)
            .returning(|_, _| Ok("<p>Hi Ann</p>".to_string()));

        let renderer = TemplateRenderer::new(Arc::new(engine));

        assert_eq!(renderer.render("welcome", &params())?, "<p>Hi Ann</p>");

        Ok(())
    }

    #[test]
    fn test_render_unescapes_line_breaks_only() -> TestResult {
        let mut engine = MockTemplateEngine::new();

        engine.expect_render().returning(|_, _| {
            Ok("<p>one&lt;br /&gt;two &lt;b&gt; &amp; &lt;br&gt;</p>".to_string())
        });

        let renderer = TemplateRenderer::new(Arc::new(engine));

        assert_eq!(
            renderer.render("notification", &TemplateParams::new())?,
            "<p>one<br />two &lt;b&gt; &amp; &lt;br&gt;</p>"
        );

        Ok(())
    }

    #[test]
    fn test_render_propagates_missing_template() {
        let mut engine = MockTemplateEngine::new();

        engine
            .expect_render()
            .returning(|name, _| Err(TemplateError::TemplateNotFound(name.to_string())));

        let renderer = TemplateRenderer::new(Arc::new(engine));

        assert!(matches!(
            renderer.render("nope", &TemplateParams::new()),
            Err(TemplateError::TemplateNotFound(name)) if name == "nope"
        ));
    }

    #[test]
    fn test_render_propagates_engine_failure() {
        let mut engine = MockTemplateEngine::new();

        engine.expect_render().returning(|name, _| {
            Err(TemplateError::RenderError {
                name: name.to_string(),
                source: anyhow!("boom"),
            })
        });

        let renderer = TemplateRenderer::new(Arc::new(engine));

        assert!(matches!(
            renderer.render("welcome", &params()),
            Err(TemplateError::RenderError { .. })
        ));
    }
}
