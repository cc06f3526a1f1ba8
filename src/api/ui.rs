//! Minimal human-facing form flow.

use axum::extract::rejection::FormRejection;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Extension, Form, Router};
use serde::Deserialize;

use super::predict::run_blocking;
use super::AppState;
use crate::common::error::{SentimentError, SentimentResult};

const HOME: &str = r#"<html>
    <head>
        <title>Sentiment Analysis</title>
    </head>
    <body>
        <h2>Sentiment Analysis Demo</h2>
        <form action="/predict_ui" method="post">
            <textarea name="text" rows="4" cols="50"
                placeholder="Insert a sentence here..."></textarea>
            <br><br>
            <button type="submit">Analyze</button>
        </form>
    </body>
</html>
"#;

#[derive(Debug, Deserialize)]
struct PredictForm {
    text: String,
}

pub(super) fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(home))
        .route("/predict_ui", post(predict_ui))
}

async fn home() -> Html<&'static str> {
    Html(HOME)
}

async fn predict_ui(
    Extension(state): Extension<AppState>,
    form: Result<Form<PredictForm>, FormRejection>,
) -> SentimentResult<Html<String>> {
    let Form(form) = form.map_err(|rejection| SentimentError::invalid(rejection.body_text()))?;
    let text = form.text;
    let echoed = escape(&text);
    let label = run_blocking(state, move |service| service.predict_single(&text)).await?;

    Ok(Html(format!(
        r#"<html>
    <head>
        <title>Sentiment Result</title>
    </head>
    <body>
        <h2>Sentiment Analysis Result</h2>
        <p><strong>Text:</strong> {echoed}</p>
        <p><strong>Predicted sentiment:</strong> {label}</p>
        <br>
        <a href="/">Analyze another sentence</a>
    </body>
</html>
"#
    )))
}

/// Escape text so it can be embedded into HTML output.
fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<b>"Tom's" & co</b>"#),
            "&lt;b&gt;&quot;Tom&#39;s&quot; &amp; co&lt;/b&gt;"
        );
        assert_eq!(escape("plain text"), "plain text");
    }
}
