//! Single-page UI served at `/`.
//!
//! The page is plain HTML and script compiled into the binary; it talks to
//! the JSON API with `fetch` and re-renders after every change.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Handler for GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_index_references_api() {
        let Html(body) = index().await;
        assert!(body.contains("/api/posts"));
        assert!(body.contains("/api/stats"));
    }
}
