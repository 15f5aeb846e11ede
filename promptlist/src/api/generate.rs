//! Playlist generation endpoint

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    routing::post,
    Json, Router,
};

use crate::error::ApiResult;
use crate::models::{Playlist, PromptRequest};
use crate::AppState;

/// POST /generate
///
/// Body `{"prompt": "..."}`, read only when sent as `application/json`. Any
/// other content type, invalid JSON, or a non-string prompt all count as
/// "prompt missing" and produce the same 400 as an empty prompt.
pub async fn generate_playlist(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<Playlist>> {
    let request = if is_json(&headers) {
        PromptRequest::from_json_body(&body)
    } else {
        PromptRequest::default()
    };
    let playlist = state.generator.generate(&request).await?;
    Ok(Json(playlist))
}

/// Build playlist generation routes
pub fn generate_routes() -> Router<AppState> {
    Router::new().route("/generate", post(generate_playlist))
}

/// `application/json`, ignoring case and parameters such as `charset`
fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_content_type(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_json_content_type_detection() {
        assert!(is_json(&with_content_type("application/json")));
        assert!(is_json(&with_content_type("Application/JSON; charset=utf-8")));
        assert!(!is_json(&with_content_type("text/plain")));
        assert!(!is_json(&with_content_type("application/x-www-form-urlencoded")));
        assert!(!is_json(&HeaderMap::new()));
    }
}
