//! Static file serving with rust-embed
//!
//! Embeds the stylesheet and frontend script into the binary.

use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "static/"]
pub struct StaticAssets;

/// Serve embedded static files at /static/*path
pub async fn serve_static(Path(path): Path<String>) -> Response {
    match StaticAssets::get(&path) {
        Some(content) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            (
                [
                    (header::CONTENT_TYPE, mime.as_ref().to_string()),
                    (header::CACHE_CONTROL, "public, max-age=3600".to_string()),
                ],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => {
            tracing::debug!(path = %path, "Static asset not found");
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assets_embedded() {
        assert!(StaticAssets::get("css/app.css").is_some());
        assert!(StaticAssets::get("js/app.js").is_some());
        assert!(StaticAssets::get("missing.txt").is_none());
    }
}
