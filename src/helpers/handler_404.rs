use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tracing::debug;

pub async fn page_not_found_handler(uri: Uri) -> impl IntoResponse {
    debug!("No route for {}", uri);
    (
        StatusCode::IM_A_TEAPOT,
        Json(json!({
            "error": format!("No chai at {}, try /chai-spots or /nearby-chai-spots", uri.path()),
            "kind": "not_found",
        })),
    )
}
