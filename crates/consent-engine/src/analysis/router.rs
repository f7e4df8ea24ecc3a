use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::service::{ConsentAnalyzer, ConsentRequest};

/// Router exposing the consent analysis endpoint.
pub fn analysis_router(analyzer: Arc<ConsentAnalyzer>) -> Router {
    Router::new()
        .route("/analyze-consent", post(analyze_handler))
        .with_state(analyzer)
}

pub(crate) async fn analyze_handler(
    State(analyzer): State<Arc<ConsentAnalyzer>>,
    axum::Json(request): axum::Json<ConsentRequest>,
) -> Response {
    match analyzer.analyze(request).await {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}
