use axum::{extract::State, http::StatusCode, routing::get, Router};
use tracing::{error, instrument};

use super::services::new_upload_key;
use crate::state::AppState;

pub fn upload_routes() -> Router<AppState> {
    Router::new().route("/image-upload-url", get(image_upload_url))
}

/// GET /image-upload-url: a one-time URL the browser can PUT an image to.
#[instrument(skip(state))]
pub async fn image_upload_url(
    State(state): State<AppState>,
) -> Result<String, (StatusCode, String)> {
    let key = new_upload_key();
    state
        .storage
        .presign_put(&key, state.config.object_store.upload_ttl_secs)
        .await
        .map_err(|e| {
            error!(error = %e, %key, "presign failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "presign failed".to_string(),
            )
        })
}
