use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{MarkerForm, UserQuery};
use crate::{
    app::store_fault,
    auth::AuthUser,
    datastore::UserMarker,
    sanitize,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/user-markers", get(list_markers))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/user-markers", post(create_marker))
}

#[instrument(skip(state))]
pub async fn list_markers(
    State(state): State<AppState>,
    Query(q): Query<UserQuery>,
) -> Result<Json<Vec<UserMarker>>, (StatusCode, String)> {
    let Some(user) = q.user.filter(|u| !u.is_empty()) else {
        return Ok(Json(Vec::new()));
    };
    let markers = state.datastore.get_markers(&user).await.map_err(store_fault)?;
    Ok(Json(markers))
}

#[instrument(skip(state, form))]
pub async fn create_marker(
    State(state): State<AppState>,
    AuthUser(email): AuthUser,
    Form(form): Form<MarkerForm>,
) -> Result<StatusCode, (StatusCode, String)> {
    let Some((lat, lng)) = form.coordinates() else {
        warn!(%email, lat = ?form.lat, lng = ?form.lng, "invalid marker coordinates");
        return Err((StatusCode::BAD_REQUEST, "Invalid coordinates".into()));
    };

    let marker = UserMarker {
        lat,
        lng,
        content: sanitize::basic(form.content.as_deref().unwrap_or_default()),
        user: email,
    };
    state.datastore.store_marker(&marker).await.map_err(store_fault)?;

    info!(user = %marker.user, lat, lng, "marker stored");
    Ok(StatusCode::OK)
}
