use axum::{routing::get, Json, Router};
use tracing::instrument;

use crate::{
    auth::{dto::LoginStatus, extractors::AuthUser},
    state::AppState,
};

pub fn login_routes() -> Router<AppState> {
    Router::new().route("/login-status", get(login_status))
}

#[instrument(skip_all)]
pub async fn login_status(user: Option<AuthUser>) -> Json<LoginStatus> {
    Json(LoginStatus {
        is_logged_in: user.is_some(),
        username: user.map(|AuthUser(email)| email),
    })
}
