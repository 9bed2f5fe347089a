use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
    Form, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{AboutMeForm, UserQuery};
use crate::{
    app::{store_fault, user_page},
    auth::AuthUser,
    datastore::User,
    sanitize,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/about", get(get_about_me))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/about", post(post_about_me))
}

/// GET /about?user=...: the user's about-me text, empty when unknown.
#[instrument(skip(state))]
pub async fn get_about_me(
    State(state): State<AppState>,
    Query(q): Query<UserQuery>,
) -> Result<String, (StatusCode, String)> {
    let Some(email) = q.user.filter(|u| !u.is_empty()) else {
        return Ok(String::new());
    };
    let user = state.datastore.get_user(&email).await.map_err(store_fault)?;
    Ok(user.map(|u| u.about_me).unwrap_or_default())
}

#[instrument(skip(state, form))]
pub async fn post_about_me(
    State(state): State<AppState>,
    AuthUser(email): AuthUser,
    Form(form): Form<AboutMeForm>,
) -> Result<Redirect, (StatusCode, String)> {
    let back = user_page(&email);

    let Some(raw) = form.about_me else {
        warn!(%email, "about form without about-me");
        return Ok(back);
    };

    let user = User::new(Some(email), Some(sanitize::strip_all(&raw)));
    state.datastore.store_user(&user).await.map_err(store_fault)?;

    info!(email = %user.email, "about me stored");
    Ok(back)
}
