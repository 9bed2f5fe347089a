use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
    Form, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{InterestForm, UserQuery};
use crate::{
    app::{store_fault, user_page},
    auth::AuthUser,
    datastore::Interest,
    sanitize,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/interest", get(get_interests))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/interest", post(post_interest))
}

/// GET /interest?user=...: one interest per line.
#[instrument(skip(state))]
pub async fn get_interests(
    State(state): State<AppState>,
    Query(q): Query<UserQuery>,
) -> Result<String, (StatusCode, String)> {
    let Some(user) = q.user.filter(|u| !u.is_empty()) else {
        return Ok("User is invalid".to_string());
    };
    let interests = state
        .datastore
        .get_interests(&user)
        .await
        .map_err(store_fault)?;

    Ok(interests
        .iter()
        .map(|i| format!("{}\n", i.info))
        .collect())
}

#[instrument(skip(state, form))]
pub async fn post_interest(
    State(state): State<AppState>,
    AuthUser(email): AuthUser,
    Form(form): Form<InterestForm>,
) -> Result<Redirect, (StatusCode, String)> {
    let back = user_page(&email);

    let Some(raw) = form.my_interest else {
        warn!(%email, "interest form without my-interest");
        return Ok(back);
    };

    let interest = Interest::new(Some(email), Some(sanitize::strip_all(&raw)));
    state
        .datastore
        .store_interest(&interest)
        .await
        .map_err(store_fault)?;

    info!(email = %interest.email, "interest stored");
    Ok(back)
}
