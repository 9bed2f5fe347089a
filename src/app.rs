use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use axum::{
    http::{Request, Response, StatusCode},
    response::Redirect,
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, field, info, Span};

use crate::state::AppState;
use crate::store::StoreError;
use crate::{auth, bus_stops, images, interests, markers, messages, profile};

pub fn build_app(state: AppState) -> Router {
    let trace = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<_>| {
            tracing::info_span!(
                "http_request",
                method = %req.method(),
                uri = %req.uri(),
                status = field::Empty,
            )
        })
        .on_response(|res: &Response<_>, latency: Duration, span: &Span| {
            let status = res.status();
            span.record("status", field::display(status));
            let latency_ms = latency.as_millis() as u64;
            if status.is_server_error() {
                error!(%status, latency_ms, "request failed");
            } else {
                info!(%status, latency_ms, "request served");
            }
        });

    Router::new()
        .merge(messages::router())
        .merge(interests::router())
        .merge(profile::router())
        .merge(markers::router())
        .merge(bus_stops::router())
        .merge(images::router())
        .merge(auth::router())
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(trace)
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port = std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into());
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!(%addr, "townsquare listening");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Sends the browser back to `user`'s page.
pub(crate) fn user_page(user: &str) -> Redirect {
    let user: String = url::form_urlencoded::byte_serialize(user.as_bytes()).collect();
    Redirect::to(&format!("/user-page.html?user={user}"))
}

/// Maps a failed store call to the response handlers return.
pub(crate) fn store_fault(e: StoreError) -> (StatusCode, String) {
    error!(error = %e, "store call failed");
    match &e {
        StoreError::Unavailable(_) => {
            (StatusCode::SERVICE_UNAVAILABLE, "store unavailable".into())
        }
        StoreError::Backend(_) => (StatusCode::INTERNAL_SERVER_ERROR, "store error".into()),
        StoreError::DuplicateKey { .. } => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}


#[cfg(test)]
mod tests {
    use super::testing::get;
    use super::*;
    use axum::response::IntoResponse;
    use crate::state::AppState;

    #[tokio::test]
    async fn health_is_ok() {
        let reply = get(build_app(AppState::fake()), "/health").await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, "ok");
    }

    #[tokio::test]
    async fn bus_stops_are_served_as_json() {
        let reply = get(build_app(AppState::fake()), "/bus-stops").await;
        assert_eq!(reply.status, StatusCode::OK);
        let stops = reply.json();
        let stops = stops.as_array().unwrap();
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0]["neighborhood"], "Downtown");
        assert_eq!(stops[1]["neighborhood"], "Roseland");
        assert_eq!(stops[0].as_object().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn login_status_reflects_the_token() {
        let state = AppState::fake();
        let anon = get(build_app(state.clone()), "/login-status").await;
        assert_eq!(anon.json()["isLoggedIn"], false);

        let token = super::testing::token_for(&state, "a@x.io");
        let req = axum::http::Request::get("/login-status")
            .header("cookie", format!("id_token={}", token))
            .body(axum::body::Body::empty())
            .unwrap();
        let signed_in = super::testing::send(build_app(state), req).await;
        assert_eq!(signed_in.json()["isLoggedIn"], true);
        assert_eq!(signed_in.json()["username"], "a@x.io");
    }

    #[test]
    fn store_faults_map_to_status_codes() {
        let (status, body) = store_fault(StoreError::Unavailable(sqlx::Error::PoolTimedOut));
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, "store unavailable");

        let (status, _) = store_fault(StoreError::DuplicateKey {
            kind: "User",
            key: "a@x.io".into(),
        });
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, body) = store_fault(StoreError::from(sqlx::Error::RowNotFound));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "store error");
    }

    #[test]
    fn user_page_escapes_the_address() {
        let location = |user: &str| {
            let res = user_page(user).into_response();
            res.headers()[axum::http::header::LOCATION]
                .to_str()
                .unwrap()
                .to_string()
        };
        assert_eq!(location("a+b@x.io"), "/user-page.html?user=a%2Bb%40x.io");
        assert_eq!(location("a&b#c@x.io"), "/user-page.html?user=a%26b%23c%40x.io");
        assert_eq!(location("a\u{1}b@x.io"), "/user-page.html?user=a%01b%40x.io");
    }
}
