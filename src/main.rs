mod app;
mod auth;
mod bus_stops;
mod config;
mod datastore;
mod images;
mod interests;
mod markers;
mod messages;
mod profile;
mod sanitize;
mod state;
mod storage;
mod store;

use tracing_subscriber::EnvFilter;

use crate::state::AppState;

/// `RUST_LOG` picks the filter; `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("townsquare=debug,axum=info,tower_http=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().with_current_span(true).init(),
        _ => builder.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let state = AppState::init().await?;
    app::serve(app::build_app(state)).await
}
