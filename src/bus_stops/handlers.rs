use axum::{extract::State, routing::get, Json, Router};

use super::BusStop;
use crate::state::AppState;

pub fn bus_stop_routes() -> Router<AppState> {
    Router::new().route("/bus-stops", get(list_bus_stops))
}

pub async fn list_bus_stops(State(state): State<AppState>) -> Json<Vec<BusStop>> {
    Json(state.bus_stops.as_ref().clone())
}
