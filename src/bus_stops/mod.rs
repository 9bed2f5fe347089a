//! Bus stop locations, read once from a bundled CSV file.

pub mod handlers;

use anyhow::Context;
use axum::Router;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusStop {
    pub neighborhood: String,
    pub lat: f64,
    pub lng: f64,
}

pub fn router() -> Router<AppState> {
    handlers::bus_stop_routes()
}

pub fn load(path: &str) -> anyhow::Result<Vec<BusStop>> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read {}", path))?;
    parse(&text).with_context(|| format!("parse {}", path))
}

/// Parses `neighborhood,lat,lng` lines. There is no header; blank lines are skipped.
pub fn parse(text: &str) -> anyhow::Result<Vec<BusStop>> {
    let mut stops = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let lineno = idx + 1;
        let mut cells = line.split(',');
        let (Some(neighborhood), Some(lat), Some(lng)) = (cells.next(), cells.next(), cells.next())
        else {
            anyhow::bail!("line {}: expected neighborhood,lat,lng", lineno);
        };
        let lat: f64 = lat
            .trim()
            .parse()
            .with_context(|| format!("line {}: bad latitude `{}`", lineno, lat))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .with_context(|| format!("line {}: bad longitude `{}`", lineno, lng))?;
        stops.push(BusStop {
            neighborhood: neighborhood.trim().to_string(),
            lat,
            lng,
        });
    }
    Ok(stops)
}
