use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user: Option<String>,
}

/// Coordinates arrive as raw strings so a bad value becomes a 400 with our message.
#[derive(Debug, Deserialize)]
pub struct MarkerForm {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub content: Option<String>,
}

impl MarkerForm {
    /// Both coordinates, if present and finite.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let parse = |v: &Option<String>| {
            v.as_deref()
                .and_then(|s| s.trim().parse::<f64>().ok())
                .filter(|n| n.is_finite())
        };
        Some((parse(&self.lat)?, parse(&self.lng)?))
    }
}
