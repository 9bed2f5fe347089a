pub(crate) use crate::auth::claims::Claims;
pub(crate) use crate::auth::dto::JwtKeys;
use crate::config::IdentityConfig;
use crate::state::AppState;
use axum::extract::FromRef;
use jsonwebtoken::{decode, DecodingKey, Validation};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s\p{Cc}]+@[^@\s\p{Cc}]+\.[^@\s\p{Cc}]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

impl From<&IdentityConfig> for JwtKeys {
    fn from(cfg: &IdentityConfig) -> Self {
        Self {
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::from(&state.config.identity)
    }
}

impl JwtKeys {
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        if !is_valid_email(&data.claims.email) {
            anyhow::bail!("token email is not an address");
        }
        debug!(email = %data.claims.email, "identity token verified");
        Ok(data.claims)
    }
}

/// Mints a token the way the identity service does, for tests.
#[cfg(test)]
pub(crate) fn issue_token(cfg: &IdentityConfig, email: &str, ttl_secs: i64) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use time::OffsetDateTime;

    let now = OffsetDateTime::now_utc().unix_timestamp();
    let claims = Claims {
        sub: format!("acct-{email}"),
        email: email.to_string(),
        iat: now as usize,
        exp: (now + ttl_secs) as usize,
        iss: cfg.issuer.clone(),
        aud: cfg.audience.clone(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(cfg.secret.as_bytes()),
    )
    .expect("encode test token")
}
