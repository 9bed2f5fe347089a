use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
    Form, Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{NewMessageForm, RecipientQuery};
use crate::{
    app::{store_fault, user_page},
    auth::{services::is_valid_email, AuthUser},
    datastore::Message,
    images::services::is_upload_key,
    sanitize,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/messages", get(list_messages))
        .route("/feed", get(feed))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/messages", post(post_message))
}

/// GET /messages?recipient=...: newest first, `[]` without a recipient.
#[instrument(skip(state))]
pub async fn list_messages(
    State(state): State<AppState>,
    Query(q): Query<RecipientQuery>,
) -> Result<Json<Vec<Message>>, (StatusCode, String)> {
    let Some(recipient) = q.recipient.filter(|r| !r.is_empty()) else {
        return Ok(Json(Vec::new()));
    };
    let messages = state
        .datastore
        .get_messages(&recipient)
        .await
        .map_err(store_fault)?;
    Ok(Json(messages))
}

#[instrument(skip(state))]
pub async fn feed(
    State(state): State<AppState>,
) -> Result<Json<Vec<Message>>, (StatusCode, String)> {
    let messages = state
        .datastore
        .get_all_messages()
        .await
        .map_err(store_fault)?;
    Ok(Json(messages))
}

#[instrument(skip(state, form))]
pub async fn post_message(
    State(state): State<AppState>,
    AuthUser(email): AuthUser,
    Form(form): Form<NewMessageForm>,
) -> Result<Redirect, (StatusCode, String)> {
    let Some(recipient) = form
        .recipient
        .as_deref()
        .map(str::trim)
        .filter(|r| is_valid_email(r))
        .map(str::to_string)
    else {
        warn!(%email, recipient = ?form.recipient, "message without a valid recipient");
        return Err((StatusCode::BAD_REQUEST, "Recipient is invalid".into()));
    };

    let image_url = match form.image_key.as_deref().filter(|k| !k.is_empty()) {
        None => None,
        Some(key) if is_upload_key(key) => Some(state.storage.public_url(key)),
        Some(key) => {
            warn!(%email, %key, "rejecting image key we did not issue");
            return Err((StatusCode::BAD_REQUEST, "Image key is invalid".into()));
        }
    };

    let text = sanitize::strip_all(form.text.as_deref().unwrap_or_default());
    let message = Message::new(email, text, recipient, image_url);
    state
        .datastore
        .store_message(&message)
        .await
        .map_err(store_fault)?;

    info!(id = %message.id, sender = %message.user, "message stored");
    Ok(user_page(&message.recipient))
}

#[cfg(test)]
mod tests {
    use crate::app::{
        build_app,
        testing::{get, post_form, token_for},
    };
    use crate::state::AppState;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn posted_messages_are_listed_for_the_recipient() {
        let state = AppState::fake();
        let token = token_for(&state, "sender@x.io");

        let reply = post_form(
            build_app(state.clone()),
            "/messages",
            "text=%3Cb%3Ehello%3C%2Fb%3E&recipient=friend%40x.io",
            Some(&token),
        )
        .await;
        assert_eq!(reply.status, StatusCode::SEE_OTHER);
        assert_eq!(reply.location(), Some("/user-page.html?user=friend%40x.io"));

        let listed = get(build_app(state.clone()), "/messages?recipient=friend%40x.io").await;
        assert_eq!(listed.status, StatusCode::OK);
        let json = listed.json();
        let messages = json.as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["user"], "sender@x.io");
        assert_eq!(messages[0]["text"], "hello");
        assert!(messages[0].get("imageUrl").is_none());

        let feed = get(build_app(state), "/feed").await;
        assert_eq!(feed.json().as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_recipient_lists_nothing() {
        let reply = get(build_app(AppState::fake()), "/messages").await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, "[]");
    }

    #[tokio::test]
    async fn anonymous_posts_redirect_to_login() {
        let state = AppState::fake();
        let reply = post_form(
            build_app(state.clone()),
            "/messages",
            "text=hi&recipient=friend%40x.io",
            None,
        )
        .await;
        assert_eq!(reply.status, StatusCode::SEE_OTHER);
        assert_eq!(reply.location(), Some("/index.html"));
        assert!(state.datastore.get_all_messages().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn image_keys_must_be_ours() {
        let state = AppState::fake();
        let token = token_for(&state, "sender@x.io");

        let bad = post_form(
            build_app(state.clone()),
            "/messages",
            "text=hi&recipient=friend%40x.io&image-key=..%2Fsecrets",
            Some(&token),
        )
        .await;
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);

        let key = "images/6f1c1c3e-8d3a-4c55-9d2a-0f6f8c7b2a11";
        let good = post_form(
            build_app(state.clone()),
            "/messages",
            &format!("text=hi&recipient=friend%40x.io&image-key={}", key.replace('/', "%2F")),
            Some(&token),
        )
        .await;
        assert_eq!(good.status, StatusCode::SEE_OTHER);

        let stored = state.datastore.get_messages("friend@x.io").await.unwrap();
        assert_eq!(
            stored[0].image_url.as_deref(),
            Some("https://fake.local/images/6f1c1c3e-8d3a-4c55-9d2a-0f6f8c7b2a11")
        );
    }

    #[tokio::test]
    async fn blank_recipient_is_rejected() {
        let state = AppState::fake();
        let token = token_for(&state, "sender@x.io");
        let reply = post_form(build_app(state), "/messages", "text=hi&recipient=+", Some(&token)).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.body, "Recipient is invalid");
    }

    #[tokio::test]
    async fn recipients_that_are_not_addresses_are_rejected_before_storing() {
        let state = AppState::fake();
        let token = token_for(&state, "sender@x.io");

        for recipient in ["a%01b%40x.io", "friend", "a+b%40x.io%0D%0ASet-Cookie:x"] {
            let reply = post_form(
                build_app(state.clone()),
                "/messages",
                &format!("text=hi&recipient={recipient}"),
                Some(&token),
            )
            .await;
            assert_eq!(reply.status, StatusCode::BAD_REQUEST, "{recipient}");
            assert_eq!(reply.body, "Recipient is invalid");
        }
        assert!(state.datastore.get_all_messages().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn redirect_escapes_the_recipient() {
        let state = AppState::fake();
        let token = token_for(&state, "sender@x.io");
        let reply = post_form(
            build_app(state.clone()),
            "/messages",
            "text=hi&recipient=a%2Bb%40x.io",
            Some(&token),
        )
        .await;
        assert_eq!(reply.status, StatusCode::SEE_OTHER);
        assert_eq!(reply.location(), Some("/user-page.html?user=a%2Bb%40x.io"));
        assert_eq!(state.datastore.get_messages("a+b@x.io").await.unwrap().len(), 1);
    }
}
