use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// A single message posted by a user to a recipient.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub user: String,      // sender email
    pub text: String,
    pub timestamp: i64,    // milliseconds since the unix epoch
    pub recipient: String, // recipient email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Message {
    /// New message with a random id, stamped with the current time.
    pub fn new(
        user: impl Into<String>,
        text: impl Into<String>,
        recipient: impl Into<String>,
        image_url: Option<String>,
    ) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            user: user.into(),
            text: text.into(),
            timestamp: (now.unix_timestamp_nanos() / 1_000_000) as i64,
            recipient: recipient.into(),
            image_url,
        }
    }
}

/// Profile data shown in a user's "about me" section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    pub about_me: String,
}

impl User {
    /// If either field is missing both are stored empty.
    pub fn new(email: Option<String>, about_me: Option<String>) -> Self {
        match (email, about_me) {
            (Some(email), Some(about_me)) => Self { email, about_me },
            _ => Self {
                email: String::new(),
                about_me: String::new(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interest {
    pub email: String,
    pub info: String,
}

impl Interest {
    /// If either field is missing both are stored empty.
    pub fn new(email: Option<String>, info: Option<String>) -> Self {
        match (email, info) {
            (Some(email), Some(info)) => Self { email, info },
            _ => Self {
                email: String::new(),
                info: String::new(),
            },
        }
    }
}

/// A point a user dropped on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserMarker {
    pub lat: f64,
    pub lng: f64,
    pub content: String,
    pub user: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_with_any_missing_field_is_fully_empty() {
        let cases = [
            (None, Some("about".to_string())),
            (Some("a@x.io".to_string()), None),
            (None, None),
        ];
        for (email, about) in cases {
            let user = User::new(email, about);
            assert_eq!(user.email, "");
            assert_eq!(user.about_me, "");
        }

        let user = User::new(Some("a@x.io".into()), Some("hi".into()));
        assert_eq!(user.email, "a@x.io");
        assert_eq!(user.about_me, "hi");
    }

    #[test]
    fn interest_with_any_missing_field_is_fully_empty() {
        let only_email = Interest::new(Some("a@x.io".into()), None);
        assert_eq!(only_email, Interest { email: String::new(), info: String::new() });

        let only_info = Interest::new(None, Some("hiking".into()));
        assert_eq!(only_info, Interest { email: String::new(), info: String::new() });

        let full = Interest::new(Some("a@x.io".into()), Some("hiking".into()));
        assert_eq!(full.info, "hiking");
    }

    #[test]
    fn new_messages_get_distinct_ids_and_a_current_timestamp() {
        let before = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
        let a = Message::new("s@x.io", "hello", "r@x.io", None);
        let b = Message::new("s@x.io", "hello", "r@x.io", None);
        assert_ne!(a.id, b.id);
        assert!(a.timestamp >= before);
        assert!(b.timestamp >= a.timestamp);
    }

    #[test]
    fn message_json_uses_camel_case_and_omits_missing_image() {
        let mut m = Message::new("s@x.io", "hello", "r@x.io", None);
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["user"], "s@x.io");
        assert_eq!(json["recipient"], "r@x.io");
        assert!(json.get("imageUrl").is_none());

        m.image_url = Some("https://cdn.local/images/1".into());
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["imageUrl"], "https://cdn.local/images/1");
    }
}
