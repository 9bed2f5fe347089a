use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RecipientQuery {
    pub recipient: Option<String>,
}

/// Form posted from a user page; `image-key` comes from a prior `/image-upload-url` call.
#[derive(Debug, Deserialize)]
pub struct NewMessageForm {
    pub text: Option<String>,
    pub recipient: Option<String>,
    #[serde(rename = "image-key")]
    pub image_key: Option<String>,
}
