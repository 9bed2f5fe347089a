use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AboutMeForm {
    #[serde(rename = "about-me")]
    pub about_me: Option<String>,
}
