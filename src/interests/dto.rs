use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InterestForm {
    #[serde(rename = "my-interest")]
    pub my_interest: Option<String>,
}
