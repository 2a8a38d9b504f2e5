use serde::Deserialize;

#[derive(Deserialize)]
pub struct Login {
    pub token: Option<String>,
    pub msg: Option<String>,
}
