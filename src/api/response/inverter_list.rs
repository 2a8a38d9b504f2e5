use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub device_guid: String,
}

#[derive(Deserialize)]
pub struct InverterList {
    #[serde(default)]
    pub rows: Vec<Row>,
}
