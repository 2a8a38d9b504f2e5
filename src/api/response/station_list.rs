use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub status: Value,
    pub station_name: String,
    pub power_station_guid: String,
}

#[derive(Deserialize)]
pub struct StationList {
    #[serde(default)]
    pub rows: Vec<Row>,
}
