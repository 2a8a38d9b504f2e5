use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Data {
    pub total_active_power: Value,
    pub day_energy: Value,
    pub month_energy: Value,
    pub year_energy: Value,
}

#[derive(Deserialize)]
pub struct StationDetail {
    pub data: Data,
}
