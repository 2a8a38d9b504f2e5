use serde::Deserialize;
use serde_json::Value;

/* One MPPT input as reported under `data.pv` */
#[derive(Deserialize)]
pub struct Pv {
    pub voltage: Value,
    pub current: Value,
    pub power: Value,
}

#[derive(Deserialize)]
pub struct Data {
    #[serde(default)]
    pub pv: Vec<Pv>,
}

#[derive(Deserialize)]
pub struct InverterInfo {
    pub data: Data,
}
