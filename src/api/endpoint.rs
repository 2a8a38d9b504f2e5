pub type Endpoint = str;

pub const LOGIN: &Endpoint = "login";
pub const STATIONS: &Endpoint = "system/station/list";
pub const STATION_BY_GUID: &Endpoint = "system/station/getPowerStationByGuid";
pub const INVERTERS: &Endpoint = "tools/device/selectDeviceInverter";
pub const INVERTER_INFO: &Endpoint = "tools/device/selectDeviceInverterInfo";

/// The service reports daily figures against this offset regardless of the local timezone.
pub const TIMEZONE: &str = "+02:00";
