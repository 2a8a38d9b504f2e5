use crate::api::Error;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// Readings are kept as the JSON values the service returned, numbers or strings alike.
pub type Reading = Value;

#[derive(Debug, Clone)]
pub struct Api {
    pub api_url: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub status: Value,
    pub name: String,
    pub guid: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StationEnergy {
    pub total_active_power: Reading,
    pub day_energy: Reading,
    pub month_energy: Reading,
    pub year_energy: Reading,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Inverter {
    pub guid: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelReading {
    pub voltage: Reading,
    pub current: Reading,
    pub power: Reading,
}

/// Flat view over the first station and its first inverter.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub status: Value,
    pub station_name: String,
    pub total_active_power: Reading,
    pub day_energy: Reading,
    pub month_energy: Reading,
    pub year_energy: Reading,
    pub panels: [PanelReading; 2],
}

impl Report {
    pub fn new(station: Station, energy: StationEnergy, panels: [PanelReading; 2]) -> Report {
        Report {
            status: station.status,
            station_name: station.name,
            total_active_power: energy.total_active_power,
            day_energy: energy.day_energy,
            month_energy: energy.month_energy,
            year_energy: energy.year_energy,
            panels,
        }
    }

    /// Report entries as `(key, value)` in output order.
    pub fn fields(&self) -> Vec<(&'static str, Value)> {
        let [pv1, pv2] = &self.panels;
        vec![
            ("Status", self.status.clone()),
            ("StationName", Value::String(self.station_name.clone())),
            ("TotalActivePower(W)", self.total_active_power.clone()),
            ("DailyEnergy(Wh)", self.day_energy.clone()),
            ("MonthlyEnergy(Wh)", self.month_energy.clone()),
            ("YearlyEnergy(Wh)", self.year_energy.clone()),
            ("Panel1Voltage(V)", pv1.voltage.clone()),
            ("Panel1Current(A)", pv1.current.clone()),
            ("Panel1Power(W)", pv1.power.clone()),
            ("Panel2Voltage(V)", pv2.voltage.clone()),
            ("Panel2Current(A)", pv2.current.clone()),
            ("Panel2Power(W)", pv2.power.clone()),
        ]
    }

    /// Pretty-print with a four space indent, keys in `fields()` order.
    pub fn to_json(&self) -> Result<String, Error> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)
            .map_err(|e| Error::FormatError(e.to_string()))?;

        String::from_utf8(buffer).map_err(|e| Error::FormatError(e.to_string()))
    }

    /// Emit one log line per entry.
    pub fn log(&self) {
        for (key, value) in self.fields() {
            match value {
                Value::String(s) => log::info!("{}: {}", key, s),
                other => log::info!("{}: {}", key, other),
            }
        }
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.fields();
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for (key, value) in &fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn report() -> Report {
        Report::new(
            Station {
                status: json!("ready"),
                name: "Balcony".to_string(),
                guid: "ps-0001".to_string(),
            },
            StationEnergy {
                total_active_power: json!(412.5),
                day_energy: json!(1830),
                month_energy: json!(51200),
                year_energy: json!(402100),
            },
            [
                PanelReading {
                    voltage: json!(31.2),
                    current: json!(6.8),
                    power: json!(212.2),
                },
                PanelReading {
                    voltage: json!(30.7),
                    current: json!(6.5),
                    power: json!(199.6),
                },
            ],
        )
    }

    #[test]
    fn json_keeps_field_order() {
        let output = report().to_json().unwrap();
        let keys: Vec<usize> = report()
            .fields()
            .iter()
            .map(|(key, _)| output.find(&format!("\"{}\"", key)).unwrap())
            .collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, keys);
    }

    #[test]
    fn json_uses_four_space_indent() {
        let output = report().to_json().unwrap();
        assert!(output.starts_with("{\n    \"Status\": \"ready\",\n"));
        assert!(output.ends_with("\n}"));
    }

    #[test]
    fn json_values_match_readings() {
        let parsed: Value = serde_json::from_str(&report().to_json().unwrap()).unwrap();
        assert_eq!(12, parsed.as_object().unwrap().len());
        assert_eq!(json!("Balcony"), parsed["StationName"]);
        assert_eq!(json!(1830), parsed["DailyEnergy(Wh)"]);
        assert_eq!(json!(199.6), parsed["Panel2Power(W)"]);
    }

    #[test]
    fn json_keeps_non_ascii_string_readings() {
        let mut report = report();
        report.station_name = "Balkon Süd".to_string();
        report.status = json!("未知");

        let parsed: Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json!("Balkon Süd"), parsed["StationName"]);
        assert_eq!(json!("未知"), parsed["Status"]);
    }
}
