pub mod endpoint;
pub mod error;
pub mod response;

use crate::model;
pub use error::Error;
use http::StatusCode;
use reqwest::{Client, Response};
use response::inverter_info::InverterInfo;
use response::inverter_list::InverterList;
use response::login::Login;
use response::station_detail::StationDetail;
use response::station_list::StationList;
use serde::de::DeserializeOwned;
use serde_json::Value;

use std::collections::HashMap;

/// Client for the Talent monitoring API.
///
/// Borrows a caller-owned `reqwest::Client` and keeps the bearer token obtained from `/login`
/// for as long as the instance lives. A single fetch walks station list, station detail,
/// inverter list and inverter detail, using only the first station and the first inverter.
pub struct TalentMonitor<'a> {
    api: model::Api,
    client: &'a Client,
    return_json: bool,
    timezone: String,
    token: Option<String>,
}

/// Map transport failure of a data request to Error
fn map_api_err(error: reqwest::Error) -> Error {
    Error::ApiError(error.to_string())
}

/// Deserialize `value` returned by `endpoint`, reporting a mismatch as a data shape problem.
fn decode<T: DeserializeOwned>(endpoint: &endpoint::Endpoint, value: Value) -> Result<T, Error> {
    serde_json::from_value(value)
        .map_err(|e| Error::DataShapeError(format!("{} returned {}", endpoint, e)))
}

impl<'a> TalentMonitor<'a> {
    pub fn new(api: model::Api, client: &'a Client, return_json: bool) -> TalentMonitor<'a> {
        TalentMonitor {
            api,
            client,
            return_json,
            timezone: endpoint::TIMEZONE.to_owned(),
            token: None,
        }
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> TalentMonitor<'a> {
        self.timezone = timezone.into();
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn validate_credentials(&self) -> Result<(), Error> {
        if self.api.username.is_empty() || self.api.password.is_empty() {
            return Err(Error::ConfigurationError(
                "Credentials not provided via command line arguments or environment variables."
                    .to_string(),
            ));
        }
        Ok(())
    }

    pub async fn login(&mut self) -> Result<(), Error> {
        self.validate_credentials()?;

        let url = format!("{}/{}", self.api.api_url, endpoint::LOGIN);
        let request_body = HashMap::from([
            ("username", self.api.username.as_str()),
            ("password", self.api.password.as_str()),
        ]);

        let response = self
            .client
            .post(url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::AuthenticationError {
                status: e.status(),
                message: e.to_string(),
            })?;

        let status = response.status();
        match response.json::<Login>().await {
            Ok(Login {
                token: Some(token), ..
            }) => {
                log::debug!("Login successful - received token");
                self.token = Some(token);
                Ok(())
            }
            other => {
                log::error!("Login failed. Got status code {}", status);
                let reason = other
                    .ok()
                    .and_then(|login| login.msg)
                    .unwrap_or_else(|| "no token received".to_string());
                Err(Error::AuthenticationError {
                    status: Some(status),
                    message: format!("{} (server responded {})", reason, status),
                })
            }
        }
    }

    /// Log in again after the service rejected the current token.
    pub async fn refresh_token(&mut self) -> Result<(), Error> {
        log::debug!("Token expired. Refreshing token...");
        self.login().await
    }

    async fn get(
        &self,
        endpoint: &endpoint::Endpoint,
        query: &[(&str, &str)],
    ) -> Result<Response, Error> {
        let url = format!("{}/{}", self.api.api_url, endpoint);

        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }

        request
            .bearer_auth(self.token.as_deref().unwrap_or_default())
            .send()
            .await
            .map_err(map_api_err)
    }

    /// GET `endpoint` with the bearer token, logging in first if no token is held.
    ///
    /// A 401 triggers one re-login and one retry; a second 401 is an `AuthenticationError`.
    /// Any other non-200 status is logged and yields `Ok(None)`.
    pub async fn get_data(
        &mut self,
        endpoint: &endpoint::Endpoint,
        query: &[(&str, &str)],
    ) -> Result<Option<Value>, Error> {
        if self.token.is_none() {
            self.login().await?;
        }

        let mut response = self.get(endpoint, query).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            self.refresh_token().await?;
            response = self.get(endpoint, query).await?;

            if response.status() == StatusCode::UNAUTHORIZED {
                return Err(Error::AuthenticationError {
                    status: Some(StatusCode::UNAUTHORIZED),
                    message: format!("{} rejected the refreshed token", endpoint),
                });
            }
        }

        match response.status() {
            StatusCode::OK => {
                let text = response
                    .text()
                    .await
                    .map_err(|e| Error::ApiError(format!("Error reading API response: {}", e)))?;

                log::trace!("endpoint: {}, response_text: {}", endpoint, text);

                serde_json::from_str(&text)
                    .map(Some)
                    .map_err(|e| Error::InvalidResponse(text, e.to_string()))
            }
            status => {
                log::error!("Failed to fetch data from {}. Status Code: {}", endpoint, status);
                Ok(None)
            }
        }
    }

    /// First station of the account. `None` when the list is unavailable or empty.
    pub async fn first_station(&mut self) -> Result<Option<model::Station>, Error> {
        let value = match self.get_data(endpoint::STATIONS, &[]).await? {
            Some(value) => value,
            None => return Ok(None),
        };

        let stations: StationList = decode(endpoint::STATIONS, value)?;
        Ok(stations.rows.into_iter().next().map(|row| model::Station {
            status: row.status,
            name: row.station_name,
            guid: row.power_station_guid,
        }))
    }

    /// Current power and energy totals of `station`.
    pub async fn station_energy(
        &mut self,
        station: &model::Station,
    ) -> Result<Option<model::StationEnergy>, Error> {
        let timezone = self.timezone.clone();
        /* `query()` percent-encodes the offset; a literal `+` would reach the server as a space */
        let query = [
            ("powerStationGuid", station.guid.as_str()),
            ("timezone", timezone.as_str()),
        ];

        let value = self.get_data(endpoint::STATION_BY_GUID, &query).await?;
        log::debug!("Data for powerstation GUID {}: {:?}", station.guid, value);

        match value {
            Some(value) => {
                let detail: StationDetail = decode(endpoint::STATION_BY_GUID, value)?;
                Ok(Some(model::StationEnergy {
                    total_active_power: detail.data.total_active_power,
                    day_energy: detail.data.day_energy,
                    month_energy: detail.data.month_energy,
                    year_energy: detail.data.year_energy,
                }))
            }
            None => Ok(None),
        }
    }

    /// First inverter of the account. An answered request without rows is a data shape error.
    pub async fn first_inverter(&mut self) -> Result<Option<model::Inverter>, Error> {
        let value = match self.get_data(endpoint::INVERTERS, &[]).await? {
            Some(value) => value,
            None => return Ok(None),
        };

        let inverters: InverterList = decode(endpoint::INVERTERS, value)?;
        inverters
            .rows
            .into_iter()
            .next()
            .map(|row| Some(model::Inverter { guid: row.device_guid }))
            .ok_or_else(|| Error::data_shape(format!("{} returned no rows", endpoint::INVERTERS)))
    }

    /// Readings of the first two PV inputs of `inverter`.
    pub async fn inverter_panels(
        &mut self,
        inverter: &model::Inverter,
    ) -> Result<Option<[model::PanelReading; 2]>, Error> {
        let query = [("deviceGuid", inverter.guid.as_str())];
        let value = self.get_data(endpoint::INVERTER_INFO, &query).await?;
        log::debug!("Data for inverter GUID {}: {:?}", inverter.guid, value);

        let value = match value {
            Some(value) => value,
            None => return Ok(None),
        };

        let info: InverterInfo = decode(endpoint::INVERTER_INFO, value)?;
        let count = info.data.pv.len();
        let mut panels = info.data.pv.into_iter().map(|pv| model::PanelReading {
            voltage: pv.voltage,
            current: pv.current,
            power: pv.power,
        });

        match (panels.next(), panels.next()) {
            (Some(pv1), Some(pv2)) => Ok(Some([pv1, pv2])),
            _ => Err(Error::data_shape(format!(
                "inverter {} reported {} PV inputs, expected at least 2",
                inverter.guid, count
            ))),
        }
    }

    /// Walk the station and inverter endpoints and assemble a report.
    ///
    /// `Ok(None)` means the account has no station. Any other missing piece fails the whole
    /// fetch, so a caller never sees a partially filled report.
    pub async fn fetch_report(&mut self) -> Result<Option<model::Report>, Error> {
        self.validate_credentials()?;
        if self.token.is_none() {
            self.login().await?;
        }

        let station = match self.first_station().await? {
            Some(station) => station,
            None => {
                log::info!("No station returned, nothing to report");
                return Ok(None);
            }
        };
        log::debug!("GUID: {}", station.guid);

        let energy = self.station_energy(&station).await?;

        /* Without an inverter GUID there is nothing to query for panel readings */
        let panels = match self.first_inverter().await? {
            Some(inverter) => self.inverter_panels(&inverter).await?,
            None => None,
        };

        let energy = energy.ok_or_else(|| {
            Error::data_shape(format!("no energy data for station {}", station.guid))
        })?;
        let panels = panels.ok_or_else(|| Error::data_shape("no panel readings for inverter"))?;

        Ok(Some(model::Report::new(station, energy, panels)))
    }

    /// Fetch a report and render it: as a JSON string when constructed with `return_json`,
    /// otherwise as log lines, returning `None`.
    pub async fn fetch_solar_data(&mut self) -> Result<Option<String>, Error> {
        let report = match self.fetch_report().await? {
            Some(report) => report,
            None => return Ok(None),
        };

        if self.return_json {
            report.to_json().map(Some)
        } else {
            report.log();
            Ok(None)
        }
    }
}
