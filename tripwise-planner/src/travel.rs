//! Flight and weather facts for a destination.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tripwise_core::TripwiseError;

use crate::DestinationInfo;

const AVIATIONSTACK_BASE_URL: &str = "http://api.aviationstack.com";
const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";

#[async_trait]
pub trait FlightLookup: Send + Sync {
    async fn lookup(&self, destination: &DestinationInfo) -> Result<String, TripwiseError>;
}

#[async_trait]
pub trait WeatherLookup: Send + Sync {
    async fn lookup(&self, destination: &DestinationInfo) -> Result<String, TripwiseError>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct StubFlightLookup;

#[async_trait]
impl FlightLookup for StubFlightLookup {
    async fn lookup(&self, _destination: &DestinationInfo) -> Result<String, TripwiseError> {
        Ok("flight price is $2000.".to_string())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct StubWeatherLookup;

#[async_trait]
impl WeatherLookup for StubWeatherLookup {
    async fn lookup(&self, _destination: &DestinationInfo) -> Result<String, TripwiseError> {
        Ok("weather is rainy.".to_string())
    }
}

fn destination_name(destination: &DestinationInfo) -> Result<&str, TripwiseError> {
    destination
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| TripwiseError::ExternalService("destination has no name to look up".into()))
}

fn http_client() -> Result<Client, TripwiseError> {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|err| TripwiseError::ExternalService(err.to_string()))
}

fn service_error(service: &str, err: reqwest::Error) -> TripwiseError {
    TripwiseError::ExternalService(format!("{service}: {err}"))
}

/// Finds the destination's airport through the AviationStack airports API.
#[derive(Clone)]
pub struct AviationStackFlightLookup {
    base_url: String,
    access_key: SecretString,
    http: Client,
}

impl AviationStackFlightLookup {
    pub fn new(access_key: impl Into<String>) -> Result<Self, TripwiseError> {
        Ok(Self {
            base_url: AVIATIONSTACK_BASE_URL.to_string(),
            access_key: SecretString::new(access_key.into()),
            http: http_client()?,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct AirportsResponse {
    #[serde(default)]
    data: Vec<Airport>,
    #[serde(default)]
    error: Option<AviationStackError>,
}

#[derive(Debug, Deserialize)]
struct Airport {
    airport_name: Option<String>,
    iata_code: Option<String>,
    country_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AviationStackError {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

#[async_trait]
impl FlightLookup for AviationStackFlightLookup {
    async fn lookup(&self, destination: &DestinationInfo) -> Result<String, TripwiseError> {
        let name = destination_name(destination)?;
        let url = format!("{}/v1/airports", self.base_url.trim_end_matches('/'));
        tracing::debug!(destination = name, "aviationstack airport lookup");

        let response = self
            .http
            .get(url)
            .query(&[
                ("access_key", self.access_key.expose_secret().as_str()),
                ("search", name),
            ])
            .send()
            .await
            .map_err(|err| service_error("aviationstack", err))?;
        let status = response.status();
        let body: AirportsResponse = response
            .json()
            .await
            .map_err(|err| service_error("aviationstack", err))?;

        if let Some(error) = body.error {
            let code = error.code.unwrap_or_else(|| status.to_string());
            return Err(TripwiseError::ExternalService(format!(
                "aviationstack {code}: {}",
                error.message
            )));
        }
        if !status.is_success() {
            return Err(TripwiseError::ExternalService(format!(
                "aviationstack returned {status}"
            )));
        }

        let airport = body
            .data
            .into_iter()
            .find(|airport| airport.iata_code.as_deref().is_some_and(|code| !code.is_empty()));
        Ok(match airport {
            Some(airport) => {
                let airport_name = airport.airport_name.unwrap_or_else(|| name.to_string());
                let iata = airport.iata_code.unwrap_or_default();
                match airport.country_name {
                    Some(country) => {
                        format!("fly into {airport_name} ({iata}), {country}.")
                    }
                    None => format!("fly into {airport_name} ({iata})."),
                }
            }
            None => format!("no airport found for {name}."),
        })
    }
}

/// Current conditions from the OpenWeatherMap weather API, in metric units.
#[derive(Clone)]
pub struct OpenWeatherLookup {
    base_url: String,
    api_key: SecretString,
    http: Client,
}

impl OpenWeatherLookup {
    pub fn new(api_key: impl Into<String>) -> Result<Self, TripwiseError> {
        Ok(Self {
            base_url: OPENWEATHER_BASE_URL.to_string(),
            api_key: SecretString::new(api_key.into()),
            http: http_client()?,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    #[serde(default)]
    weather: Vec<WeatherCondition>,
    main: Option<MainReadings>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WeatherCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OpenWeatherError {
    message: String,
}

#[async_trait]
impl WeatherLookup for OpenWeatherLookup {
    async fn lookup(&self, destination: &DestinationInfo) -> Result<String, TripwiseError> {
        let name = destination_name(destination)?;
        let url = format!("{}/data/2.5/weather", self.base_url.trim_end_matches('/'));
        tracing::debug!(destination = name, "openweather lookup");

        let response = self
            .http
            .get(url)
            .query(&[
                ("q", name),
                ("appid", self.api_key.expose_secret().as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|err| service_error("openweather", err))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<OpenWeatherError>()
                .await
                .map(|error| error.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(TripwiseError::ExternalService(format!(
                "openweather {status}: {message}"
            )));
        }

        let body: WeatherResponse = response
            .json()
            .await
            .map_err(|err| service_error("openweather", err))?;
        let place = body.name.filter(|n| !n.is_empty()).unwrap_or_else(|| name.to_string());
        let description = body
            .weather
            .first()
            .map(|condition| condition.description.clone())
            .unwrap_or_else(|| "unknown conditions".to_string());

        Ok(match body.main {
            Some(MainReadings {
                temp,
                humidity: Some(humidity),
            }) => format!("weather in {place} is {description}, {temp:.1}°C with {humidity:.0}% humidity."),
            Some(MainReadings { temp, .. }) => {
                format!("weather in {place} is {description}, {temp:.1}°C.")
            }
            None => format!("weather in {place} is {description}."),
        })
    }
}
