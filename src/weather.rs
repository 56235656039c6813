use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::WeatherConfig;
use crate::error::{check_status, ClientError, ClientResult};

const SERVICE: &str = "OpenWeatherMap";

/// Current conditions for one place, as reported by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub description: String,
    /// Degrees Celsius.
    pub temperature: f64,
    pub feels_like: f64,
    pub pressure: f64,
    /// Percent.
    pub humidity: f64,
    /// Metres.
    pub visibility: u32,
    /// Metres per second.
    pub wind_speed: f64,
    /// Meteorological degrees.
    pub wind_direction: f64,
    /// Unix timestamps.
    pub sunrise: i64,
    pub sunset: i64,
}

// Raw provider payload. Fields are required so a truncated response is a
// `Malformed` error rather than a half-filled report.
#[derive(Debug, Deserialize)]
struct CurrentWeather {
    weather: Vec<Condition>,
    main: MainReadings,
    visibility: u32,
    wind: Wind,
    sys: Sun,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    feels_like: f64,
    pressure: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
    deg: f64,
}

#[derive(Debug, Deserialize)]
struct Sun {
    sunrise: i64,
    sunset: i64,
}

impl TryFrom<CurrentWeather> for WeatherReport {
    type Error = ClientError;

    fn try_from(raw: CurrentWeather) -> ClientResult<Self> {
        let description = raw
            .weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .ok_or_else(|| ClientError::malformed(SERVICE, "empty weather list"))?;

        Ok(Self {
            description,
            temperature: raw.main.temp,
            feels_like: raw.main.feels_like,
            pressure: raw.main.pressure,
            humidity: raw.main.humidity,
            visibility: raw.visibility,
            wind_speed: raw.wind.speed,
            wind_direction: raw.wind.deg,
            sunrise: raw.sys.sunrise,
            sunset: raw.sys.sunset,
        })
    }
}

pub struct WeatherClient {
    client: reqwest::Client,
    config: WeatherConfig,
}

impl WeatherClient {
    pub fn new(client: reqwest::Client, config: WeatherConfig) -> Self {
        Self { client, config }
    }

    /// Current weather for a free-form place name. `None` if the provider
    /// does not know the place or the call fails.
    pub async fn by_city(&self, name: &str) -> Option<WeatherReport> {
        let query = vec![("q", name.to_string())];
        self.lookup(query, name).await
    }

    pub async fn by_coordinates(&self, latitude: f64, longitude: f64) -> Option<WeatherReport> {
        let query = vec![("lat", latitude.to_string()), ("lon", longitude.to_string())];
        self.lookup(query, &format!("{latitude},{longitude}")).await
    }

    async fn lookup(&self, query: Vec<(&str, String)>, label: &str) -> Option<WeatherReport> {
        match self.fetch(query).await {
            Ok(report) => Some(report),
            Err(ClientError::Status { status, .. }) => {
                debug!("No weather for '{}' ({})", label, status);
                None
            }
            Err(e) => {
                warn!("Weather lookup for '{}' failed: {}", label, e);
                None
            }
        }
    }

    async fn fetch(&self, mut query: Vec<(&str, String)>) -> ClientResult<WeatherReport> {
        query.extend([
            ("appid", self.config.api_key.clone()),
            ("units", "metric".to_string()),
            ("lang", "ru".to_string()),
        ]);

        let response = self
            .client
            .get(&self.config.api_url)
            .query(&query)
            .send()
            .await?;
        let response = check_status(SERVICE, response)?;

        let body = response.bytes().await?;
        let raw: CurrentWeather = serde_json::from_slice(&body)
            .map_err(|e| ClientError::malformed(SERVICE, e.to_string()))?;
        raw.try_into()
    }
}
