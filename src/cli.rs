#![allow(clippy::missing_errors_doc)]

use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::app::builder::LocationQuery;
use crate::app::events::{MAX_REFRESH_SECS, MIN_REFRESH_SECS};
use crate::data::http::DEFAULT_GATEWAY_URL;
use crate::domain::weather::{Location, SpeedUnit, TempUnit};
use crate::error::WeatherError;

pub const DEFAULT_REFRESH_SECS: u64 = 900;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum UnitsArg {
    Celsius,
    Fahrenheit,
}

impl From<UnitsArg> for TempUnit {
    fn from(arg: UnitsArg) -> Self {
        match arg {
            UnitsArg::Celsius => Self::Celsius,
            UnitsArg::Fahrenheit => Self::Fahrenheit,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SpeedArg {
    Kmh,
    Mph,
}

impl From<SpeedArg> for SpeedUnit {
    fn from(arg: SpeedArg) -> Self {
        match arg {
            SpeedArg::Kmh => Self::Kmh,
            SpeedArg::Mph => Self::Mph,
        }
    }
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "weatherverse",
    version,
    about = "Weather dashboard: conditions, forecast, air quality and UV in one snapshot"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Print one snapshot and exit
    Show(DashboardArgs),
    /// Keep printing snapshots as the auto-refresh timer fires
    Watch(WatchArgs),
    /// Run the credential-hiding provider proxy
    Serve(ServeArgs),
    /// List or remove saved favorites
    Favorites(FavoritesArgs),
}

#[derive(Debug, Args, Clone)]
pub struct DashboardArgs {
    /// City name to geocode (default: last location, then Benin City)
    pub city: Option<String>,

    /// Direct latitude (requires --lon)
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Direct longitude (requires --lat)
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Temperature units (overrides saved preference)
    #[arg(long, value_enum)]
    pub units: Option<UnitsArg>,

    /// Wind speed units (overrides saved preference)
    #[arg(long, value_enum)]
    pub speed: Option<SpeedArg>,

    /// Base URL of the proxy endpoints
    #[arg(long, default_value = DEFAULT_GATEWAY_URL)]
    pub gateway_url: String,

    /// Emit the snapshot as JSON
    #[arg(long)]
    pub json: bool,

    /// Bypass the in-process response cache
    #[arg(long)]
    pub no_cache: bool,

    /// Do not read or write the settings file
    #[arg(long)]
    pub no_save: bool,

    /// Star the shown location, or unstar it when it is already a favorite
    #[arg(long)]
    pub favorite: bool,
}

#[derive(Debug, Args, Clone)]
pub struct WatchArgs {
    #[command(flatten)]
    pub dashboard: DashboardArgs,

    /// Auto-refresh interval in seconds (10 to 86400)
    #[arg(
        long,
        default_value_t = DEFAULT_REFRESH_SECS,
        value_parser = clap::value_parser!(u64).range(MIN_REFRESH_SECS..=MAX_REFRESH_SECS)
    )]
    pub refresh_interval: u64,
}

#[derive(Debug, Args, Clone)]
pub struct ServeArgs {
    /// Listen address (default: WEATHERVERSE_BIND or 0.0.0.0:3000)
    #[arg(long)]
    pub bind: Option<SocketAddr>,

    /// Provider base URL (default: WEATHERVERSE_UPSTREAM_URL or OpenWeather)
    #[arg(long)]
    pub upstream_url: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct FavoritesArgs {
    #[command(subcommand)]
    pub action: Option<FavoritesAction>,
}

#[derive(Debug, Subcommand, Clone, Copy, PartialEq, Eq)]
pub enum FavoritesAction {
    /// Print saved favorites (default)
    List,
    /// Remove the favorite at a position shown by `list`
    Remove {
        /// 1-based position
        position: usize,
    },
}

impl DashboardArgs {
    pub fn validate(&self) -> Result<(), WeatherError> {
        match (self.lat, self.lon) {
            (Some(_), None) | (None, Some(_)) => Err(WeatherError::InvalidInput(
                "--lat and --lon must be provided together".to_string(),
            )),
            (Some(lat), Some(lon)) => Location::new(lat, lon).map(|_| ()),
            (None, None) => Ok(()),
        }
    }

    /// Explicit location from the flags. Coordinates win over a city name;
    /// `None` means the caller picks a fallback.
    pub fn location_query(&self) -> Result<Option<LocationQuery>, WeatherError> {
        self.validate()?;
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            return Ok(Some(LocationQuery::Coordinates(Location::new(lat, lon)?)));
        }
        Ok(self
            .city
            .as_ref()
            .map(|city| LocationQuery::Text(city.clone())))
    }
}
