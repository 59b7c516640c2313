use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ConfigError, CycleConfig, Currency, StartDay};

/// User preferences the calculator and formatters depend on.
/// Loaded and validated once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSettings", into = "RawSettings")]
pub struct Settings {
    pub start_day: StartDay,
    pub currency:  Currency,
    pub time_zone: Tz,
}

/// Wire shape of [`Settings`]; field names follow the backend's JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSettings {
    #[serde(default, rename = "startDate")]
    start_day: Option<u8>,
    #[serde(default)]
    currency:  Option<String>,
    #[serde(default)]
    time_zone: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start_day: StartDay::default(),
            currency:  Currency::default(),
            time_zone: Tz::UTC,
        }
    }
}

impl TryFrom<RawSettings> for Settings {
    type Error = ConfigError;

    fn try_from(raw: RawSettings) -> Result<Self, Self::Error> {
        let defaults = Self::default();
        let start_day = raw.start_day.map_or(Ok(defaults.start_day), StartDay::new)?;
        let currency = raw.currency.as_deref().map_or(Ok(defaults.currency), str::parse)?;
        let time_zone = match raw.time_zone {
            Some(name) => name
                .trim()
                .parse::<Tz>()
                .map_err(|_| ConfigError::UnknownTimeZone(name))?,
            None => defaults.time_zone,
        };
        Ok(Self { start_day, currency, time_zone })
    }
}

impl From<Settings> for RawSettings {
    fn from(settings: Settings) -> Self {
        Self {
            start_day: Some(settings.start_day.get()),
            currency:  Some(settings.currency.to_string()),
            time_zone: Some(settings.time_zone.name().to_owned()),
        }
    }
}

impl Settings {
    /// Parses settings from JSON, filling absent fields with defaults.
    ///
    /// # Errors
    /// Returns `ConfigError::Malformed` for invalid JSON, or the specific
    /// validation error for a bad start day, currency or time zone.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawSettings = serde_json::from_str(json).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        let settings = Self::try_from(raw)?;
        debug!(
            start_day = settings.start_day.get(),
            currency = %settings.currency,
            time_zone = settings.time_zone.name(),
            "loaded settings"
        );
        Ok(settings)
    }

    pub const fn cycle(&self) -> CycleConfig {
        CycleConfig::new(self.start_day)
    }
}
