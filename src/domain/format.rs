//! Input validation and human-readable rendering of NWS payloads

use crate::nws::{AlertFeature, ForecastPeriod};

pub const STATE_CODE_ERROR: &str =
    "Error: Please provide a valid two-letter US state code (e.g. CA, NY)";
pub const ALERTS_UNAVAILABLE: &str = "Unable to fetch alerts or no alerts found.";
pub const NO_ACTIVE_ALERTS: &str = "No active alerts for this state.";
pub const POINTS_UNAVAILABLE: &str = "Unable to fetch forecast data for this location.";
pub const FORECAST_UNAVAILABLE: &str = "Unable to fetch detailed forecast.";
pub const BLOCK_SEPARATOR: &str = "\n---\n";

/// Exactly two ASCII letters. Callers uppercase before checking.
pub fn is_valid_state_code(state: &str) -> bool {
    state.len() == 2 && state.bytes().all(|byte| byte.is_ascii_alphabetic())
}

pub fn format_alert(feature: &AlertFeature) -> String {
    let props = &feature.properties;
    format!(
        "Event: {}\nArea: {}\nSeverity: {}\nDescription: {}\nInstructions: {}",
        props.event.as_deref().unwrap_or("Unknown"),
        props.area_desc.as_deref().unwrap_or("Unknown"),
        props.severity.as_deref().unwrap_or("Unknown"),
        props
            .description
            .as_deref()
            .unwrap_or("No description available"),
        props
            .instruction
            .as_deref()
            .unwrap_or("No specific instructions provided"),
    )
}

pub fn format_period(period: &ForecastPeriod) -> String {
    format!(
        "{}:\nTemperature: {}°{}\nWind: {} {}\nForecast: {}",
        period.name,
        period.temperature,
        period.temperature_unit,
        period.wind_speed,
        period.wind_direction,
        period.detailed_forecast,
    )
}
