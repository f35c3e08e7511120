//! MCP tool declarations and dispatch
//!
//! `get_alerts` and `get_forecast` both resolve to plain text results.
//! Upstream failures never become JSON-RPC errors here: each failure stage
//! maps to a fixed fallback string returned as a successful tool result.

use rust_mcp_sdk::{
    macros,
    schema::{CallToolRequestParams, CallToolResult, ContentBlock, TextContent, Tool},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::auth::AccessToken;
use crate::domain::format::{
    format_alert, format_period, is_valid_state_code, ALERTS_UNAVAILABLE, BLOCK_SEPARATOR,
    FORECAST_UNAVAILABLE, NO_ACTIVE_ALERTS, POINTS_UNAVAILABLE, STATE_CODE_ERROR,
};
use crate::mcp::rpc::{json_rpc_error, json_rpc_error_with_data, json_rpc_result};
use crate::AppState;

#[macros::mcp_tool(
    name = "get_alerts",
    description = "Get detailed weather alerts for any US state. Requires Google OAuth authentication."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetAlertsTool {
    /// Two-letter US state code (e.g. CA, NY)
    pub state: String,
}

#[macros::mcp_tool(
    name = "get_forecast",
    description = "Get detailed weather forecast for any location by coordinates. Requires Google OAuth authentication."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetForecastTool {
    /// Latitude of the location
    pub latitude: f64,
    /// Longitude of the location
    pub longitude: f64,
}

pub fn build_tools_list() -> Vec<Tool> {
    vec![GetAlertsTool::tool(), GetForecastTool::tool()]
}

pub async fn run_get_alerts(
    state: &AppState,
    access_token: &AccessToken,
    params: GetAlertsTool,
) -> String {
    let region = params.state.to_uppercase();
    info!(
        state = %region,
        client_id = %access_token.client_id,
        "fetching weather alerts"
    );

    if !is_valid_state_code(&region) {
        return STATE_CODE_ERROR.to_string();
    }

    let data = match state.weather.active_alerts(&region).await {
        Ok(data) => data,
        Err(err) => {
            warn!(state = %region, error = %err, "alerts fetch failed");
            return ALERTS_UNAVAILABLE.to_string();
        }
    };

    match data.features {
        None => ALERTS_UNAVAILABLE.to_string(),
        Some(features) if features.is_empty() => NO_ACTIVE_ALERTS.to_string(),
        Some(features) => features
            .iter()
            .map(format_alert)
            .collect::<Vec<_>>()
            .join(BLOCK_SEPARATOR),
    }
}

pub async fn run_get_forecast(
    state: &AppState,
    access_token: &AccessToken,
    params: GetForecastTool,
) -> String {
    let GetForecastTool {
        latitude,
        longitude,
    } = params;
    info!(
        latitude,
        longitude,
        client_id = %access_token.client_id,
        "fetching weather forecast"
    );

    // Coordinates are passed through unvalidated; out-of-range points simply
    // fail the upstream lookup and hit the fallback below.
    let points = match state.weather.point_forecast(latitude, longitude).await {
        Ok(points) => points,
        Err(err) => {
            warn!(latitude, longitude, error = %err, "points lookup failed");
            return POINTS_UNAVAILABLE.to_string();
        }
    };

    let forecast = match state.weather.forecast(&points.properties.forecast).await {
        Ok(forecast) => forecast,
        Err(err) => {
            warn!(latitude, longitude, error = %err, "forecast fetch failed");
            return FORECAST_UNAVAILABLE.to_string();
        }
    };

    forecast
        .properties
        .periods
        .iter()
        .take(5)
        .map(format_period)
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

pub async fn handle_tools_call(
    state: &AppState,
    access_token: &AccessToken,
    id: Option<Value>,
    params: Option<Value>,
) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, -32602, "Invalid params");
    };

    let tool_call: CallToolRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };

    let arguments = json!(tool_call.arguments.unwrap_or_default());
    match tool_call.name.as_str() {
        "get_alerts" => {
            let params: GetAlertsTool = match serde_json::from_value(arguments) {
                Ok(value) => value,
                Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
            };

            text_tool_result(id, run_get_alerts(state, access_token, params).await)
        }
        "get_forecast" => {
            let params: GetForecastTool = match serde_json::from_value(arguments) {
                Ok(value) => value,
                Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
            };

            text_tool_result(id, run_get_forecast(state, access_token, params).await)
        }
        _ => json_rpc_error_with_data(
            id,
            -32601,
            "Method not found",
            Some(json!({
                "code": "tool_not_found",
                "message": "unknown tool name",
                "details": {
                    "name": tool_call.name,
                },
            })),
        ),
    }
}

fn text_tool_result(id: Option<Value>, text: String) -> Value {
    json_rpc_result(
        id,
        serde_json::to_value(CallToolResult {
            content: vec![ContentBlock::from(TextContent::new(text, None, None))],
            is_error: None,
            meta: None,
            structured_content: None,
        })
        .expect("tool result serialization"),
    )
}
