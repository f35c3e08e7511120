//! Weather tool implementations exposed over the MCP protocol
//!
//! Provides the `get_alerts` and `get_forecast` behavior on top of the
//! upstream NWS client, plus the text formatting the tools return.

pub mod format;
pub mod tools;
