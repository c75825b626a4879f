/// Authentication helpers for Microsoft identity client-credentials flows.
pub mod auth;
/// Power BI REST API types and setup client helpers.
pub mod powerbi;

/// Logging verbosity for client operations.
#[derive(Debug, Clone, Copy, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Emit verbose debug output.
    Debug,
    /// Emit standard informational output.
    Information,
}

impl Default for LogLevel {
    /// Defaults to `Information` logging.
    fn default() -> Self {
        LogLevel::Information
    }
}
