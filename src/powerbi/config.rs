use std::env;

/// Service-principal and workspace settings for one setup run.
#[derive(Debug, Clone)]
pub struct SetupConfig {
    /// Entra ID tenant that issued the app registration.
    pub tenant_id: String,
    /// Application (client) id of the service principal.
    pub client_id: String,
    /// Client secret of the service principal.
    pub client_secret: String,
    /// Power BI workspace (group) id holding the datasets.
    pub group_id: String,
}

impl SetupConfig {
    /// Load the configuration from `PBI_*` environment variables.
    ///
    /// There are no defaults; a missing variable is an error naming it.
    pub fn from_env() -> Result<Self, String> {
        Ok(SetupConfig {
            tenant_id: require_env("PBI_TENANT_ID")?,
            client_id: require_env("PBI_CLIENT_ID")?,
            client_secret: require_env("PBI_CLIENT_SECRET")?,
            group_id: require_env("PBI_GROUP_ID")?,
        })
    }
}

fn require_env(name: &str) -> Result<String, String> {
    env::var(name).map_err(|_| format!("{name} is not set"))
}
