use std::env;

/// Runtime settings. The orchestrator injects these through the container
/// environment; there is no config file in this deployment model.
#[derive(Debug, Clone)]
pub struct Settings {
    pub app_version: String,
    pub system: String,
    pub supervisor_url: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Settings {
            app_version: env::var("APP_VERSION")
                .unwrap_or_else(|_| "version not set".to_string()),
            system: env::var("SYSTEM").unwrap_or_else(|_| "system not set".to_string()),
            supervisor_url: env::var("SUPERVISOR_API_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
        }
    }
}
