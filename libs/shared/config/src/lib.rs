use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

const DEFAULT_AUTH_URL: &str = "http://localhost:8081";
const DEFAULT_APPOINTMENT_URL: &str = "http://localhost:8081";
const DEFAULT_AVAILABILITY_URL: &str = "http://localhost:8084";
const DEFAULT_CONSULTATION_URL: &str = "http://localhost:8081";
const DEFAULT_SESSION_DIR: &str = ".portal-session";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub auth_service_url: String,
    pub appointment_service_url: String,
    pub availability_service_url: String,
    pub consultation_service_url: String,
    pub session_store_path: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let config = Self {
            auth_service_url: env_or_default("AUTH_SERVICE_URL", DEFAULT_AUTH_URL),
            appointment_service_url: env_or_default("APPOINTMENT_SERVICE_URL", DEFAULT_APPOINTMENT_URL),
            availability_service_url: env_or_default("AVAILABILITY_SERVICE_URL", DEFAULT_AVAILABILITY_URL),
            consultation_service_url: env_or_default("CONSULTATION_SERVICE_URL", DEFAULT_CONSULTATION_URL),
            session_store_path: PathBuf::from(env_or_default("SESSION_STORE_PATH", DEFAULT_SESSION_DIR)),
        };

        if !config.is_configured() {
            warn!("Client not fully configured - service URLs must be absolute http(s) URLs");
        }

        config
    }

    /// Every service behind a single host, as in a local all-in-one deployment.
    pub fn single_host(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        Self {
            auth_service_url: base.clone(),
            appointment_service_url: base.clone(),
            availability_service_url: base.clone(),
            consultation_service_url: base,
            session_store_path: PathBuf::from(DEFAULT_SESSION_DIR),
        }
    }

    pub fn is_configured(&self) -> bool {
        [
            &self.auth_service_url,
            &self.appointment_service_url,
            &self.availability_service_url,
            &self.consultation_service_url,
        ]
        .iter()
        .all(|url| url.starts_with("http://") || url.starts_with("https://"))
    }

    pub fn auth_api_url(&self) -> String {
        format!("{}/auth", self.auth_service_url.trim_end_matches('/'))
    }

    pub fn appointments_api_url(&self) -> String {
        format!("{}/appointments", self.appointment_service_url.trim_end_matches('/'))
    }

    pub fn availability_api_url(&self) -> String {
        format!("{}/api/v1/availability", self.availability_service_url.trim_end_matches('/'))
    }

    pub fn consultation_api_url(&self) -> String {
        format!("{}/consult", self.consultation_service_url.trim_end_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            auth_service_url: DEFAULT_AUTH_URL.to_string(),
            appointment_service_url: DEFAULT_APPOINTMENT_URL.to_string(),
            availability_service_url: DEFAULT_AVAILABILITY_URL.to_string(),
            consultation_service_url: DEFAULT_CONSULTATION_URL.to_string(),
            session_store_path: PathBuf::from(DEFAULT_SESSION_DIR),
        }
    }
}

fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        warn!("{} not set, using default {}", key, default);
        default.to_string()
    })
}
