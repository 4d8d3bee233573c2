//! Application configuration loaded from environment variables.

use std::net::SocketAddr;

use serde::{Deserialize, Deserializer};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Debug mode. Only a case-insensitive "true" enables it.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub debug: bool,

    /// Log filter directives (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    // === Deployment Metadata ===
    /// Version reported by the health and info endpoints.
    #[serde(default = "default_app_version")]
    pub app_version: String,

    /// Deployment environment name.
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Host name reported by the info endpoint.
    #[serde(default = "default_hostname")]
    pub hostname: String,
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_app_version() -> String {
    "1.0.0".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_hostname() -> String {
    "localhost".to_string()
}

/// Anything other than "true" (any case) is false, including "1" and "yes".
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().eq_ignore_ascii_case("true"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            debug: false,
            rust_log: default_log_level(),
            app_version: default_app_version(),
            environment: default_environment(),
            hostname: default_hostname(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Build configuration from explicit key/value pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }

    /// Address the server binds to: all interfaces on the configured port.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    /// Default log filter: `RUST_LOG` plus crate-level debug output when
    /// debug mode is on.
    pub fn log_filter(&self) -> String {
        if self.debug {
            format!("{},devops_app=debug,tower_http=debug", self.rust_log)
        } else {
            self.rust_log.clone()
        }
    }
}
