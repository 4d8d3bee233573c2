//! HTTP API handlers.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;

/// Name reported by the info endpoint.
pub const APP_NAME: &str = "DevOps Project App";

/// Service identifier reported by the health check.
pub const SERVICE_NAME: &str = "devops-app";

/// Deepest array/object nesting the echo endpoint accepts.
pub const MAX_ECHO_DEPTH: usize = 1000;

/// Application state shared with handlers.
///
/// Everything in here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded at startup.
    pub config: Arc<Config>,
    /// Time source for response timestamps.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create app state backed by the system clock.
    pub fn new(config: Config) -> Self {
        Self::with_clock(config, SystemClock)
    }

    /// Create app state with an explicit time source.
    pub fn with_clock(config: Config, clock: impl Clock + 'static) -> Self {
        Self {
            config: Arc::new(config),
            clock: Arc::new(clock),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "healthy".
    pub status: &'static str,
    /// Service identifier.
    pub service: &'static str,
    /// Time of the check.
    pub timestamp: String,
    /// Deployed version.
    pub version: String,
}

/// Info response.
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub app_name: &'static str,
    pub version: String,
    pub environment: String,
    pub hostname: String,
    /// Toolchain baseline and target platform. Keeps the `python_version`
    /// wire name existing clients read.
    #[serde(rename = "python_version")]
    pub runtime_version: String,
}

/// Echo response.
#[derive(Debug, Serialize)]
pub struct EchoResponse {
    /// Always "Echo successful".
    pub message: &'static str,
    /// The parsed request body, or `{}` when there was nothing to parse.
    pub received_data: Value,
    /// Time the request was handled.
    pub timestamp: String,
}

/// Metrics response. Placeholder values; nothing is counted.
#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub requests_processed: u64,
    pub uptime: &'static str,
    pub memory_usage: &'static str,
}

/// Describe the Rust toolchain and platform this binary targets.
pub fn runtime_version() -> String {
    format!(
        "rust {} ({} {})",
        env!("CARGO_PKG_RUST_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Parse an echo body. Empty or malformed input, or input nested deeper than
/// [`MAX_ECHO_DEPTH`], becomes an empty object.
pub fn parse_echo_body(body: &[u8]) -> Value {
    if body.is_empty() {
        return json!({});
    }

    let depth = nesting_depth(body);
    if depth > MAX_ECHO_DEPTH {
        debug!(
            "Echo body nests {} levels (max {}), echoing empty object",
            depth, MAX_ECHO_DEPTH
        );
        return json!({});
    }

    parse_json(body).unwrap_or_else(|e| {
        debug!("Echo body is not valid JSON ({}), echoing empty object", e);
        json!({})
    })
}

/// Parse without serde_json's fixed recursion limit; the stack grows on
/// demand instead.
fn parse_json(body: &[u8]) -> serde_json::Result<Value> {
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    Ok(value)
}

/// Maximum `[`/`{` nesting in `body`, ignoring brackets inside strings.
fn nesting_depth(body: &[u8]) -> usize {
    let mut depth = 0usize;
    let mut max = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for &byte in body {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                max = max.max(depth);
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    max
}

/// Health check handler - always returns 200.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        timestamp: state.clock.timestamp(),
        version: state.config.app_version.clone(),
    })
}

/// Info handler - reports deployment metadata.
pub async fn info(State(state): State<AppState>) -> Json<InfoResponse> {
    let config = &state.config;

    Json(InfoResponse {
        app_name: APP_NAME,
        version: config.app_version.clone(),
        environment: config.environment.clone(),
        hostname: config.hostname.clone(),
        runtime_version: runtime_version(),
    })
}

/// Echo handler - returns the request body back, 200 even for bad input.
pub async fn echo(State(state): State<AppState>, body: Bytes) -> Json<EchoResponse> {
    Json(EchoResponse {
        message: "Echo successful",
        received_data: parse_echo_body(&body),
        timestamp: state.clock.timestamp(),
    })
}

/// Metrics handler - fixed placeholder payload.
pub async fn metrics() -> Json<MetricsResponse> {
    Json(MetricsResponse {
        requests_processed: 0,
        uptime: "N/A",
        memory_usage: "N/A",
    })
}
