//! App Configuration
//!
//! Where the Supabase project lives. Read from `window.__TASKFLOW_CONFIG__`
//! when the host page sets it, otherwise from the build environment.

use serde::Deserialize;
use supabase_rest::ClientConfig;
use thiserror::Error;
use wasm_bindgen::JsValue;

const RUNTIME_CONFIG_KEY: &str = "__TASKFLOW_CONFIG__";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("invalid Supabase URL: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RuntimeConfig {
    supabase_url: Option<String>,
    supabase_anon_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

impl AppConfig {
    /// Runtime values win per field; build-time values fill the gaps
    pub fn load() -> Result<Self, ConfigError> {
        let runtime = runtime_config();
        Self::from_values(
            runtime
                .supabase_url
                .or_else(|| option_env!("SUPABASE_URL").map(String::from)),
            runtime
                .supabase_anon_key
                .or_else(|| option_env!("SUPABASE_ANON_KEY").map(String::from)),
        )
    }

    pub fn from_values(url: Option<String>, anon_key: Option<String>) -> Result<Self, ConfigError> {
        let supabase_url = non_blank(url).ok_or(ConfigError::Missing("SUPABASE_URL"))?;
        let supabase_anon_key =
            non_blank(anon_key).ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?;
        Ok(Self {
            supabase_url,
            supabase_anon_key,
        })
    }

    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        ClientConfig::new(&self.supabase_url, self.supabase_anon_key.clone())
            .map_err(|e| ConfigError::InvalidUrl(e.to_string()))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn runtime_config() -> RuntimeConfig {
    let Some(window) = web_sys::window() else {
        return RuntimeConfig::default();
    };
    let raw = match js_sys::Reflect::get(&window, &JsValue::from_str(RUNTIME_CONFIG_KEY)) {
        Ok(raw) if !raw.is_undefined() && !raw.is_null() => raw,
        _ => return RuntimeConfig::default(),
    };
    serde_wasm_bindgen::from_value(raw).unwrap_or_else(|e| {
        tracing::warn!("ignoring malformed {}: {}", RUNTIME_CONFIG_KEY, e);
        RuntimeConfig::default()
    })
}

/// Origin of the running page, used as the sign-up confirmation target
pub fn app_origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}
