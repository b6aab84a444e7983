use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::worker::{CachePolicy, WorkerConfig, DEFAULT_CACHE_VERSION};

const DEFAULT_SCOPE_URL: &str = "http://localhost:8080/";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppProfile {
    Dev,
    Prod,
}

impl AppProfile {
    pub fn from_env(value: Option<String>) -> Self {
        match value.as_deref() {
            Some("prod") | Some("production") => Self::Prod,
            _ => Self::Dev,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub profile: AppProfile,
    /// 离线缓存作用的源与路径
    pub scope_url: String,
    pub cache_policy: CachePolicy,
    pub cache_version: String,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profile: AppProfile::Dev,
            scope_url: DEFAULT_SCOPE_URL.to_string(),
            cache_policy: CachePolicy::default(),
            cache_version: DEFAULT_CACHE_VERSION.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        crate::config::load_dotenv();

        Self::from_lookup(read_env)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        config.profile = AppProfile::from_env(lookup("DATAVIZ_PROFILE"));

        if let Some(url) = lookup("DATAVIZ_SCOPE_URL") {
            config.scope_url = url;
        }

        if let Some(raw) = lookup("DATAVIZ_CACHE_POLICY") {
            match raw.parse::<CachePolicy>() {
                Ok(policy) => config.cache_policy = policy,
                Err(err) => tracing::warn!("{err}; keeping {}", config.cache_policy),
            }
        }

        if let Some(version) = lookup("DATAVIZ_CACHE_VERSION") {
            let version = version.trim();
            if !version.is_empty() {
                config.cache_version = version.to_string();
            }
        }

        if let Some(raw) = lookup("DATAVIZ_REQUEST_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) => config.request_timeout = Duration::from_secs(secs.max(1)),
                Err(err) => tracing::warn!(
                    "invalid DATAVIZ_REQUEST_TIMEOUT_SECS `{raw}`: {err}; keeping {}s",
                    config.request_timeout.as_secs()
                ),
            }
        }

        config
    }

    pub fn worker_config(&self) -> WorkerConfig {
        WorkerConfig {
            cache_version: self.cache_version.clone(),
            scope: self.scope_url.clone(),
            policy: self.cache_policy,
            ..WorkerConfig::default()
        }
    }
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .or_else(|| option_env_from_build(key).map(|s| s.to_string()))
}

fn option_env_from_build(key: &str) -> Option<&'static str> {
    match key {
        "DATAVIZ_PROFILE" => option_env!("DATAVIZ_PROFILE"),
        "DATAVIZ_SCOPE_URL" => option_env!("DATAVIZ_SCOPE_URL"),
        "DATAVIZ_CACHE_POLICY" => option_env!("DATAVIZ_CACHE_POLICY"),
        "DATAVIZ_CACHE_VERSION" => option_env!("DATAVIZ_CACHE_VERSION"),
        "DATAVIZ_REQUEST_TIMEOUT_SECS" => option_env!("DATAVIZ_REQUEST_TIMEOUT_SECS"),
        _ => None,
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_dotenv() {
    if let Err(err) = dotenvy::dotenv() {
        if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            tracing::warn!("failed to load .env: {err}");
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[inline]
pub fn load_dotenv() {}
