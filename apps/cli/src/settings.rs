use std::{path::Path, time::Duration};

use anyhow::Context;
use client_core::{DEFAULT_API_URL, DEFAULT_PAGE_SIZE, DEFAULT_REQUEST_TIMEOUT};
use config::{Config, Environment, File, FileFormat, Map};
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "invoice.toml";
const ENV_PREFIX: &str = "INVOICE";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_url: String,
    pub page_size: usize,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
        }
    }
}

impl Settings {
    /// Defaults, then `invoice.toml` (or `config_path`), then `INVOICE__*`
    /// environment variables, then `api_url_override`.
    pub fn load(config_path: Option<&Path>, api_url_override: Option<String>) -> anyhow::Result<Self> {
        load_settings(config_path, None, api_url_override)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn load_settings(
    config_path: Option<&Path>,
    env: Option<Map<String, String>>,
    api_url_override: Option<String>,
) -> anyhow::Result<Settings> {
    let file = match config_path {
        Some(path) => File::from(path).required(true),
        None => File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false),
    };
    let environment = Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
        .source(env);

    let mut settings: Settings = Config::builder()
        .add_source(file)
        .add_source(environment)
        .build()
        .with_context(|| match config_path {
            Some(path) => format!("failed to read settings from '{}'", path.display()),
            None => "failed to read settings".to_string(),
        })?
        .try_deserialize()
        .context("invalid settings")?;

    if let Some(api_url) = api_url_override {
        settings.api_url = api_url;
    }
    if settings.page_size == 0 {
        settings.page_size = DEFAULT_PAGE_SIZE;
    }
    Ok(settings)
}
