use std::{
    env::{self, VarError},
    str::FromStr,
    time::Duration,
};

use anyhow::Context;
use url::Url;

use crate::{models::StatusField, routes::params::MAX_PAGE_SIZE};

pub const DEFAULT_API_URL: &str = "https://67e07e477635238f9aadaa54.mockapi.io/api/v1/products";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: Url,
    pub status_field: StatusField,
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
    pub default_page_size: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key))
    }

    /// Builds the config from `lookup`. Absent variables take their default;
    /// present but malformed ones are an error.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let api_url = var_or(&lookup, "PRODUCTS_API_URL", || DEFAULT_API_URL.to_string())?;
        let api_url = Url::parse(&api_url)
            .with_context(|| format!("PRODUCTS_API_URL is not a valid URL: {api_url}"))?;

        let status_field = match optional_var(&lookup, "PRODUCTS_STATUS_FIELD")? {
            Some(value) => value
                .parse::<StatusField>()
                .map_err(|e| anyhow::anyhow!("PRODUCTS_STATUS_FIELD: {e}"))?,
            None => StatusField::Checked,
        };

        let host = var_or(&lookup, "APP_HOST", || "127.0.0.1".to_string())?;
        let port = parse_var(&lookup, "APP_PORT", 3000_u16)?;
        let request_timeout =
            Duration::from_secs(parse_var(&lookup, "REQUEST_TIMEOUT_SECS", 10_u64)?);
        let default_page_size = parse_var(&lookup, "DEFAULT_PAGE_SIZE", 10_u32)?;
        if !(1..=MAX_PAGE_SIZE).contains(&default_page_size) {
            anyhow::bail!("DEFAULT_PAGE_SIZE must be between 1 and {MAX_PAGE_SIZE}, got {default_page_size}");
        }

        Ok(Self {
            api_url,
            status_field,
            host,
            port,
            request_timeout,
            default_page_size,
        })
    }

    /// Config pointing at an explicit remote, used by tests and embedders.
    pub fn for_remote(api_url: Url, status_field: StatusField) -> Self {
        Self {
            api_url,
            status_field,
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout: Duration::from_secs(10),
            default_page_size: 10,
        }
    }
}

fn optional_var<F>(lookup: &F, key: &str) -> anyhow::Result<Option<String>>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    match lookup(key) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(err) => Err(err).with_context(|| format!("{key} is not readable")),
    }
}

fn var_or<F>(lookup: &F, key: &str, default: impl FnOnce() -> String) -> anyhow::Result<String>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    Ok(optional_var(lookup, key)?.unwrap_or_else(default))
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Result<String, VarError>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_var(lookup, key)? {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value `{raw}`")),
        None => Ok(default),
    }
}
