use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Provider configuration supplied once by the host runtime.
///
/// Field names follow the current host contract; the legacy names
/// `key`, `secret`, and `space` are still accepted as aliases. Anything
/// the adapter does not recognise is collected into `extra` and passed
/// through untouched.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ProviderConfig {
    #[serde(alias = "key")]
    pub access_key: String,
    #[serde(alias = "secret")]
    pub secret_key: String,
    /// Base URL of the storage backend (scheme + host + optional path).
    pub endpoint: String,
    pub region: String,
    pub bucket: Option<String>,
    /// Legacy name for `bucket`, kept for older host configurations.
    pub space: Option<String>,
    /// Optional key prefix, a logical folder inside the bucket.
    pub directory: Option<String>,
    /// Override base URL for public links, typically a CDN in front of
    /// the bucket.
    pub cdn_endpoint: Option<String>,
    /// Backend-specific passthrough options; never interpreted here.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl ProviderConfig {
    /// Load configuration from disk and environment.
    pub fn load() -> Result<Self> {
        let config_path =
            env::var("SPACEPORT_CONFIG").unwrap_or_else(|_| "spaceport.toml".to_string());

        let mut builder = config::Config::builder();

        if Path::new(&config_path).exists() {
            builder = builder.add_source(config::File::from(PathBuf::from(&config_path)));
        }

        builder = builder.add_source(config::Environment::with_prefix("SPACEPORT"));

        let settings = builder.build()?;
        let config: Self = settings
            .try_deserialize()
            .context("invalid provider configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Bucket name, preferring the primary field over the legacy
    /// `space` alias. Blank values count as absent.
    pub fn bucket(&self) -> Option<&str> {
        self.bucket
            .as_deref()
            .filter(|b| !b.trim().is_empty())
            .or_else(|| self.space.as_deref().filter(|s| !s.trim().is_empty()))
    }

    /// CDN endpoint, treating an empty string as absent.
    pub fn cdn_endpoint(&self) -> Option<&str> {
        self.cdn_endpoint
            .as_deref()
            .filter(|c| !c.trim().is_empty())
    }

    fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            bail!("endpoint must be specified");
        }
        if self.bucket().is_none() {
            bail!("bucket (or legacy 'space') must be specified");
        }
        Ok(())
    }
}
