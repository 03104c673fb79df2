//! Storage client abstraction
//!
//! The adapter core talks to the backend exclusively through
//! [`ObjectStore`]; the production implementation signs S3-compatible
//! HTTP requests, and tests substitute their own.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::config::ProviderConfig;
use crate::endpoint::normalize_endpoint;
use crate::{Error, Result};

pub mod s3;

pub use s3::S3Store;

/// Canned ACL applied to stored objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectAcl {
    PublicRead,
    Private,
}

impl ObjectAcl {
    /// Value sent in the `x-amz-acl` request header.
    pub fn as_header_value(self) -> &'static str {
        match self {
            ObjectAcl::PublicRead => "public-read",
            ObjectAcl::Private => "private",
        }
    }
}

/// Object storage client capability.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write an object under `key`.
    async fn put(&self, key: &str, data: Bytes, content_type: &str, acl: ObjectAcl) -> Result<()>;

    /// Delete the object under `key`.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check whether an object exists under `key`.
    async fn exists(&self, key: &str) -> Result<bool>;
}

/// Build the production store from provider configuration.
///
/// The endpoint handed to the client is the normalized, bucket-qualified
/// form so that virtual-hosted-style requests sign and route correctly.
pub fn create_store(config: &ProviderConfig) -> Result<Arc<dyn ObjectStore>> {
    let bucket = config
        .bucket()
        .ok_or_else(|| Error::config("bucket (or legacy 'space') must be specified"))?;

    let endpoint = normalize_endpoint(&config.endpoint, Some(bucket));
    let store = S3Store::new(
        &endpoint,
        &config.region,
        &config.access_key,
        &config.secret_key,
    )?;

    Ok(Arc::new(store))
}
