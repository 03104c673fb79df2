//! Storage operations facade

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::asset::Asset;
use crate::config::ProviderConfig;
use crate::key::object_key;
use crate::public_url::public_url;
use crate::storage::{create_store, ObjectAcl, ObjectStore};
use crate::{Error, Result};

/// Upload-provider facade over an S3-compatible object store.
///
/// Constructed once per host configuration. Every operation closes only
/// over the immutable configuration and the shared store handle, so
/// concurrent operations need no coordination; the single caller-visible
/// mutation is the `url` written onto an uploaded [`Asset`].
pub struct SpacesProvider {
    config: ProviderConfig,
    bucket: String,
    store: Arc<dyn ObjectStore>,
}

impl SpacesProvider {
    /// Build a provider from host configuration, constructing the
    /// production store against the normalized endpoint.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let store = create_store(&config)?;
        Self::with_store(config, store)
    }

    /// Build a provider around an explicit store implementation.
    pub fn with_store(config: ProviderConfig, store: Arc<dyn ObjectStore>) -> Result<Self> {
        let bucket = config
            .bucket()
            .ok_or_else(|| Error::config("bucket (or legacy 'space') must be specified"))?
            .to_string();

        info!(endpoint = %config.endpoint, bucket = %bucket, "storage provider initialized");

        Ok(Self {
            config,
            bucket,
            store,
        })
    }

    fn key_for(&self, asset: &Asset) -> String {
        object_key(
            self.config.directory.as_deref(),
            asset.path.as_deref(),
            &asset.hash,
            &asset.ext,
        )
    }

    /// Upload an asset and record its public URL on success.
    ///
    /// Fails when no content source is attached, when the content
    /// stream errors, or when the backend write fails. No retry.
    pub async fn upload(&self, asset: &mut Asset) -> Result<()> {
        let key = self.key_for(asset);
        let content = asset.resolve_content().await?;

        debug!(%key, size = content.len(), mime = %asset.mime, "uploading object");
        self.store
            .put(&key, content, &asset.mime, ObjectAcl::PublicRead)
            .await?;

        asset.url = Some(public_url(
            self.config.cdn_endpoint(),
            &self.config.endpoint,
            &self.bucket,
            &key,
        ));
        Ok(())
    }

    /// Identical semantics to [`upload`](Self::upload); the host
    /// runtime invokes this entry point for stream-backed files.
    pub async fn upload_stream(&self, asset: &mut Asset) -> Result<()> {
        self.upload(asset).await
    }

    /// Remove an asset's object, best-effort.
    ///
    /// The host treats deletion as cleanup around record removal, so a
    /// backend failure (including an already-missing object) never
    /// surfaces to the caller.
    pub async fn delete(&self, asset: &Asset) {
        let key = self.key_for(asset);
        if let Err(err) = self.store.delete(&key).await {
            warn!(%key, error = %err, "delete failed; treating object as already gone");
        }
    }

    /// Advisory existence check; backend failures report `false`.
    pub async fn check(&self, asset: &Asset) -> bool {
        let key = self.key_for(asset);
        match self.store.exists(&key).await {
            Ok(found) => found,
            Err(err) => {
                warn!(%key, error = %err, "existence check failed");
                false
            }
        }
    }
}
