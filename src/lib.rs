//! Spaceport - an upload-provider adapter for S3-compatible object storage
//!
//! Spaceport maps a content-management host's "store this file" contract
//! onto virtual-hosted-style object storage backends (DigitalOcean
//! Spaces, Cloudflare R2, AWS S3):
//! - Stable, deterministic object keys derived from file metadata
//! - Bucket-qualified endpoint normalization for request signing
//! - Public URL resolution with CDN override
//! - Upload / best-effort delete / advisory existence check

pub mod asset;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod key;
pub mod provider;
pub mod public_url;
pub mod storage;

pub use asset::{Asset, ByteStream, StreamFactory};
pub use config::ProviderConfig;
pub use error::{Error, Result};
pub use provider::SpacesProvider;
