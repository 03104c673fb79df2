//! Asset metadata and content acquisition

use std::fmt;
use std::io;
use std::pin::Pin;

use bytes::{Bytes, BytesMut};
use futures::{Stream, TryStreamExt};

use crate::{Error, Result};

/// Chunked byte content, as handed over by the host runtime.
pub type ByteStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>;

/// Deferred content source, invoked at most once when the content is
/// first needed.
pub type StreamFactory = Box<dyn FnOnce() -> ByteStream + Send>;

/// A file handed to the adapter by the host runtime.
///
/// Identity is `hash` + `ext`; the content travels in exactly one of
/// `buffer`, `stream`, or `stream_factory`. After a successful upload
/// the adapter writes the public URL into `url` — the only mutation
/// visible to the caller.
pub struct Asset {
    /// Content-derived or caller-assigned unique name.
    pub hash: String,
    /// File extension including the leading dot.
    pub ext: String,
    /// MIME type sent as the object's content type.
    pub mime: String,
    /// Optional sub-key segment below the configured directory.
    pub path: Option<String>,
    /// Public URL, populated on successful upload.
    pub url: Option<String>,
    pub buffer: Option<Bytes>,
    pub stream: Option<ByteStream>,
    pub stream_factory: Option<StreamFactory>,
}

impl Asset {
    /// Asset with no content source attached.
    pub fn new(hash: impl Into<String>, ext: impl Into<String>, mime: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            ext: ext.into(),
            mime: mime.into(),
            path: None,
            url: None,
            buffer: None,
            stream: None,
            stream_factory: None,
        }
    }

    /// Asset backed by an in-memory buffer.
    pub fn from_bytes(
        hash: impl Into<String>,
        ext: impl Into<String>,
        mime: impl Into<String>,
        buffer: impl Into<Bytes>,
    ) -> Self {
        Self {
            buffer: Some(buffer.into()),
            ..Self::new(hash, ext, mime)
        }
    }

    /// Asset backed by an already-open byte stream.
    pub fn from_stream(
        hash: impl Into<String>,
        ext: impl Into<String>,
        mime: impl Into<String>,
        stream: ByteStream,
    ) -> Self {
        Self {
            stream: Some(stream),
            ..Self::new(hash, ext, mime)
        }
    }

    /// Asset backed by a factory producing its byte stream on demand.
    pub fn from_stream_factory(
        hash: impl Into<String>,
        ext: impl Into<String>,
        mime: impl Into<String>,
        factory: StreamFactory,
    ) -> Self {
        Self {
            stream_factory: Some(factory),
            ..Self::new(hash, ext, mime)
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Resolve the asset's full content into a single buffer.
    ///
    /// Sources are tried in order: materialized buffer, open stream,
    /// stream factory. Stream sources are drained to completion before
    /// any network write begins, so memory use is proportional to the
    /// asset size. Fails with [`Error::MissingContent`] when no source
    /// is attached.
    pub async fn resolve_content(&mut self) -> Result<Bytes> {
        if let Some(buffer) = &self.buffer {
            return Ok(buffer.clone());
        }
        if let Some(stream) = self.stream.take() {
            return collect(stream).await;
        }
        if let Some(factory) = self.stream_factory.take() {
            return collect(factory()).await;
        }
        Err(Error::MissingContent)
    }
}

/// Drain a stream, concatenating chunks in arrival order.
async fn collect(mut stream: ByteStream) -> Result<Bytes> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = stream.try_next().await? {
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}

impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Asset")
            .field("hash", &self.hash)
            .field("ext", &self.ext)
            .field("mime", &self.mime)
            .field("path", &self.path)
            .field("url", &self.url)
            .field("buffer", &self.buffer.as_ref().map(Bytes::len))
            .field("stream", &self.stream.is_some())
            .field("stream_factory", &self.stream_factory.is_some())
            .finish()
    }
}
