//! S3-compatible storage client
//!
//! Signs requests with AWS Signature Version 4 over plain HTTP, in the
//! style of the lightweight clients used against DigitalOcean Spaces,
//! Cloudflare R2, and MinIO. The endpoint given at construction is used
//! verbatim as the base URL — the bucket is already part of it — so a
//! key maps straight onto `{endpoint}/{key}`.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::{Client, Method, Response, StatusCode};
use sha2::{Digest, Sha256};
use url::Url;

use super::{ObjectAcl, ObjectStore};
use crate::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

const SERVICE: &str = "s3";

/// Object store speaking sigv4-signed HTTP against a fixed base URL.
pub struct S3Store {
    http: Client,
    base: Url,
    region: String,
    access_key: String,
    secret_key: String,
}

impl S3Store {
    pub fn new(endpoint: &str, region: &str, access_key: &str, secret_key: &str) -> Result<Self> {
        let base = Url::parse(endpoint)
            .map_err(|e| Error::config(format!("invalid storage endpoint '{}': {}", endpoint, e)))?;
        if base.host_str().is_none() {
            return Err(Error::config(format!(
                "storage endpoint '{}' has no host",
                endpoint
            )));
        }

        Ok(Self {
            http: Client::new(),
            base,
            region: region.to_string(),
            access_key: access_key.to_string(),
            secret_key: secret_key.to_string(),
        })
    }

    fn object_url(&self, key: &str) -> String {
        format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            key.trim_start_matches('/')
        )
    }

    /// Issue one signed request for `key`.
    async fn request(
        &self,
        method: Method,
        key: &str,
        body: Option<Bytes>,
        extra_headers: &[(&str, &str)],
    ) -> Result<Response> {
        let url = self.object_url(key);
        let parsed = Url::parse(&url)
            .map_err(|e| Error::storage(format!("invalid object URL '{}': {}", url, e)))?;

        let host = parsed.host_str().unwrap_or_default();
        let host_header = match parsed.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let payload_hash = hex::encode(Sha256::digest(body.as_deref().unwrap_or(&[])));

        let now = Utc::now();
        let date_stamp = now.format("%Y%m%d").to_string();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();

        // Headers participating in the signature, sorted by name.
        let mut signed: Vec<(String, String)> = vec![
            ("host".to_string(), host_header),
            ("x-amz-content-sha256".to_string(), payload_hash.clone()),
            ("x-amz-date".to_string(), amz_date.clone()),
        ];
        for (name, value) in extra_headers {
            signed.push((name.to_string(), value.to_string()));
        }
        signed.sort_by(|a, b| a.0.cmp(&b.0));

        let signed_header_names = signed
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(";");
        let canonical_headers: String = signed
            .iter()
            .map(|(name, value)| format!("{}:{}\n", name, value.trim()))
            .collect();

        let canonical_request = format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            method.as_str(),
            parsed.path(),
            parsed.query().unwrap_or(""),
            canonical_headers,
            signed_header_names,
            payload_hash,
        );

        let scope = format!("{}/{}/{}/aws4_request", date_stamp, self.region, SERVICE);
        let string_to_sign = format!(
            "AWS4-HMAC-SHA256\n{}\n{}\n{}",
            amz_date,
            scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes())),
        );
        let signature = self.signature(&date_stamp, &string_to_sign);

        let authorization = format!(
            "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
            self.access_key, scope, signed_header_names, signature,
        );

        tracing::debug!(%url, method = %method, "sending signed storage request");

        let mut request = self.http.request(method, parsed);
        for (name, value) in &signed {
            // reqwest derives the host header from the URL itself.
            if name != "host" {
                request = request.header(name, value);
            }
        }
        request = request.header("authorization", authorization);
        if let Some(body) = body {
            request = request.body(body);
        }

        Ok(request.send().await?)
    }

    /// Derive the request signature for `string_to_sign`.
    fn signature(&self, date_stamp: &str, string_to_sign: &str) -> String {
        let k_date = hmac(
            format!("AWS4{}", self.secret_key).as_bytes(),
            date_stamp.as_bytes(),
        );
        let k_region = hmac(&k_date, self.region.as_bytes());
        let k_service = hmac(&k_region, SERVICE.as_bytes());
        let k_signing = hmac(&k_service, b"aws4_request");
        hex::encode(hmac(&k_signing, string_to_sign.as_bytes()))
    }
}

fn hmac(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put(&self, key: &str, data: Bytes, content_type: &str, acl: ObjectAcl) -> Result<()> {
        let response = self
            .request(
                Method::PUT,
                key,
                Some(data),
                &[
                    ("content-type", content_type),
                    ("x-amz-acl", acl.as_header_value()),
                ],
            )
            .await?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT => Ok(()),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(Error::storage(format!("S3 put failed ({}): {}", status, body)))
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let response = self.request(Method::DELETE, key, None, &[]).await?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT | StatusCode::ACCEPTED => Ok(()),
            StatusCode::NOT_FOUND => Err(Error::storage(format!("S3 object not found: {}", key))),
            status => Err(Error::storage(format!(
                "S3 delete failed with status {}",
                status
            ))),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let response = self.request(Method::HEAD, key, None, &[]).await?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(Error::storage(format!(
                "S3 head failed with status {}",
                status
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(endpoint: &str) -> S3Store {
        S3Store::new(endpoint, "nyc3", "access", "secret").unwrap()
    }

    #[test]
    fn object_url_joins_key_onto_base() {
        let store = store("https://test-space.nyc3.digitaloceanspaces.com");
        assert_eq!(
            store.object_url("uploads/test-hash.png"),
            "https://test-space.nyc3.digitaloceanspaces.com/uploads/test-hash.png"
        );
    }

    #[test]
    fn object_url_tolerates_trailing_and_leading_slashes() {
        let store = store("https://test-space.nyc3.digitaloceanspaces.com/");
        assert_eq!(
            store.object_url("/test-hash.png"),
            "https://test-space.nyc3.digitaloceanspaces.com/test-hash.png"
        );
    }

    #[test]
    fn construction_rejects_unparseable_endpoint() {
        let result = S3Store::new("not a url", "nyc3", "access", "secret");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn signature_is_deterministic_per_day_and_payload() {
        let store = store("https://test-space.nyc3.digitaloceanspaces.com");
        let first = store.signature("20240101", "AWS4-HMAC-SHA256\nexample");
        let second = store.signature("20240101", "AWS4-HMAC-SHA256\nexample");

        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
    }
}
