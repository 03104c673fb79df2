//! Public URL resolution

/// Compute the public URL a client would use to fetch an object.
///
/// A configured CDN endpoint takes total precedence. Without one, the
/// bucket-subdomain form is rebuilt from the raw configured endpoint,
/// always over HTTPS — the caller's endpoint may or may not already
/// carry the bucket, so the host is recomputed here instead of trusting
/// the normalized form.
pub fn public_url(cdn_endpoint: Option<&str>, endpoint: &str, bucket: &str, key: &str) -> String {
    if let Some(cdn) = cdn_endpoint {
        let base = cdn.strip_suffix('/').unwrap_or(cdn);
        return format!("{base}/{key}");
    }

    let host = endpoint
        .strip_prefix("https://")
        .or_else(|| endpoint.strip_prefix("http://"))
        .unwrap_or(endpoint);
    format!("https://{bucket}.{host}/{key}")
}
