//! Endpoint normalization for virtual-hosted-style addressing

use url::Url;

/// Rewrite `endpoint` so that the bucket appears as a host subdomain.
///
/// Several S3-compatible providers route and sign requests by bucket
/// subdomain. Callers may supply either a bare regional endpoint or an
/// already-bucket-qualified one; both must come out usable. Any parse
/// failure returns the raw endpoint — normalization never blocks
/// adapter construction.
pub fn normalize_endpoint(endpoint: &str, bucket: Option<&str>) -> String {
    let Some(bucket) = bucket.filter(|b| !b.is_empty()) else {
        return endpoint.to_string();
    };

    // Endpoint already mentions the bucket somewhere (virtual-hosted or
    // embedded in a path): leave it alone rather than risk a second
    // prefix.
    if endpoint.contains(bucket) {
        return endpoint.to_string();
    }

    let Ok(url) = Url::parse(endpoint) else {
        return endpoint.to_string();
    };
    let Some(host) = url.host_str() else {
        return endpoint.to_string();
    };
    if host.starts_with(&format!("{bucket}.")) {
        return endpoint.to_string();
    }

    let mut authority = format!("{bucket}.{host}");
    if let Some(port) = url.port() {
        authority = format!("{authority}:{port}");
    }
    format!("{}://{}{}", url.scheme(), authority, url.path())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepends_bucket_to_bare_endpoint() {
        let normalized =
            normalize_endpoint("https://nyc3.digitaloceanspaces.com", Some("test-space"));

        let url = Url::parse(&normalized).expect("normalized endpoint should stay parseable");
        assert!(url.host_str().unwrap().starts_with("test-space."));
        assert_eq!(normalized, "https://test-space.nyc3.digitaloceanspaces.com/");
    }

    #[test]
    fn preserves_scheme_and_port() {
        let normalized = normalize_endpoint("http://localhost:9000", Some("media"));
        assert_eq!(normalized, "http://media.localhost:9000/");
    }

    #[test]
    fn leaves_bucket_qualified_endpoint_alone() {
        let endpoint = "https://test-space.nyc3.digitaloceanspaces.com";
        assert_eq!(normalize_endpoint(endpoint, Some("test-space")), endpoint);
    }

    #[test]
    fn leaves_bucket_in_path_alone() {
        let endpoint = "https://nyc3.digitaloceanspaces.com/test-space";
        assert_eq!(normalize_endpoint(endpoint, Some("test-space")), endpoint);
    }

    #[test]
    fn malformed_endpoint_falls_back_unchanged() {
        assert_eq!(
            normalize_endpoint("not a url", Some("test-space")),
            "not a url"
        );
        assert_eq!(
            normalize_endpoint("nyc3.digitaloceanspaces.com", Some("test-space")),
            "nyc3.digitaloceanspaces.com"
        );
    }

    #[test]
    fn missing_bucket_is_a_no_op() {
        let endpoint = "https://nyc3.digitaloceanspaces.com";
        assert_eq!(normalize_endpoint(endpoint, None), endpoint);
        assert_eq!(normalize_endpoint(endpoint, Some("")), endpoint);
    }
}
