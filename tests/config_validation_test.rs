use serde_json::json;

use spaceport::ProviderConfig;

#[test]
fn legacy_field_names_are_accepted() {
    let config: ProviderConfig = serde_json::from_value(json!({
        "key": "legacy-access",
        "secret": "legacy-secret",
        "endpoint": "https://nyc3.digitaloceanspaces.com",
        "region": "nyc3",
        "space": "legacy-space",
    }))
    .expect("legacy field names should deserialize");

    assert_eq!(config.access_key, "legacy-access");
    assert_eq!(config.secret_key, "legacy-secret");
    assert_eq!(config.bucket(), Some("legacy-space"));
}

#[test]
fn primary_bucket_field_wins_over_legacy_alias() {
    let config = ProviderConfig {
        bucket: Some("primary".into()),
        space: Some("legacy".into()),
        ..Default::default()
    };

    assert_eq!(config.bucket(), Some("primary"));
}

#[test]
fn blank_bucket_falls_back_to_legacy_alias() {
    let config = ProviderConfig {
        bucket: Some("  ".into()),
        space: Some("legacy".into()),
        ..Default::default()
    };

    assert_eq!(config.bucket(), Some("legacy"));
}

#[test]
fn missing_bucket_resolves_to_none() {
    let config = ProviderConfig::default();
    assert_eq!(config.bucket(), None);
}

#[test]
fn empty_cdn_endpoint_counts_as_absent() {
    let config = ProviderConfig {
        cdn_endpoint: Some(String::new()),
        ..Default::default()
    };

    assert_eq!(config.cdn_endpoint(), None);
}

#[test]
fn unknown_options_pass_through_untouched() {
    let config: ProviderConfig = serde_json::from_value(json!({
        "access_key": "access",
        "secret_key": "secret",
        "endpoint": "https://nyc3.digitaloceanspaces.com",
        "region": "nyc3",
        "bucket": "test-space",
        "force_path_style": false,
        "request_timeout_secs": 30,
    }))
    .expect("unknown options should not fail deserialization");

    assert_eq!(config.extra.get("force_path_style"), Some(&json!(false)));
    assert_eq!(config.extra.get("request_timeout_secs"), Some(&json!(30)));
}
