//! Object key derivation

/// Derive the storage object key for an asset.
///
/// Layout is fixed: configured directory prefix, then the asset's own
/// path segment, then `hash` + `ext`. Identical inputs always produce
/// identical keys — no randomness, no timestamps.
pub fn object_key(directory: Option<&str>, path: Option<&str>, hash: &str, ext: &str) -> String {
    format!("{}{}{}{}", prefix(directory), prefix(path), hash, ext)
}

/// Normalize a key segment: absent or empty yields nothing, anything
/// else is stripped of trailing slashes and given exactly one.
fn prefix(segment: Option<&str>) -> String {
    match segment {
        Some(s) if !s.is_empty() => format!("{}/", s.trim_end_matches('/')),
        _ => String::new(),
    }
}
