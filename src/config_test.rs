use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn from_lookup_defaults_api_url() {
    let cfg = PortalConfig::from_lookup(lookup_from(&[("PORTAL_STATE_DIR", "/tmp/portal")])).unwrap();
    assert_eq!(cfg.api_url, DEFAULT_API_URL);
    assert_eq!(cfg.state_dir, PathBuf::from("/tmp/portal"));
    assert_eq!(cfg.timeout, None);
}

#[test]
fn from_lookup_trims_trailing_slash() {
    let cfg = PortalConfig::from_lookup(lookup_from(&[
        ("PORTAL_API_URL", "https://api.example.test/"),
        ("PORTAL_STATE_DIR", "/tmp/portal"),
    ]))
    .unwrap();
    assert_eq!(cfg.api_url, "https://api.example.test");
}

#[test]
fn from_lookup_rejects_non_http_url() {
    let err = PortalConfig::from_lookup(lookup_from(&[
        ("PORTAL_API_URL", "ftp://example.test"),
        ("PORTAL_STATE_DIR", "/tmp/portal"),
    ]))
    .unwrap_err()
    .to_string();
    assert!(err.contains("PORTAL_API_URL"));
}

#[test]
fn from_lookup_parses_timeout() {
    let cfg = PortalConfig::from_lookup(lookup_from(&[
        ("PORTAL_STATE_DIR", "/tmp/portal"),
        ("PORTAL_TIMEOUT_SECS", "15"),
    ]))
    .unwrap();
    assert_eq!(cfg.timeout, Some(Duration::from_secs(15)));
}

#[test]
fn from_lookup_zero_timeout_means_unbounded() {
    let cfg = PortalConfig::from_lookup(lookup_from(&[
        ("PORTAL_STATE_DIR", "/tmp/portal"),
        ("PORTAL_TIMEOUT_SECS", "0"),
    ]))
    .unwrap();
    assert_eq!(cfg.timeout, None);
}

#[test]
fn from_lookup_bad_timeout_errors() {
    let err = PortalConfig::from_lookup(lookup_from(&[
        ("PORTAL_STATE_DIR", "/tmp/portal"),
        ("PORTAL_TIMEOUT_SECS", "soon"),
    ]))
    .unwrap_err()
    .to_string();
    assert!(err.contains("invalid PORTAL_TIMEOUT_SECS"));
}

#[test]
fn state_files_live_under_state_dir() {
    let cfg = PortalConfig::from_lookup(lookup_from(&[("PORTAL_STATE_DIR", "/tmp/portal")])).unwrap();
    assert_eq!(cfg.shadow_path(), PathBuf::from("/tmp/portal/user.json"));
    assert_eq!(cfg.credential_path(), PathBuf::from("/tmp/portal/cookies.txt"));
}
