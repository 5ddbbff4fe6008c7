use super::*;
use serde_json::json;

fn base_url() -> reqwest::Url {
    reqwest::Url::parse("http://localhost:8080").unwrap()
}

// =============================================================
// parse_body
// =============================================================

#[test]
fn parse_body_empty_is_null() {
    assert_eq!(parse_body(b""), Value::Null);
}

#[test]
fn parse_body_decodes_json() {
    assert_eq!(parse_body(br#"{"detail":"nope"}"#), json!({ "detail": "nope" }));
}

#[test]
fn parse_body_non_json_is_null() {
    assert_eq!(parse_body(b"<html>Bad Gateway</html>"), Value::Null);
}

// =============================================================
// Credential file
// =============================================================

#[test]
fn cookie_file_restores_into_fresh_jar() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cookies.txt");
    write_cookie_file(&path, Some(&HeaderValue::from_static("access_token=abc"))).unwrap();

    let jar = Jar::default();
    restore_cookies(&jar, &base_url(), &path);
    let header = jar.cookies(&base_url()).unwrap();
    assert_eq!(header.to_str().unwrap(), "access_token=abc");
}

#[test]
fn cookie_file_restores_every_pair() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cookies.txt");
    write_cookie_file(&path, Some(&HeaderValue::from_static("a=1; b=2"))).unwrap();

    let jar = Jar::default();
    restore_cookies(&jar, &base_url(), &path);
    let header = jar.cookies(&base_url()).unwrap();
    let mut pairs: Vec<&str> = header.to_str().unwrap().split("; ").collect();
    pairs.sort_unstable();
    assert_eq!(pairs, vec!["a=1", "b=2"]);
}

#[test]
fn empty_cookie_header_removes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cookies.txt");
    write_cookie_file(&path, Some(&HeaderValue::from_static("access_token=abc"))).unwrap();

    write_cookie_file(&path, None).unwrap();
    assert!(!path.exists());
    write_cookie_file(&path, Some(&HeaderValue::from_static(""))).unwrap();
    assert!(!path.exists());
}

#[test]
fn missing_cookie_file_leaves_jar_empty() {
    let dir = tempfile::tempdir().unwrap();
    let jar = Jar::default();
    restore_cookies(&jar, &base_url(), &dir.path().join("absent.txt"));
    assert!(jar.cookies(&base_url()).is_none());
}

#[cfg(unix)]
#[test]
fn cookie_file_is_not_readable_by_others() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cookies.txt");
    write_cookie_file(&path, Some(&HeaderValue::from_static("access_token=secret-jwt"))).unwrap();
    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o077, 0, "mode was {mode:o}");
}

// =============================================================
// ReqwestTransport
// =============================================================

#[test]
fn build_restores_persisted_session_cookie() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cookies.txt");
    std::fs::write(&path, "access_token=abc").unwrap();

    let transport = ReqwestTransport::build("http://localhost:8080", None, Some(path)).unwrap();
    let header = transport.jar.cookies(&transport.base_url).unwrap();
    assert_eq!(header.to_str().unwrap(), "access_token=abc");
}

#[test]
fn build_rejects_invalid_base_url() {
    assert!(matches!(ReqwestTransport::build("not a url", None, None), Err(ApiError::Transport(_))));
}

#[test]
fn persist_mirrors_jar_to_credential_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("cookies.txt");
    let transport = ReqwestTransport::build("http://localhost:8080", None, Some(path.clone())).unwrap();
    transport.jar.add_cookie_str("access_token=abc", &transport.base_url);

    transport.persist_cookies();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "access_token=abc");
}
