use glctl::commands::login::login;
use glctl::config::{delete_credential, load_credential};
use mockito::{Matcher, Server};
use serde_json::json;
use tempfile::TempDir;

#[tokio::test]
async fn login_stores_token_on_success() {
    //* Given
    let mut server = Server::new_async().await;
    let token_mock = server
        .mock("POST", "/oauth/token")
        .match_body(Matcher::Json(json!({
            "grant_type": "password",
            "username": "jdoe",
            "password": "hunter2"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"access_token":"at-1","refresh_token":"rt-1","token_type":"bearer",
                "scope":"api","created_at":1712345678}"#,
        )
        .expect(1)
        .create_async()
        .await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("glctl.yaml");

    //* When
    let cred = login(&format!("{}/api", server.url()), "jdoe", "hunter2", &path)
        .await
        .unwrap();

    //* Then
    token_mock.assert_async().await;
    assert_eq!(cred.host_url, format!("{}/api/v4", server.url()));
    let stored = load_credential(&path).unwrap().expect("credential file written");
    assert_eq!(stored, cred);
    assert_eq!(stored.access_token, "at-1");
    assert_eq!(stored.refresh_token, "rt-1");
    assert_eq!(stored.user_name, "jdoe");
    assert_eq!(stored.created_at, 1712345678);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[tokio::test]
async fn rejected_login_writes_nothing() {
    //* Given
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/oauth/token")
        .with_status(401)
        .with_body(
            r#"{"error":"invalid_grant","error_description":"The provided authorization grant is invalid, expired, revoked"}"#,
        )
        .create_async()
        .await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("glctl.yaml");

    //* When
    let err = login(&server.url(), "jdoe", "wrong-password", &path)
        .await
        .unwrap_err();

    //* Then
    let msg = format!("{err:#}");
    assert!(msg.contains("The provided authorization grant is invalid"));
    assert!(msg.contains("jdoe"));
    assert!(!msg.contains("wrong-password"));
    assert!(!path.exists());
}

#[test]
fn logout_of_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("glctl.yaml");

    let err = delete_credential(&path).unwrap_err();
    assert!(err.to_string().contains("does not exist"));
    assert!(!path.exists());
}

#[test]
fn logout_removes_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("glctl.yaml");
    std::fs::write(&path, "access_token: abc\nhost_url: https://gitlab.example.com\n").unwrap();

    delete_credential(&path).unwrap();
    assert!(!path.exists());
}
