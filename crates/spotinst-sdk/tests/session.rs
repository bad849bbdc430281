//! Credential discovery end to end: environment and shared credentials file

mod common;

use std::env;
use std::fs;

use common::ok;
use serial_test::serial;
use spotinst_config::credentials::{ENV_ACCOUNT, ENV_PROFILE, ENV_TOKEN};
use spotinst_config::file::ENV_CREDENTIALS_FILE;
use spotinst_sdk::{Config, Context, Session, Spotinst};
use tempfile::TempDir;
use wiremock::matchers::{header, method, query_param};
use wiremock::{Mock, MockServer};

fn clear_env() {
    unsafe {
        env::remove_var(ENV_TOKEN);
        env::remove_var(ENV_ACCOUNT);
        env::remove_var(ENV_PROFILE);
        env::remove_var(ENV_CREDENTIALS_FILE);
    }
}

fn write_credentials(dir: &TempDir) {
    let path = dir.path().join("credentials");
    fs::write(
        &path,
        r#"
[default]
token = "file-token"
account = "act-file"

[staging]
token = "staging-token"
account = "act-staging"
"#,
    )
    .unwrap();
    unsafe {
        env::set_var(ENV_CREDENTIALS_FILE, &path);
    }
}

#[tokio::test]
#[serial]
async fn test_credentials_from_file_profile() {
    clear_env();
    let dir = TempDir::new().unwrap();
    write_credentials(&dir);
    unsafe {
        env::set_var(ENV_PROFILE, "staging");
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer staging-token"))
        .and(query_param("accountId", "act-staging"))
        .respond_with(ok("spotinst:setup:account", vec![]))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new([&Config::new().with_base_url(&server.uri()).unwrap()]).unwrap();
    Spotinst::new(&session)
        .account
        .list_accounts(&Context::background())
        .await
        .unwrap();

    clear_env();
}

#[tokio::test]
#[serial]
async fn test_environment_token_with_file_account() {
    clear_env();
    let dir = TempDir::new().unwrap();
    write_credentials(&dir);
    unsafe {
        env::set_var(ENV_TOKEN, "env-token");
    }

    let session = Session::new([&Config::new()]).unwrap();
    assert_eq!(session.config().token(), Some("env-token"));
    assert_eq!(session.config().account(), Some("act-file"));

    clear_env();
}

#[tokio::test]
#[serial]
async fn test_code_token_is_not_overridden() {
    clear_env();
    unsafe {
        env::set_var(ENV_TOKEN, "env-token");
        env::set_var(ENV_ACCOUNT, "act-env");
    }

    let session = Session::new([&Config::new()
        .with_credentials(spotinst_sdk::Value::token_only("code-token"))])
    .unwrap();
    assert_eq!(session.config().token(), Some("code-token"));
    // Discovery only runs without a configured token
    assert_eq!(session.config().account(), None);

    clear_env();
}
