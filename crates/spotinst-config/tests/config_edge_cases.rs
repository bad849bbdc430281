use std::env;
use std::fs;
use std::path::PathBuf;

use serial_test::serial;
use spotinst_config::credentials::{ENV_ACCOUNT, ENV_PROFILE, ENV_TOKEN};
use spotinst_config::file::ENV_CREDENTIALS_FILE;
use spotinst_config::{
    ChainProvider, Config, ConfigError, CredentialsFile, EnvProvider, FileProvider, Provider,
    StaticProvider, Value,
};
use tempfile::TempDir;

fn clear_env() {
    unsafe {
        env::remove_var(ENV_TOKEN);
        env::remove_var(ENV_ACCOUNT);
        env::remove_var(ENV_PROFILE);
        env::remove_var(ENV_CREDENTIALS_FILE);
    }
}

// ---------------------------------------------------------------------------
// Credentials file
// ---------------------------------------------------------------------------

#[test]
fn load_from_nonexistent_path_returns_empty_file() {
    let path = PathBuf::from("/tmp/spotinst-test-nonexistent/does/not/exist/credentials");
    assert!(!path.exists());

    let file = CredentialsFile::load_from_path(&path).expect("missing file is not an error");
    assert!(file.profiles.is_empty());
}

#[test]
fn load_empty_file_returns_empty_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("credentials");
    fs::write(&path, "").unwrap();

    let file = CredentialsFile::load_from_path(&path).expect("empty file should parse");
    assert!(file.profiles.is_empty());
}

#[test]
fn load_corrupt_toml_returns_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("credentials");
    fs::write(&path, "[[[broken").unwrap();

    let err = CredentialsFile::load_from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)));
    assert!(err.to_string().contains("parse"));
}

#[test]
fn load_profile_with_unknown_fields_ignores_them() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("credentials");
    fs::write(
        &path,
        r#"
[default]
token = "abc"
region = "us-east-1"
"#,
    )
    .unwrap();

    let file = CredentialsFile::load_from_path(&path).expect("unknown keys are ignored");
    assert_eq!(file.profile("default").unwrap().token.as_deref(), Some("abc"));
}

#[cfg(unix)]
#[test]
fn save_to_unwritable_location_returns_save_error() {
    let err = CredentialsFile::default()
        .save_to_path(std::path::Path::new("/proc/spotinst-test/credentials"))
        .unwrap_err();
    assert!(matches!(err, ConfigError::SaveError { .. }));
}

// ---------------------------------------------------------------------------
// Discovery order
// ---------------------------------------------------------------------------

#[test]
#[serial]
fn default_chain_prefers_environment_over_file() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("credentials");
    fs::write(
        &path,
        "[default]\ntoken = \"file-token\"\naccount = \"act-file\"\n",
    )
    .unwrap();

    unsafe {
        env::set_var(ENV_CREDENTIALS_FILE, &path);
        env::set_var(ENV_TOKEN, "env-token");
    }

    let value = ChainProvider::default_chain().retrieve().unwrap();
    assert_eq!(value.token.as_deref(), Some("env-token"));
    assert_eq!(value.provider, EnvProvider::NAME);
    // the environment had no account, so the file supplies it
    assert_eq!(value.account.as_deref(), Some("act-file"));

    clear_env();
}

#[test]
#[serial]
fn default_chain_falls_back_to_file() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("credentials");
    fs::write(&path, "[default]\ntoken = \"file-token\"\n").unwrap();

    unsafe {
        env::set_var(ENV_CREDENTIALS_FILE, &path);
    }

    let value = ChainProvider::default_chain().retrieve().unwrap();
    assert_eq!(value.token.as_deref(), Some("file-token"));
    assert_eq!(value.provider, FileProvider::NAME);

    clear_env();
}

#[test]
#[serial]
fn default_chain_with_nothing_configured_fails() {
    clear_env();
    unsafe {
        env::set_var(
            ENV_CREDENTIALS_FILE,
            "/tmp/spotinst-test-nonexistent/credentials",
        );
    }

    let err = ChainProvider::default_chain().retrieve().unwrap_err();
    assert!(matches!(err, ConfigError::NoValidProvidersInChain { .. }));
    assert!(err.to_string().contains("SPOTINST_TOKEN"));

    clear_env();
}

#[test]
fn explicit_provider_first_in_chain_wins() {
    let chain = ChainProvider::new(vec![
        Box::new(StaticProvider::new(Value::new("code-token", "act-code"))),
        Box::new(StaticProvider::new(Value::new("other", "act-other"))),
    ]);
    let value = chain.retrieve().unwrap();
    assert_eq!(value.token.as_deref(), Some("code-token"));
    assert_eq!(value.account.as_deref(), Some("act-code"));
}

// ---------------------------------------------------------------------------
// Config layering
// ---------------------------------------------------------------------------

#[test]
fn merged_config_keeps_endpoint_and_credentials_from_any_layer() {
    let defaults = Config::defaults();
    let session = Config::new().with_credentials(Value::new("t", "act-1"));
    let call = Config::new().with_user_agent("my-tool/1.0");

    let config = Config::merged([&defaults, &session, &call]);
    assert!(config.base_url().is_some());
    assert_eq!(config.token(), Some("t"));
    assert_eq!(config.account(), Some("act-1"));
    assert_eq!(config.user_agent.as_deref(), Some("my-tool/1.0"));
    assert!(config.validate().is_ok());
}
