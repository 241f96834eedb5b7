use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use ordwatch::error::{ConfigError, Error};
use ordwatch::infrastructure::config::settings::{
    Config, ENV_BOT_TOKEN, ENV_COLLECTION_SYMBOL, ENV_GENERAL_CHAT_ID, ENV_MIN_PRICE_BTC,
    ENV_RECONNECT_DELAY,
};
use rust_decimal_macros::dec;

/// Serializes tests that touch process environment variables.
static ENV_LOCK: Mutex<()> = Mutex::new(());

const MANAGED_VARS: &[&str] = &[
    ENV_BOT_TOKEN,
    ENV_GENERAL_CHAT_ID,
    ENV_COLLECTION_SYMBOL,
    ENV_RECONNECT_DELAY,
    ENV_MIN_PRICE_BTC,
];

fn clear_env() {
    for var in MANAGED_VARS {
        std::env::remove_var(var);
    }
}

fn write_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("ordwatch.toml");
    fs::write(&path, contents).expect("write temp config");
    path
}

#[test]
fn missing_file_loads_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();
    let dir = tempfile::tempdir().unwrap();

    let config = Config::load(dir.path().join("absent.toml")).unwrap();

    assert_eq!(config.feed.collection_symbol, "stones");
    assert!(config.bot_token.is_none());
}

#[test]
fn env_overrides_file() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"
[feed]
collection_symbol = "bitmap"

[reconnection]
delay_secs = 30
"#,
    );

    std::env::set_var(ENV_COLLECTION_SYMBOL, "nodemonkes");
    std::env::set_var(ENV_MIN_PRICE_BTC, "0.25");
    let result = Config::load(&path);
    clear_env();

    let config = result.unwrap();
    assert_eq!(config.feed.collection_symbol, "nodemonkes");
    assert_eq!(config.reconnection.delay_secs, 30);
    assert_eq!(config.min_price_btc(), Some(dec!(0.25)));
}

#[test]
fn credentials_come_from_env_and_validate() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();
    let dir = tempfile::tempdir().unwrap();

    std::env::set_var(ENV_BOT_TOKEN, "123:abc");
    std::env::set_var(ENV_GENERAL_CHAT_ID, "@stones_listings");
    let result = Config::load(dir.path().join("absent.toml"));
    clear_env();

    let config = result.unwrap();
    assert_eq!(config.bot_token.as_deref(), Some("123:abc"));
    assert!(config.validate().is_ok());
}

#[test]
fn bot_token_in_file_is_ignored() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"
bot_token = "leaked"

[telegram]
general_chat_id = "-100123"
"#,
    );

    let config = Config::load(&path).unwrap();

    assert!(config.bot_token.is_none());
    match config.validate() {
        Err(Error::Config(ConfigError::MissingCredentials { vars })) => {
            assert_eq!(vars, vec![ENV_BOT_TOKEN]);
        }
        other => panic!("Expected missing bot token, got {other:?}"),
    }
}

#[test]
fn invalid_env_number_is_rejected() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();
    let dir = tempfile::tempdir().unwrap();

    std::env::set_var(ENV_RECONNECT_DELAY, "ten");
    let result = Config::load(dir.path().join("absent.toml"));
    clear_env();

    match result {
        Err(Error::Config(ConfigError::InvalidValue {
            field: ENV_RECONNECT_DELAY,
            ..
        })) => {}
        Err(err) => panic!("Expected invalid RECONNECT_DELAY, got {err}"),
        Ok(config) => panic!(
            "Expected RECONNECT_DELAY to be rejected, got {}",
            config.reconnection.delay_secs
        ),
    }
}

#[test]
fn unreadable_toml_is_parse_error() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[reconnection]\ndelay_secs = \"soon\"\n");

    let result = Config::load(&path);

    assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
}
