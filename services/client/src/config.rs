use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// WebSocket base address of the chat service.
    pub server_url: String,
    /// Channel path segment appended to the fixed `ws/` route.
    pub channel: String,
    /// Credentials file holding the persisted auth token.
    pub credentials_path: PathBuf,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let server_url =
            std::env::var("SERVER_URL").unwrap_or_else(|_| "ws://127.0.0.1:8000".to_string());
        if !server_url.starts_with("ws://") && !server_url.starts_with("wss://") {
            return Err(ConfigError::InvalidValue(
                "SERVER_URL".to_string(),
                format!("'{}' is not a ws:// or wss:// address", server_url),
            ));
        }

        let channel = std::env::var("CHAT_CHANNEL").unwrap_or_else(|_| "chat".to_string());
        if channel.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "CHAT_CHANNEL".to_string(),
                "channel name must not be empty".to_string(),
            ));
        }

        let credentials_path = std::env::var("CREDENTIALS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./credentials.json"));

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            server_url,
            channel,
            credentials_path,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clear_env_vars() {
        unsafe {
            env::remove_var("SERVER_URL");
            env::remove_var("CHAT_CHANNEL");
            env::remove_var("CREDENTIALS_PATH");
            env::remove_var("RUST_LOG");
        }
    }

    #[test]
    fn test_config_error_display() {
        let missing_var = ConfigError::MissingVar("TEST_VAR".to_string());
        assert_eq!(
            format!("{}", missing_var),
            "Missing environment variable: TEST_VAR"
        );

        let invalid_value =
            ConfigError::InvalidValue("TEST_VAR".to_string(), "bad_value".to_string());
        assert_eq!(
            format!("{}", invalid_value),
            "Invalid value for environment variable TEST_VAR: bad_value"
        );
    }

    #[test]
    #[serial]
    fn test_config_defaults() {
        clear_env_vars();

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.server_url, "ws://127.0.0.1:8000");
        assert_eq!(config.channel, "chat");
        assert_eq!(config.credentials_path, PathBuf::from("./credentials.json"));
        assert_eq!(config.log_level, Level::INFO);
    }

    #[test]
    #[serial]
    fn test_config_custom_values() {
        clear_env_vars();
        unsafe {
            env::set_var("SERVER_URL", "wss://chat.example.com");
            env::set_var("CHAT_CHANNEL", "support");
            env::set_var("CREDENTIALS_PATH", "/tmp/creds.json");
            env::set_var("RUST_LOG", "debug");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.server_url, "wss://chat.example.com");
        assert_eq!(config.channel, "support");
        assert_eq!(config.credentials_path, PathBuf::from("/tmp/creds.json"));
        assert_eq!(config.log_level, Level::DEBUG);

        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_config_rejects_non_websocket_url() {
        clear_env_vars();
        unsafe {
            env::set_var("SERVER_URL", "http://127.0.0.1:8000");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "SERVER_URL"),
            _ => panic!("Expected InvalidValue for SERVER_URL"),
        }

        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_config_rejects_empty_channel() {
        clear_env_vars();
        unsafe {
            env::set_var("CHAT_CHANNEL", "  ");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "CHAT_CHANNEL"),
            _ => panic!("Expected InvalidValue for CHAT_CHANNEL"),
        }

        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_config_invalid_log_level() {
        clear_env_vars();
        unsafe {
            env::set_var("RUST_LOG", "not-a-level");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "RUST_LOG"),
            _ => panic!("Expected InvalidValue for RUST_LOG"),
        }

        clear_env_vars();
    }
}
