//! Read-once access to the persisted credential token.
//!
//! The token lives in a small JSON file under a fixed key, mirroring the
//! cookie the browser front-end reads. It is loaded once at session start;
//! a missing or unreadable store simply means the session connects without
//! the auth handshake.

use std::path::Path;
use tracing::{debug, warn};

/// Fixed key the token is stored under.
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Reads the auth token from the credentials file, if one is present.
///
/// Returns `None` for a missing file, malformed JSON, or an absent/empty
/// token value. None of these is an error: unauthenticated sessions are
/// valid, the server just receives no `auth` event.
pub fn load_token(path: &Path) -> Option<String> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "No credentials file; skipping auth handshake");
            return None;
        }
    };

    let parsed: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Credentials file is not valid JSON");
            return None;
        }
    };

    parsed
        .get(AUTH_TOKEN_KEY)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn credentials_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn test_loads_token_from_fixed_key() {
        let file = credentials_file(r#"{"auth_token": "secret-token-123"}"#);
        assert_eq!(
            load_token(file.path()),
            Some("secret-token-123".to_string())
        );
    }

    #[test]
    fn test_missing_file_yields_none() {
        assert_eq!(load_token(Path::new("/nonexistent/credentials.json")), None);
    }

    #[test]
    fn test_malformed_json_yields_none() {
        let file = credentials_file("not json at all");
        assert_eq!(load_token(file.path()), None);
    }

    #[test]
    fn test_missing_key_yields_none() {
        let file = credentials_file(r#"{"other_key": "value"}"#);
        assert_eq!(load_token(file.path()), None);
    }

    #[test]
    fn test_empty_or_blank_token_yields_none() {
        let file = credentials_file(r#"{"auth_token": ""}"#);
        assert_eq!(load_token(file.path()), None);

        let file = credentials_file(r#"{"auth_token": "   "}"#);
        assert_eq!(load_token(file.path()), None);
    }

    #[test]
    fn test_non_string_token_yields_none() {
        let file = credentials_file(r#"{"auth_token": 42}"#);
        assert_eq!(load_token(file.path()), None);
    }

    #[test]
    fn test_token_is_trimmed() {
        let file = credentials_file(r#"{"auth_token": "  secret  "}"#);
        assert_eq!(load_token(file.path()), Some("secret".to_string()));
    }
}
