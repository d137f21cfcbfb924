use std::path::PathBuf;

use serde::Deserialize;

use crate::credential::StoredCredential;
use crate::error::{AssistantError, AssistantResult};

/// The CLI auth bundle importable on demand. Carries either a plain API
/// key or an OAuth token set, depending on how the CLI was signed in.
#[derive(Debug, Default, Deserialize)]
pub struct AuthFile {
    #[serde(default)]
    pub openai_api_key: String,
    #[serde(default)]
    pub tokens: Option<AuthFileTokens>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AuthFileTokens {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub account_id: String,
}

impl AuthFile {
    /// Convert to a storable credential. The API key wins when both are
    /// present; a token set with a missing account id recovers it from
    /// the access token's claims.
    pub fn into_credential(self) -> Option<StoredCredential> {
        if !self.openai_api_key.is_empty() {
            return Some(StoredCredential::api_key(self.openai_api_key));
        }
        let tokens = self.tokens?;
        if tokens.access_token.is_empty() {
            return None;
        }
        Some(StoredCredential::oauth_session(
            tokens.access_token,
            tokens.refresh_token,
            tokens.account_id,
        ))
    }
}

/// Resolve the auth file location: explicit override, then `$CODEX_HOME`,
/// then `~/.codex`.
pub fn auth_file_path(override_path: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(PathBuf::from(path));
    }
    let base = std::env::var_os("CODEX_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".codex")))?;
    Some(base.join("auth.json"))
}

pub fn auth_file_exists(override_path: Option<&str>) -> bool {
    auth_file_path(override_path)
        .map(|path| path.exists())
        .unwrap_or(false)
}

pub fn read_auth_file(override_path: Option<&str>) -> AssistantResult<AuthFile> {
    let path = auth_file_path(override_path)
        .ok_or_else(|| AssistantError::AuthImport("cannot resolve auth file location".to_string()))?;
    let data = std::fs::read(&path)
        .map_err(|err| AssistantError::AuthImport(format!("could not read CLI auth file {}: {err}", path.display())))?;
    serde_json::from_slice(&data)
        .map_err(|err| AssistantError::AuthImport(format!("invalid JSON in CLI auth file {}: {err}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::AuthMethod;

    #[test]
    fn api_key_wins_over_tokens() {
        let file: AuthFile = serde_json::from_str(
            r#"{"openai_api_key":"sk-1","tokens":{"access_token":"at","refresh_token":"rt"}}"#,
        )
        .unwrap();
        let cred = file.into_credential().unwrap();
        assert_eq!(cred.auth_method, AuthMethod::ApiKey);
        assert_eq!(cred.api_key, "sk-1");
    }

    #[test]
    fn token_set_maps_to_session_credential() {
        let file: AuthFile = serde_json::from_str(
            r#"{"tokens":{"access_token":"at","refresh_token":"rt","account_id":"acc"}}"#,
        )
        .unwrap();
        let cred = file.into_credential().unwrap();
        assert_eq!(cred.auth_method, AuthMethod::OauthSession);
        assert_eq!(cred.access_token, "at");
        assert_eq!(cred.refresh_token, "rt");
        assert_eq!(cred.account_id, "acc");
    }

    #[test]
    fn empty_bundle_yields_nothing() {
        let file: AuthFile = serde_json::from_str(r#"{"auth_mode":"none"}"#).unwrap();
        assert!(file.into_credential().is_none());

        let file: AuthFile =
            serde_json::from_str(r#"{"tokens":{"refresh_token":"rt"}}"#).unwrap();
        assert!(file.into_credential().is_none());
    }
}
