mod claims;
mod import;
mod store;

pub use claims::account_id_from_token;
pub use import::{AuthFile, auth_file_exists, auth_file_path, read_auth_file};
pub use store::CredentialVault;

use serde::{Deserialize, Serialize};

/// Which authentication scheme the stored record carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    #[default]
    None,
    ApiKey,
    OauthSession,
}

/// The single persisted authentication record. At most one of
/// `api_key` / (`access_token`, `refresh_token`) is populated, matching
/// `auth_method`. Everything outside the vault works on transient copies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredCredential {
    #[serde(default)]
    pub auth_method: AuthMethod,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub access_token: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub refresh_token: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub account_id: String,
}

impl StoredCredential {
    pub fn api_key(key: impl Into<String>) -> Self {
        Self {
            auth_method: AuthMethod::ApiKey,
            api_key: key.into(),
            ..Self::default()
        }
    }

    pub fn oauth_session(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        account_id: impl Into<String>,
    ) -> Self {
        let access_token = access_token.into();
        let account_id = {
            let id = account_id.into();
            if id.is_empty() {
                account_id_from_token(&access_token)
            } else {
                id
            }
        };
        Self {
            auth_method: AuthMethod::OauthSession,
            access_token,
            refresh_token: refresh_token.into(),
            account_id,
            ..Self::default()
        }
    }

    /// The token sent as `Authorization: Bearer`, per the active scheme.
    pub fn bearer_token(&self) -> &str {
        match self.auth_method {
            AuthMethod::ApiKey => &self.api_key,
            AuthMethod::OauthSession => &self.access_token,
            AuthMethod::None => "",
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.bearer_token().is_empty()
    }

    /// Adopt the output of a refresh grant. A grant that omits the
    /// rotated refresh token keeps the prior one.
    pub fn apply_refresh(&mut self, grant: TokenGrant) {
        self.access_token = grant.access_token;
        if let Some(refresh_token) = grant.refresh_token {
            self.refresh_token = refresh_token;
        }
    }
}

/// Output of a refresh-token grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: Option<String>,
}
