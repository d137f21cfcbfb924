use serde::Deserialize;

use crate::credential::TokenGrant;
use crate::error::{AssistantError, AssistantResult};

pub const TOKEN_ENDPOINT: &str = "https://auth0.openai.com/oauth/token";
pub const CLIENT_ID: &str = "app_EMoamEEZ73f0CkXaXp7hrann";
pub const REFRESH_SCOPE: &str = "openid profile email";

#[derive(Debug, Deserialize)]
struct TokenEndpointResponse {
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Exchange a refresh token for a new access token. Transport and parse
/// failures come back as [`AssistantError::Refresh`], never as the 401
/// that triggered the exchange.
pub async fn refresh_access_token(
    client: &wreq::Client,
    refresh_token: &str,
) -> AssistantResult<TokenGrant> {
    let body = format!(
        "grant_type=refresh_token&client_id={}&refresh_token={}&scope={}",
        urlencoding::encode(CLIENT_ID),
        urlencoding::encode(refresh_token),
        urlencoding::encode(REFRESH_SCOPE),
    );

    let resp = client
        .post(TOKEN_ENDPOINT)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(body)
        .send()
        .await
        .map_err(|err| AssistantError::Refresh(err.to_string()))?;
    let bytes = resp
        .bytes()
        .await
        .map_err(|err| AssistantError::Refresh(err.to_string()))?;

    let parsed: TokenEndpointResponse = serde_json::from_slice(&bytes)
        .map_err(|err| AssistantError::Refresh(err.to_string()))?;
    if let Some(error) = parsed.error {
        return Err(AssistantError::Refresh(error));
    }
    if parsed.access_token.is_empty() {
        return Err(AssistantError::Refresh(
            "token endpoint returned no access token".to_string(),
        ));
    }
    Ok(TokenGrant {
        access_token: parsed.access_token,
        refresh_token: parsed.refresh_token.filter(|token| !token.is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_response_decodes_with_optional_rotation() {
        let parsed: TokenEndpointResponse =
            serde_json::from_str(r#"{"access_token":"at2"}"#).unwrap();
        assert_eq!(parsed.access_token, "at2");
        assert!(parsed.refresh_token.is_none());

        let parsed: TokenEndpointResponse =
            serde_json::from_str(r#"{"access_token":"at2","refresh_token":"rt2"}"#).unwrap();
        assert_eq!(parsed.refresh_token.as_deref(), Some("rt2"));
    }

    #[test]
    fn grant_error_field_decodes() {
        let parsed: TokenEndpointResponse =
            serde_json::from_str(r#"{"error":"invalid_grant"}"#).unwrap();
        assert_eq!(parsed.error.as_deref(), Some("invalid_grant"));
    }
}
