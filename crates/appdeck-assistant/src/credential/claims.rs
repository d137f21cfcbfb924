use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct AccessTokenClaims {
    #[serde(default, rename = "https://api.openai.com/auth")]
    auth: AuthClaims,
}

#[derive(Debug, Default, Deserialize)]
struct AuthClaims {
    #[serde(default)]
    chatgpt_account_id: String,
}

/// Pull the account-identity claim out of an access token's payload.
/// The session backend requires it as the `ChatGPT-Account-ID` header.
///
/// The payload is read unverified (no signature check wanted or needed);
/// every failure mode — missing segment, bad base64, bad JSON, absent
/// claim — yields the empty string.
pub fn account_id_from_token(token: &str) -> String {
    let Some(payload) = token.split('.').nth(1) else {
        return String::new();
    };
    // Tokens in the wild carry both padded and unpadded payloads.
    let Ok(bytes) = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')) else {
        return String::new();
    };
    serde_json::from_slice::<AccessTokenClaims>(&bytes)
        .map(|claims| claims.auth.chatgpt_account_id)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE;

    fn token_with_payload(payload: &str) -> String {
        format!(
            "{}.{}.{}",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256"}"#),
            URL_SAFE_NO_PAD.encode(payload),
            "sig"
        )
    }

    #[test]
    fn extracts_account_id() {
        let token =
            token_with_payload(r#"{"https://api.openai.com/auth":{"chatgpt_account_id":"acc-1"}}"#);
        assert_eq!(account_id_from_token(&token), "acc-1");
    }

    #[test]
    fn missing_claim_yields_empty_string() {
        let token = token_with_payload(r#"{"sub":"user-1"}"#);
        assert_eq!(account_id_from_token(&token), "");
    }

    #[test]
    fn padded_payload_tolerated() {
        let payload = r#"{"https://api.openai.com/auth":{"chatgpt_account_id":"acc-2"}}"#;
        let token = format!("h.{}.s", URL_SAFE.encode(payload));
        assert_eq!(account_id_from_token(&token), "acc-2");
    }

    #[test]
    fn garbage_inputs_yield_empty_string() {
        assert_eq!(account_id_from_token(""), "");
        assert_eq!(account_id_from_token("not-a-jwt"), "");
        assert_eq!(account_id_from_token("a.!!!.c"), "");
        let token = format!("h.{}.s", URL_SAFE_NO_PAD.encode("not json"));
        assert_eq!(account_id_from_token(&token), "");
    }
}
