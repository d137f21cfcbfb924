use std::future::Future;

use crate::credential::{AuthMethod, CredentialVault};
use crate::error::{AssistantError, AssistantResult};
use crate::oauth::refresh_access_token;

/// Run one upstream call with the resolved bearer token, refreshing an
/// expired session credential at most once.
///
/// A 401 on the OAuth session scheme (with a refresh token on hand)
/// triggers: drop the failed response, serialize on the vault's refresh
/// guard, re-read the record — a concurrent request may have already
/// rotated the token, in which case its token is reused — otherwise run
/// the refresh grant, persist, and retry exactly once. The retried
/// response is returned unconditionally; a second 401 is the caller's
/// problem. Everything else passes through untouched.
pub async fn send_with_refresh<F, Fut>(
    vault: &CredentialVault,
    client: &wreq::Client,
    request: F,
) -> AssistantResult<wreq::Response>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<wreq::Response, wreq::Error>>,
{
    let credential = vault.load().await;
    let token = credential.bearer_token().to_string();
    if token.is_empty() {
        return Err(AssistantError::NotConfigured);
    }

    let resp = request(token.clone())
        .await
        .map_err(|err| AssistantError::Http(err.to_string()))?;

    let should_refresh = resp.status().as_u16() == 401
        && credential.auth_method == AuthMethod::OauthSession
        && !credential.refresh_token.is_empty();
    if !should_refresh {
        return Ok(resp);
    }
    drop(resp);

    let retry_token = {
        let _guard = vault.lock_refresh().await;
        let current = vault.load().await;
        if current.access_token != token && !current.access_token.is_empty() {
            // Another request already rotated the credential while we
            // waited on the guard; reuse its token instead of burning the
            // refresh token again.
            current.access_token
        } else {
            let grant = refresh_access_token(client, &current.refresh_token).await?;
            let mut updated = current;
            updated.apply_refresh(grant);
            vault.save(&updated).await?;
            tracing::debug!("session access token refreshed");
            updated.access_token
        }
    };

    request(retry_token)
        .await
        .map_err(|err| AssistantError::Http(err.to_string()))
}
