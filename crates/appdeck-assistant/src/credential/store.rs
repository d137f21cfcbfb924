use std::sync::Arc;

use appdeck_storage::SettingsStore;
use tokio::sync::{Mutex, MutexGuard};

use crate::credential::StoredCredential;
use crate::error::AssistantResult;

const AUTH_KEY: &str = "assistant_auth";
/// Pre-dates the structured record: a bare JSON string holding an API key.
const LEGACY_API_KEY: &str = "openai_api_key";

/// Exclusive owner of the persisted credential record. Other components
/// read transient copies at request start; only the vault (and through
/// it, the refresh coordinator) writes.
pub struct CredentialVault {
    settings: Arc<dyn SettingsStore>,
    refresh_guard: Mutex<()>,
}

impl CredentialVault {
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self {
            settings,
            refresh_guard: Mutex::new(()),
        }
    }

    /// Read the active credential. Never fails: an absent or unparsable
    /// record falls back to the legacy API-key slot, then to the empty
    /// record. Callers must refuse to call upstream on `none`.
    pub async fn load(&self) -> StoredCredential {
        match self.settings.get(AUTH_KEY).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(credential) => credential,
                Err(err) => {
                    tracing::warn!(error = %err, "stored credential unparsable, trying legacy slot");
                    self.load_legacy().await
                }
            },
            Ok(None) => self.load_legacy().await,
            Err(err) => {
                tracing::warn!(error = %err, "settings store read failed");
                StoredCredential::default()
            }
        }
    }

    async fn load_legacy(&self) -> StoredCredential {
        match self.settings.get(LEGACY_API_KEY).await {
            Ok(Some(serde_json::Value::String(key))) if !key.is_empty() => {
                StoredCredential::api_key(key)
            }
            _ => StoredCredential::default(),
        }
    }

    pub async fn save(&self, credential: &StoredCredential) -> AssistantResult<()> {
        let value = serde_json::to_value(credential).map_err(appdeck_storage::StorageError::from)?;
        self.settings.put(AUTH_KEY, value).await?;
        Ok(())
    }

    pub async fn clear(&self) -> AssistantResult<()> {
        self.save(&StoredCredential::default()).await
    }

    /// Serializes refresh attempts. Hold the guard across the
    /// re-read / grant / persist sequence so concurrent 401s converge on
    /// one rotation instead of overwriting each other.
    pub async fn lock_refresh(&self) -> MutexGuard<'_, ()> {
        self.refresh_guard.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::AuthMethod;
    use appdeck_storage::MemorySettings;
    use serde_json::json;

    async fn vault_with(values: &[(&str, serde_json::Value)]) -> CredentialVault {
        let settings = Arc::new(MemorySettings::new());
        for (key, value) in values {
            settings.put(key, value.clone()).await.unwrap();
        }
        CredentialVault::new(settings)
    }

    #[tokio::test]
    async fn missing_record_yields_none() {
        let vault = vault_with(&[]).await;
        let cred = vault.load().await;
        assert_eq!(cred.auth_method, AuthMethod::None);
        assert!(!cred.is_configured());
    }

    #[tokio::test]
    async fn legacy_slot_synthesizes_api_key_record() {
        let vault = vault_with(&[("openai_api_key", json!("sk-legacy"))]).await;
        let cred = vault.load().await;
        assert_eq!(cred.auth_method, AuthMethod::ApiKey);
        assert_eq!(cred.api_key, "sk-legacy");
    }

    #[tokio::test]
    async fn unparsable_record_falls_back_to_legacy() {
        let vault = vault_with(&[
            ("assistant_auth", json!({"auth_method": 42})),
            ("openai_api_key", json!("sk-old")),
        ])
        .await;
        let cred = vault.load().await;
        assert_eq!(cred.api_key, "sk-old");
    }

    #[tokio::test]
    async fn save_then_load_roundtrips() {
        let vault = vault_with(&[]).await;
        let cred = StoredCredential::oauth_session("at", "rt", "acc");
        vault.save(&cred).await.unwrap();
        assert_eq!(vault.load().await, cred);

        vault.clear().await.unwrap();
        assert!(!vault.load().await.is_configured());
    }
}
