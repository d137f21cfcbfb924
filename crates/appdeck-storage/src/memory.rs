use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::settings::{SettingsResult, SettingsStore};

/// Map-backed store for tests and ephemeral setups.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: Mutex<HashMap<String, JsonValue>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for MemorySettings {
    async fn get(&self, key: &str) -> SettingsResult<Option<JsonValue>> {
        let guard = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(guard.get(key).cloned())
    }

    async fn put(&self, key: &str, value: JsonValue) -> SettingsResult<()> {
        let mut guard = self.values.lock().unwrap_or_else(|e| e.into_inner());
        guard.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> SettingsResult<()> {
        let mut guard = self.values.lock().unwrap_or_else(|e| e.into_inner());
        guard.remove(key);
        Ok(())
    }
}
