pub mod credential;
mod error;
mod gateway;
mod oauth;
pub mod prompts;
mod retry;
pub mod stream;
pub mod tools;
pub mod upstream;

pub use credential::{AuthMethod, CredentialVault, StoredCredential, TokenGrant};
pub use error::{AssistantError, AssistantResult, map_upstream_error};
pub use gateway::{ConfigSummary, Gateway};
pub use retry::send_with_refresh;
