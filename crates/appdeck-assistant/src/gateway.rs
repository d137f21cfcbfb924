use std::sync::Arc;

use appdeck_protocol::client::ClientEvent;
use appdeck_protocol::openai::chat::response::CreateChatCompletionResponse;
use appdeck_protocol::sse::{STREAM_END_MARKER, SseDecoder};
use appdeck_storage::SettingsStore;
use bytes::Bytes;
use futures_util::StreamExt;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tokio::sync::mpsc;

use crate::credential::{
    AuthMethod, CredentialVault, StoredCredential, auth_file_exists, read_auth_file,
};
use crate::error::{AssistantError, AssistantResult, map_upstream_error};
use crate::retry::send_with_refresh;
use crate::stream::{DocumentReassembly, ToolStream};
use crate::upstream::{
    ACCOUNT_ID_HEADER, CHAT_COMPLETIONS_ENDPOINT, COMPLETIONS_MODEL, RESPONSES_ENDPOINT,
    RESPONSES_MODEL, document_completions_request, document_responses_request,
    document_user_message, tool_completions_request, tool_responses_request, tool_user_message,
};

/// Assistant configuration state surfaced to the editor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSummary {
    pub has_api_key: bool,
    pub has_session_auth: bool,
    pub auth_method: AuthMethod,
    pub import_available: bool,
    pub model: String,
}

/// The assistant gateway: owns the credential vault and the upstream
/// HTTP client, and drives both interaction modes end to end.
pub struct Gateway {
    vault: CredentialVault,
    client: wreq::Client,
    auth_file: Option<String>,
}

impl Gateway {
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        proxy: Option<&str>,
        auth_file: Option<String>,
    ) -> AssistantResult<Self> {
        let mut builder = wreq::Client::builder();
        if let Some(proxy) = proxy.map(str::trim).filter(|proxy| !proxy.is_empty()) {
            builder = builder
                .proxy(wreq::Proxy::all(proxy).map_err(|err| AssistantError::Http(err.to_string()))?);
        }
        let client = builder
            .build()
            .map_err(|err| AssistantError::Http(err.to_string()))?;
        Ok(Self {
            vault: CredentialVault::new(settings),
            client,
            auth_file,
        })
    }

    // --- configuration surface ---

    pub async fn config_summary(&self) -> ConfigSummary {
        let credential = self.vault.load().await;
        let model = match credential.auth_method {
            AuthMethod::OauthSession => RESPONSES_MODEL,
            _ => COMPLETIONS_MODEL,
        };
        ConfigSummary {
            has_api_key: !credential.api_key.is_empty(),
            has_session_auth: !credential.access_token.is_empty(),
            auth_method: credential.auth_method,
            import_available: auth_file_exists(self.auth_file.as_deref()),
            model: model.to_string(),
        }
    }

    pub async fn set_api_key(&self, key: &str) -> AssistantResult<()> {
        self.vault.save(&StoredCredential::api_key(key)).await
    }

    pub async fn clear_credentials(&self) -> AssistantResult<()> {
        self.vault.clear().await
    }

    /// Store tokens obtained by the frontend's sign-in flow. The account
    /// id is extracted from the access token once, here.
    pub async fn save_session_tokens(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> AssistantResult<()> {
        self.vault
            .save(&StoredCredential::oauth_session(
                access_token,
                refresh_token,
                "",
            ))
            .await
    }

    /// Import whichever credential the CLI auth file carries.
    pub async fn import_cli_auth(&self) -> AssistantResult<AuthMethod> {
        let file = read_auth_file(self.auth_file.as_deref())?;
        let Some(credential) = file.into_credential() else {
            return Err(AssistantError::AuthImport(
                "no valid credentials found in CLI auth file".to_string(),
            ));
        };
        let method = credential.auth_method;
        self.vault.save(&credential).await?;
        Ok(method)
    }

    // --- document mode (buffered JSON response) ---

    pub async fn document_chat(
        &self,
        message: &str,
        current_dsl: Option<&JsonValue>,
    ) -> AssistantResult<JsonValue> {
        let credential = self.vault.load().await;
        if !credential.is_configured() {
            return Err(AssistantError::NotConfigured);
        }
        let user_message = document_user_message(current_dsl, message);
        let content = match credential.auth_method {
            AuthMethod::OauthSession => {
                self.document_via_responses(&user_message, &credential.account_id)
                    .await?
            }
            _ => self.document_via_completions(&user_message).await?,
        };
        if content.is_empty() {
            return Err(AssistantError::EmptyResponse);
        }
        Ok(parse_model_output(&content))
    }

    async fn document_via_completions(&self, user_message: &str) -> AssistantResult<String> {
        let body = encode_body(&document_completions_request(user_message))?;
        let resp = self.post_completions(body).await?;

        let status = resp.status().as_u16();
        let bytes = resp
            .bytes()
            .await
            .map_err(|err| AssistantError::Http(err.to_string()))?;
        if status != 200 {
            return Err(map_upstream_error(status, &bytes));
        }

        let parsed: CreateChatCompletionResponse = serde_json::from_slice(&bytes)
            .map_err(|err| AssistantError::Http(format!("unreadable AI response: {err}")))?;
        parsed
            .first_content()
            .map(str::to_string)
            .ok_or(AssistantError::EmptyResponse)
    }

    async fn document_via_responses(
        &self,
        user_message: &str,
        account_id: &str,
    ) -> AssistantResult<String> {
        let body = encode_body(&document_responses_request(user_message))?;
        let resp = self.post_responses(body, account_id).await?;

        let status = resp.status().as_u16();
        let bytes = resp
            .bytes()
            .await
            .map_err(|err| AssistantError::Http(err.to_string()))?;
        if status != 200 {
            return Err(map_upstream_error(status, &bytes));
        }

        // The session backend only streams; reassemble the buffered SSE
        // into the complete document text.
        let mut decoder = SseDecoder::new();
        let mut doc = DocumentReassembly::new();
        let mut frames = decoder.feed(&bytes);
        frames.extend(decoder.finish());
        for frame in frames {
            if frame.data == STREAM_END_MARKER {
                break;
            }
            if doc.push_data(&frame.data) {
                break;
            }
        }
        Ok(doc.into_text())
    }

    // --- tool mode (streaming) ---

    /// Run one tool-calling conversation turn, writing normalized events
    /// into `events`. Exactly one terminal event is always delivered:
    /// `Done` on success, `Error` otherwise (replacing `Done`). A closed
    /// receiver means the client went away; the upstream response is
    /// dropped, cancelling the in-flight request.
    pub async fn tool_chat(
        &self,
        message: &str,
        component_list: &[String],
        events: mpsc::Sender<ClientEvent>,
    ) {
        if let Err(err) = self.run_tool_stream(message, component_list, &events).await {
            let _ = events
                .send(ClientEvent::Error {
                    data: err.to_string(),
                })
                .await;
        }
    }

    async fn run_tool_stream(
        &self,
        message: &str,
        component_list: &[String],
        events: &mpsc::Sender<ClientEvent>,
    ) -> AssistantResult<()> {
        let credential = self.vault.load().await;
        if !credential.is_configured() {
            return Err(AssistantError::NotConfigured);
        }
        let user_message = tool_user_message(component_list, message);

        let (resp, state) = match credential.auth_method {
            AuthMethod::OauthSession => {
                let body = encode_body(&tool_responses_request(&user_message))?;
                let resp = self.post_responses(body, &credential.account_id).await?;
                (resp, ToolStream::for_responses())
            }
            _ => {
                let body = encode_body(&tool_completions_request(&user_message))?;
                let resp = self.post_completions(body).await?;
                (resp, ToolStream::for_chat())
            }
        };

        let status = resp.status().as_u16();
        if status != 200 {
            let bytes = resp.bytes().await.unwrap_or_default();
            return Err(map_upstream_error(status, &bytes));
        }

        self.pump_tool_stream(resp, state, events).await
    }

    async fn pump_tool_stream(
        &self,
        resp: wreq::Response,
        mut state: ToolStream,
        events: &mpsc::Sender<ClientEvent>,
    ) -> AssistantResult<()> {
        let mut decoder = SseDecoder::new();
        let mut body = resp.bytes_stream();

        'read: while let Some(chunk) = body.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(err) => {
                    // Treat a broken upstream like a close: finalize with
                    // what was accumulated so far.
                    tracing::warn!(error = %err, "upstream stream interrupted");
                    break 'read;
                }
            };
            for frame in decoder.feed(&chunk) {
                if frame.data == STREAM_END_MARKER {
                    break 'read;
                }
                for event in state.push_data(&frame.data) {
                    if events.send(event).await.is_err() {
                        return Ok(());
                    }
                }
            }
        }

        for frame in decoder.finish() {
            if frame.data == STREAM_END_MARKER {
                continue;
            }
            for event in state.push_data(&frame.data) {
                if events.send(event).await.is_err() {
                    return Ok(());
                }
            }
        }

        for event in state.finish() {
            if events.send(event).await.is_err() {
                return Ok(());
            }
        }
        Ok(())
    }

    // --- upstream calls ---

    async fn post_completions(&self, body: Bytes) -> AssistantResult<wreq::Response> {
        let client = self.client.clone();
        send_with_refresh(&self.vault, &self.client, move |token| {
            let client = client.clone();
            let body = body.clone();
            async move {
                client
                    .post(CHAT_COMPLETIONS_ENDPOINT)
                    .header("Content-Type", "application/json")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(body)
                    .send()
                    .await
            }
        })
        .await
    }

    async fn post_responses(
        &self,
        body: Bytes,
        account_id: &str,
    ) -> AssistantResult<wreq::Response> {
        let client = self.client.clone();
        let account_id = account_id.to_string();
        send_with_refresh(&self.vault, &self.client, move |token| {
            let client = client.clone();
            let body = body.clone();
            let account_id = account_id.clone();
            async move {
                let mut req = client
                    .post(RESPONSES_ENDPOINT)
                    .header("Content-Type", "application/json")
                    .header("Accept", "text/event-stream")
                    .header("Authorization", format!("Bearer {token}"));
                if !account_id.is_empty() {
                    req = req.header(ACCOUNT_ID_HEADER, account_id);
                }
                req.body(body).send().await
            }
        })
        .await
    }
}

fn encode_body<T: Serialize>(request: &T) -> AssistantResult<Bytes> {
    serde_json::to_vec(request)
        .map(Bytes::from)
        .map_err(|err| AssistantError::Http(format!("failed to build AI request: {err}")))
}

/// Document-mode output contract: a JSON object passes through verbatim;
/// anything else degrades to the raw-text envelope so the editor can
/// still show what the model said.
fn parse_model_output(content: &str) -> JsonValue {
    match serde_json::from_str::<JsonValue>(content) {
        Ok(value) if value.is_object() => value,
        _ => serde_json::json!({
            "explanation": content,
            "dsl": null,
            "raw": content,
        }),
    }
}
