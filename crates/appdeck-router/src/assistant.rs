use std::convert::Infallible;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::StreamExt;
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};
use tokio_stream::wrappers::ReceiverStream;

use appdeck_assistant::{AssistantError, Gateway};
use appdeck_protocol::client::{ClientEvent, EVENT_STREAM_CONTENT_TYPE, encode_client_event};

use crate::session::{SessionAuth, SessionRole};

#[derive(Clone)]
pub struct AssistantState {
    pub gateway: Arc<Gateway>,
    pub sessions: Arc<dyn SessionAuth>,
}

pub fn assistant_router(state: AssistantState) -> Router {
    Router::new()
        .route("/api/ai/config", get(get_config).put(set_config))
        .route("/api/ai/chat", post(chat))
        .route("/api/ai/chat/stream", post(chat_stream))
        .route("/api/ai/auth/save-tokens", post(save_tokens))
        .route("/api/ai/auth/import", post(import_auth))
        .with_state(state)
}

// --- request bodies ---

#[derive(Debug, Deserialize)]
struct SetConfigBody {
    #[serde(default, rename = "apiKey")]
    api_key: String,
    #[serde(default)]
    clear: bool,
}

#[derive(Debug, Deserialize)]
struct SaveTokensBody {
    #[serde(default, rename = "accessToken")]
    access_token: String,
    #[serde(default, rename = "refreshToken")]
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct ChatBody {
    #[serde(default)]
    message: String,
    #[serde(default, rename = "currentDSL")]
    current_dsl: Option<JsonValue>,
}

#[derive(Debug, Deserialize)]
struct ChatStreamBody {
    #[serde(default)]
    message: String,
    #[serde(default, rename = "componentList")]
    component_list: Vec<String>,
}

// --- handlers ---

async fn get_config(State(state): State<AssistantState>, headers: HeaderMap) -> Response {
    let role = state.sessions.role(&headers);
    if role < SessionRole::User {
        return err_resp(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    let summary = state.gateway.config_summary().await;
    let mut data = match serde_json::to_value(&summary) {
        Ok(value) => value,
        Err(_) => return err_resp(StatusCode::INTERNAL_SERVER_ERROR, "Failed to read config"),
    };
    if let Some(map) = data.as_object_mut() {
        map.insert("isAdmin".to_string(), json!(role == SessionRole::Admin));
    }
    ok_resp(data)
}

async fn set_config(
    State(state): State<AssistantState>,
    headers: HeaderMap,
    Json(body): Json<SetConfigBody>,
) -> Response {
    if state.sessions.role(&headers) < SessionRole::Admin {
        return err_resp(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    if body.clear {
        return match state.gateway.clear_credentials().await {
            Ok(()) => ok_resp(json!({"success": true})),
            Err(_) => err_resp(StatusCode::INTERNAL_SERVER_ERROR, "Failed to clear auth"),
        };
    }
    if !body.api_key.is_empty()
        && state.gateway.set_api_key(&body.api_key).await.is_err()
    {
        return err_resp(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store API key");
    }
    ok_resp(json!({"success": true}))
}

async fn save_tokens(
    State(state): State<AssistantState>,
    headers: HeaderMap,
    Json(body): Json<SaveTokensBody>,
) -> Response {
    if state.sessions.role(&headers) < SessionRole::Admin {
        return err_resp(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    if body.access_token.is_empty() {
        return err_resp(StatusCode::BAD_REQUEST, "Access token is required");
    }
    match state
        .gateway
        .save_session_tokens(&body.access_token, &body.refresh_token)
        .await
    {
        Ok(()) => ok_resp(json!({"success": true})),
        Err(_) => err_resp(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store tokens"),
    }
}

async fn import_auth(State(state): State<AssistantState>, headers: HeaderMap) -> Response {
    if state.sessions.role(&headers) < SessionRole::Admin {
        return err_resp(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    match state.gateway.import_cli_auth().await {
        Ok(method) => ok_resp(json!({"method": method})),
        Err(err) => err_resp(error_status(&err), &err.to_string()),
    }
}

async fn chat(
    State(state): State<AssistantState>,
    headers: HeaderMap,
    Json(body): Json<ChatBody>,
) -> Response {
    if state.sessions.role(&headers) < SessionRole::User {
        return err_resp(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    if body.message.is_empty() {
        return err_resp(StatusCode::BAD_REQUEST, "Message is required");
    }
    match state
        .gateway
        .document_chat(&body.message, body.current_dsl.as_ref())
        .await
    {
        Ok(result) => ok_resp(result),
        Err(err) => err_resp(error_status(&err), &err.to_string()),
    }
}

async fn chat_stream(
    State(state): State<AssistantState>,
    headers: HeaderMap,
    Json(body): Json<ChatStreamBody>,
) -> Response {
    if state.sessions.role(&headers) < SessionRole::User {
        return err_resp(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    if body.message.is_empty() {
        return err_resp(StatusCode::BAD_REQUEST, "Message is required");
    }

    let (tx, rx) = tokio::sync::mpsc::channel::<ClientEvent>(32);
    let gateway = state.gateway.clone();
    tokio::spawn(async move {
        gateway
            .tool_chat(&body.message, &body.component_list, tx)
            .await;
    });

    let stream =
        ReceiverStream::new(rx).map(|event| Ok::<_, Infallible>(encode_client_event(&event)));
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, EVENT_STREAM_CONTENT_TYPE)
        // Hint common reverse proxies to avoid buffering SSE responses.
        .header(header::CACHE_CONTROL, "no-cache")
        .header("x-accel-buffering", "no")
        .body(Body::from_stream(stream))
        .unwrap_or_else(|_| {
            (StatusCode::INTERNAL_SERVER_ERROR, "response_build_failed").into_response()
        })
}

// --- response envelope ---

fn ok_resp(data: JsonValue) -> Response {
    Json(json!({"code": 1, "message": "", "success": true, "data": data})).into_response()
}

fn err_resp(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({"code": status.as_u16(), "message": message, "success": false})),
    )
        .into_response()
}

fn error_status(err: &AssistantError) -> StatusCode {
    match err {
        AssistantError::NotConfigured | AssistantError::AuthImport(_) => StatusCode::BAD_REQUEST,
        AssistantError::UpstreamAuth(_)
        | AssistantError::Upstream(_)
        | AssistantError::Refresh(_) => StatusCode::BAD_GATEWAY,
        AssistantError::Http(_)
        | AssistantError::Storage(_)
        | AssistantError::EmptyResponse => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_mapping() {
        assert_eq!(
            error_status(&AssistantError::NotConfigured),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&AssistantError::Upstream("x".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            error_status(&AssistantError::EmptyResponse),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn stream_body_field_names_match_client() {
        let body: ChatStreamBody = serde_json::from_str(
            r#"{"message":"add a table","componentList":["btn1"],"currentDSL":{}}"#,
        )
        .unwrap();
        assert_eq!(body.message, "add a table");
        assert_eq!(body.component_list, vec!["btn1".to_string()]);
    }
}
