//! HTTP adapter for the agent service
//!
//! Implements [`AgentGateway`] against a RagFlow-style agent API:
//! `POST {base}/{agent_id}/sessions` opens a conversation and
//! `POST {base}/{agent_id}/completions` sends one prompt. Every response
//! arrives in a `{code, message, data}` envelope; `code == 0` is success.

use async_trait::async_trait;
use council_application::ports::agent_gateway::{
    AgentGateway, AgentReply, EvidenceRef, GatewayError,
};
use council_domain::SessionHandle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Connection settings for the agent service
#[derive(Debug, Clone)]
pub struct AgentServiceSettings {
    /// Endpoint root, e.g. `http://localhost:9380/api/v1/agents`
    pub base_url: String,
    /// Bearer token
    pub token: String,
    /// Per-call timeout
    pub timeout: Duration,
    /// Participant key to upstream agent id
    pub agents: BTreeMap<String, String>,
}

/// [`AgentGateway`] implementation over HTTP
pub struct HttpAgentGateway {
    client: reqwest::Client,
    settings: AgentServiceSettings,
}

#[derive(Serialize)]
struct SessionRequest {
    name: String,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    question: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<&'a str>,
}

/// Response envelope shared by both endpoints
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    code: i64,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<T>,
}

#[derive(Debug, Default, Deserialize)]
struct SessionData {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CompletionData {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    session_id: Option<String>,
    /// The service sends either a chunk array or an object wrapping one
    /// under `chunks`; older deployments omit the field entirely.
    #[serde(default)]
    reference: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct ReferenceChunk {
    #[serde(default)]
    document_name: Option<String>,
    #[serde(default)]
    doc_name: Option<String>,
    #[serde(default)]
    content_with_weight: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    similarity: Option<f64>,
}

impl HttpAgentGateway {
    pub fn new(settings: AgentServiceSettings) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| GatewayError::Other(format!("failed to build http client: {e}")))?;
        Ok(Self { client, settings })
    }

    fn agent_id(&self, key: &str) -> Result<&str, GatewayError> {
        self.settings
            .agents
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| GatewayError::Session(format!("no upstream agent mapped for '{key}'")))
    }

    async fn post_json<B: Serialize, T: for<'de> Deserialize<'de> + Default>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<Envelope<T>, GatewayError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.settings.token)
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::RequestFailed(format!(
                "HTTP {} from {url}",
                status.as_u16()
            )));
        }

        response
            .json::<Envelope<T>>()
            .await
            .map_err(|e| GatewayError::RequestFailed(format!("malformed response body: {e}")))
    }
}

fn map_transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_connect() {
        GatewayError::Connection(e.to_string())
    } else {
        GatewayError::RequestFailed(e.to_string())
    }
}

fn envelope_message(message: Option<String>) -> String {
    message.unwrap_or_else(|| "unknown api error".to_string())
}

/// Flatten the `reference` payload into citation records, tolerating both
/// the bare-array and `{chunks: [...]}` shapes.
fn normalize_references(reference: Option<serde_json::Value>) -> Vec<EvidenceRef> {
    let Some(value) = reference else {
        return Vec::new();
    };
    let chunks = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map.remove("chunks") {
            Some(serde_json::Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };
    chunks
        .into_iter()
        .filter_map(|item| serde_json::from_value::<ReferenceChunk>(item).ok())
        .map(|chunk| EvidenceRef {
            document: chunk.document_name.or(chunk.doc_name),
            excerpt: chunk.content_with_weight.or(chunk.content),
            similarity: chunk.similarity,
        })
        .collect()
}

#[async_trait]
impl AgentGateway for HttpAgentGateway {
    async fn create_session(&self, key: &str) -> Result<Option<SessionHandle>, GatewayError> {
        let agent_id = self.agent_id(key)?;
        let url = format!("{}/{agent_id}/sessions", self.settings.base_url);
        let body = SessionRequest {
            name: format!("Session {}", chrono::Local::now().format("%H:%M:%S")),
        };

        let envelope: Envelope<SessionData> = self.post_json(&url, &body).await?;
        if envelope.code != 0 {
            return Err(GatewayError::Session(envelope_message(envelope.message)));
        }

        let handle = envelope
            .data
            .and_then(|d| d.id)
            .map(SessionHandle::new);
        debug!(key, has_handle = handle.is_some(), "opened agent session");
        Ok(handle)
    }

    async fn complete(
        &self,
        key: &str,
        prompt: &str,
        session: Option<&SessionHandle>,
        hidden: bool,
    ) -> Result<AgentReply, GatewayError> {
        let agent_id = self.agent_id(key)?;
        let url = format!("{}/{agent_id}/completions", self.settings.base_url);
        let body = CompletionRequest {
            question: prompt,
            stream: false,
            session_id: session.map(SessionHandle::as_str),
        };

        debug!(key, hidden, prompt_len = prompt.len(), "sending completion");
        let envelope: Envelope<CompletionData> = self.post_json(&url, &body).await?;
        if envelope.code != 0 {
            let message = envelope_message(envelope.message);
            warn!(key, %message, "agent service rejected completion");
            return Err(GatewayError::RequestFailed(message));
        }

        let data = envelope.data.unwrap_or_default();
        Ok(AgentReply {
            text: data.answer.unwrap_or_default(),
            new_session: data.session_id.map(SessionHandle::new),
            references: normalize_references(data.reference),
        })
    }
}
