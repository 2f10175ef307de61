use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, RequestBuilder, Response, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::types::{
    ChatReply, ChatRequest, HistoryMessage, ModelInfo, RenameRequest, SessionSummary,
    StartChatRequest, StartChatResponse,
};

/// Backend address used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Environment variable consulted for the backend address.
pub const API_URL_ENV: &str = "CHATPANE_API_URL";

/// The operations the chat UI needs from its backend.
///
/// [`ChatClient`] implements this over HTTP; tests substitute an in-memory
/// backend.
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    /// `GET /models`
    async fn list_models(&self) -> Result<Vec<ModelInfo>>;

    /// `GET /sessions`
    async fn list_sessions(&self) -> Result<Vec<SessionSummary>>;

    /// `GET /history/{session_id}`
    async fn history(&self, session_id: &str) -> Result<Vec<HistoryMessage>>;

    /// `PUT /sessions/{session_id}/title`
    async fn rename_session(&self, session_id: &str, title: &str) -> Result<()>;

    /// `DELETE /sessions/{session_id}`
    async fn delete_session(&self, session_id: &str) -> Result<()>;

    /// `POST /start_chat`
    async fn start_chat(&self, model: &str) -> Result<StartChatResponse>;

    /// `POST /chat`
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply>;
}

/// HTTP client for the chat backend.
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: ReqwestClient,
    base_url: Url,
    timeout: Option<Duration>,
}

impl ChatClient {
    /// Create a new client for the backend at `base_url`.
    ///
    /// Requests never time out; a hung request is only reported if the
    /// connection fails.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_options(base_url, None)
    }

    /// Create a new client with an optional per-request timeout.
    pub fn with_options(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::url(
                format!("{base_url} cannot be used as a base URL"),
                None,
            ));
        }

        let mut builder = ReqwestClient::builder().default_headers(Self::default_headers());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            Error::http_client(
                format!("Failed to build HTTP client: {}", e),
                Some(Box::new(e)),
            )
        })?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// The backend address requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Resolve an endpoint, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| Error::url("base URL cannot have path segments", None))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        #[derive(Deserialize)]
        struct ErrorResponse {
            error: Option<String>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let message = serde_json::from_str::<ErrorResponse>(&error_body)
            .ok()
            .and_then(|e| e.error)
            .unwrap_or(error_body);
        Error::api(status_code, message)
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        CLIENT_REQUESTS.click();
        let start = Instant::now();
        let result = request.send().await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());

        let response = result.map_err(|e| {
            CLIENT_REQUEST_ERRORS.click();
            if e.is_timeout() {
                Error::timeout(
                    format!("Request timed out: {}", e),
                    self.timeout.map(|t| t.as_secs_f64()),
                )
            } else if e.is_connect() {
                Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
            } else {
                Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
            }
        })?;

        if !response.status().is_success() {
            CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }
        Ok(response)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        response.json::<T>().await.map_err(|e| {
            CLIENT_REQUEST_ERRORS.click();
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.endpoint(segments)?;
        let response = self.execute(self.client.get(url)).await?;
        Self::read_json(response).await
    }
}

#[async_trait::async_trait]
impl ChatBackend for ChatClient {
    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        self.get_json(&["models"]).await
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        self.get_json(&["sessions"]).await
    }

    async fn history(&self, session_id: &str) -> Result<Vec<HistoryMessage>> {
        self.get_json(&["history", session_id]).await
    }

    async fn rename_session(&self, session_id: &str, title: &str) -> Result<()> {
        let url = self.endpoint(&["sessions", session_id, "title"])?;
        let body = RenameRequest {
            title: title.to_string(),
        };
        self.execute(self.client.put(url).json(&body)).await?;
        Ok(())
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        let url = self.endpoint(&["sessions", session_id])?;
        self.execute(self.client.delete(url)).await?;
        Ok(())
    }

    async fn start_chat(&self, model: &str) -> Result<StartChatResponse> {
        let url = self.endpoint(&["start_chat"])?;
        let body = StartChatRequest {
            model: model.to_string(),
        };
        let response = self.execute(self.client.post(url).json(&body)).await?;
        Self::read_json(response).await
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        let url = self.endpoint(&["chat"])?;
        let response = self.execute(self.client.post(url).json(request)).await?;
        Self::read_json(response).await
    }
}
