//! Aperture API Client

use anyhow::{bail, Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

/// API Client for Aperture
pub struct ApertureClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

// ============================================
// API Response Types
// ============================================

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub studio_id: Uuid,
    pub user_id: Uuid,
    pub message: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub session_id: Uuid,
    pub response: String,
    #[serde(default)]
    pub tools_used: Vec<String>,
    #[serde(default)]
    pub shortcut: bool,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub role: String,
    pub content: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct ToolSchema {
    pub function: ToolFunction,
}

#[derive(Debug, Deserialize)]
pub struct ToolFunction {
    pub name: String,
    pub description: String,
}

impl ApertureClient {
    /// Create a new API client
    pub fn new(base_url: &str, api_key: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(str::to_string),
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn parse<T: DeserializeOwned>(resp: Response) -> Result<T> {
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        resp.json().await.context("Failed to parse response")
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/api/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        Ok(resp.status().is_success())
    }

    /// Run one agent turn
    pub async fn chat(&self, studio_id: Uuid, user_id: Uuid, message: &str) -> Result<ChatResponse> {
        let url = format!("{}/api/agent/chat", self.base_url);
        let request = ChatRequest {
            studio_id,
            user_id,
            message,
        };

        let resp = self
            .authorized(self.client.post(&url))
            .json(&request)
            .send()
            .await
            .context("Failed to connect to Aperture API")?;

        Self::parse(resp).await
    }

    /// Stored messages of a session, oldest first
    pub async fn history(&self, session_id: Uuid, limit: usize) -> Result<Vec<MessageResponse>> {
        let url = format!(
            "{}/api/agent/sessions/{}/messages",
            self.base_url, session_id
        );

        let resp = self
            .authorized(self.client.get(&url))
            .query(&[("limit", limit)])
            .send()
            .await
            .context("Failed to connect to Aperture API")?;

        Self::parse(resp).await
    }

    /// Tool schemas offered to the agent
    pub async fn tools(&self) -> Result<Vec<ToolSchema>> {
        let url = format!("{}/api/agent/tools", self.base_url);

        let resp = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .context("Failed to connect to Aperture API")?;

        Self::parse(resp).await
    }
}
