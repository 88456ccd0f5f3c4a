//! AI collaborator contract.
//!
//! The language model is reached through the [`NarrativeModel`] trait so the
//! analysis operations can run against the real Anthropic Messages API or a
//! test double. A single request is sent per call: no retries, no timeout.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::insight::normalize;
use super::prompts::{DATA_MARKER, NARRATIVE_PROMPT, RANK_SCHEDULE_PROMPT};
use super::schedule::parse_recommendation;
use crate::config::LlmSettings;
use crate::models::RankRecord;
use crate::routes::insight::{NormalizedInsight, RankScheduleRecommendation};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("분석할 데이터가 없습니다.")]
    EmptyRequest,

    #[error("ANTHROPIC_API_KEY is not configured")]
    MissingCredential,

    #[error("{0}")]
    Transport(String),

    #[error("No JSON object found in the model response")]
    NoJsonObject,

    #[error("Model response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Failed to encode request data: {0}")]
    Encoding(String),
}

/// Text-in/text-out language model.
#[async_trait]
pub trait NarrativeModel: Send + Sync {
    /// Send one user prompt and return the text of the reply.
    async fn complete(&self, prompt: &str) -> Result<String, AnalysisError>;
}

/// Anthropic Messages API client.
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    settings: LlmSettings,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl AnthropicClient {
    /// Build a client; fails when no usable API key is configured.
    pub fn new(settings: LlmSettings) -> Result<Self, AnalysisError> {
        let api_key = settings
            .usable_api_key()
            .ok_or(AnalysisError::MissingCredential)?
            .to_string();
        Ok(Self {
            client: Client::new(),
            api_key,
            settings,
        })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }
}

#[async_trait]
impl NarrativeModel for AnthropicClient {
    async fn complete(&self, prompt: &str) -> Result<String, AnalysisError> {
        let body = json!({
            "model": self.settings.model,
            "max_tokens": self.settings.max_tokens,
            "messages": [
                { "role": "user", "content": prompt }
            ]
        });

        let response = self
            .client
            .post(self.settings.messages_url())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.settings.api_version)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalysisError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| format!("Language model request failed with status {}", status));
            return Err(AnalysisError::Transport(message));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::Transport(e.to_string()))?;

        // Only a leading text block carries the answer.
        Ok(parsed
            .content
            .into_iter()
            .next()
            .filter(|block| block.kind == "text")
            .and_then(|block| block.text)
            .unwrap_or_default())
    }
}

/// Substitute the pretty-printed records for the data marker.
pub fn build_prompt(template: &str, records: &[RankRecord]) -> Result<String, AnalysisError> {
    let data =
        serde_json::to_string_pretty(records).map_err(|e| AnalysisError::Encoding(e.to_string()))?;
    Ok(template.replacen(DATA_MARKER, &data, 1))
}

/// Parse the span from the first `{` to the last `}` of `text`.
pub fn extract_json_object(text: &str) -> Result<Value, AnalysisError> {
    let start = text.find('{').ok_or(AnalysisError::NoJsonObject)?;
    let end = text.rfind('}').ok_or(AnalysisError::NoJsonObject)?;
    if end < start {
        return Err(AnalysisError::NoJsonObject);
    }
    serde_json::from_str(&text[start..=end]).map_err(|e| AnalysisError::InvalidJson(e.to_string()))
}

async fn request_json(
    model: &dyn NarrativeModel,
    template: &str,
    records: &[RankRecord],
) -> Result<Value, AnalysisError> {
    if records.is_empty() {
        return Err(AnalysisError::EmptyRequest);
    }
    let prompt = build_prompt(template, records)?;
    debug!(
        "Sending prompt for {} records ({} bytes)",
        records.len(),
        prompt.len()
    );

    let text = model.complete(&prompt).await.map_err(|e| {
        warn!("Language model request failed: {}", e);
        e
    })?;
    extract_json_object(&text).map_err(|e| {
        warn!("Unusable language model response: {}", e);
        e
    })
}

/// Narrative analysis as returned by the model, before normalization.
pub async fn request_narrative(
    model: &dyn NarrativeModel,
    records: &[RankRecord],
) -> Result<Value, AnalysisError> {
    let raw = request_json(model, NARRATIVE_PROMPT, records).await?;
    info!("Narrative analysis completed for {} records", records.len());
    Ok(raw)
}

/// Narrative analysis normalized into its fixed shape.
pub async fn analyze_narrative(
    model: &dyn NarrativeModel,
    records: &[RankRecord],
) -> Result<NormalizedInsight, AnalysisError> {
    let raw = request_narrative(model, records).await?;
    Ok(normalize(Some(&raw)))
}

/// Hour-by-hour target ranks for the given rows.
pub async fn recommend_rank_schedule(
    model: &dyn NarrativeModel,
    records: &[RankRecord],
) -> Result<RankScheduleRecommendation, AnalysisError> {
    let raw = request_json(model, RANK_SCHEDULE_PROMPT, records).await?;
    info!("Rank schedule recommended for {} records", records.len());
    Ok(parse_recommendation(Some(&raw)))
}
