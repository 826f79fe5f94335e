//! AI insight formatting and the completion collaborator boundary.
//!
//! This module only formats requests and parses responses. It never reads or
//! writes tracked state, and any collaborator failure surfaces as
//! [`Error::InsightUnavailable`] without side effects.

use async_trait::async_trait;
use chrono_tz::Tz;
use serde::Serialize;

use crate::config::Config;
use crate::error::Error;
use crate::models::TimeLogWithBreaks;

const ANALYSIS_MAX_TOKENS: u32 = 150;
const SUGGESTION_MAX_TOKENS: u32 = 100;

const ANALYSIS_SYSTEM_PROMPT: &str =
    "You are a helpful time management assistant. Analyze work patterns and provide brief, practical insights.";
const SUGGESTION_SYSTEM_PROMPT: &str =
    "You are a helpful wellness assistant providing break suggestions. Keep responses short and friendly.";

/// One role-tagged message of a completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Text-completion collaborator.
///
/// Use `MockCompletionClient` in tests to mock the behavior.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Submits the messages and returns the completion text.
    async fn complete(&self, messages: Vec<ChatMessage>, max_tokens: u32)
        -> Result<String, Error>;
}

/// [`CompletionClient`] speaking the OpenAI-style `/chat/completions` shape.
pub struct HttpCompletionClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl HttpCompletionClient {
    pub fn new(base_url: String, api_key: String, model: String) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent("punchclock/0.1")
            .build()?;
        Ok(Self {
            client,
            base_url,
            api_key,
            model,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Self::new(
            config.openai_api_base.clone(),
            config.openai_api_key.clone(),
            config.openai_model.clone(),
        )
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        max_tokens: u32,
    ) -> Result<String, Error> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": max_tokens,
        });
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::InsightUnavailable(anyhow::anyhow!(
                "completion endpoint returned status {}",
                status
            )));
        }
        let payload: serde_json::Value = response.json().await?;
        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                Error::InsightUnavailable(anyhow::anyhow!(
                    "completion response missing choices[0].message.content"
                ))
            })?;
        Ok(content.trim().to_string())
    }
}

/// Compact per-session shape sent to the collaborator.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InsightRow {
    date: String,
    check_in: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    check_out: Option<String>,
    duration: String,
}

/// Builds insight and break-suggestion requests over a completion client.
pub struct InsightService<C> {
    client: C,
    time_zone: Tz,
}

impl<C: CompletionClient> InsightService<C> {
    pub fn new(client: C, time_zone: Tz) -> Self {
        Self { client, time_zone }
    }

    /// Work-pattern analysis over the given sessions.
    pub async fn analyze(&self, entries: &[TimeLogWithBreaks]) -> Result<String, Error> {
        let rows = insight_rows(entries, &self.time_zone);
        let data = serde_json::to_string(&rows)
            .map_err(|e| Error::InsightUnavailable(e.into()))?;
        let messages = vec![
            ChatMessage::system(ANALYSIS_SYSTEM_PROMPT),
            ChatMessage::user(format!(
                "Analyze this time log data and provide 3 key insights about work patterns \
                 and a brief suggestion for improvement. Keep it concise and friendly: {}",
                data
            )),
        ];
        self.client.complete(messages, ANALYSIS_MAX_TOKENS).await
    }

    /// A short break-activity suggestion for the current working stretch.
    pub async fn break_suggestion(&self, worked_minutes: i64) -> Result<String, Error> {
        let messages = vec![
            ChatMessage::system(SUGGESTION_SYSTEM_PROMPT),
            ChatMessage::user(format!(
                "I've been working for {} minutes. Suggest a quick break activity.",
                worked_minutes
            )),
        ];
        self.client.complete(messages, SUGGESTION_MAX_TOKENS).await
    }
}

fn insight_rows(entries: &[TimeLogWithBreaks], tz: &Tz) -> Vec<InsightRow> {
    entries
        .iter()
        .map(|entry| {
            let check_in_local = entry.log.check_in.with_timezone(tz);
            InsightRow {
                date: check_in_local.format("%Y-%m-%d").to_string(),
                check_in: check_in_local.format("%H:%M").to_string(),
                check_out: entry
                    .log
                    .check_out
                    .map(|t| t.with_timezone(tz).format("%H:%M").to_string()),
                duration: match entry.log.gross_hours() {
                    Some(hours) => format!("{:.2} hours", hours),
                    None => "In progress".to_string(),
                },
            }
        })
        .collect()
}
