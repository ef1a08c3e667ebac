//! HTTP client for the Perplexity Sonar Pro chat-completions API.
//!
//! Wraps `reqwest` with bounded timeouts, the retry policy from
//! [`crate::retry`], and the cleanup → parse → validate → deserialize
//! pipeline that turns a free-text model response into typed report
//! sections.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::cleanup;
use crate::error::{snippet, SonarError};
use crate::prompts;
use crate::retry::{retry_with_policy, RetryPolicy};
use crate::schema::{self, Section};
use crate::types::{Category, CategoryData, ChatMessage, ChatRequest, ChatResponse, TrendsPayload};

const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai";
const MODEL: &str = "sonar-pro";
const TEMPERATURE: f32 = 0.1;
const MAX_TOKENS: u32 = 3000;

/// Client for the Perplexity Sonar Pro API.
///
/// Manages the HTTP client, API key, retry policy, and base URL. Use
/// [`SonarClient::new`] for production or [`SonarClient::with_base_url`] to
/// point at a mock server in tests.
pub struct SonarClient {
    client: Client,
    api_key: String,
    endpoint: Url,
    policy: RetryPolicy,
}

impl SonarClient {
    /// Creates a new client pointed at the production Perplexity API.
    ///
    /// # Errors
    ///
    /// Returns [`SonarError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, policy: RetryPolicy) -> Result<Self, SonarError> {
        Self::with_base_url(api_key, timeout_secs, policy, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with
    /// wiremock or a self-hosted gateway).
    ///
    /// # Errors
    ///
    /// Returns [`SonarError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SonarError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        policy: RetryPolicy,
        base_url: &str,
    ) -> Result<Self, SonarError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("neural-signal/0.1 (market-intelligence)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // join appends to the path rather than replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|u| u.join("chat/completions"))
            .map_err(|e| SonarError::InvalidBaseUrl(format!("{base_url}: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
            policy,
        })
    }

    /// Fetches, validates, and parses one intelligence category.
    ///
    /// Transient upstream failures are retried per the configured policy;
    /// payload problems are not.
    ///
    /// # Errors
    ///
    /// - [`SonarError::UpstreamUnavailable`] after exhausting retries on
    ///   transport failures or non-2xx statuses.
    /// - [`SonarError::MalformedPayload`] if the cleaned response text is
    ///   not valid JSON or the envelope carries no content.
    /// - [`SonarError::SchemaViolation`] if the parsed payload breaks the
    ///   section schema.
    pub async fn fetch(&self, category: Category) -> Result<CategoryData, SonarError> {
        let content = retry_with_policy(
            self.policy,
            |d| tokio::time::sleep(d),
            || self.send_chat(category),
        )
        .await?;

        let cleaned = cleanup::normalize_payload(&content);
        let payload: serde_json::Value =
            serde_json::from_str(&cleaned).map_err(|e| SonarError::MalformedPayload {
                context: category.to_string(),
                reason: format!("{e}; cleaned payload: {}", snippet(&cleaned)),
            })?;

        extract_category(category, &payload)
    }

    /// Sends one chat-completions request and returns the assistant text.
    async fn send_chat(&self, category: Category) -> Result<String, SonarError> {
        let request = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompts::system_instruction(category),
                },
                ChatMessage {
                    role: "user",
                    content: prompts::user_query(category),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SonarError::Status {
                status: status.as_u16(),
                body: snippet(&body),
            });
        }

        let body = response.text().await?;
        let envelope: ChatResponse =
            serde_json::from_str(&body).map_err(|e| SonarError::MalformedPayload {
                context: category.to_string(),
                reason: format!("envelope did not parse: {e}; body: {}", snippet(&body)),
            })?;

        if let Some(usage) = &envelope.usage {
            tracing::debug!(
                category = %category,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "sonar usage"
            );
        }

        envelope
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| SonarError::MalformedPayload {
                context: category.to_string(),
                reason: "response envelope contained no choices".to_string(),
            })
    }
}

/// Validates the payload's section(s) for `category` and deserializes them
/// into typed report data.
fn extract_category(category: Category, payload: &serde_json::Value) -> Result<CategoryData, SonarError> {
    let typed = |section: Section| -> Result<serde_json::Value, SonarError> {
        let value = schema::require_section(payload, section)?;
        schema::validate_section(value, section)?;
        Ok(value.clone())
    };

    // from_value cannot fail on validated input; mapping keeps the error
    // contextual if the schema and the typed model ever drift.
    let morph = |e: serde_json::Error| SonarError::MalformedPayload {
        context: category.to_string(),
        reason: format!("validated payload did not deserialize: {e}"),
    };

    match category {
        Category::Trends => {
            let trends = typed(Section::Trends)?;
            let timeline = typed(Section::TrendTimeline)?;
            Ok(CategoryData::Trends(TrendsPayload {
                trends: serde_json::from_value(trends).map_err(morph)?,
                trend_timeline: serde_json::from_value(timeline).map_err(morph)?,
            }))
        }
        Category::Insights => Ok(CategoryData::Insights(
            serde_json::from_value(typed(Section::Insights)?).map_err(morph)?,
        )),
        Category::News => Ok(CategoryData::News(
            serde_json::from_value(typed(Section::News)?).map_err(morph)?,
        )),
        Category::Opportunities => Ok(CategoryData::Opportunities(
            serde_json::from_value(typed(Section::Opportunities)?).map_err(morph)?,
        )),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn with_base_url_strips_trailing_slash() {
        let client = SonarClient::with_base_url(
            "test-key",
            30,
            RetryPolicy::default(),
            "https://api.perplexity.ai/",
        )
        .expect("client construction should not fail");
        assert_eq!(
            client.endpoint.as_str(),
            "https://api.perplexity.ai/chat/completions"
        );
    }

    #[test]
    fn with_base_url_rejects_garbage() {
        let result =
            SonarClient::with_base_url("test-key", 30, RetryPolicy::default(), "not a url");
        assert!(matches!(result, Err(SonarError::InvalidBaseUrl(_))));
    }

    #[test]
    fn extract_trends_requires_both_sections() {
        let payload = json!({"trends": []});
        let err = extract_category(Category::Trends, &payload).unwrap_err();
        assert!(matches!(
            err,
            SonarError::SchemaViolation { ref path, .. } if path == "trend_timeline"
        ));
    }

    #[test]
    fn extract_news_produces_typed_items() {
        let payload = json!({"news": [{
            "headline": "h",
            "category": "Product Launch",
            "summary": "s",
            "impact_analysis": "i",
            "technical_implications": "t",
            "date": "2026-08-01",
            "source": "Reuters",
            "relevance_score": 0.8
        }]});
        let data = extract_category(Category::News, &payload).expect("valid payload");
        match data {
            CategoryData::News(items) => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].headline, "h");
            }
            other => panic!("expected news, got {other:?}"),
        }
    }
}
