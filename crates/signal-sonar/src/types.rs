//! Wire types for the Perplexity chat-completions API and the per-category
//! fetch results.
//!
//! The request/response envelope follows the OpenAI-compatible shape exposed
//! at `https://api.perplexity.ai/chat/completions`.

use serde::{Deserialize, Serialize};

use signal_core::report::{InsightItem, NewsItem, OpportunityItem, TimelineEvent, TrendItem};

/// One upstream fetch category.
///
/// The trends fetch returns two report sections (`trends` and
/// `trend_timeline`) in a single payload; the remaining categories map to
/// one section each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Trends,
    Insights,
    News,
    Opportunities,
}

impl Category {
    /// All fetch categories, in aggregation order.
    pub const ALL: [Category; 4] = [
        Category::Trends,
        Category::Insights,
        Category::News,
        Category::Opportunities,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Trends => "trends",
            Category::Insights => "insights",
            Category::News => "news",
            Category::Opportunities => "opportunities",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of the trends fetch: two report sections from one upstream call.
#[derive(Debug, Clone, Deserialize)]
pub struct TrendsPayload {
    pub trends: Vec<TrendItem>,
    pub trend_timeline: Vec<TimelineEvent>,
}

/// A validated, typed per-category fetch result.
#[derive(Debug, Clone)]
pub enum CategoryData {
    Trends(TrendsPayload),
    Insights(Vec<InsightItem>),
    News(Vec<NewsItem>),
    Opportunities(Vec<OpportunityItem>),
}

// ---------------------------------------------------------------------------
// chat/completions envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: String,
}

/// Top-level chat-completions response envelope.
///
/// Only the fields this service reads are modeled; everything else in the
/// upstream envelope is ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssistantMessage {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}
