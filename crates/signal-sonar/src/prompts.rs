//! Prompt construction for the Sonar Pro queries.
//!
//! Each category sends one system instruction that pins the exact JSON
//! output schema, plus a user prompt scoped to a fixed allowlist of
//! reputable marketing publications. The model is asked for bare JSON; the
//! cleanup step still tolerates fences and trailing commas.

use crate::types::Category;

/// Publications the model is asked to cite. Ordered roughly by authority;
/// per-category prompts take a prefix of this list.
pub const MARKETING_SOURCES: &[&str] = &[
    "marketingland.com",
    "adage.com",
    "marketingprofs.com",
    "contentmarketinginstitute.com",
    "hubspot.com/marketing",
    "salesforce.com/resources/articles/marketing",
    "forrester.com",
    "gartner.com",
    "mckinsey.com",
    "deloitte.com",
    "techcrunch.com",
    "venturebeat.com",
    "wired.com",
    "harvard.edu",
    "mit.edu",
    "stanford.edu",
    "reuters.com",
    "wsj.com",
    "bloomberg.com",
];

/// System instruction pinning the analyst persona and the exact output
/// schema for `category`.
#[must_use]
pub fn system_instruction(category: Category) -> String {
    format!(
        "You are a senior marketing intelligence analyst providing actionable insights \
         for marketing executives and professionals. Focus on business impact, ROI, and \
         strategic implications. Only cite information from reputable marketing \
         publications, industry reports, and authoritative sources. Respond with a \
         single JSON object and nothing else — no prose, no Markdown fences. The object \
         must match this schema exactly:\n{}",
        schema_pin(category)
    )
}

/// User prompt for `category`, scoped to the source allowlist.
#[must_use]
pub fn user_query(category: Category) -> String {
    match category {
        Category::Trends => format!(
            "What are the most significant marketing technology trends and innovations \
             from the past week, sourced from: {}? Focus on AI marketing tools, \
             attribution models, privacy changes, customer experience innovations, and \
             performance marketing. For each trend give concrete metrics and technical \
             detail, and chart the adoption trajectory per quarter.",
            sources(8)
        ),
        Category::Insights => format!(
            "Provide strategic marketing insights backed by recent case studies and \
             success stories from: {}. Focus on AI-driven campaigns, personalization, \
             attribution studies, and ROI improvements. For each insight include the \
             analysis, its implications, and one supporting case study.",
            sources(7)
        ),
        Category::News => format!(
            "Find the latest marketing industry news from the past 48 hours from these \
             sources: {}. Focus on AI in marketing, new platform features, campaign \
             successes, industry reports, executive moves, funding news, and regulatory \
             changes affecting digital marketing.",
            sources(10)
        ),
        Category::Opportunities => format!(
            "What emerging market opportunities in marketing technology should teams \
             evaluate now, according to: {}? Include the technical potential, concrete \
             requirements, an ROI projection, implementation complexity, and how ready \
             the market is.",
            sources(6)
        ),
    }
}

fn sources(n: usize) -> String {
    MARKETING_SOURCES[..n.min(MARKETING_SOURCES.len())].join(", ")
}

/// Literal schema text embedded in the system instruction.
fn schema_pin(category: Category) -> &'static str {
    match category {
        Category::Trends => {
            r#"{
  "trends": [
    {
      "topic": "string",
      "metrics": ["string"],
      "technical_details": "string",
      "adoption_rate": 0.0
    }
  ],
  "trend_timeline": [
    {
      "period": "YYYY-Q1 through YYYY-Q4",
      "value": 0.0,
      "event": "string",
      "milestone": "string"
    }
  ]
}
adoption_rate is a fraction between 0 and 1. value is an index between 0 and 100. period must match YYYY-Q[1-4]."#
        }
        Category::Insights => {
            r#"{
  "insights": [
    {
      "area": "string",
      "analysis": "string",
      "implications": ["string"],
      "case_study": "string",
      "confidence_score": 0.0
    }
  ]
}
confidence_score is a fraction between 0 and 1."#
        }
        Category::News => {
            r#"{
  "news": [
    {
      "headline": "string",
      "category": "Industry Move | Product Launch | Research | Regulation",
      "summary": "string",
      "impact_analysis": "string",
      "technical_implications": "string",
      "date": "string",
      "source": "string",
      "relevance_score": 0.0
    }
  ]
}
category must be exactly one of the four listed labels. relevance_score is a fraction between 0 and 1."#
        }
        Category::Opportunities => {
            r#"{
  "opportunities": [
    {
      "domain": "string",
      "technical_potential": "string",
      "requirements": ["string"],
      "roi_projection": "string",
      "complexity": "High | Medium | Low",
      "market_readiness": 0.0
    }
  ]
}
complexity must be exactly High, Medium, or Low. market_readiness is a fraction between 0 and 1."#
        }
    }
}
