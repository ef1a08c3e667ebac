//! Market intelligence report data model.
//!
//! These types define both the wire format served over HTTP and the shape
//! persisted in the cache. Struct field order is the serialization order, so
//! a report written to the cache and read back re-serializes byte-for-byte.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The unit of cached and served data: one full intelligence report.
///
/// Every list field is present (possibly empty) after successful
/// aggregation — never absent or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntelligenceReport {
    pub trends: Vec<TrendItem>,
    pub trend_timeline: Vec<TimelineEvent>,
    pub insights: Vec<InsightItem>,
    pub news: Vec<NewsItem>,
    pub opportunities: Vec<OpportunityItem>,
    pub generated_at: DateTime<Utc>,
}

/// A single emerging trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendItem {
    pub topic: String,
    /// Ordered sequence of headline metrics, most significant first.
    pub metrics: Vec<String>,
    pub technical_details: String,
    /// Adoption rate in `0.0..=1.0`.
    pub adoption_rate: f64,
}

/// One point on the trend timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Quarter label matching `YYYY-Q[1-4]`, e.g. `"2025-Q3"`.
    pub period: String,
    /// Index value in `0.0..=100.0`.
    pub value: f64,
    pub event: String,
    pub milestone: String,
}

/// A strategic insight with supporting analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightItem {
    pub area: String,
    pub analysis: String,
    pub implications: Vec<String>,
    pub case_study: String,
    /// Confidence in `0.0..=1.0`.
    pub confidence_score: f64,
}

/// Category label for a news item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NewsCategory {
    #[serde(rename = "Industry Move")]
    IndustryMove,
    #[serde(rename = "Product Launch")]
    ProductLaunch,
    Research,
    Regulation,
}

/// An industry news item with impact analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub headline: String,
    pub category: NewsCategory,
    pub summary: String,
    pub impact_analysis: String,
    pub technical_implications: String,
    /// Publication date as emitted by the upstream model; kept as a plain
    /// string since the source format is not pinned.
    pub date: String,
    pub source: String,
    /// Relevance in `0.0..=1.0`.
    pub relevance_score: f64,
}

/// Implementation complexity of a market opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Complexity {
    High,
    Medium,
    Low,
}

/// A market opportunity with readiness assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityItem {
    pub domain: String,
    pub technical_potential: String,
    pub requirements: Vec<String>,
    pub roi_projection: String,
    pub complexity: Complexity,
    /// Market readiness in `0.0..=1.0`.
    pub market_readiness: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> IntelligenceReport {
        IntelligenceReport {
            trends: vec![TrendItem {
                topic: "AI-Powered Personalization".to_string(),
                metrics: vec!["3.2x CLV".to_string(), "45% lift".to_string()],
                technical_details: "Realtime feature stores feeding ranking models".to_string(),
                adoption_rate: 0.62,
            }],
            trend_timeline: vec![TimelineEvent {
                period: "2025-Q4".to_string(),
                value: 74.5,
                event: "Holiday campaign automation peak".to_string(),
                milestone: "Majority adoption among enterprise retailers".to_string(),
            }],
            insights: vec![],
            news: vec![NewsItem {
                headline: "OpenAI Partners with WPP".to_string(),
                category: NewsCategory::IndustryMove,
                summary: "Agency workflow integration".to_string(),
                impact_analysis: "40% faster concept-to-delivery".to_string(),
                technical_implications: "API-first creative pipelines".to_string(),
                date: "2026-08-01".to_string(),
                source: "Campaign".to_string(),
                relevance_score: 0.9,
            }],
            opportunities: vec![OpportunityItem {
                domain: "Spatial Commerce".to_string(),
                technical_potential: "3D product experiences".to_string(),
                requirements: vec!["WebGL pipeline".to_string()],
                roi_projection: "28% higher AOV".to_string(),
                complexity: Complexity::High,
                market_readiness: 0.4,
            }],
            generated_at: "2026-08-01T00:00:00Z".parse().expect("valid timestamp"),
        }
    }

    #[test]
    fn report_serializes_all_list_fields() {
        let json = serde_json::to_value(sample_report()).expect("serialize");
        for field in ["trends", "trend_timeline", "insights", "news", "opportunities"] {
            assert!(
                json[field].is_array(),
                "{field} should serialize as an array even when empty"
            );
        }
        assert!(json["generated_at"].is_string());
    }

    #[test]
    fn news_category_uses_spaced_labels() {
        let json = serde_json::to_string(&NewsCategory::IndustryMove).expect("serialize");
        assert_eq!(json, "\"Industry Move\"");
        let json = serde_json::to_string(&NewsCategory::ProductLaunch).expect("serialize");
        assert_eq!(json, "\"Product Launch\"");
        let back: NewsCategory = serde_json::from_str("\"Regulation\"").expect("deserialize");
        assert_eq!(back, NewsCategory::Regulation);
    }

    #[test]
    fn report_round_trips_byte_for_byte() {
        let report = sample_report();
        let first = serde_json::to_string(&report).expect("serialize");
        let parsed: IntelligenceReport = serde_json::from_str(&first).expect("deserialize");
        let second = serde_json::to_string(&parsed).expect("re-serialize");
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_complexity_is_rejected() {
        let result = serde_json::from_str::<Complexity>("\"Extreme\"");
        assert!(result.is_err());
    }
}
