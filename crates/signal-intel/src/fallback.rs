//! Built-in sample report served when no Perplexity API key is configured.
//!
//! The content mirrors the kind of output the live pipeline produces so the
//! HTTP surface behaves identically in both modes.

use chrono::{DateTime, Utc};

use signal_core::report::{
    Complexity, InsightItem, IntelligenceReport, NewsCategory, NewsItem, OpportunityItem,
    TimelineEvent, TrendItem,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// The static fallback report, stamped with the given generation time.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn sample_report(generated_at: DateTime<Utc>) -> IntelligenceReport {
    IntelligenceReport {
        trends: vec![
            TrendItem {
                topic: "Zero-Party Data Collection".to_string(),
                metrics: strings(&[
                    "3.2x higher customer lifetime value",
                    "45% better personalization effectiveness",
                    "60% improvement in targeting accuracy",
                ]),
                technical_details:
                    "Preference centers and interactive experiences feeding consent-scoped \
                     customer data platforms as third-party cookies disappear"
                        .to_string(),
                adoption_rate: 0.58,
            },
            TrendItem {
                topic: "Generative AI Content Production".to_string(),
                metrics: strings(&[
                    "65% reduction in content creation time",
                    "38% improvement in engagement rates",
                    "280% first-year ROI",
                ]),
                technical_details:
                    "Brand-voice-tuned language models integrated into enterprise content \
                     pipelines with human review gates"
                        .to_string(),
                adoption_rate: 0.71,
            },
            TrendItem {
                topic: "Real-Time Personalization Engines".to_string(),
                metrics: strings(&[
                    "19% average revenue increase",
                    "25% conversion rate improvement",
                    "33% higher satisfaction scores",
                ]),
                technical_details:
                    "Streaming feature stores and online ranking models personalizing \
                     sessions within a single page view"
                        .to_string(),
                adoption_rate: 0.49,
            },
            TrendItem {
                topic: "AI-Powered Attribution".to_string(),
                metrics: strings(&[
                    "40% more accurate performance measurement",
                    "25% better budget optimization",
                    "22% marketing efficiency gain",
                ]),
                technical_details:
                    "Shapley-value and media-mix models replacing last-click attribution \
                     across privacy-constrained customer journeys"
                        .to_string(),
                adoption_rate: 0.36,
            },
        ],
        trend_timeline: vec![
            TimelineEvent {
                period: "2025-Q3".to_string(),
                value: 42.0,
                event: "Enterprise generative AI pilots conclude".to_string(),
                milestone: "Early majority begins production rollouts".to_string(),
            },
            TimelineEvent {
                period: "2025-Q4".to_string(),
                value: 56.0,
                event: "Holiday campaigns lean on automated creative".to_string(),
                milestone: "AI-assisted content passes half of enterprise output".to_string(),
            },
            TimelineEvent {
                period: "2026-Q1".to_string(),
                value: 64.0,
                event: "Third-party cookie deprecation completes".to_string(),
                milestone: "Zero-party data programs become table stakes".to_string(),
            },
            TimelineEvent {
                period: "2026-Q2".to_string(),
                value: 73.0,
                event: "Attribution modernization wave".to_string(),
                milestone: "AI attribution reaches mainstream adoption".to_string(),
            },
        ],
        insights: vec![
            InsightItem {
                area: "Streaming Personalization".to_string(),
                analysis:
                    "Machine-learned playlist and content personalization measurably deepens \
                     engagement when models incorporate session context and mood signals"
                        .to_string(),
                implications: strings(&[
                    "Session-context features outperform demographic targeting",
                    "Retention gains compound into premium conversion",
                ]),
                case_study:
                    "Spotify increased average session duration 35% and playlist completion \
                     42% with AI-driven playlist personalization"
                        .to_string(),
                confidence_score: 0.87,
            },
            InsightItem {
                area: "Campaign Spend Optimization".to_string(),
                analysis:
                    "Real-time media-mix modeling lets global brands reallocate spend across \
                     markets faster than quarterly planning cycles allow"
                        .to_string(),
                implications: strings(&[
                    "Budget agility matters more than absolute budget size",
                    "Savings concentrate in the long tail of small markets",
                ]),
                case_study:
                    "Coca-Cola improved marketing ROI 25% and cut acquisition cost 18% with \
                     AI campaign optimization across 200+ markets"
                        .to_string(),
                confidence_score: 0.82,
            },
            InsightItem {
                area: "Retail Recommendation Systems".to_string(),
                analysis:
                    "Computer-vision product matching plus purchase history lifts conversion \
                     most where the product catalog is deep and preference-sensitive"
                        .to_string(),
                implications: strings(&[
                    "Visual similarity closes the gap for first-time buyers",
                    "Average order value rises with recommendation confidence",
                ]),
                case_study:
                    "Sephora drove a 40% increase in online conversions with AI-powered \
                     personalization over beauty-profile data"
                        .to_string(),
                confidence_score: 0.79,
            },
        ],
        news: vec![
            NewsItem {
                headline: "Meta's Threads Surpasses 200M Monthly Active Users as Brands Shift \
                           Ad Spend"
                    .to_string(),
                category: NewsCategory::IndustryMove,
                summary:
                    "Major brands are reallocating social media budgets toward Threads as its \
                     monthly audience passes 200 million"
                        .to_string(),
                impact_analysis:
                    "Early advertising partners report 23% lower cost-per-engagement than \
                     incumbent social platforms"
                        .to_string(),
                technical_implications:
                    "New ad API surface and measurement integrations required for \
                     cross-platform budget tooling"
                        .to_string(),
                date: "2026-08-05".to_string(),
                source: "AdAge".to_string(),
                relevance_score: 0.88,
            },
            NewsItem {
                headline: "OpenAI Partners with WPP to Transform Creative Agency Workflows"
                    .to_string(),
                category: NewsCategory::IndustryMove,
                summary:
                    "WPP is integrating frontier AI tooling across creative and media \
                     planning processes"
                        .to_string(),
                impact_analysis:
                    "Pilot programs show 40% reduction in concept-to-delivery timelines at \
                     maintained quality"
                        .to_string(),
                technical_implications:
                    "Agency pipelines shift to API-first asset generation with human \
                     approval gates"
                        .to_string(),
                date: "2026-08-04".to_string(),
                source: "Campaign".to_string(),
                relevance_score: 0.91,
            },
            NewsItem {
                headline: "Apple's Vision Pro Drives 300% Surge in Spatial Commerce Investment"
                    .to_string(),
                category: NewsCategory::ProductLaunch,
                summary:
                    "Retail brands are expanding spatial commerce and 3D shopping budgets \
                     following the Vision Pro launch"
                        .to_string(),
                impact_analysis:
                    "Early adopters see 67% higher engagement and 28% higher average order \
                     values in spatial experiences"
                        .to_string(),
                technical_implications:
                    "3D asset pipelines and WebXR delivery become marketing-stack \
                     requirements"
                        .to_string(),
                date: "2026-08-03".to_string(),
                source: "Retail Dive".to_string(),
                relevance_score: 0.74,
            },
            NewsItem {
                headline: "TikTok Shop Expands to European Markets Amid Regulatory Scrutiny"
                    .to_string(),
                category: NewsCategory::Regulation,
                summary:
                    "TikTok's commerce platform launches across the UK, Germany, and France \
                     despite ongoing data-privacy challenges"
                        .to_string(),
                impact_analysis:
                    "Beta merchants report conversion rates 45% above traditional social \
                     commerce"
                        .to_string(),
                technical_implications:
                    "Compliance tooling for EU data residency becomes a prerequisite for \
                     social commerce integrations"
                        .to_string(),
                date: "2026-08-02".to_string(),
                source: "Marketing Week".to_string(),
                relevance_score: 0.69,
            },
        ],
        opportunities: vec![
            OpportunityItem {
                domain: "Spatial Commerce Experiences".to_string(),
                technical_potential:
                    "3D product visualization and virtual try-on rendered natively on \
                     headset and mobile AR"
                        .to_string(),
                requirements: strings(&[
                    "3D asset production pipeline",
                    "WebXR delivery infrastructure",
                    "Spatial analytics instrumentation",
                ]),
                roi_projection: "28% higher average order value for early adopters".to_string(),
                complexity: Complexity::High,
                market_readiness: 0.35,
            },
            OpportunityItem {
                domain: "Conversational Commerce Agents".to_string(),
                technical_potential:
                    "LLM-backed shopping assistants handling discovery, comparison, and \
                     checkout inside chat surfaces"
                        .to_string(),
                requirements: strings(&[
                    "Product catalog grounding",
                    "Guardrailed generation with human escalation",
                    "Conversion attribution for conversational journeys",
                ]),
                roi_projection: "45% higher conversion than static social commerce".to_string(),
                complexity: Complexity::Medium,
                market_readiness: 0.62,
            },
            OpportunityItem {
                domain: "Privacy-Preserving Measurement".to_string(),
                technical_potential:
                    "Clean-room and on-device attribution replacing third-party identifiers"
                        .to_string(),
                requirements: strings(&[
                    "Data clean-room partnership",
                    "Consent-management integration",
                ]),
                roi_projection: "25% better budget optimization from restored visibility"
                    .to_string(),
                complexity: Complexity::Low,
                market_readiness: 0.78,
            },
        ],
        generated_at,
    }
}
