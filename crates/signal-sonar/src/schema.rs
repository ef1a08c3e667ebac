//! Structural validation of parsed payloads against the fixed per-section
//! schema.
//!
//! Validation runs on `serde_json::Value` before typed deserialization so a
//! violation can name the first offending field as a JSON-ish path
//! (`news[1].relevance_score`). It is all-or-nothing per section: one bad
//! item invalidates the whole section.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::SonarError;

static PERIOD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-Q[1-4]$").expect("period pattern compiles"));

const NEWS_CATEGORIES: &[&str] = &["Industry Move", "Product Launch", "Research", "Regulation"];
const COMPLEXITY_LEVELS: &[&str] = &["High", "Medium", "Low"];

/// A report section with its own item schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Trends,
    TrendTimeline,
    Insights,
    News,
    Opportunities,
}

impl Section {
    /// JSON key of this section in both payloads and the final report.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Section::Trends => "trends",
            Section::TrendTimeline => "trend_timeline",
            Section::Insights => "insights",
            Section::News => "news",
            Section::Opportunities => "opportunities",
        }
    }
}

/// Validates one section array against its fixed item schema.
///
/// `value` is the section's array value as found in the payload.
///
/// # Errors
///
/// Returns [`SonarError::SchemaViolation`] naming the first offending
/// field's path.
pub fn validate_section(value: &Value, section: Section) -> Result<(), SonarError> {
    let key = section.key();
    let Some(items) = value.as_array() else {
        return Err(violation(key, "expected an array"));
    };

    for (i, item) in items.iter().enumerate() {
        let path = format!("{key}[{i}]");
        let Some(obj) = item.as_object() else {
            return Err(violation(&path, "expected an object"));
        };
        match section {
            Section::Trends => validate_trend(obj, &path)?,
            Section::TrendTimeline => validate_timeline_event(obj, &path)?,
            Section::Insights => validate_insight(obj, &path)?,
            Section::News => validate_news(obj, &path)?,
            Section::Opportunities => validate_opportunity(obj, &path)?,
        }
    }
    Ok(())
}

/// Pulls the named section array out of a payload object.
///
/// # Errors
///
/// Returns [`SonarError::SchemaViolation`] when the key is absent.
pub fn require_section<'a>(payload: &'a Value, section: Section) -> Result<&'a Value, SonarError> {
    payload
        .get(section.key())
        .ok_or_else(|| violation(section.key(), "missing required field"))
}

fn validate_trend(obj: &Map<String, Value>, path: &str) -> Result<(), SonarError> {
    require_string(obj, path, "topic")?;
    require_string_array(obj, path, "metrics")?;
    require_string(obj, path, "technical_details")?;
    require_number_in(obj, path, "adoption_rate", 0.0, 1.0)
}

fn validate_timeline_event(obj: &Map<String, Value>, path: &str) -> Result<(), SonarError> {
    let period = require_string(obj, path, "period")?;
    if !PERIOD_RE.is_match(period) {
        return Err(violation(
            &format!("{path}.period"),
            "expected the form YYYY-Q[1-4]",
        ));
    }
    require_number_in(obj, path, "value", 0.0, 100.0)?;
    require_string(obj, path, "event")?;
    require_string(obj, path, "milestone")?;
    Ok(())
}

fn validate_insight(obj: &Map<String, Value>, path: &str) -> Result<(), SonarError> {
    require_string(obj, path, "area")?;
    require_string(obj, path, "analysis")?;
    require_string_array(obj, path, "implications")?;
    require_string(obj, path, "case_study")?;
    require_number_in(obj, path, "confidence_score", 0.0, 1.0)
}

fn validate_news(obj: &Map<String, Value>, path: &str) -> Result<(), SonarError> {
    require_string(obj, path, "headline")?;
    require_enum(obj, path, "category", NEWS_CATEGORIES)?;
    require_string(obj, path, "summary")?;
    require_string(obj, path, "impact_analysis")?;
    require_string(obj, path, "technical_implications")?;
    require_string(obj, path, "date")?;
    require_string(obj, path, "source")?;
    require_number_in(obj, path, "relevance_score", 0.0, 1.0)
}

fn validate_opportunity(obj: &Map<String, Value>, path: &str) -> Result<(), SonarError> {
    require_string(obj, path, "domain")?;
    require_string(obj, path, "technical_potential")?;
    require_string_array(obj, path, "requirements")?;
    require_string(obj, path, "roi_projection")?;
    require_enum(obj, path, "complexity", COMPLEXITY_LEVELS)?;
    require_number_in(obj, path, "market_readiness", 0.0, 1.0)
}

// ---------------------------------------------------------------------------
// field helpers
// ---------------------------------------------------------------------------

fn violation(path: &str, reason: &str) -> SonarError {
    SonarError::SchemaViolation {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

fn field<'a>(
    obj: &'a Map<String, Value>,
    path: &str,
    name: &str,
) -> Result<&'a Value, SonarError> {
    obj.get(name)
        .ok_or_else(|| violation(&format!("{path}.{name}"), "missing required field"))
}

fn require_string<'a>(
    obj: &'a Map<String, Value>,
    path: &str,
    name: &str,
) -> Result<&'a str, SonarError> {
    field(obj, path, name)?
        .as_str()
        .ok_or_else(|| violation(&format!("{path}.{name}"), "expected a string"))
}

fn require_string_array(obj: &Map<String, Value>, path: &str, name: &str) -> Result<(), SonarError> {
    let value = field(obj, path, name)?;
    let Some(items) = value.as_array() else {
        return Err(violation(&format!("{path}.{name}"), "expected an array"));
    };
    for (i, item) in items.iter().enumerate() {
        if !item.is_string() {
            return Err(violation(
                &format!("{path}.{name}[{i}]"),
                "expected a string",
            ));
        }
    }
    Ok(())
}

fn require_number_in(
    obj: &Map<String, Value>,
    path: &str,
    name: &str,
    min: f64,
    max: f64,
) -> Result<(), SonarError> {
    let value = field(obj, path, name)?;
    let Some(n) = value.as_f64() else {
        return Err(violation(&format!("{path}.{name}"), "expected a number"));
    };
    if !(min..=max).contains(&n) {
        return Err(violation(
            &format!("{path}.{name}"),
            &format!("expected a number in {min}..={max}, got {n}"),
        ));
    }
    Ok(())
}

fn require_enum(
    obj: &Map<String, Value>,
    path: &str,
    name: &str,
    allowed: &[&str],
) -> Result<(), SonarError> {
    let value = require_string(obj, path, name)?;
    if !allowed.contains(&value) {
        return Err(violation(
            &format!("{path}.{name}"),
            &format!("expected one of {allowed:?}, got {value:?}"),
        ));
    }
    Ok(())
}
