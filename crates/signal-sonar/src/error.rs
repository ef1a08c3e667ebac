use thiserror::Error;

/// Errors returned by the Sonar Pro upstream client.
#[derive(Debug, Error)]
pub enum SonarError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream returned a non-2xx status.
    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// All retry attempts were exhausted on transient errors.
    #[error("upstream unavailable after {attempts} attempts: {last_error}")]
    UpstreamUnavailable { attempts: u32, last_error: String },

    /// The response payload could not be parsed as structured data, even
    /// after the documented cleanup steps.
    #[error("malformed payload for {context}: {reason}")]
    MalformedPayload { context: String, reason: String },

    /// The parsed payload violates the fixed per-section schema.
    #[error("schema violation at {path}: {reason}")]
    SchemaViolation { path: String, reason: String },

    /// The configured base URL could not be parsed.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Truncates a raw payload for inclusion in error messages and logs, so a
/// multi-kilobyte model response does not flood diagnostics.
#[must_use]
pub(crate) fn snippet(raw: &str) -> String {
    const MAX: usize = 200;
    if raw.len() <= MAX {
        return raw.to_string();
    }
    let mut end = MAX;
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &raw[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_passes_short_strings_through() {
        assert_eq!(snippet("{}"), "{}");
    }

    #[test]
    fn snippet_truncates_long_strings() {
        let long = "x".repeat(500);
        let s = snippet(&long);
        assert!(s.len() < 250);
        assert!(s.ends_with('…'));
    }

    #[test]
    fn snippet_respects_char_boundaries() {
        let long = "é".repeat(300);
        let s = snippet(&long);
        assert!(s.ends_with('…'));
    }
}
