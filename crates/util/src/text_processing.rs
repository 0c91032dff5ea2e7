//! Redaction of credentials before text reaches logs.

use once_cell::sync::Lazy;
use regex::Regex;

static REDACT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(build_redact_patterns);

/// Redacts values that look like secrets in a string.
///
/// Authorization headers, bearer/basic credentials, GitHub token formats and
/// `*_TOKEN=`/`*_KEY=` style assignments are replaced with `[REDACTED]`
/// while the surrounding key names are kept.
pub fn redact_sensitive(input: &str) -> String {
    redact_sensitive_with(input, "[REDACTED]")
}

/// Redacts sensitive-looking values, using a custom replacement token.
pub fn redact_sensitive_with(input: &str, replacement: &str) -> String {
    let mut redacted = input.to_string();

    for pattern in REDACT_PATTERNS.iter() {
        redacted = pattern
            .replace_all(&redacted, |captures: &regex::Captures| {
                let prefix = captures.get(1).map(|m| m.as_str()).unwrap_or("");
                format!("{prefix}{replacement}")
            })
            .to_string();
    }

    redacted
}

fn build_redact_patterns() -> Vec<Regex> {
    [
        // GitHub personal access, OAuth and app tokens.
        r"()\b(?:gh[pousr]_[A-Za-z0-9]{20,}|github_pat_[A-Za-z0-9_]{20,})",
        r"(?i)(authorization:\s+)([^\s]+(?:\s+[^\s]+)?)",
        r"(?i)((?:^|\b)Bearer\s+)([A-Za-z0-9\-._~+/]+=*)",
        r"(?i)((?:^|\b)Basic\s+)([A-Za-z0-9+/]+=*)",
        r"(?i)([A-Z0-9_]*?(?:KEY|TOKEN|SECRET|PASSWORD)=)([^\s]+)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("redaction pattern"))
    .collect()
}
