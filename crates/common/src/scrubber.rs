use once_cell::sync::Lazy;
use regex::Regex;

/// Redaction of SQL text before it is written to logs.
///
/// Regex based and best-effort: quoted literals, e-mail addresses and long digit
/// runs are masked, whitespace is collapsed. It does not parse SQL.
static STRING_LITERAL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'(?:[^']|'')*'").expect("valid literal pattern"));

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}").expect("valid email pattern")
});

static LONG_NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{6,}\b").expect("valid number pattern"));

static WHITESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Maximum number of characters of a statement kept in a log line.
pub const LOG_PREVIEW_CHARS: usize = 120;

pub fn scrub(sql: &str) -> String {
    let scrubbed = STRING_LITERAL_REGEX.replace_all(sql, "'?'");
    let scrubbed = EMAIL_REGEX.replace_all(&scrubbed, "[EMAIL]");
    let scrubbed = LONG_NUMBER_REGEX.replace_all(&scrubbed, "[NUMBER]");
    WHITESPACE_REGEX
        .replace_all(scrubbed.trim(), " ")
        .into_owned()
}

/// Scrubbed statement cut to [`LOG_PREVIEW_CHARS`] characters.
pub fn log_preview(sql: &str) -> String {
    let scrubbed = scrub(sql);
    if scrubbed.chars().count() <= LOG_PREVIEW_CHARS {
        return scrubbed;
    }
    let mut preview: String = scrubbed.chars().take(LOG_PREVIEW_CHARS).collect();
    preview.push_str("...");
    preview
}
