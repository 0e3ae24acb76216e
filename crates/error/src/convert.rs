use crate::{ErrorCode, ErrorContext, QuarryError};

impl From<reqwest::Error> for QuarryError {
    fn from(err: reqwest::Error) -> Self {
        let code = if err.is_timeout() {
            ErrorCode::ConnectionTimeout
        } else if err.is_decode() {
            ErrorCode::InvalidResponse
        } else if err.is_status() {
            ErrorCode::UnexpectedStatus
        } else {
            ErrorCode::TransportFailure
        };

        let mut error = QuarryError::new(code, err.to_string());
        if let Some(url) = err.url() {
            // Never leak credentials embedded in the URL
            let mut url = url.clone();
            let _ = url.set_password(None);
            error = error.with_context(ErrorContext::Http {
                method: String::new(),
                url: url.to_string(),
                status: err.status().map(|s| s.as_u16()),
            });
        }
        error
    }
}

impl From<std::io::Error> for QuarryError {
    fn from(err: std::io::Error) -> Self {
        QuarryError::new(ErrorCode::InternalPanic, err.to_string())
    }
}

impl From<serde_json::Error> for QuarryError {
    fn from(err: serde_json::Error) -> Self {
        QuarryError::new(ErrorCode::SerializationFailed, err.to_string())
    }
}

impl From<serde_yaml::Error> for QuarryError {
    fn from(err: serde_yaml::Error) -> Self {
        QuarryError::new(ErrorCode::InvalidConfig, err.to_string())
    }
}

impl From<arrow::error::ArrowError> for QuarryError {
    fn from(err: arrow::error::ArrowError) -> Self {
        QuarryError::new(ErrorCode::SerializationFailed, err.to_string())
    }
}

/// Closest candidate within an edit distance of 3, for "Did you mean" hints.
pub fn suggest_closest(target: &str, options: &[String]) -> Option<String> {
    let mut best_match: Option<&str> = None;
    let mut min_distance = usize::MAX;

    for option in options {
        let distance = levenshtein(target, option);
        if distance < min_distance && distance <= 3 {
            min_distance = distance;
            best_match = Some(option.as_str());
        }
    }

    best_match.map(|s| s.to_string())
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
