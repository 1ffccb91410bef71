use std::fmt;

#[derive(Debug)]
pub enum ApiError {
    /// Transport-level failure (connection refused, timeout, TLS)
    Http { uri: String, source: reqwest::Error },

    /// Backend answered with a non-success HTTP status
    Backend { uri: String, status: u16, body: String },

    /// Response body was not the JSON shape we expected
    JsonParse { context: String, source: serde_json::Error },

    /// Request payload failed to serialize
    JsonSerialize { context: String, source: serde_json::Error },
}

impl ApiError {
    /// Whether this error means "the object does not exist".
    ///
    /// TestRail reports unknown ids as HTTP 400 ("not a valid ...") and
    /// some installations as 404. The `exists`/`select` path swallows
    /// these and re-raises everything else.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Backend { status, .. } if *status == 400 || *status == 404)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http { uri, source } => {
                write!(f, "HTTP request to {} failed: {}", uri, source)
            }
            ApiError::Backend { uri, status, body } => {
                write!(f, "Backend returned {} for {}: {}", status, uri, body)
            }
            ApiError::JsonParse { context, source } => {
                write!(f, "JSON parse error ({}): {}", context, source)
            }
            ApiError::JsonSerialize { context, source } => {
                write!(f, "JSON serialize error ({}): {}", context, source)
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Http { source, .. } => Some(source),
            ApiError::JsonParse { source, .. } => Some(source),
            ApiError::JsonSerialize { source, .. } => Some(source),
            _ => None,
        }
    }
}
