use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("unexpected content type: {0}")]
    UnexpectedContentType(String),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// True when no HTTP response was received at all.
    pub(crate) fn is_transport(&self) -> bool {
        match self {
            ApiError::Transport(err) => !err.is_status() && !err.is_decode(),
            _ => false,
        }
    }
}

pub(crate) fn is_json_content_type(value: &str) -> bool {
    let media_type = value.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    media_type == "application/json" || media_type.ends_with("+json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_content_types() {
        assert!(is_json_content_type("application/json"));
        assert!(is_json_content_type("application/json;charset=UTF-8"));
        assert!(is_json_content_type("Application/JSON"));
        assert!(is_json_content_type("application/problem+json"));
        assert!(!is_json_content_type("text/html; charset=utf-8"));
        assert!(!is_json_content_type(""));
    }

    #[test]
    fn status_errors_are_not_transport_errors() {
        assert!(!ApiError::Status(500).is_transport());
        assert!(!ApiError::UnexpectedContentType("text/html".into()).is_transport());
    }
}
