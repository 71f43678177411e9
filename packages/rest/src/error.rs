#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request body could not be encoded; nothing was sent.
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A successful response did not decode into the expected shape.
    #[error("Decode error: {0}")]
    Decode(#[source] serde_json::Error),

    /// The transport failed before a response was received.
    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid URL: {message}")]
    InvalidUrl { message: String },
}

impl Error {
    /// HTTP status carried by an [`Error::Http`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_exposes_status() {
        let error = Error::Http {
            status: 404,
            body: "null".to_string(),
        };
        assert_eq!(error.status(), Some(404));
        assert_eq!(error.to_string(), "HTTP 404: null");
    }

    #[test]
    fn other_errors_have_no_status() {
        let error = Error::Transport {
            message: "timed out".to_string(),
        };
        assert_eq!(error.status(), None);
    }
}
