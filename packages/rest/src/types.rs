use std::collections::HashMap;

/// HTTP verbs understood by the document tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    GET,
    PUT,
    PATCH,
    POST,
    DELETE,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Method::GET => "GET",
            Method::PUT => "PUT",
            Method::PATCH => "PATCH",
            Method::POST => "POST",
            Method::DELETE => "DELETE",
        };
        f.write_str(name)
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => http::Method::GET,
            Method::PUT => http::Method::PUT,
            Method::PATCH => http::Method::PATCH,
            Method::POST => http::Method::POST,
            Method::DELETE => http::Method::DELETE,
        }
    }
}

/// A fully resolved request, ready for an [`HttpExecutor`](crate::HttpExecutor).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpRequest {
    pub method: Method,

    /// Absolute endpoint URL, including the REST suffix.
    pub url: String,

    pub query: HashMap<String, String>,

    pub headers: HashMap<String, String>,

    /// Already-encoded JSON body
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            ..Default::default()
        }
    }
}

/// Raw response as seen by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,

    /// Status text (e.g., "OK", "Not Found")
    pub status_text: String,

    pub headers: HashMap<String, String>,

    pub body_text: String,
}

impl HttpResponse {
    /// Check if the response status indicates success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> HttpResponse {
        HttpResponse {
            status,
            status_text: String::new(),
            headers: HashMap::new(),
            body_text: String::new(),
        }
    }

    #[test]
    fn only_2xx_is_success() {
        assert!(response(200).is_success());
        assert!(response(204).is_success());
        assert!(!response(301).is_success());
        assert!(!response(404).is_success());
        assert!(!response(503).is_success());
    }

    #[test]
    fn method_converts_to_http_method() {
        assert_eq!(http::Method::from(Method::PATCH), http::Method::PATCH);
        assert_eq!(http::Method::from(Method::DELETE), http::Method::DELETE);
        assert_eq!(Method::POST.to_string(), "POST");
    }

    #[test]
    fn new_request_is_bare() {
        let request = HttpRequest::new(Method::GET, "https://example.com/a.json");

        assert_eq!(request.url, "https://example.com/a.json");
        assert!(request.query.is_empty());
        assert!(request.headers.is_empty());
        assert!(request.body.is_none());
    }
}
