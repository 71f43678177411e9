//! HTTP transport abstraction.
//!
//! Nodes never talk to reqwest directly; they hand a resolved
//! [`HttpRequest`] to an [`HttpExecutor`]. Tests swap in a mock executor
//! so no network is needed.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::types::{HttpRequest, HttpResponse};

/// Trait for executing HTTP requests.
pub trait HttpExecutor: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// Returns `Err` with a message if no response could be obtained.
    /// Non-2xx responses are still `Ok`.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, String>;
}

/// Production HTTP executor using reqwest.
pub struct ReqwestExecutor {
    client: Client,
}

impl ReqwestExecutor {
    /// Create a new executor with the given timeout.
    pub fn new(timeout: Duration) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| e.to_string())?;

        Ok(Self { client })
    }
}

impl HttpExecutor for ReqwestExecutor {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, String> {
        let method: http::Method = request.method.into();

        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let header_name = HeaderName::try_from(name.as_str()).map_err(|e| e.to_string())?;
            let header_value = HeaderValue::try_from(value.as_str()).map_err(|e| e.to_string())?;
            headers.insert(header_name, header_value);
        }

        let mut req_builder = self.client.request(method, &request.url);
        req_builder = req_builder.headers(headers);

        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.json(body);
        }

        let response = req_builder.send().map_err(|e| e.to_string())?;

        let status = response.status().as_u16();
        let status_text = response
            .status()
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_string();

        let mut resp_headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                resp_headers.insert(name.to_string(), v.to_string());
            }
        }

        let body_text = response.text().map_err(|e| e.to_string())?;

        Ok(HttpResponse {
            status,
            status_text,
            headers: resp_headers,
            body_text,
        })
    }
}

/// Mock HTTP executor for testing.
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Returns canned responses keyed by endpoint URL and records every
    /// request it sees.
    #[derive(Clone, Default)]
    pub struct MockExecutor {
        responses: Arc<Mutex<HashMap<String, HttpResponse>>>,
        default_response: Arc<Mutex<Option<HttpResponse>>>,
        recorded_requests: Arc<Mutex<Vec<HttpRequest>>>,
        failure: Arc<Mutex<Option<String>>>,
    }

    impl MockExecutor {
        pub fn new() -> Self {
            Self::default()
        }

        /// Add a response for a specific endpoint URL.
        pub fn with_response(self, url: impl Into<String>, response: HttpResponse) -> Self {
            self.responses.lock().unwrap().insert(url.into(), response);
            self
        }

        /// Set a default response when no URL matches.
        pub fn with_default_response(self, response: HttpResponse) -> Self {
            *self.default_response.lock().unwrap() = Some(response);
            self
        }

        /// Configure to fail all requests with a transport error.
        pub fn fail_with(self, message: impl Into<String>) -> Self {
            *self.failure.lock().unwrap() = Some(message.into());
            self
        }

        /// Replace the response for a URL after construction.
        pub fn set_response(&self, url: impl Into<String>, response: HttpResponse) {
            self.responses.lock().unwrap().insert(url.into(), response);
        }

        pub fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.recorded_requests.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.recorded_requests.lock().unwrap().len()
        }

        pub fn success_response(body: serde_json::Value) -> HttpResponse {
            HttpResponse {
                status: 200,
                status_text: "OK".to_string(),
                headers: HashMap::new(),
                body_text: body.to_string(),
            }
        }

        pub fn error_response(status: u16, message: &str) -> HttpResponse {
            HttpResponse {
                status,
                status_text: message.to_string(),
                headers: HashMap::new(),
                body_text: format!(r#"{{"error":"{}"}}"#, message),
            }
        }

        pub fn not_found() -> HttpResponse {
            Self::error_response(404, "Not Found")
        }
    }

    impl HttpExecutor for MockExecutor {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, String> {
            self.recorded_requests.lock().unwrap().push(request.clone());

            if let Some(message) = self.failure.lock().unwrap().clone() {
                return Err(message);
            }

            if let Some(response) = self.responses.lock().unwrap().get(&request.url) {
                return Ok(response.clone());
            }

            if let Some(ref response) = *self.default_response.lock().unwrap() {
                return Ok(response.clone());
            }

            Ok(Self::not_found())
        }
    }
}
