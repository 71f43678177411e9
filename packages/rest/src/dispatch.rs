//! Request dispatch.
//!
//! Turns `(method, body)` on a node into exactly one HTTP round trip:
//! the endpoint is the node URL plus the REST suffix, the auth token rides
//! along as the `auth` query parameter, and any non-2xx answer becomes
//! [`Error::Http`].

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::codec;
use crate::config::Config;
use crate::error::Error;
use crate::executor::HttpExecutor;
use crate::types::{HttpRequest, Method};

/// Query parameter carrying the auth credential.
pub const AUTH_PARAM: &str = "auth";

/// Shared by every node derived from one root; cloning is cheap.
#[derive(Clone)]
pub struct Dispatcher {
    executor: Arc<dyn HttpExecutor>,
    suffix: Arc<str>,
    default_headers: Arc<HashMap<String, String>>,
}

impl Dispatcher {
    pub fn new(executor: Arc<dyn HttpExecutor>, config: &Config) -> Self {
        Self {
            executor,
            suffix: Arc::from(config.suffix.as_str()),
            default_headers: Arc::new(config.default_headers.clone()),
        }
    }

    /// Wire endpoint for a node URL.
    pub fn endpoint(&self, base_url: &str) -> String {
        format!("{}{}", base_url, self.suffix)
    }

    /// Build the request without sending it.
    ///
    /// A non-empty `auth` token is merged into `params`, replacing any
    /// caller-supplied `auth` entry.
    pub fn build_request(
        &self,
        base_url: &str,
        auth: Option<&str>,
        method: Method,
        body: Option<Value>,
        params: &HashMap<String, String>,
    ) -> HttpRequest {
        let mut query = params.clone();
        if let Some(token) = auth.filter(|t| !t.is_empty()) {
            query.insert(AUTH_PARAM.to_string(), token.to_string());
        }

        let mut request = HttpRequest::new(method, self.endpoint(base_url));
        request.query = query;
        request.headers = (*self.default_headers).clone();
        request.body = body;
        request
    }

    /// Send one request and decode the JSON answer.
    pub fn dispatch(
        &self,
        base_url: &str,
        auth: Option<&str>,
        method: Method,
        body: Option<Value>,
        params: &HashMap<String, String>,
    ) -> Result<Value, Error> {
        let request = self.build_request(base_url, auth, method, body, params);
        log::debug!("{} {}", request.method, request.url);

        let response = self
            .executor
            .execute(&request)
            .map_err(|message| Error::Transport { message })?;

        if !response.is_success() {
            log::debug!(
                "{} {} failed: {} {}",
                request.method,
                request.url,
                response.status,
                response.status_text
            );
            return Err(Error::Http {
                status: response.status,
                body: response.body_text,
            });
        }

        codec::decode(&response.body_text).inspect_err(|e| {
            log::warn!("{} {} returned undecodable body: {}", request.method, request.url, e);
        })
    }
}
