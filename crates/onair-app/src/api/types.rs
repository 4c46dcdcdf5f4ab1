//! Request/response envelopes
//!
//! Shaped like a serverless HTTP event so the handlers can run behind a
//! function gateway or the bundled server alike.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};

fn default_method() -> String {
    "GET".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiRequest {
    #[serde(rename = "httpMethod", default = "default_method")]
    pub method: String,
    #[serde(rename = "queryStringParameters", default)]
    pub query: Option<HashMap<String, String>>,
}

impl ApiRequest {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            query: None,
        }
    }

    pub fn get() -> Self {
        Self::new("GET")
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Build a request from a method and a request target such as
    /// `/api?endpoint=history`. Returns the path and the request.
    pub fn from_target(method: impl Into<String>, target: &str) -> (String, Self) {
        let mut request = Self::new(method);
        let Ok(url) = reqwest::Url::parse("http://localhost/").and_then(|base| base.join(target))
        else {
            return (target.to_string(), request);
        };
        for (key, value) in url.query_pairs() {
            request = request.with_query(key, value);
        }
        (url.path().to_string(), request)
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.as_ref()?.get(key).map(String::as_str)
    }

    pub fn is(&self, method: &str) -> bool {
        self.method.eq_ignore_ascii_case(method)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub is_base64_encoded: bool,
    pub body: String,
}

impl ApiResponse {
    fn with_cors(status_code: u16, body: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Access-Control-Allow-Origin".to_string(), "*".to_string());
        Self {
            status_code,
            headers,
            is_base64_encoded: false,
            body,
        }
    }

    /// JSON body with CORS headers
    pub fn json<T: Serialize>(status_code: u16, payload: &T) -> Self {
        let body = serde_json::to_string(payload)
            .unwrap_or_else(|e| json!({ "error": e.to_string() }).to_string());
        let mut response = Self::with_cors(status_code, body);
        response
            .headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        response
    }

    pub fn ok<T: Serialize>(payload: &T) -> Self {
        Self::json(200, payload)
    }

    pub fn error(status_code: u16, message: impl Into<String>) -> Self {
        Self::json(status_code, &json!({ "error": message.into() }))
    }

    /// CORS preflight answer for `OPTIONS`
    pub fn preflight(methods: &str) -> Self {
        let mut response = Self::with_cors(200, String::new());
        for (key, value) in [
            ("Access-Control-Allow-Methods", methods),
            ("Access-Control-Allow-Headers", "Content-Type"),
            ("Access-Control-Max-Age", "86400"),
        ] {
            response.headers.insert(key.to_string(), value.to_string());
        }
        response
    }

    pub fn method_not_allowed() -> Self {
        Self::error(405, "Method not allowed")
    }

    pub fn not_found() -> Self {
        Self::error(404, "Not found")
    }

    /// Parse the body back to JSON
    pub fn body_json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}
