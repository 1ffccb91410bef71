use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::error::ApiError;

/// Blocking HTTP client for the TestRail REST API (`index.php?/api/v2/...`).
///
/// Every call is synchronous and sequential; the reporting pipeline blocks
/// on each response. Authentication is HTTP basic with the account email
/// and password (or API key).
pub struct TestRailClient {
    base_url: String,
    user: String,
    password: String,
    http: reqwest::blocking::Client,
}

impl TestRailClient {
    pub fn new(base_url: &str, user: &str, password: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            user: user.to_string(),
            password: password.to_string(),
            http: reqwest::blocking::Client::new(),
        }
    }

    fn endpoint(&self, uri: &str) -> String {
        format!("{}/index.php?/api/v2/{}", self.base_url, uri)
    }

    /// GET a raw JSON value from the API.
    pub fn send_get(&self, uri: &str) -> Result<Value, ApiError> {
        let url = self.endpoint(uri);
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.user, Some(&self.password))
            .header("Content-Type", "application/json")
            .send()
            .map_err(|e| ApiError::Http {
                uri: uri.to_string(),
                source: e,
            })?;

        self.read_json(uri, response)
    }

    /// POST a JSON payload and return the raw JSON response.
    pub fn send_post<T: Serialize>(&self, uri: &str, data: &T) -> Result<Value, ApiError> {
        let url = self.endpoint(uri);
        let body = serde_json::to_value(data).map_err(|e| ApiError::JsonSerialize {
            context: uri.to_string(),
            source: e,
        })?;

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.user, Some(&self.password))
            .json(&body)
            .send()
            .map_err(|e| ApiError::Http {
                uri: uri.to_string(),
                source: e,
            })?;

        self.read_json(uri, response)
    }

    /// Typed GET: deserialize the response into `T`.
    pub fn get_typed<T: DeserializeOwned>(&self, uri: &str) -> Result<T, ApiError> {
        let value = self.send_get(uri)?;
        serde_json::from_value(value).map_err(|e| ApiError::JsonParse {
            context: uri.to_string(),
            source: e,
        })
    }

    /// Typed POST: serialize `data`, deserialize the response into `T`.
    pub fn post_typed<D: Serialize, T: DeserializeOwned>(
        &self,
        uri: &str,
        data: &D,
    ) -> Result<T, ApiError> {
        let value = self.send_post(uri, data)?;
        serde_json::from_value(value).map_err(|e| ApiError::JsonParse {
            context: uri.to_string(),
            source: e,
        })
    }

    fn read_json(&self, uri: &str, response: reqwest::blocking::Response) -> Result<Value, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ApiError::Backend {
                uri: uri.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        // Some write endpoints (close, delete) return an empty body
        let text = response.text().map_err(|e| ApiError::Http {
            uri: uri.to_string(),
            source: e,
        })?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| ApiError::JsonParse {
            context: uri.to_string(),
            source: e,
        })
    }
}
