use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Error body returned by the service for failed requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum SdkError {
    /// Transport or decoding failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("service returned {status} ({}): {}", body.code, body.message)]
    Api { status: StatusCode, body: ApiErrorBody },
}

/// Result of a settings update.
#[derive(Debug, Clone)]
pub struct UpdateResult {
    /// The validated document the service stored.
    pub document: Value,
    /// Advisory `section.field: message` lines for repaired fields.
    pub errors: Vec<String>,
}

pub struct SettingsClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl SettingsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    /// Attach the admin bearer token used for updates.
    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    /// Fetch the current settings document.
    pub async fn get_settings(&self) -> Result<Value, SdkError> {
        let resp = self
            .client
            .get(format!("{}/settings", self.base_url))
            .send()
            .await?;
        Self::json_or_error(resp).await
    }

    /// Fetch the settings schema.
    pub async fn get_schema(&self) -> Result<Value, SdkError> {
        let resp = self
            .client
            .get(format!("{}/settings/schema", self.base_url))
            .send()
            .await?;
        Self::json_or_error(resp).await
    }

    /// Submit a (possibly partial) settings document.
    pub async fn update_settings(&self, candidate: &Value) -> Result<UpdateResult, SdkError> {
        let mut req = self
            .client
            .post(format!("{}/settings", self.base_url))
            .json(candidate);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req.send().await?;

        let errors = resp
            .headers()
            .get_all("x-settings-error")
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect();
        let document = Self::json_or_error(resp).await?;

        Ok(UpdateResult { document, errors })
    }

    async fn json_or_error(resp: Response) -> Result<Value, SdkError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json().await?);
        }

        let text = resp.text().await?;
        let body = serde_json::from_str::<ApiErrorBody>(&text).unwrap_or(ApiErrorBody {
            code: "unknown".to_string(),
            message: text,
        });
        Err(SdkError::Api { status, body })
    }
}
