//! Blocking HTTP client for the flow measure admin API.

use anyhow::Result;
use serde_json::Value;

pub struct FlowApiClient {
    base_url: String,
    token: String,
    http: reqwest::blocking::Client,
}

impl FlowApiClient {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            http: reqwest::blocking::Client::new(),
        }
    }

    pub fn post(&self, path: &str, body: &Value) -> Result<Value> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .json(body)
            .send()?;

        let status = response.status();
        let payload: Value = response.json()?;
        if !status.is_success() {
            anyhow::bail!("{} returned {}: {}", path, status, payload);
        }
        Ok(payload)
    }

    pub fn get(&self, path: &str) -> Result<Value> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .send()?;

        let status = response.status();
        let payload: Value = response.json()?;
        if !status.is_success() {
            anyhow::bail!("{} returned {}: {}", path, status, payload);
        }
        Ok(payload)
    }
}
