//! Remote drug-target binding affinity model.
//!
//! Inference runs behind an HTTP service; this module only speaks its wire
//! format: `POST {base_url}/predict` with `{drug, target, model}` and a
//! `{binding_score}` reply.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::BindingError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingRequest {
    pub drug: String,
    pub target: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
struct BindingReply {
    binding_score: f64,
}

#[async_trait]
pub trait BindingPredictor: Send + Sync {
    /// Predicted affinity; higher means stronger binding.
    async fn predict(&self, drug: &str, target: &str) -> Result<f64, BindingError>;
    fn model_id(&self) -> &str;
}

pub struct RemoteBindingModel {
    pub base_url: String,
    pub model: String,
    client: reqwest::Client,
}

impl RemoteBindingModel {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self, BindingError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client,
        })
    }
}

#[async_trait]
impl BindingPredictor for RemoteBindingModel {
    async fn predict(&self, drug: &str, target: &str) -> Result<f64, BindingError> {
        let url = format!("{}/predict", self.base_url);
        let body = BindingRequest {
            drug: drug.to_string(),
            target: target.to_string(),
            model: self.model.clone(),
        };
        debug!(%url, model = %self.model, "Requesting binding prediction");
        let resp = self.client.post(&url).json(&body).send().await.map_err(timeout_or_http)?;
        let status = resp.status();
        let text = resp.text().await.map_err(timeout_or_http)?;
        if !status.is_success() {
            return Err(BindingError::Api { status: status.as_u16(), message: text });
        }
        let reply: BindingReply = serde_json::from_str(&text)?;
        Ok(reply.binding_score)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

fn timeout_or_http(err: reqwest::Error) -> BindingError {
    if err.is_timeout() {
        BindingError::Timeout
    } else {
        BindingError::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = "CNN_CNN_DAVIS";

    #[test]
    fn request_wire_format() {
        let req = BindingRequest {
            drug: "CCO".into(),
            target: "MKT".into(),
            model: MODEL.into(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"drug": "CCO", "target": "MKT", "model": "CNN_CNN_DAVIS"}));
    }

    #[test]
    fn reply_ignores_extra_fields() {
        let reply: BindingReply = serde_json::from_str(r#"{"binding_score": 7.25, "units": "pKd"}"#).unwrap();
        assert_eq!(reply.binding_score, 7.25);
    }

    #[test]
    fn base_url_is_normalised() {
        let model = RemoteBindingModel::new("http://localhost:9000/", MODEL, Duration::from_secs(1)).unwrap();
        assert_eq!(model.base_url, "http://localhost:9000");
        assert_eq!(model.model_id(), "CNN_CNN_DAVIS");
    }

    #[tokio::test]
    async fn unreachable_service_is_an_error() {
        let model = RemoteBindingModel::new("http://127.0.0.1:9", MODEL, Duration::from_secs(2)).unwrap();
        assert!(model.predict("CCO", "MKT").await.is_err());
    }
}
