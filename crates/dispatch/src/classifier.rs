//! The external NLP intent classifier, seen from this side of the fence.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{DispatchError, Result};

/// Maps an utterance to either conversational text or an encoded operation
/// token (`REQUEST~...`). The real matcher lives in a separate service.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(&self, utterance: &str) -> Result<String>;
}

#[derive(Deserialize)]
struct ClassifierReply {
    reply: String,
}

/// HTTP adapter for the classifier service: POST `{"query": ...}`, read
/// back `{"reply": ...}`.
pub struct HttpClassifier {
    http: reqwest::Client,
    url: String,
}

impl HttpClassifier {
    pub fn new(url: impl Into<String>, timeout: std::time::Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| DispatchError::Classifier(err.to_string()))?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait]
impl IntentClassifier for HttpClassifier {
    async fn classify(&self, utterance: &str) -> Result<String> {
        let response = self
            .http
            .post(&self.url)
            .json(&serde_json::json!({ "query": utterance }))
            .send()
            .await
            .map_err(|err| DispatchError::Classifier(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Classifier(format!(
                "classifier returned {status}"
            )));
        }

        let reply: ClassifierReply = response
            .json()
            .await
            .map_err(|err| DispatchError::Classifier(err.to_string()))?;
        Ok(reply.reply)
    }
}
