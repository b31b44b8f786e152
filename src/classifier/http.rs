use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;

use crate::models::{EmotionLabel, UnknownEmotion};

use super::{ClassifyError, EmotionClassifier, FaceImage};

#[derive(Debug, Deserialize)]
struct EmotionResponse {
    emotion: String,
}

/// Posts face crops as `multipart/form-data` (field `image`) and reads
/// `{"emotion": "<label>"}` back.
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    client: reqwest::Client,
    url: String,
}

impl HttpClassifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build classifier http client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl EmotionClassifier for HttpClassifier {
    async fn classify(&self, face: FaceImage) -> Result<EmotionLabel, ClassifyError> {
        let part = Part::bytes(face.jpeg)
            .file_name("face.jpg")
            .mime_str("image/jpeg")?;
        let form = Form::new().part("image", part);

        let response = self.client.post(&self.url).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClassifyError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let parsed: EmotionResponse = serde_json::from_slice(&body)
            .map_err(|err| ClassifyError::Malformed(err.to_string()))?;

        parsed
            .emotion
            .parse()
            .map_err(|err: UnknownEmotion| ClassifyError::Unrecognized(err.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn face() -> FaceImage {
        FaceImage {
            jpeg: b"not-really-a-jpeg".to_vec(),
        }
    }

    async fn classifier_for(server: &MockServer) -> HttpClassifier {
        HttpClassifier::new(format!("{}/emotion", server.uri()), Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn posts_multipart_image_and_parses_label() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emotion"))
            .and(body_string_contains("name=\"image\""))
            .and(body_string_contains("filename=\"face.jpg\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "emotion": "sad" })))
            .expect(1)
            .mount(&server)
            .await;

        let label = classifier_for(&server).await.classify(face()).await.unwrap();
        assert_eq!(label, EmotionLabel::Sad);
    }

    #[tokio::test]
    async fn non_success_status_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = classifier_for(&server).await.classify(face()).await.unwrap_err();
        assert!(matches!(err, ClassifyError::Status(500)));
    }

    #[tokio::test]
    async fn body_without_emotion_field_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "mood": "sad" })))
            .mount(&server)
            .await;

        let err = classifier_for(&server).await.classify(face()).await.unwrap_err();
        assert!(matches!(err, ClassifyError::Malformed(_)));
    }

    #[tokio::test]
    async fn backend_fallback_label_is_unrecognized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "emotion": "unknown" })))
            .mount(&server)
            .await;

        let err = classifier_for(&server).await.classify(face()).await.unwrap_err();
        assert!(matches!(err, ClassifyError::Unrecognized(ref label) if label == "unknown"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_failure() {
        // nothing listens on port 9 (discard) in the test environment
        let classifier =
            HttpClassifier::new("http://127.0.0.1:9/emotion", Duration::from_secs(2)).unwrap();
        let err = classifier.classify(face()).await.unwrap_err();
        assert!(matches!(err, ClassifyError::Transport(_)));
    }
}
