//! Google Speech-to-Text client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use crate::config::MarketConfig;
use crate::error::{Result, TranscriptionFailure};
use crate::voice::{AudioClip, SpeechRecognizer};

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Alternative {
    #[serde(default)]
    transcript: String,
}

/// Client for the `v1/speech:recognize` endpoint
pub struct GoogleSpeechClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    language: String,
}

impl GoogleSpeechClient {
    /// Create a new speech client
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        language: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            language: language.into(),
        })
    }

    /// Create a client from market configuration
    pub fn from_config(config: &MarketConfig) -> Result<Self> {
        Self::new(
            config.speech_api_key.clone(),
            &config.speech_base_url,
            &config.speech_language,
            config.listen_timeout,
        )
    }

    fn request_body(&self, clip: &AudioClip) -> serde_json::Value {
        let mut config = json!({
            "encoding": clip.encoding.as_str(),
            "languageCode": self.language,
        });
        if let Some(rate) = clip.sample_rate_hertz {
            config["sampleRateHertz"] = json!(rate);
        }
        json!({
            "config": config,
            "audio": { "content": clip.content_base64 },
        })
    }
}

#[async_trait]
impl SpeechRecognizer for GoogleSpeechClient {
    async fn recognize(
        &self,
        clip: &AudioClip,
    ) -> std::result::Result<String, TranscriptionFailure> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            TranscriptionFailure::Unavailable("SPEECH_API_KEY is not set".to_string())
        })?;

        let url = format!("{}/v1/speech:recognize", self.base_url);
        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&self.request_body(clip))
            .send()
            .await
            .map_err(|e| TranscriptionFailure::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TranscriptionFailure::Unavailable(format!(
                "speech service returned {}",
                response.status()
            )));
        }

        let parsed: RecognizeResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionFailure::Unavailable(e.to_string()))?;

        let transcript = parsed
            .results
            .into_iter()
            .filter_map(|r| r.alternatives.into_iter().next())
            .map(|a| a.transcript)
            .collect::<Vec<_>>()
            .join(" ");

        let transcript = transcript.trim();
        if transcript.is_empty() {
            return Err(TranscriptionFailure::Unintelligible);
        }
        Ok(transcript.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::AudioEncoding;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::Value;

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn clip() -> AudioClip {
        AudioClip {
            content_base64: "AAAA".to_string(),
            encoding: AudioEncoding::WebmOpus,
            sample_rate_hertz: Some(48_000),
        }
    }

    fn client(base: &str) -> GoogleSpeechClient {
        GoogleSpeechClient::new(Some("k".to_string()), base, "en-US", Duration::from_secs(5))
            .unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let body = client("http://localhost").request_body(&clip());
        assert_eq!(body["config"]["encoding"], "WEBM_OPUS");
        assert_eq!(body["config"]["sampleRateHertz"], 48_000);
        assert_eq!(body["config"]["languageCode"], "en-US");
        assert_eq!(body["audio"]["content"], "AAAA");
    }

    #[tokio::test]
    async fn test_transcript_returned() {
        let router = Router::new().route(
            "/v1/speech:recognize",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["audio"]["content"], "AAAA");
                Json(serde_json::json!({
                    "results": [{"alternatives": [{"transcript": "AAPL", "confidence": 0.93}]}]
                }))
            }),
        );
        let base = spawn(router).await;

        assert_eq!(client(&base).recognize(&clip()).await.unwrap(), "AAPL");
    }

    #[tokio::test]
    async fn test_empty_results_are_unintelligible() {
        let router = Router::new().route(
            "/v1/speech:recognize",
            post(|| async { Json(serde_json::json!({})) }),
        );
        let base = spawn(router).await;

        assert_eq!(
            client(&base).recognize(&clip()).await,
            Err(TranscriptionFailure::Unintelligible)
        );
    }

    #[tokio::test]
    async fn test_service_error_is_unavailable() {
        let router = Router::new().route(
            "/v1/speech:recognize",
            post(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        );
        let base = spawn(router).await;

        assert!(matches!(
            client(&base).recognize(&clip()).await,
            Err(TranscriptionFailure::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_key_is_unavailable() {
        let speech =
            GoogleSpeechClient::new(None, "http://localhost", "en-US", Duration::from_secs(1))
                .unwrap();
        assert!(matches!(
            speech.recognize(&clip()).await,
            Err(TranscriptionFailure::Unavailable(_))
        ));
    }
}
