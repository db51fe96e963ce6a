//! Voice shortcut for entering a ticker
//!
//! A short audio clip is handed to a [`SpeechRecognizer`]. The call is bounded
//! by a timeout and can be cancelled; the result is always a [`VoiceOutcome`],
//! never an error.

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tokio::sync::watch;

use crate::error::TranscriptionFailure;

/// Container format of a captured clip
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioEncoding {
    /// What browsers produce through MediaRecorder
    #[default]
    WebmOpus,
    OggOpus,
    Flac,
    Linear16,
}

impl AudioEncoding {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WebmOpus => "WEBM_OPUS",
            Self::OggOpus => "OGG_OPUS",
            Self::Flac => "FLAC",
            Self::Linear16 => "LINEAR16",
        }
    }
}

/// Base64-encoded audio captured within a bounded listen window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioClip {
    pub content_base64: String,
    #[serde(default)]
    pub encoding: AudioEncoding,
    #[serde(default)]
    pub sample_rate_hertz: Option<u32>,
}

/// Turns audio into text
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn recognize(&self, clip: &AudioClip) -> Result<String, TranscriptionFailure>;
}

/// Result of a voice capture
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VoiceOutcome {
    Recognized {
        transcript: String,
        ticker: Option<String>,
    },
    Unintelligible,
    Unavailable {
        reason: String,
    },
    Cancelled,
}

impl VoiceOutcome {
    /// Ticker to use, if the transcript produced one
    pub fn ticker(&self) -> Option<&str> {
        match self {
            Self::Recognized { ticker, .. } => ticker.as_deref(),
            _ => None,
        }
    }

    /// Text shown to the user
    pub fn message(&self) -> String {
        match self {
            Self::Recognized { transcript, .. } => format!("You said: {transcript}"),
            Self::Unintelligible => "Could not understand speech".to_string(),
            Self::Unavailable { .. } => "Error with Speech Recognition service".to_string(),
            Self::Cancelled => "Voice input cancelled".to_string(),
        }
    }
}

impl From<TranscriptionFailure> for VoiceOutcome {
    fn from(failure: TranscriptionFailure) -> Self {
        match failure {
            TranscriptionFailure::Unintelligible => Self::Unintelligible,
            TranscriptionFailure::Unavailable(reason) => Self::Unavailable { reason },
        }
    }
}

/// Cooperative cancellation flag shared between a caller and a capture
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self { tx: Arc::new(tx), rx }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once [`cancel`](Self::cancel) has been called
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        // the sender lives as long as self, so this only returns on cancel
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Timeout-bounded wrapper around a [`SpeechRecognizer`]
#[derive(Clone)]
pub struct VoiceCapture {
    recognizer: Arc<dyn SpeechRecognizer>,
    timeout: Duration,
}

impl VoiceCapture {
    pub fn new(recognizer: Arc<dyn SpeechRecognizer>, timeout: Duration) -> Self {
        Self {
            recognizer,
            timeout,
        }
    }

    /// Transcribe a clip, giving up after the configured timeout
    pub async fn listen(&self, clip: &AudioClip) -> VoiceOutcome {
        self.listen_until(clip, &CancelToken::new()).await
    }

    /// Transcribe a clip unless `cancel` fires first
    pub async fn listen_until(&self, clip: &AudioClip, cancel: &CancelToken) -> VoiceOutcome {
        if cancel.is_cancelled() {
            return VoiceOutcome::Cancelled;
        }

        let outcome = tokio::select! {
            () = cancel.cancelled() => VoiceOutcome::Cancelled,
            result = tokio::time::timeout(self.timeout, self.recognizer.recognize(clip)) => {
                match result {
                    Ok(Ok(transcript)) => VoiceOutcome::Recognized {
                        ticker: ticker_from_transcript(&transcript),
                        transcript,
                    },
                    Ok(Err(failure)) => failure.into(),
                    Err(_) => VoiceOutcome::Unavailable {
                        reason: format!(
                            "no transcript within {}ms",
                            self.timeout.as_millis()
                        ),
                    },
                }
            }
        };

        match &outcome {
            VoiceOutcome::Recognized { transcript, ticker } => {
                tracing::info!(transcript, ticker = ?ticker, "voice input recognized");
            }
            other => tracing::warn!(outcome = ?other, "voice input failed"),
        }

        outcome
    }
}

static SPOKEN_DOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(dot|point)\b").unwrap_or_else(|e| panic!("invalid regex: {e}"))
});

static NOT_TICKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^A-Z0-9.\-^=]").unwrap_or_else(|e| panic!("invalid regex: {e}"))
});

/// Normalize a transcript into a ticker symbol.
///
/// Spoken "dot" becomes `.`, whitespace and punctuation go, the rest is
/// upper-cased: `"reliance dot ns"` → `RELIANCE.NS`, `"a a p l"` → `AAPL`.
pub fn ticker_from_transcript(transcript: &str) -> Option<String> {
    let dotted = SPOKEN_DOT.replace_all(transcript, ".");
    let upper = dotted.to_uppercase();
    let ticker = NOT_TICKER.replace_all(&upper, "");
    let ticker = ticker.trim_matches('.');

    (!ticker.is_empty()).then(|| ticker.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowRecognizer(Duration);

    #[async_trait]
    impl SpeechRecognizer for SlowRecognizer {
        async fn recognize(&self, _clip: &AudioClip) -> Result<String, TranscriptionFailure> {
            tokio::time::sleep(self.0).await;
            Ok("too late".to_string())
        }
    }

    fn clip() -> AudioClip {
        AudioClip {
            content_base64: "AAAA".to_string(),
            encoding: AudioEncoding::WebmOpus,
            sample_rate_hertz: None,
        }
    }

    #[test]
    fn test_ticker_from_transcript() {
        assert_eq!(ticker_from_transcript("aapl").as_deref(), Some("AAPL"));
        assert_eq!(ticker_from_transcript("A A P L").as_deref(), Some("AAPL"));
        assert_eq!(
            ticker_from_transcript("reliance dot NS").as_deref(),
            Some("RELIANCE.NS")
        );
        assert_eq!(ticker_from_transcript("Tesla.").as_deref(), Some("TESLA"));
        assert_eq!(ticker_from_transcript("  ...  "), None);
    }

    #[tokio::test]
    async fn test_recognized_transcript() {
        let mut mock = MockSpeechRecognizer::new();
        mock.expect_recognize()
            .times(1)
            .returning(|_| Ok("msft".to_string()));

        let capture = VoiceCapture::new(Arc::new(mock), Duration::from_secs(1));
        let outcome = capture.listen(&clip()).await;

        assert_eq!(outcome.ticker(), Some("MSFT"));
        assert_eq!(outcome.message(), "You said: msft");
    }

    #[tokio::test]
    async fn test_failures_map_to_outcomes() {
        let mut mock = MockSpeechRecognizer::new();
        mock.expect_recognize()
            .times(1)
            .returning(|_| Err(TranscriptionFailure::Unintelligible));
        let capture = VoiceCapture::new(Arc::new(mock), Duration::from_secs(1));
        assert_eq!(capture.listen(&clip()).await, VoiceOutcome::Unintelligible);

        let mut mock = MockSpeechRecognizer::new();
        mock.expect_recognize()
            .times(1)
            .returning(|_| Err(TranscriptionFailure::Unavailable("503".to_string())));
        let capture = VoiceCapture::new(Arc::new(mock), Duration::from_secs(1));
        let outcome = capture.listen(&clip()).await;
        assert_eq!(
            outcome,
            VoiceOutcome::Unavailable {
                reason: "503".to_string()
            }
        );
        assert_eq!(outcome.message(), "Error with Speech Recognition service");
    }

    #[tokio::test]
    async fn test_timeout_is_unavailable() {
        let capture = VoiceCapture::new(
            Arc::new(SlowRecognizer(Duration::from_secs(5))),
            Duration::from_millis(20),
        );
        let outcome = capture.listen(&clip()).await;
        assert!(matches!(outcome, VoiceOutcome::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_cancel_stops_capture() {
        let capture = VoiceCapture::new(
            Arc::new(SlowRecognizer(Duration::from_secs(5))),
            Duration::from_secs(10),
        );
        let cancel = CancelToken::new();
        let trigger = cancel.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        assert_eq!(capture.listen_until(&clip(), &cancel).await, VoiceOutcome::Cancelled);
    }

    #[test]
    fn test_already_cancelled_returns_immediately() {
        let mock = MockSpeechRecognizer::new();
        let capture = VoiceCapture::new(Arc::new(mock), Duration::from_secs(1));
        let cancel = CancelToken::new();
        cancel.cancel();

        let outcome = tokio_test::block_on(capture.listen_until(&clip(), &cancel));
        assert_eq!(outcome, VoiceOutcome::Cancelled);
    }

    #[test]
    fn test_outcome_json_shape() {
        let json = serde_json::to_value(VoiceOutcome::Recognized {
            transcript: "aapl".to_string(),
            ticker: Some("AAPL".to_string()),
        })
        .unwrap();
        assert_eq!(json["status"], "recognized");
        assert_eq!(json["ticker"], "AAPL");
    }
}
