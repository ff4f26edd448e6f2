//! Google Translate text-to-speech client.

use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;

use babel_core::error::SpeechError;
use babel_core::traits::SpeechSynthesizer;

pub const DEFAULT_BASE_URL: &str = "https://translate.google.com";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Synthesizes speech through the public `translate_tts` endpoint and
/// returns MP3 bytes.
pub struct GoogleTtsSynthesizer {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl GoogleTtsSynthesizer {
    pub fn new(base_url: Option<String>, timeout_secs: Option<u64>) -> Self {
        let timeout_secs = timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout_secs,
            client,
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTtsSynthesizer {
    #[instrument(skip(self, text), fields(lang = %audio_code))]
    async fn synthesize(&self, text: &str, audio_code: &str) -> Result<Vec<u8>, SpeechError> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}/translate_tts", self.base_url),
            &[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", audio_code),
                ("q", text),
            ],
        )
        .map_err(|e| SpeechError::Unavailable(format!("invalid speech URL: {e}")))?;

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                SpeechError::Unavailable(format!("timed out after {}s", self.timeout_secs))
            } else {
                SpeechError::Unavailable(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let message = response.text().await.unwrap_or_default();
            return Err(SpeechError::Rejected { status, message });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::Unavailable(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn returns_audio_bytes() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .and(query_param("tl", "es"))
            .and(query_param("q", "El agua"))
            .and(query_param("client", "tw-ob"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"ID3\x04mp3".to_vec())
                    .insert_header("content-type", "audio/mpeg"),
            )
            .mount(&server)
            .await;

        let synth = GoogleTtsSynthesizer::new(Some(server.uri()), Some(5));
        let audio = synth.synthesize("El agua", "es").await.unwrap();
        assert_eq!(audio, b"ID3\x04mp3");
    }

    #[tokio::test]
    async fn rejected_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let synth = GoogleTtsSynthesizer::new(Some(format!("{}/", server.uri())), Some(5));
        let err = synth.synthesize("Hola", "es").await.unwrap_err();
        assert!(matches!(err, SpeechError::Rejected { status: 429, .. }));
    }
}
