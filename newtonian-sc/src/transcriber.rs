//! Speech-to-text transcription

use crate::audio_capture::Recording;
use crate::config::TranscriptionConfig;
use crate::error::{AudioError, RecognitionFailure};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::io::Cursor;
use std::time::Duration;
use tracing::debug;

/// Turns a recorded phrase into text
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, wav: Bytes, language: &str) -> Result<String, RecognitionFailure>;
}

/// Encode mono 16-bit samples as a WAV file in memory
pub fn encode_wav(recording: &Recording) -> Result<Bytes, AudioError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: recording.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| AudioError::Format(format!("WAV header: {}", e)))?;
        for &sample in &recording.samples {
            writer
                .write_sample(sample)
                .map_err(|e| AudioError::Format(format!("WAV write: {}", e)))?;
        }
        writer
            .finalize()
            .map_err(|e| AudioError::Format(format!("WAV finalize: {}", e)))?;
    }

    Ok(Bytes::from(cursor.into_inner()))
}

/// OpenAI Whisper transcription client
pub struct WhisperTranscriber {
    client: Client,
    api_key: Option<String>,
    config: TranscriptionConfig,
}

impl WhisperTranscriber {
    pub fn new(config: TranscriptionConfig, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            config,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, wav: Bytes, language: &str) -> Result<String, RecognitionFailure> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            RecognitionFailure::ServiceError("No API key for transcription".to_string())
        })?;

        let file = Part::bytes(wav.to_vec())
            .file_name("phrase.wav")
            .mime_str("audio/wav")
            .map_err(|e| RecognitionFailure::ServiceError(e.to_string()))?;
        let form = Form::new()
            .text("model", self.config.model.clone())
            .text("language", language.to_string())
            .part("file", file);

        let url = format!(
            "{}/audio/transcriptions",
            self.config.base_url.trim_end_matches('/')
        );
        debug!("Uploading {} bytes for transcription", wav.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .multipart(form)
            .send()
            .await
            .map_err(|e| RecognitionFailure::ServiceError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(500)
                .collect();
            return Err(RecognitionFailure::ServiceError(format!(
                "HTTP {}: {}",
                status, text
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RecognitionFailure::ServiceError(e.to_string()))?;
        let text = json["text"].as_str().unwrap_or("").trim().to_string();

        if text.is_empty() {
            return Err(RecognitionFailure::Unintelligible);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_wav_header_and_length() {
        let recording = Recording {
            samples: vec![0, 1000, -1000, 32767],
            sample_rate: 16_000,
        };
        let wav = encode_wav(&recording).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        // 44-byte header plus two bytes per sample
        assert_eq!(wav.len(), 44 + 8);

        let reader = hound::WavReader::new(Cursor::new(wav.to_vec())).unwrap();
        assert_eq!(reader.spec().sample_rate, 16_000);
        let samples: Vec<i16> = reader.into_samples().map(|s| s.unwrap()).collect();
        assert_eq!(samples, recording.samples);
    }

    #[tokio::test]
    async fn test_missing_key_is_service_error() {
        let transcriber = WhisperTranscriber::new(TranscriptionConfig::default(), None);
        assert!(!transcriber.has_api_key());
        let result = transcriber.transcribe(Bytes::from_static(b"RIFF"), "en").await;
        assert!(matches!(result, Err(RecognitionFailure::ServiceError(_))));
    }
}
