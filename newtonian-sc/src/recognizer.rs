//! Speech recognizers

use crate::audio_capture::{AudioCapture, Recording};
use crate::energy::{EnergyDetector, PhraseSegmenter};
use crate::error::{AudioError, RecognitionFailure};
use crate::transcriber::{encode_wav, Transcriber};
use async_trait::async_trait;
use newtonian_core::ListenConfig;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Source of transcribed speech
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Measure ambient noise so that speech detection adapts to the room
    async fn calibrate(&self, duration: Duration) -> Result<(), RecognitionFailure>;

    /// Wait up to `timeout` for speech, record at most `phrase_limit`, and
    /// return the transcript
    async fn recognize(
        &self,
        timeout: Duration,
        phrase_limit: Duration,
    ) -> Result<String, RecognitionFailure>;
}

/// Microphone capture plus a transcription service
pub struct MicrophoneRecognizer {
    capture: Arc<AudioCapture>,
    detector: Arc<Mutex<EnergyDetector>>,
    transcriber: Arc<dyn Transcriber>,
    pause: Duration,
    language: String,
}

impl MicrophoneRecognizer {
    pub fn new(
        capture: AudioCapture,
        transcriber: Arc<dyn Transcriber>,
        listen: &ListenConfig,
    ) -> Self {
        Self {
            capture: Arc::new(capture),
            detector: Arc::new(Mutex::new(EnergyDetector::new(
                listen.min_energy_threshold,
                listen.dynamic_energy_ratio,
            ))),
            transcriber,
            pause: Duration::from_millis(listen.pause_threshold_ms),
            language: listen.language.clone(),
        }
    }

    pub fn energy_threshold(&self) -> f32 {
        self.detector.lock().threshold()
    }
}

async fn run_blocking<T, F>(task: F) -> Result<T, RecognitionFailure>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, AudioError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| RecognitionFailure::MicError(format!("Capture task failed: {}", e)))?
        .map_err(RecognitionFailure::from)
}

#[async_trait]
impl SpeechRecognizer for MicrophoneRecognizer {
    async fn calibrate(&self, duration: Duration) -> Result<(), RecognitionFailure> {
        let capture = self.capture.clone();
        let ambient: Recording = run_blocking(move || capture.sample_ambient(duration)).await?;
        let threshold = self.detector.lock().calibrate(&ambient.samples);
        debug!("Energy threshold calibrated to {:.1}", threshold);
        Ok(())
    }

    async fn recognize(
        &self,
        timeout: Duration,
        phrase_limit: Duration,
    ) -> Result<String, RecognitionFailure> {
        let capture = self.capture.clone();
        let detector = self.detector.lock().clone();
        let pause = self.pause;

        let recording = run_blocking(move || {
            capture.capture_phrase(|rate| {
                PhraseSegmenter::new(detector, rate, timeout, phrase_limit, pause)
            })
        })
        .await?
        .ok_or(RecognitionFailure::NoSpeech)?;

        let wav = encode_wav(&recording)?;
        let text = self.transcriber.transcribe(wav, &self.language).await?;
        info!("Recognized: {}", text);
        Ok(text)
    }
}
