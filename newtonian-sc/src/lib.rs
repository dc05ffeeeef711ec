//! newtonian-sc: Speech input for the telescope
//!
//! Provides one listen attempt at a time:
//! - Ambient noise calibration and energy-based phrase detection
//! - Microphone capture through cpal
//! - Transcription through a speech-to-text service
//! - Wake-word gating before any text reaches the command parser

pub mod audio_capture;
pub mod config;
pub mod energy;
pub mod error;
pub mod gateway;
pub mod recognizer;
pub mod transcriber;
pub mod wake_word;

pub use audio_capture::AudioCapture;
pub use config::{CaptureConfig, TranscriptionConfig};
pub use energy::{EnergyDetector, PhraseSegmenter, SegmentEvent};
pub use error::{AudioError, RecognitionFailure};
pub use gateway::{ListenOutcome, RecognitionResult, SpeechInputGateway};
pub use recognizer::{MicrophoneRecognizer, SpeechRecognizer};
pub use transcriber::{encode_wav, Transcriber, WhisperTranscriber};
pub use wake_word::{WakeWordGate, WakeWordMatch};
