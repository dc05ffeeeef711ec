//! Speech input gateway: one guarded listen attempt at a time

use crate::error::RecognitionFailure;
use crate::recognizer::SpeechRecognizer;
use crate::wake_word::{WakeWordGate, WakeWordMatch};
use newtonian_core::Announcer;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Text ready for the command parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub text: String,
    pub woke_up: bool,
}

/// Successful end of a listen attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenOutcome {
    /// Forward this text to the parser
    Command(RecognitionResult),
    /// The wake word alone was heard
    Acknowledged,
    /// Speech without the required wake word; nothing is forwarded
    WakeWordMissing,
}

/// Clears the busy flag when the listen attempt ends, however it ends
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct SpeechInputGateway {
    recognizer: Arc<dyn SpeechRecognizer>,
    gate: WakeWordGate,
    announcer: Arc<dyn Announcer>,
    calibration: Duration,
    busy: AtomicBool,
}

impl SpeechInputGateway {
    pub fn new(
        recognizer: Arc<dyn SpeechRecognizer>,
        gate: WakeWordGate,
        announcer: Arc<dyn Announcer>,
        calibration: Duration,
    ) -> Self {
        Self {
            recognizer,
            gate,
            announcer,
            calibration,
            busy: AtomicBool::new(false),
        }
    }

    pub fn is_listening(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Run one listen attempt.
    ///
    /// Every outcome except `Busy` and a forwarded command is announced. A second
    /// call while one is in flight returns `Busy` at once.
    pub async fn listen(
        &self,
        timeout: Duration,
        phrase_limit: Duration,
    ) -> Result<ListenOutcome, RecognitionFailure> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Listen requested while already listening");
            return Err(RecognitionFailure::Busy);
        }
        let _guard = BusyGuard(&self.busy);

        let result = self.listen_once(timeout, phrase_limit).await;
        match &result {
            Ok(ListenOutcome::Acknowledged) => self.announcer.announce("Yes? I'm listening."),
            Ok(ListenOutcome::WakeWordMissing) => self.announcer.announce(&format!(
                "Please say '{}' before your command.",
                self.gate.word()
            )),
            Ok(ListenOutcome::Command(_)) => {}
            Err(failure) => {
                info!("Listen failed: {}", failure);
                if let Some(message) = failure.announcement() {
                    self.announcer.announce(message);
                }
            }
        }
        result
    }

    async fn listen_once(
        &self,
        timeout: Duration,
        phrase_limit: Duration,
    ) -> Result<ListenOutcome, RecognitionFailure> {
        if !self.calibration.is_zero() {
            self.recognizer.calibrate(self.calibration).await?;
        }

        let text = self.recognizer.recognize(timeout, phrase_limit).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(RecognitionFailure::Unintelligible);
        }

        Ok(match self.gate.check(text) {
            WakeWordMatch::Present { rest } if rest.is_empty() => ListenOutcome::Acknowledged,
            WakeWordMatch::Present { rest } => ListenOutcome::Command(RecognitionResult {
                text: rest,
                woke_up: true,
            }),
            WakeWordMatch::Absent if self.gate.is_required() => {
                debug!("Ignoring speech without wake word: {}", text);
                ListenOutcome::WakeWordMissing
            }
            WakeWordMatch::Absent => ListenOutcome::Command(RecognitionResult {
                text: text.to_string(),
                woke_up: false,
            }),
        })
    }
}
