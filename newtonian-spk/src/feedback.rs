//! Non-blocking feedback channel
//!
//! Announcements are queued on a bounded channel and rendered one at a time by a
//! single worker task. Callers never wait for rendering. When the queue is full
//! the new announcement is dropped. When the voice engine fails, the channel
//! switches permanently to the log sink.

use crate::config::{SpeechConfig, VoiceBackend, VoiceConfig};
use crate::engines::log::LogVoiceEngine;
use crate::engines::native::NativeVoiceEngine;
use crate::engines::VoiceEngine;
use crate::error::SpeechError;
use newtonian_core::Announcer;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Spoken feedback channel shared by every component.
///
/// Must be created inside a tokio runtime; the worker task is spawned on construction.
pub struct FeedbackChannel {
    sender: Mutex<Option<mpsc::Sender<String>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    degraded: Arc<AtomicBool>,
    dropped: AtomicU64,
    backend: String,
}

impl FeedbackChannel {
    /// Build a channel from configuration, selecting the voice engine.
    ///
    /// An unavailable voice engine is not an error: the channel starts degraded.
    pub fn new(config: SpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Config)?;

        let engine: Arc<dyn VoiceEngine> = if !config.enabled || config.engine == VoiceBackend::Log {
            Arc::new(LogVoiceEngine::new())
        } else {
            match NativeVoiceEngine::new_with_config(config.rate, config.volume, config.pitch) {
                Ok(engine) => Arc::new(engine),
                Err(e) => {
                    warn!("Voice engine failed to initialize: {}", e);
                    Arc::new(LogVoiceEngine::new())
                }
            }
        };

        Ok(Self::with_engine(engine, config.voice, config.queue_size))
    }

    /// Build a channel around an explicit engine.
    pub fn with_engine(engine: Arc<dyn VoiceEngine>, voice: VoiceConfig, queue_size: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<String>(queue_size.max(1));
        let degraded = Arc::new(AtomicBool::new(false));
        let backend = engine.name().to_string();

        if !engine.is_available() {
            warn!(
                "Voice engine '{}' unavailable, announcements go to the log",
                backend
            );
            degraded.store(true, Ordering::SeqCst);
        } else {
            info!("Feedback channel using '{}' voice engine", backend);
        }

        let worker_degraded = degraded.clone();
        let worker = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                if worker_degraded.load(Ordering::SeqCst) {
                    LogVoiceEngine::write(&message);
                    continue;
                }

                if let Err(e) = engine.speak(&message, &voice).await {
                    warn!("Voice engine failed, degrading to log sink: {}", e);
                    worker_degraded.store(true, Ordering::SeqCst);
                    LogVoiceEngine::write(&message);
                }
            }
            debug!("Feedback worker stopped");
        });

        Self {
            sender: Mutex::new(Some(tx)),
            worker: Mutex::new(Some(worker)),
            degraded,
            dropped: AtomicU64::new(0),
            backend,
        }
    }

    /// Queue an announcement without waiting for it to be rendered.
    pub fn announce(&self, message: &str) {
        let guard = self.sender.lock();
        let Some(sender) = guard.as_ref() else {
            // Channel already shut down
            LogVoiceEngine::write(message);
            return;
        };

        match sender.try_send(message.to_string()) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(dropped)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!("Feedback queue full, dropping announcement: {}", dropped);
            }
            Err(mpsc::error::TrySendError::Closed(message)) => {
                LogVoiceEngine::write(&message);
            }
        }
    }

    /// Stop accepting announcements and wait for queued ones to finish.
    pub async fn shutdown(&self) {
        drop(self.sender.lock().take());
        let worker = self.worker.lock().take();
        if let Some(handle) = worker {
            if let Err(e) = handle.await {
                warn!("Feedback worker ended abnormally: {}", e);
            }
        }
    }

    /// True once the channel has fallen back to the log sink.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::SeqCst)
    }

    pub fn backend_name(&self) -> &str {
        if self.is_degraded() {
            "log"
        } else {
            &self.backend
        }
    }

    /// Number of announcements dropped because the queue was full.
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Announcer for FeedbackChannel {
    fn announce(&self, message: &str) {
        FeedbackChannel::announce(self, message);
    }
}
