// Wiring of the telescope pipeline: speech in, command, mount, feedback out

use crate::settings::Settings;
use anyhow::{bail, Context, Result};
use newtonian_cmd::{Command, CommandParser, PresetTable};
use newtonian_core::{Announcer, ObserverLocation, Orientation};
use newtonian_llm::{ObjectClassifier, OpenAiClassifier};
use newtonian_mount::{AnimationDriver, ApplyOutcome, Frame, MountController, OrientationSink};
use newtonian_sc::{
    AudioCapture, MicrophoneRecognizer, SpeechInputGateway, WakeWordGate, WhisperTranscriber,
};
use newtonian_sky::{BuiltinLoader, CelestialCatalog, CelestialResolver};
use newtonian_spk::FeedbackChannel;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub const BUSY_MESSAGE: &str = "Still moving. Please wait.";

/// Prints every frame to stdout
pub struct PrintSink;

impl OrientationSink for PrintSink {
    fn show(&self, orientation: Orientation, _show_axes: bool) {
        let (az, el) = orientation.to_degrees_minutes();
        println!(
            "  Az {:>7.2}° ({})  El {:>6.2}° ({})",
            orientation.azimuth, az, orientation.elevation, el
        );
    }
}

pub struct Telescope {
    settings: Settings,
    feedback: Arc<FeedbackChannel>,
    resolver: Arc<CelestialResolver>,
    classifier: Option<Arc<dyn ObjectClassifier>>,
    parser: CommandParser,
    controller: MountController,
    driver: AnimationDriver,
}

impl Telescope {
    pub fn new(settings: Settings) -> Result<Self> {
        let feedback = Arc::new(
            FeedbackChannel::new(settings.speech.clone()).context("Failed to start feedback")?,
        );
        Self::with_feedback(settings, feedback)
    }

    /// Wire the pipeline around an existing feedback channel
    pub fn with_feedback(settings: Settings, feedback: Arc<FeedbackChannel>) -> Result<Self> {
        let announcer: Arc<dyn Announcer> = feedback.clone();

        let resolver = Arc::new(CelestialResolver::new(
            Arc::new(CelestialCatalog::default()),
            Box::new(BuiltinLoader::new(
                settings.telescope.ephemeris.elements_path.clone(),
            )),
            announcer.clone(),
        ));

        let classifier = OpenAiClassifier::from_config(&settings.telescope.ai)
            .map(|c| Arc::new(c) as Arc<dyn ObjectClassifier>);
        if classifier.is_none() {
            info!("AI disambiguation disabled");
        }

        let parser = CommandParser::new(
            PresetTable::default(),
            resolver.clone(),
            classifier.clone(),
            announcer,
        )?;

        let controller = MountController::from_config(&settings.telescope.animation);
        let driver = AnimationDriver::from_millis(settings.telescope.animation.tick_interval_ms);

        info!(
            "Telescope ready at lat {:.4}, lon {:.4} (feedback: {})",
            settings.telescope.observer.latitude,
            settings.telescope.observer.longitude,
            feedback.backend_name()
        );

        Ok(Self {
            settings,
            feedback,
            resolver,
            classifier,
            parser,
            controller,
            driver,
        })
    }

    pub fn observer(&self) -> ObserverLocation {
        self.settings.telescope.observer
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn parser(&self) -> &CommandParser {
        &self.parser
    }

    pub fn resolver(&self) -> &CelestialResolver {
        &self.resolver
    }

    pub fn classifier(&self) -> Option<&Arc<dyn ObjectClassifier>> {
        self.classifier.as_ref()
    }

    pub fn controller(&self) -> &MountController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut MountController {
        &mut self.controller
    }

    pub fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    pub fn announce(&self, message: &str) {
        self.feedback.announce(message);
    }

    /// Parse `text` and start moving the mount if it names a target.
    ///
    /// Returns `None` without parsing while the mount is still moving, so the only
    /// announcement is the request to wait.
    pub async fn handle_text(&mut self, text: &str) -> Result<Option<(Command, ApplyOutcome)>> {
        if self.controller.is_animating() {
            warn!("Mount still moving; '{}' ignored", text.trim());
            self.feedback.announce(BUSY_MESSAGE);
            return Ok(None);
        }

        let observer = self.observer();
        let command = self.parser.parse(text, &observer).await;
        let outcome = self.controller.apply(&command)?;
        Ok(Some((command, outcome)))
    }

    /// Tick until the mount is idle
    pub async fn settle(&mut self, sink: &dyn OrientationSink) -> Vec<Frame> {
        self.driver.run_until_idle(&mut self.controller, sink).await
    }

    /// Microphone gateway built from the capture and listen settings
    pub fn speech_gateway(&self) -> Result<SpeechInputGateway> {
        let telescope = &self.settings.telescope;
        let transcriber = WhisperTranscriber::new(
            self.settings.capture.transcription.clone(),
            telescope.ai.api_key.clone(),
        );
        if !transcriber.has_api_key() {
            bail!("Speech transcription needs OPENAI_API_KEY to be set");
        }

        let capture = AudioCapture::new(self.settings.capture.clone())?;
        let recognizer = MicrophoneRecognizer::new(capture, Arc::new(transcriber), &telescope.listen);
        Ok(SpeechInputGateway::new(
            Arc::new(recognizer),
            WakeWordGate::new(&telescope.wake_word),
            self.feedback.clone(),
            Duration::from_millis(telescope.listen.calibration_ms),
        ))
    }

    /// Drain pending announcements
    pub async fn shutdown(&self) {
        self.feedback.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use newtonian_spk::{SpeechError, VoiceConfig, VoiceEngine};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct SpokenLog(Mutex<Vec<String>>);

    #[async_trait]
    impl VoiceEngine for SpokenLog {
        async fn speak(&self, text: &str, _voice: &VoiceConfig) -> Result<(), SpeechError> {
            self.0.lock().push(text.to_string());
            Ok(())
        }

        fn is_available(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "spoken-log"
        }
    }

    fn telescope() -> (Telescope, Arc<SpokenLog>) {
        let spoken = Arc::new(SpokenLog::default());
        let feedback = Arc::new(FeedbackChannel::with_engine(
            spoken.clone(),
            VoiceConfig::default(),
            16,
        ));
        let mut settings = Settings::default();
        settings.telescope.ai.api_key = None;
        (Telescope::with_feedback(settings, feedback).unwrap(), spoken)
    }

    #[tokio::test]
    async fn test_text_while_moving_only_asks_to_wait() {
        let (mut telescope, spoken) = telescope();

        let first = telescope.handle_text("go to the zenith").await.unwrap();
        assert!(matches!(first, Some((_, ApplyOutcome::Started(_)))));

        let second = telescope.handle_text("show me the moon").await.unwrap();
        assert!(second.is_none());
        assert_eq!(
            telescope.controller().animator().target(),
            Orientation::new(0.0, 90.0)
        );

        telescope.shutdown().await;
        assert_eq!(
            *spoken.0.lock(),
            vec!["Pointing to the zenith.".to_string(), BUSY_MESSAGE.to_string()]
        );
    }

    #[tokio::test]
    async fn test_text_after_arrival_is_parsed() {
        let (mut telescope, spoken) = telescope();
        telescope.handle_text("zenith").await.unwrap();
        telescope.settle(&PrintSink).await;

        let next = telescope.handle_text("azimuth 90").await.unwrap();
        assert!(matches!(next, Some((_, ApplyOutcome::Started(_)))));

        telescope.shutdown().await;
        assert_eq!(spoken.0.lock().len(), 2);
        assert!(!spoken.0.lock().contains(&BUSY_MESSAGE.to_string()));
    }
}
