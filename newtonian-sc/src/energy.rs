//! Energy-based speech detection

use std::time::Duration;

/// RMS energy of i16 samples
pub fn rms(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum / samples.len() as f64).sqrt() as f32
}

/// Decides whether a chunk of audio is speech
#[derive(Debug, Clone)]
pub struct EnergyDetector {
    threshold: f32,
    min_threshold: f32,
    dynamic_ratio: f32,
}

impl EnergyDetector {
    pub fn new(min_threshold: f32, dynamic_ratio: f32) -> Self {
        Self {
            threshold: min_threshold,
            min_threshold,
            dynamic_ratio,
        }
    }

    /// Raise the threshold above measured ambient noise
    pub fn calibrate(&mut self, ambient: &[i16]) -> f32 {
        let ambient_rms = rms(ambient);
        self.threshold = self.min_threshold.max(ambient_rms * self.dynamic_ratio);
        self.threshold
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn is_speech(&self, chunk: &[i16]) -> bool {
        rms(chunk) > self.threshold
    }
}

/// What the segmenter concluded after a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentEvent {
    /// Still waiting for speech to start
    Waiting,
    /// Speech started or continues
    Recording,
    /// The phrase ended (pause or length limit); samples are ready
    Complete,
    /// Nothing was said before the timeout
    TimedOut,
}

/// Cuts one phrase out of a stream of chunks.
///
/// Time is measured in samples, so the segmenter behaves the same regardless of
/// how fast chunks arrive.
#[derive(Debug)]
pub struct PhraseSegmenter {
    detector: EnergyDetector,
    sample_rate: u32,
    timeout_samples: u64,
    phrase_limit_samples: u64,
    pause_samples: u64,
    waited: u64,
    silence: u64,
    started: bool,
    samples: Vec<i16>,
}

impl PhraseSegmenter {
    pub fn new(
        detector: EnergyDetector,
        sample_rate: u32,
        timeout: Duration,
        phrase_limit: Duration,
        pause: Duration,
    ) -> Self {
        let to_samples = |d: Duration| (d.as_secs_f64() * sample_rate as f64).round() as u64;
        Self {
            detector,
            sample_rate,
            timeout_samples: to_samples(timeout),
            phrase_limit_samples: to_samples(phrase_limit).max(1),
            pause_samples: to_samples(pause).max(1),
            waited: 0,
            silence: 0,
            started: false,
            samples: Vec::new(),
        }
    }

    pub fn push(&mut self, chunk: &[i16]) -> SegmentEvent {
        if !self.started {
            if self.detector.is_speech(chunk) {
                self.started = true;
            } else {
                self.waited += chunk.len() as u64;
                if self.waited >= self.timeout_samples {
                    return SegmentEvent::TimedOut;
                }
                return SegmentEvent::Waiting;
            }
        }

        self.samples.extend_from_slice(chunk);
        if self.detector.is_speech(chunk) {
            self.silence = 0;
        } else {
            self.silence += chunk.len() as u64;
        }

        if self.silence >= self.pause_samples
            || self.samples.len() as u64 >= self.phrase_limit_samples
        {
            return SegmentEvent::Complete;
        }
        SegmentEvent::Recording
    }

    pub fn has_started(&self) -> bool {
        self.started
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Recorded phrase, capped at the phrase limit
    pub fn into_samples(mut self) -> Vec<i16> {
        self.samples.truncate(self.phrase_limit_samples as usize);
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(len: usize, amplitude: i16) -> Vec<i16> {
        (0..len)
            .map(|i| if i % 2 == 0 { amplitude } else { -amplitude })
            .collect()
    }

    #[test]
    fn test_rms() {
        assert_eq!(rms(&[]), 0.0);
        assert!((rms(&tone(100, 1000)) - 1000.0).abs() < 1e-3);
    }

    #[test]
    fn test_calibration_never_below_minimum() {
        let mut detector = EnergyDetector::new(300.0, 1.5);
        assert_eq!(detector.calibrate(&tone(100, 10)), 300.0);
        assert!((detector.calibrate(&tone(100, 1000)) - 1500.0).abs() < 1e-2);
        assert!(!detector.is_speech(&tone(100, 1200)));
        assert!(detector.is_speech(&tone(100, 2000)));
    }

    fn segmenter() -> PhraseSegmenter {
        // 1000 Hz keeps the numbers readable: 1 chunk of 100 samples = 0.1 s
        PhraseSegmenter::new(
            EnergyDetector::new(300.0, 1.5),
            1000,
            Duration::from_millis(500),
            Duration::from_secs(2),
            Duration::from_millis(300),
        )
    }

    #[test]
    fn test_times_out_without_speech() {
        let mut seg = segmenter();
        for _ in 0..4 {
            assert_eq!(seg.push(&tone(100, 10)), SegmentEvent::Waiting);
        }
        assert_eq!(seg.push(&tone(100, 10)), SegmentEvent::TimedOut);
        assert!(!seg.has_started());
    }

    #[test]
    fn test_phrase_ends_after_pause() {
        let mut seg = segmenter();
        assert_eq!(seg.push(&tone(100, 10)), SegmentEvent::Waiting);
        assert_eq!(seg.push(&tone(100, 5000)), SegmentEvent::Recording);
        assert_eq!(seg.push(&tone(100, 5000)), SegmentEvent::Recording);
        assert_eq!(seg.push(&tone(100, 10)), SegmentEvent::Recording);
        assert_eq!(seg.push(&tone(100, 10)), SegmentEvent::Recording);
        assert_eq!(seg.push(&tone(100, 10)), SegmentEvent::Complete);
        assert_eq!(seg.into_samples().len(), 500);
    }

    #[test]
    fn test_phrase_limit_caps_recording() {
        let mut seg = segmenter();
        let mut event = SegmentEvent::Waiting;
        for _ in 0..30 {
            event = seg.push(&tone(100, 5000));
            if event == SegmentEvent::Complete {
                break;
            }
        }
        assert_eq!(event, SegmentEvent::Complete);
        assert_eq!(seg.into_samples().len(), 2000);
    }
}
