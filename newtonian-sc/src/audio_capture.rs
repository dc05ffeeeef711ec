//! Audio capture from the system microphone
//!
//! cpal streams are not `Send`, so every capture opens the device, builds the
//! stream, and drops it on the calling thread. Callers run these methods on a
//! blocking worker thread.

use crate::config::CaptureConfig;
use crate::energy::{PhraseSegmenter, SegmentEvent};
use crate::error::AudioError;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Host, SampleFormat, Stream, StreamConfig};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

const MAX_SAMPLES_PER_CHUNK: usize = 200_000;
/// Roughly two seconds of 10 ms device callbacks
const CHUNK_QUEUE_CAPACITY: usize = 200;
const MAX_DEVICES_TO_CHECK: usize = 100;

/// Mono i16 samples at the device's native rate
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

/// Microphone capture
pub struct AudioCapture {
    config: CaptureConfig,
}

struct OpenStream {
    _stream: Stream,
    receiver: Receiver<Vec<i16>>,
    sample_rate: u32,
}

impl AudioCapture {
    pub fn new(config: CaptureConfig) -> Result<Self, AudioError> {
        config.validate().map_err(AudioError::Config)?;
        Ok(Self { config })
    }

    /// Record ambient noise for `duration`
    pub fn sample_ambient(&self, duration: Duration) -> Result<Recording, AudioError> {
        let open = self.open()?;
        let deadline = Instant::now() + duration;
        let mut samples = Vec::new();

        while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
            match open.receiver.recv_timeout(remaining) {
                Ok(chunk) => samples.extend_from_slice(&chunk),
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(AudioError::Capture("Audio stream stopped".to_string()))
                }
            }
        }

        debug!("Sampled {} ambient samples", samples.len());
        Ok(Recording {
            samples,
            sample_rate: open.sample_rate,
        })
    }

    /// Record one phrase. `make_segmenter` receives the device sample rate.
    ///
    /// Returns `Ok(None)` when nothing was said before the segmenter timed out.
    pub fn capture_phrase<F>(&self, make_segmenter: F) -> Result<Option<Recording>, AudioError>
    where
        F: FnOnce(u32) -> PhraseSegmenter,
    {
        let open = self.open()?;
        let mut segmenter = make_segmenter(open.sample_rate);

        loop {
            let chunk = match open.receiver.recv_timeout(Duration::from_secs(2)) {
                Ok(chunk) => chunk,
                Err(RecvTimeoutError::Timeout) => {
                    return Err(AudioError::Capture("Microphone stopped delivering audio".to_string()))
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(AudioError::Capture("Audio stream stopped".to_string()))
                }
            };

            match segmenter.push(&chunk) {
                SegmentEvent::Waiting | SegmentEvent::Recording => continue,
                SegmentEvent::TimedOut => return Ok(None),
                SegmentEvent::Complete => {
                    let sample_rate = segmenter.sample_rate();
                    let samples = segmenter.into_samples();
                    info!("Captured phrase of {} samples", samples.len());
                    return Ok(Some(Recording {
                        samples,
                        sample_rate,
                    }));
                }
            }
        }
    }

    fn open(&self) -> Result<OpenStream, AudioError> {
        let host = cpal::default_host();
        let device = match self.config.device_name {
            Some(ref name) => Self::find_device_by_name(&host, name)?
                .ok_or_else(|| AudioError::Device(format!("Input device '{}' not found", name)))?,
            None => host
                .default_input_device()
                .ok_or_else(|| AudioError::Device("No input device available".to_string()))?,
        };

        let supported = device
            .default_input_config()
            .map_err(|e| AudioError::Device(format!("Failed to get input config: {}", e)))?;
        let sample_format = supported.sample_format();
        let stream_config: StreamConfig = supported.config();
        let channels = stream_config.channels.max(1) as usize;
        let sample_rate = stream_config.sample_rate.0;

        let (tx, rx) = bounded::<Vec<i16>>(CHUNK_QUEUE_CAPACITY);
        let err_fn = |err: cpal::StreamError| error!("Audio stream error: {}", err);

        let stream = match sample_format {
            SampleFormat::F32 => device.build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let mono = downmix(data, channels, |s| {
                        let s = if s.is_finite() { s } else { 0.0 };
                        (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
                    });
                    forward(&tx, mono);
                },
                err_fn,
                None,
            ),
            SampleFormat::I16 => device.build_input_stream(
                &stream_config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    forward(&tx, downmix(data, channels, |s| s));
                },
                err_fn,
                None,
            ),
            SampleFormat::U16 => device.build_input_stream(
                &stream_config,
                move |data: &[u16], _: &cpal::InputCallbackInfo| {
                    forward(&tx, downmix(data, channels, |s| (s as i32 - 32_768) as i16));
                },
                err_fn,
                None,
            ),
            other => {
                return Err(AudioError::Format(format!(
                    "Unsupported sample format: {:?}",
                    other
                )))
            }
        }
        .map_err(|e| AudioError::Capture(format!("Failed to build stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| AudioError::Capture(format!("Failed to start stream: {}", e)))?;

        debug!(
            "Input stream open: {} Hz, {} channel(s), {:?}",
            sample_rate, channels, sample_format
        );

        Ok(OpenStream {
            _stream: stream,
            receiver: rx,
            sample_rate,
        })
    }

    fn find_device_by_name(host: &Host, name: &str) -> Result<Option<Device>, AudioError> {
        let devices = host
            .input_devices()
            .map_err(|e| AudioError::Device(format!("Failed to enumerate devices: {}", e)))?;

        for device in devices.take(MAX_DEVICES_TO_CHECK) {
            if let Ok(device_name) = device.name() {
                if device_name == name || device_name.contains(name) {
                    return Ok(Some(device));
                }
            }
        }

        warn!("No input device matching '{}'", name);
        Ok(None)
    }
}

/// Hand a chunk to the consumer; a full queue drops it
fn forward(tx: &Sender<Vec<i16>>, chunk: Vec<i16>) -> bool {
    match tx.try_send(chunk) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            debug!("Audio buffer full, dropping samples");
            false
        }
        Err(TrySendError::Disconnected(_)) => false,
    }
}

/// Average interleaved frames down to one channel
fn downmix<T: Copy>(data: &[T], channels: usize, convert: impl Fn(T) -> i16) -> Vec<i16> {
    let data = if data.len() > MAX_SAMPLES_PER_CHUNK {
        &data[..MAX_SAMPLES_PER_CHUNK]
    } else {
        data
    };

    if channels <= 1 {
        return data.iter().map(|&s| convert(s)).collect();
    }

    data.chunks(channels)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| convert(s) as i32).sum();
            (sum / frame.len() as i32) as i16
        })
        .collect()
}
