//! CPAL audio output wrapper.

use crate::callback::{process_audio, return_channel, AudioCallbackState, ReturningState};
use crate::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;

#[derive(Clone, Debug, Default)]
pub struct AudioEngineConfig {
    pub output_device_index: Option<usize>,
}

/// Wrapper to hold a `cpal::Stream` in a `Send` context.
///
/// `cpal::Stream` is `!Send` on some platforms. The engine that owns it is
/// driven from one thread and the stream is only dropped there.
struct StreamHandle(#[allow(dead_code)] cpal::Stream);

// SAFETY: the stream is never accessed concurrently; it is created, kept and
// dropped by the owning `AudioEngine`.
unsafe impl Send for StreamHandle {}

pub struct AudioEngine {
    sample_rate: f64,
    channels: usize,
    output_device_index: Option<usize>,
    running: Option<Arc<crate::SharedKeyState>>,
    _stream: Option<StreamHandle>,
    home: Sender<AudioCallbackState>,
    returned: Receiver<AudioCallbackState>,
}

impl AudioEngine {
    pub fn new(config: AudioEngineConfig) -> Result<Self> {
        let device = Self::get_device(config.output_device_index)?;
        let output_config = device.default_output_config()?;
        let (home, returned) = return_channel();

        Ok(Self {
            sample_rate: output_config.sample_rate().0 as f64,
            channels: output_config.channels() as usize,
            output_device_index: config.output_device_index,
            running: None,
            _stream: None,
            home,
            returned,
        })
    }

    /// Move the callback state into a new output stream and start it.
    ///
    /// On failure the state can be taken back with [`reclaim`](Self::reclaim).
    pub fn start(&mut self, state: AudioCallbackState) -> Result<()> {
        let shared = Arc::clone(state.shared());
        let state = ReturningState::new(state, self.home.clone());
        if self.is_running() {
            return Err(Error::InvalidConfig(
                "audio stream already running".to_string(),
            ));
        }

        let device = Self::get_device(self.output_device_index)?;
        let config = device.default_output_config()?;

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => Self::build_stream::<f32>(&device, &config.into(), state)?,
            cpal::SampleFormat::I16 => Self::build_stream::<i16>(&device, &config.into(), state)?,
            cpal::SampleFormat::U16 => Self::build_stream::<u16>(&device, &config.into(), state)?,
            format => {
                return Err(Error::AudioBackendUnavailable(format!(
                    "Unsupported sample format: {:?}",
                    format
                )));
            }
        };

        stream.play()?;
        shared.running.set(true);

        self._stream = Some(StreamHandle(stream));
        self.running = Some(shared);
        Ok(())
    }

    /// Stop and drop the stream. The callback state becomes available from
    /// [`reclaim`](Self::reclaim).
    pub fn stop(&mut self) {
        self._stream = None;
        if let Some(shared) = self.running.take() {
            shared.running.set(false);
        }
    }

    /// Take back the callback state of a stream that failed or stopped.
    pub fn reclaim(&self) -> Option<AudioCallbackState> {
        self.returned.try_recv().ok()
    }

    fn get_device(index: Option<usize>) -> Result<cpal::Device> {
        let host = cpal::default_host();

        if let Some(idx) = index {
            let devices: Vec<_> = host.output_devices()?.collect();

            let device_count = devices.len();
            devices.into_iter().nth(idx).ok_or_else(|| {
                Error::AudioBackendUnavailable(format!(
                    "Output device index {} out of range (available: {})",
                    idx, device_count
                ))
            })
        } else {
            host.default_output_device().ok_or_else(|| {
                Error::AudioBackendUnavailable("No output device available".to_string())
            })
        }
    }

    fn build_stream<T>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        mut state: ReturningState,
    ) -> Result<cpal::Stream>
    where
        T: cpal::SizedSample + cpal::FromSample<f32>,
    {
        let channels = config.channels as usize;
        let silence = T::from_sample(0.0f32);

        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| match state.get_mut() {
                Some(state) => {
                    process_audio(state, data, channels, silence);
                }
                None => data.fill(silence),
            },
            |_err| {
                // Stream errors arrive on the audio thread; nothing to do here.
            },
            None,
        )?;

        Ok(stream)
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// List available output devices.
    pub fn list_output_devices() -> Result<Vec<String>> {
        let host = cpal::default_host();
        let devices: Result<Vec<String>> = host
            .output_devices()?
            .enumerate()
            .map(|(idx, device)| Ok(format!("{}: {}", idx, device.name()?)))
            .collect();
        devices
    }
}

impl Drop for AudioEngine {
    fn drop(&mut self) {
        self.stop();
    }
}
