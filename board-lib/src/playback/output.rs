//! Audio output backends for the playback channel.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::thread;
use std::time::Duration;

use log::{error, info, warn};
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};

use super::PlaybackError;

const OUTPUT_STREAM_OPEN_RETRIES: usize = 3;
const OUTPUT_STREAM_OPEN_RETRY_MS: u64 = 100;

/// The single output channel the engine drives.
///
/// Implementations hold at most one sound. Opening a new one replaces
/// whatever was queued before.
pub trait AudioOutput {
    /// Decode `path` and queue it, paused.
    fn open(&mut self, path: &Path) -> Result<(), PlaybackError>;

    /// Start the queued sound.
    fn start(&mut self) -> Result<(), PlaybackError>;

    /// Stop and drop the queued sound.
    fn halt(&mut self);

    /// Set the linear output gain.
    fn set_gain(&mut self, gain: f32);

    /// True while the queued sound still has audio left to play.
    fn is_active(&self) -> bool;
}

/// Output through the default system device via `rodio`.
///
/// The device is opened on first use, so constructing one never fails.
pub struct RodioOutput {
    stream: Option<OutputStream>,
    sink: Option<Sink>,
    gain: f32,
}

impl RodioOutput {
    pub fn new() -> Self {
        Self {
            stream: None,
            sink: None,
            gain: 1.0,
        }
    }

    fn stream(&mut self) -> Result<&OutputStream, PlaybackError> {
        if self.stream.is_none() {
            self.stream = Some(open_output_stream_with_retry()?);
        }
        self.stream
            .as_ref()
            .ok_or_else(|| PlaybackError::Device("output stream unavailable".to_string()))
    }
}

impl Default for RodioOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioOutput for RodioOutput {
    fn open(&mut self, path: &Path) -> Result<(), PlaybackError> {
        let display = path.display().to_string();
        let file = File::open(path).map_err(|err| PlaybackError::Decode {
            path: display.clone(),
            reason: err.to_string(),
        })?;
        let source = Decoder::new(BufReader::new(file)).map_err(|err| PlaybackError::Decode {
            path: display,
            reason: err.to_string(),
        })?;

        self.halt();
        let gain = self.gain;
        let sink = Sink::connect_new(self.stream()?.mixer());
        sink.pause();
        sink.set_volume(gain);
        sink.append(source);
        self.sink = Some(sink);
        Ok(())
    }

    fn start(&mut self) -> Result<(), PlaybackError> {
        match &self.sink {
            Some(sink) => {
                sink.play();
                Ok(())
            }
            None => Err(PlaybackError::NothingLoaded),
        }
    }

    fn halt(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain.max(0.0);
        if let Some(sink) = &self.sink {
            sink.set_volume(self.gain);
        }
    }

    fn is_active(&self) -> bool {
        self.sink.as_ref().map(|sink| !sink.empty()).unwrap_or(false)
    }
}

/// Output that accepts everything and produces no sound.
///
/// Sounds end as soon as they start, so the channel returns to `Idle` on the
/// next tick. Used for headless runs.
#[derive(Debug, Default)]
pub struct SilentOutput {
    queued: bool,
}

impl AudioOutput for SilentOutput {
    fn open(&mut self, path: &Path) -> Result<(), PlaybackError> {
        info!("silent output: {}", path.display());
        self.queued = true;
        Ok(())
    }

    fn start(&mut self) -> Result<(), PlaybackError> {
        if self.queued {
            Ok(())
        } else {
            Err(PlaybackError::NothingLoaded)
        }
    }

    fn halt(&mut self) {
        self.queued = false;
    }

    fn set_gain(&mut self, _gain: f32) {}

    fn is_active(&self) -> bool {
        false
    }
}

/// Open the default output stream, retrying a few times.
fn open_output_stream_with_retry() -> Result<OutputStream, PlaybackError> {
    let mut last_error = String::new();
    for attempt in 1..=OUTPUT_STREAM_OPEN_RETRIES {
        match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => return Ok(stream),
            Err(err) => {
                warn!(
                    "open_default_stream attempt {}/{} failed: {}",
                    attempt, OUTPUT_STREAM_OPEN_RETRIES, err
                );
                last_error = err.to_string();
                if attempt < OUTPUT_STREAM_OPEN_RETRIES {
                    thread::sleep(Duration::from_millis(OUTPUT_STREAM_OPEN_RETRY_MS));
                }
            }
        }
    }
    error!(
        "failed to open default output stream after {} attempts",
        OUTPUT_STREAM_OPEN_RETRIES
    );
    Err(PlaybackError::Device(last_error))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::path::Path;
    use std::rc::Rc;

    use super::{AudioOutput, PlaybackError};

    /// Calls observed by a [`RecordingOutput`].
    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Open(String),
        Start,
        Halt,
        Gain(f32),
    }

    #[derive(Debug, Default)]
    pub struct Shared {
        pub calls: Vec<Call>,
        pub active: bool,
        pub gain: f32,
        pub fail_open: Option<PlaybackError>,
    }

    /// Fake output that records calls. Clones share state.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingOutput {
        pub shared: Rc<RefCell<Shared>>,
    }

    impl RecordingOutput {
        pub fn opened(&self) -> Vec<String> {
            self.shared
                .borrow()
                .calls
                .iter()
                .filter_map(|call| match call {
                    Call::Open(path) => Some(path.clone()),
                    _ => None,
                })
                .collect()
        }

        pub fn gain(&self) -> f32 {
            self.shared.borrow().gain
        }

        pub fn is_sounding(&self) -> bool {
            self.shared.borrow().active
        }

        /// Pretend the queued sound reached its end.
        pub fn finish(&self) {
            self.shared.borrow_mut().active = false;
        }

        pub fn fail_next_open(&self, err: PlaybackError) {
            self.shared.borrow_mut().fail_open = Some(err);
        }
    }

    impl AudioOutput for RecordingOutput {
        fn open(&mut self, path: &Path) -> Result<(), PlaybackError> {
            let mut shared = self.shared.borrow_mut();
            if let Some(err) = shared.fail_open.take() {
                return Err(err);
            }
            shared.calls.push(Call::Open(path.display().to_string()));
            shared.active = false;
            Ok(())
        }

        fn start(&mut self) -> Result<(), PlaybackError> {
            let mut shared = self.shared.borrow_mut();
            shared.calls.push(Call::Start);
            shared.active = true;
            Ok(())
        }

        fn halt(&mut self) {
            let mut shared = self.shared.borrow_mut();
            shared.calls.push(Call::Halt);
            shared.active = false;
        }

        fn set_gain(&mut self, gain: f32) {
            let mut shared = self.shared.borrow_mut();
            shared.calls.push(Call::Gain(gain));
            shared.gain = gain;
        }

        fn is_active(&self) -> bool {
            self.shared.borrow().active
        }
    }
}
