//! Single-channel playback controller.
//!
//! One sound is audible at a time. The channel moves through
//! `Idle -> Loaded -> Playing -> FadingOut -> Idle`. Every load/play/preview
//! request is serialized: if something is audible when a request arrives, the
//! old sound is faded out over a short supersede fade first and the request
//! runs when that fade completes. A newer request always cancels any fade or
//! preview cut scheduled by an older one.
//!
//! Nothing here sleeps. Timed transitions are sampled by [`PlaybackEngine::tick`],
//! which the caller's event loop invokes regularly.

use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use log::{debug, info, warn};

use crate::tools::clock::{Clock, SystemClock};

mod error;
mod fade;
mod output;

pub use error::PlaybackError;
pub use fade::FadeToken;
pub use output::{AudioOutput, RodioOutput, SilentOutput};

#[cfg(test)]
pub(crate) use output::testing;

use fade::{Fade, ScheduledCut};

/// Default preview length before the automatic fade.
pub const PREVIEW_MS: u64 = 450;
/// Default preview fade length.
pub const PREVIEW_FADE_MS: u64 = 120;
/// Fade applied to an audible sound that a newer request replaces.
pub const SUPERSEDE_FADE_MS: u64 = 60;

/// Channel phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loaded,
    Playing,
    FadingOut,
}

/// Runtime snapshot of the channel. Not persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub loaded_path: Option<String>,
    pub phase: Phase,
    pub volume: f32,
}

#[derive(Debug, Clone, PartialEq)]
enum Request {
    Load(String),
    Play(String),
    Preview {
        path: String,
        duration: Duration,
        fade: Duration,
    },
}

impl Request {
    fn path(&self) -> &str {
        match self {
            Request::Load(path) | Request::Play(path) => path,
            Request::Preview { path, .. } => path,
        }
    }
}

/// What a fade does once it reaches silence.
#[derive(Debug, Clone, PartialEq)]
enum AfterFade {
    Idle,
    Run(Request),
}

pub struct PlaybackEngine {
    output: Box<dyn AudioOutput>,
    clock: Rc<dyn Clock>,
    phase: Phase,
    loaded_path: Option<String>,
    volume: f32,
    fade_factor: f32,
    fade: Option<Fade<AfterFade>>,
    cut: Option<ScheduledCut>,
    next_token_id: u64,
    supersede_fade: Duration,
}

impl PlaybackEngine {
    /// Create an idle engine driving `output` on the wall clock.
    pub fn new(output: Box<dyn AudioOutput>) -> Self {
        Self::with_clock(output, Rc::new(SystemClock))
    }

    pub fn with_clock(output: Box<dyn AudioOutput>, clock: Rc<dyn Clock>) -> Self {
        Self {
            output,
            clock,
            phase: Phase::Idle,
            loaded_path: None,
            volume: 1.0,
            fade_factor: 1.0,
            fade: None,
            cut: None,
            next_token_id: 0,
            supersede_fade: Duration::from_millis(SUPERSEDE_FADE_MS),
        }
    }

    /// Configure the fade applied to a sound replaced by a newer request.
    pub fn set_supersede_fade_ms(&mut self, ms: u64) {
        self.supersede_fade = Duration::from_millis(ms);
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn loaded_path(&self) -> Option<&str> {
        self.loaded_path.as_deref()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            loaded_path: self.loaded_path.clone(),
            phase: self.phase,
            volume: self.volume,
        }
    }

    /// Token of the fade or preview cut currently scheduled, if any.
    pub fn pending_fade(&self) -> Option<FadeToken> {
        self.fade
            .as_ref()
            .map(|fade| fade.token.clone())
            .or_else(|| self.cut.as_ref().map(|cut| cut.token.clone()))
    }

    /// Load `path` without starting it.
    ///
    /// When a sound is audible the load is deferred behind the supersede fade
    /// and the phase reads `FadingOut` until it runs.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::AssetNotFound`] when `path` does not exist; the channel
    /// is left as it was. Device or decode failures leave it `Idle`.
    pub fn load(&mut self, path: &str) -> Result<(), PlaybackError> {
        check_exists(path)?;
        self.request(Request::Load(path.to_string()))
    }

    /// Start the loaded sound.
    ///
    /// `Loaded -> Playing`. Already playing is a no-op. While a supersede fade
    /// is pending the queued request is upgraded to start once it loads; while
    /// a stop fade is running the fade is cancelled and the sound resumes at
    /// full gain.
    pub fn play(&mut self) -> Result<(), PlaybackError> {
        match self.phase {
            Phase::Playing => Ok(()),
            Phase::Loaded => self.start_loaded(),
            Phase::Idle => Err(PlaybackError::NothingLoaded),
            Phase::FadingOut => {
                let resume = match self.fade.as_mut() {
                    None => return Err(PlaybackError::NothingLoaded),
                    Some(fade) => match &mut fade.then {
                        AfterFade::Run(request) => {
                            if let Request::Load(path) = request {
                                let path = std::mem::take(path);
                                *request = Request::Play(path);
                            }
                            false
                        }
                        AfterFade::Idle => true,
                    },
                };
                if resume {
                    if let Some(fade) = self.fade.take() {
                        fade.token.cancel();
                    }
                    self.fade_factor = 1.0;
                    self.apply_gain();
                    self.phase = Phase::Playing;
                }
                Ok(())
            }
        }
    }

    /// Load `path` and start it as soon as the channel is free.
    pub fn play_file(&mut self, path: &str) -> Result<(), PlaybackError> {
        check_exists(path)?;
        self.request(Request::Play(path.to_string()))
    }

    /// Play `path` for `duration_ms`, then fade it out over `fade_ms`.
    pub fn preview(&mut self, path: &str, duration_ms: u64, fade_ms: u64) -> Result<(), PlaybackError> {
        check_exists(path)?;
        self.request(Request::Preview {
            path: path.to_string(),
            duration: Duration::from_millis(duration_ms),
            fade: Duration::from_millis(fade_ms),
        })
    }

    /// Fade the channel to silence over `fade_ms`, then go `Idle`.
    ///
    /// `0` stops immediately. A loaded but silent channel is unloaded. A
    /// pending request behind a supersede fade is dropped.
    pub fn stop(&mut self, fade_ms: u64) {
        self.cancel_cut();
        match self.phase {
            Phase::Idle => {}
            Phase::Loaded => self.go_idle(),
            Phase::Playing => {
                if fade_ms == 0 {
                    self.go_idle();
                } else {
                    self.begin_fade(Duration::from_millis(fade_ms), AfterFade::Idle);
                }
            }
            Phase::FadingOut => {
                if fade_ms == 0 {
                    if let Some(fade) = self.fade.take() {
                        fade.token.cancel();
                    }
                    self.go_idle();
                } else if let Some(fade) = self.fade.as_mut() {
                    fade.then = AfterFade::Idle;
                }
            }
        }
    }

    /// Same as [`stop`](Self::stop).
    pub fn fadeout(&mut self, fade_ms: u64) {
        self.stop(fade_ms);
    }

    /// Set the channel volume (`0.0..=1.0`). Applies at once in any phase.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.apply_gain();
    }

    /// Advance scheduled transitions to the clock's current time.
    ///
    /// Runs due preview cuts, ramps and completes fades, starts requests that
    /// were waiting behind a supersede fade and notices sounds that ended on
    /// their own.
    ///
    /// # Errors
    ///
    /// A deferred request that fails to load. The channel is `Idle` afterwards.
    pub fn tick(&mut self) -> Result<(), PlaybackError> {
        let now = self.clock.now();

        if let Some(cut) = self.cut.take() {
            if cut.token.is_cancelled() {
                debug!("preview cut {} cancelled", cut.token.id());
            } else if !cut.is_due(now) {
                self.cut = Some(cut);
            } else if self.phase == Phase::Playing {
                debug!("preview cut {} fading out", cut.token.id());
                self.begin_fade(cut.fade, AfterFade::Idle);
            }
        }

        if let Some(fade) = self.fade.take() {
            if fade.token.is_cancelled() {
                debug!("fade {} cancelled", fade.token.id());
                self.fade_factor = 1.0;
                self.apply_gain();
                self.phase = Phase::Playing;
            } else if fade.is_finished(now) {
                self.go_idle();
                if let AfterFade::Run(request) = fade.then {
                    return self.execute(request);
                }
            } else {
                self.fade_factor = fade.factor_at(now);
                self.apply_gain();
                self.fade = Some(fade);
            }
        }

        if self.phase == Phase::Playing && !self.output.is_active() {
            debug!("sound finished: {:?}", self.loaded_path);
            self.cancel_cut();
            self.go_idle();
        }

        Ok(())
    }

    fn request(&mut self, request: Request) -> Result<(), PlaybackError> {
        self.cancel_cut();
        match self.phase {
            Phase::Playing | Phase::FadingOut => {
                info!("superseding current sound with {}", request.path());
                let duration = self.supersede_fade;
                self.begin_fade(duration, AfterFade::Run(request));
                Ok(())
            }
            Phase::Idle | Phase::Loaded => self.execute(request),
        }
    }

    fn execute(&mut self, request: Request) -> Result<(), PlaybackError> {
        self.output.halt();
        self.fade_factor = 1.0;
        self.apply_gain();

        let path = request.path().to_string();
        if let Err(err) = self.output.open(Path::new(&path)) {
            warn!("{}", err);
            self.go_idle();
            return Err(err);
        }
        self.loaded_path = Some(path);
        self.phase = Phase::Loaded;

        match request {
            Request::Load(_) => Ok(()),
            Request::Play(_) => self.start_loaded(),
            Request::Preview { duration, fade, .. } => {
                self.start_loaded()?;
                let token = self.next_token();
                self.cut = Some(ScheduledCut {
                    token,
                    at: self.clock.now() + duration,
                    fade,
                });
                Ok(())
            }
        }
    }

    fn start_loaded(&mut self) -> Result<(), PlaybackError> {
        self.fade_factor = 1.0;
        self.apply_gain();
        if let Err(err) = self.output.start() {
            warn!("{}", err);
            self.go_idle();
            return Err(err);
        }
        info!("playing {:?}", self.loaded_path);
        self.phase = Phase::Playing;
        Ok(())
    }

    /// Start (or restart) a ramp to silence from the current gain, replacing
    /// any fade already running.
    fn begin_fade(&mut self, duration: Duration, then: AfterFade) {
        let now = self.clock.now();
        let from = match self.fade.take() {
            Some(previous) => {
                previous.token.cancel();
                previous.factor_at(now)
            }
            None => self.fade_factor,
        };
        let token = self.next_token();
        self.fade = Some(Fade::new(token, now, duration, from, then));
        self.phase = Phase::FadingOut;
    }

    fn cancel_cut(&mut self) {
        if let Some(cut) = self.cut.take() {
            cut.token.cancel();
        }
    }

    fn go_idle(&mut self) {
        self.output.halt();
        self.loaded_path = None;
        self.phase = Phase::Idle;
        self.fade_factor = 1.0;
        self.apply_gain();
    }

    fn apply_gain(&mut self) {
        self.output.set_gain(self.volume * self.fade_factor);
    }

    fn next_token(&mut self) -> FadeToken {
        self.next_token_id += 1;
        FadeToken::new(self.next_token_id)
    }
}

fn check_exists(path: &str) -> Result<(), PlaybackError> {
    if Path::new(path).is_file() {
        Ok(())
    } else {
        Err(PlaybackError::AssetNotFound {
            path: path.to_string(),
        })
    }
}
