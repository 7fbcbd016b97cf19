//! Scheduled volume ramps.
//!
//! Fades never sleep. A fade records when it started and how long it lasts;
//! [`PlaybackEngine::tick`](super::PlaybackEngine::tick) samples it against
//! the clock and applies the gain. Each scheduled fade or cut carries a
//! [`FadeToken`] so a newer request, or the UI, can cancel it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cancellation handle for a scheduled fade or preview cut.
#[derive(Debug, Clone)]
pub struct FadeToken {
    id: u64,
    cancelled: Arc<AtomicBool>,
}

impl FadeToken {
    pub(crate) fn new(id: u64) -> Self {
        Self {
            id,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Identifier, unique per engine. Newer fades have larger ids.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Cancel the timer. Nothing scheduled behind it will fire.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl PartialEq for FadeToken {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Linear ramp from `from` down to silence.
#[derive(Debug, Clone)]
pub(crate) struct Fade<T> {
    pub token: FadeToken,
    started: Instant,
    duration: Duration,
    from: f32,
    /// What to do once the ramp reaches silence.
    pub then: T,
}

impl<T> Fade<T> {
    pub fn new(token: FadeToken, started: Instant, duration: Duration, from: f32, then: T) -> Self {
        Self {
            token,
            started,
            duration,
            from: from.clamp(0.0, 1.0),
            then,
        }
    }

    /// Gain multiplier at `now`, in `0.0..=from`.
    pub fn factor_at(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 0.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        let t = (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0);
        self.from * (1.0 - t)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }
}

/// Deferred start of a fade, used to truncate previews.
#[derive(Debug, Clone)]
pub(crate) struct ScheduledCut {
    pub token: FadeToken,
    pub at: Instant,
    pub fade: Duration,
}

impl ScheduledCut {
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.at
    }
}
