//! Replay engine for precomputed operation traces.
//!
//! The engine owns a position `step ∈ [0, len]` into an immutable trace and a
//! projected [`Display`]. `step == len` is finished. Everything else it
//! exposes is derived from `(trace, step)`.

use std::time::Duration;

use algoviz_steps::{Algorithm, Operation};
use serde::{Deserialize, Serialize};

use crate::display::{Display, Scene};
use crate::timing::{clamp_speed, TimingPolicy};

/// A generated trace together with the scene it starts from.
#[derive(Debug, Clone, Serialize)]
pub struct Trace {
    pub algorithm: Algorithm,
    pub initial: Scene,
    pub operations: Vec<Operation>,
}

impl Trace {
    /// Number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Current state of playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// No trace loaded
    Idle,
    /// Trace loaded at step 0
    Ready,
    /// Advancing on the auto-play timer
    Playing,
    /// Holding the current step
    Paused,
    /// Every operation has been applied
    Finished,
}

/// Direction for a manual step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

/// Playback controller for an operation trace.
pub struct Playback {
    trace: Option<Trace>,
    display: Option<Display>,
    step: usize,
    state: PlaybackState,
    speed: u8,
}

impl Playback {
    /// Create an idle controller at the given speed.
    pub fn new(speed: u8) -> Self {
        Self {
            trace: None,
            display: None,
            step: 0,
            state: PlaybackState::Idle,
            speed: clamp_speed(u32::from(speed)),
        }
    }

    /// Get the current step.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Get the number of operations in the loaded trace.
    pub fn len(&self) -> usize {
        self.trace.as_ref().map_or(0, Trace::len)
    }

    /// Whether there is nothing to replay.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the current playback state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Whether the auto-play timer should be running.
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Get the current speed, 0–100.
    pub fn speed(&self) -> u8 {
        self.speed
    }

    /// Get the loaded trace.
    pub fn trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }

    /// Get the display state at the current step.
    pub fn display(&self) -> Option<&Display> {
        self.display.as_ref()
    }

    /// Load a new trace, discarding the old one and all projections.
    pub fn load(&mut self, trace: Trace) {
        tracing::info!(algorithm = %trace.algorithm, steps = trace.len(), "trace loaded");
        self.display = Some(Display::new(trace.initial.clone()));
        self.trace = Some(trace);
        self.step = 0;
        self.state = PlaybackState::Ready;
    }

    /// Apply the operation at `step` and move past it. At the end this only
    /// stops playback.
    pub fn advance(&mut self) -> Option<&Operation> {
        let (Some(trace), Some(display)) = (self.trace.as_ref(), self.display.as_mut()) else {
            return None;
        };
        let Some(op) = trace.operations.get(self.step) else {
            self.state = PlaybackState::Finished;
            return None;
        };
        display.apply(op);
        self.step += 1;
        if self.step == trace.len() {
            self.state = PlaybackState::Finished;
        }
        Some(op)
    }

    /// Start playback, restarting a finished trace, or toggle play/pause.
    pub fn play(&mut self) {
        match self.state {
            PlaybackState::Idle => {}
            PlaybackState::Finished => {
                self.rewind();
                self.state = PlaybackState::Playing;
            }
            PlaybackState::Playing => self.state = PlaybackState::Paused,
            PlaybackState::Ready | PlaybackState::Paused => self.state = PlaybackState::Playing,
        }
    }

    /// Pause playback.
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Pause and advance exactly one operation.
    pub fn step_once(&mut self) -> Option<&Operation> {
        if self.state == PlaybackState::Idle {
            return None;
        }
        self.state = PlaybackState::Paused;
        self.advance()
    }

    /// Stop playback and move back one operation. Landing on step 0 leaves
    /// the engine ready.
    pub fn step_back(&mut self) {
        if self.state == PlaybackState::Idle {
            return;
        }
        self.seek(self.step.saturating_sub(1));
        self.state = if self.step == 0 {
            PlaybackState::Ready
        } else {
            PlaybackState::Paused
        };
    }

    /// Step one operation in `direction`.
    pub fn step_in(&mut self, direction: Direction) {
        match direction {
            Direction::Forward => {
                self.step_once();
            }
            Direction::Backward => self.step_back(),
        }
    }

    /// Return to step 0 keeping the loaded trace.
    pub fn reset(&mut self) {
        if self.state != PlaybackState::Idle {
            self.rewind();
            self.state = PlaybackState::Ready;
        }
    }

    /// Jump to `step`, rebuilding the display from the trace prefix.
    pub fn seek(&mut self, step: usize) {
        let Some(trace) = self.trace.as_ref() else {
            return;
        };
        self.step = step.min(trace.len());
        self.display = Some(Display::from_operations(&trace.initial, &trace.operations, self.step));
        self.state = if self.step == trace.len() {
            PlaybackState::Finished
        } else if self.step == 0 && self.state != PlaybackState::Playing {
            PlaybackState::Ready
        } else if self.state == PlaybackState::Finished || self.state == PlaybackState::Ready {
            PlaybackState::Paused
        } else {
            self.state
        };
    }

    /// Set playback speed; values above 100 are clamped.
    pub fn set_speed(&mut self, speed: u32) {
        self.speed = clamp_speed(speed);
    }

    /// Delay before the next auto-play tick at the current speed.
    pub fn delay(&self) -> Option<Duration> {
        self.trace
            .as_ref()
            .map(|t| TimingPolicy::for_family(t.algorithm.family()).delay(self.speed))
    }

    /// Fraction of the trace applied, 0.0 to 1.0.
    pub fn progress(&self) -> f64 {
        match self.len() {
            0 => 0.0,
            len => self.step as f64 / len as f64,
        }
    }

    /// Current projection with playback position.
    pub fn frame(&self) -> Option<Frame> {
        let trace = self.trace.as_ref()?;
        let display = self.display.clone()?;
        Some(Frame {
            algorithm: trace.algorithm,
            step: self.step,
            total: trace.len(),
            progress: self.progress(),
            display,
        })
    }

    fn rewind(&mut self) {
        self.step = 0;
        self.display = self.trace.as_ref().map(|t| Display::new(t.initial.clone()));
    }
}

/// Projection sent to renderers.
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub algorithm: Algorithm,
    pub step: usize,
    pub total: usize,
    pub progress: f64,
    #[serde(flatten)]
    pub display: Display,
}

/// Playback status for sending to frontend.
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackStatus {
    pub algorithm: Option<Algorithm>,
    pub step: usize,
    pub total: usize,
    pub state: PlaybackState,
    pub speed: u8,
    pub delay_ms: Option<u64>,
    pub progress: f64,
}

impl From<&Playback> for PlaybackStatus {
    fn from(playback: &Playback) -> Self {
        Self {
            algorithm: playback.trace.as_ref().map(|t| t.algorithm),
            step: playback.step,
            total: playback.len(),
            state: playback.state,
            speed: playback.speed,
            delay_ms: playback.delay().map(|d| d.as_millis() as u64),
            progress: playback.progress(),
        }
    }
}
