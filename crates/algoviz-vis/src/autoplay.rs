//! Auto-play timer.
//!
//! While the engine is playing, a single tokio task sleeps for the delay at
//! the current speed and then advances one step. Any command that changes the
//! trace or leaves `playing` cancels the task. A generation counter guards the
//! gap between a tick waking up and taking the write lock, so a superseded
//! task can never advance the engine.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::playback::Playback;

/// Owner of the auto-play task for one engine.
pub struct Autoplay {
    playback: Arc<RwLock<Playback>>,
    generation: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

impl Autoplay {
    pub fn new(playback: Arc<RwLock<Playback>>) -> Self {
        Self {
            playback,
            generation: Arc::new(AtomicU64::new(0)),
            task: None,
        }
    }

    /// Stop any pending tick.
    pub fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Restart the timer if the engine is playing, otherwise cancel it.
    pub fn sync(&mut self, playing: bool) {
        self.cancel();
        if playing {
            let generation = self.generation.load(Ordering::SeqCst);
            self.task = Some(tokio::spawn(run(
                self.playback.clone(),
                self.generation.clone(),
                generation,
            )));
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for Autoplay {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run(playback: Arc<RwLock<Playback>>, generation: Arc<AtomicU64>, mine: u64) {
    loop {
        let delay = {
            let playback = playback.read().await;
            match playback.delay() {
                Some(delay) if playback.is_playing() => delay,
                _ => break,
            }
        };
        tokio::time::sleep(delay).await;

        let mut playback = playback.write().await;
        if generation.load(Ordering::SeqCst) != mine || !playback.is_playing() {
            break;
        }
        playback.advance();
        tracing::debug!(step = playback.step(), total = playback.len(), "tick");
        if !playback.is_playing() {
            tracing::info!(total = playback.len(), "playback finished");
            break;
        }
    }
}
