//! AlgoViz Replay and Control
//!
//! Replays precomputed algorithm traces at a user-chosen speed and serves the
//! resulting display state to renderers.
//!
//! # Architecture
//!
//! - **Session**: current algorithm and editable inputs; produces a [`Trace`]
//! - **Playback**: the replay state machine over one trace
//! - **Display**: renderer-facing projection of `(trace, step)`
//! - **Autoplay**: cancellable tokio timer that advances while playing
//! - **REST API / WebSocket**: load, play, pause, step, seek, speed, grid edits
//!
//! # Usage
//!
//! ```no_run
//! use algoviz_vis::{VisConfig, VisServer};
//!
//! # async fn run() -> algoviz_vis::Result<()> {
//! let config = VisConfig::from_env()?;
//! let server = VisServer::new(&config)?;
//! server.serve(config.port).await?;
//! # Ok(())
//! # }
//! ```

mod autoplay;
mod config;
mod display;
mod error;
mod playback;
mod server;
mod session;
mod timing;

pub use autoplay::Autoplay;
pub use config::VisConfig;
pub use display::{Display, Scene};
pub use error::{Error, Result};
pub use playback::{Direction, Frame, Playback, PlaybackState, PlaybackStatus, Trace};
pub use server::{AppState, ErrorResponse, VisServer};
pub use session::Session;
pub use timing::TimingPolicy;

#[cfg(test)]
mod tests {
    use super::*;
    use algoviz_steps::{Algorithm, Operation};

    fn playback_for(slug: &str) -> Playback {
        let mut session = Session::new(&VisConfig::default()).unwrap();
        session.select(slug.parse::<Algorithm>().unwrap());
        let mut playback = Playback::new(50);
        playback.load(session.trace().unwrap());
        playback
    }

    #[test]
    fn replay_is_monotonic() {
        for algorithm in Algorithm::all() {
            let mut playback = playback_for(algorithm.slug());
            let len = playback.len();
            playback.play();
            let mut last = playback.step();
            for _ in 0..len + 3 {
                playback.advance();
                assert!(playback.step() >= last);
                assert!(playback.step() <= len);
                last = playback.step();
            }
            assert_eq!(playback.state(), PlaybackState::Finished, "{algorithm}");
        }
    }

    #[test]
    fn active_line_tracks_operations() {
        let mut playback = playback_for("quick");
        while let Some(op) = playback.step_once().cloned() {
            let display = playback.display().unwrap();
            assert_eq!(display.active_line, Some(op.line()));
            assert_eq!(display.status, op.note());
        }
        let last = playback.trace().and_then(|t| t.operations.last()).unwrap();
        assert!(last.is_terminal());
        assert!(matches!(last, Operation::Sort(_)));
    }

    #[test]
    fn frame_serializes_for_renderers() {
        let mut playback = playback_for("preorder");
        playback.step_once();
        let frame = playback.frame().unwrap();
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["algorithm"], "preorder");
        assert_eq!(json["step"], 1);
        assert_eq!(json["scene"]["widget"], "tree");
        assert!(json["status"].is_string());
    }
}
