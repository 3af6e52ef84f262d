//! Axum web server with WebSocket control for trace playback.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use algoviz_steps::{Algorithm, Cell, Grid};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::CorsLayer;

use crate::autoplay::Autoplay;
use crate::config::VisConfig;
use crate::error::{Error, Result};
use crate::playback::{Direction, Frame, Playback, PlaybackStatus, Trace};
use crate::session::Session;

/// Shared application state.
pub struct AppState {
    session: RwLock<Session>,
    playback: Arc<RwLock<Playback>>,
    autoplay: Mutex<Autoplay>,
}

impl AppState {
    /// Build the session from `config` and load its first trace.
    pub fn new(config: &VisConfig) -> Result<Self> {
        let session = Session::new(config)?;
        let mut playback = Playback::new(config.speed);
        playback.load(session.trace()?);
        let playback = Arc::new(RwLock::new(playback));
        Ok(Self {
            session: RwLock::new(session),
            autoplay: Mutex::new(Autoplay::new(playback.clone())),
            playback,
        })
    }

    /// Regenerate the trace from `session` and load it, cancelling auto-play.
    async fn reload(&self, session: &Session) -> Result<PlaybackStatus> {
        let trace = session.trace()?;
        let mut autoplay = self.autoplay.lock().await;
        autoplay.cancel();
        let mut playback = self.playback.write().await;
        playback.load(trace);
        Ok(PlaybackStatus::from(&*playback))
    }

    /// Run a playback command and bring the timer in line with the result.
    async fn control(&self, command: impl FnOnce(&mut Playback)) -> PlaybackStatus {
        let mut autoplay = self.autoplay.lock().await;
        let mut playback = self.playback.write().await;
        command(&mut playback);
        autoplay.sync(playback.is_playing());
        PlaybackStatus::from(&*playback)
    }

    async fn status(&self) -> PlaybackStatus {
        PlaybackStatus::from(&*self.playback.read().await)
    }

    async fn frame(&self) -> Result<Frame> {
        self.playback
            .read()
            .await
            .frame()
            .ok_or_else(|| Error::InvalidInput("no trace loaded".to_string()))
    }
}

/// Visualization server.
pub struct VisServer {
    state: Arc<AppState>,
}

impl VisServer {
    pub fn new(config: &VisConfig) -> Result<Self> {
        Ok(Self {
            state: Arc::new(AppState::new(config)?),
        })
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/status", get(status_handler))
            .route("/api/algorithms", get(algorithms_handler))
            .route("/api/frame", get(frame_handler))
            .route("/api/trace", get(trace_handler))
            .route("/api/load", post(load_handler))
            .route("/api/values/randomize", post(values_handler))
            .route("/api/playback", get(playback_status_handler))
            .route("/api/playback/play", post(play_handler))
            .route("/api/playback/pause", post(pause_handler))
            .route("/api/playback/step", post(step_handler))
            .route("/api/playback/reset", post(reset_handler))
            .route("/api/playback/seek", post(seek_handler))
            .route("/api/playback/speed", post(speed_handler))
            .route("/api/grid", get(grid_handler))
            .route("/api/grid/wall", post(wall_handler))
            .route("/api/grid/start", post(start_handler))
            .route("/api/grid/end", post(end_handler))
            .route("/api/grid/randomize", post(randomize_handler))
            .route("/api/grid/clear", post(clear_handler))
            // WebSocket for renderer control
            .route("/ws", get(ws_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Run the server on the given port.
    pub async fn serve(self, port: u16) -> Result<()> {
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Visualization server running on http://localhost:{}", port);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

/// Error body returned with `400 Bad Request`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "request rejected");
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// Server status response.
#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
    algorithm: Algorithm,
    family: &'static str,
    steps: usize,
    playback: PlaybackStatus,
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let algorithm = state.session.read().await.algorithm();
    let playback = state.status().await;
    Json(StatusResponse {
        status: "ok",
        algorithm,
        family: algorithm.family().as_str(),
        steps: playback.total,
        playback,
    })
}

/// Catalogue entry.
#[derive(Debug, Serialize)]
struct AlgorithmInfo {
    slug: &'static str,
    name: &'static str,
    family: &'static str,
    listing: &'static [&'static str],
}

async fn algorithms_handler() -> Json<Vec<AlgorithmInfo>> {
    let catalogue = Algorithm::all()
        .into_iter()
        .map(|a| AlgorithmInfo {
            slug: a.slug(),
            name: a.name(),
            family: a.family().as_str(),
            listing: a.listing(),
        })
        .collect();
    Json(catalogue)
}

async fn frame_handler(State(state): State<Arc<AppState>>) -> Result<Json<Frame>> {
    Ok(Json(state.frame().await?))
}

async fn trace_handler(State(state): State<Arc<AppState>>) -> Result<Json<Trace>> {
    state
        .playback
        .read()
        .await
        .trace()
        .cloned()
        .map(Json)
        .ok_or_else(|| Error::InvalidInput("no trace loaded".to_string()))
}

#[derive(Debug, Deserialize)]
struct LoadRequest {
    algorithm: String,
    values: Option<Vec<i64>>,
    start: Option<String>,
}

async fn load_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoadRequest>,
) -> Result<Json<PlaybackStatus>> {
    let algorithm: Algorithm = req.algorithm.parse()?;
    let mut session = state.session.write().await;
    if let Some(values) = req.values {
        session.set_values(values)?;
    }
    if let Some(start) = req.start.as_deref() {
        session.set_graph_start(start)?;
    }
    session.select(algorithm);
    Ok(Json(state.reload(&session).await?))
}

#[derive(Debug, Deserialize)]
struct ValuesRequest {
    /// Defaults to the current array length.
    size: Option<usize>,
    seed: Option<u64>,
}

/// Sort array after a shuffle plus the playback status it left behind.
#[derive(Debug, Serialize)]
struct ValuesResponse {
    values: Vec<i64>,
    playback: PlaybackStatus,
}

/// Replace the sort array with random values and reload when a sort is selected.
async fn shuffle_values(state: &AppState, req: ValuesRequest) -> Result<ValuesResponse> {
    let mut session = state.session.write().await;
    let size = req.size.unwrap_or(session.values().len());
    session.shuffle_values(size, req.seed)?;
    let playback = if session.uses_values() {
        state.reload(&session).await?
    } else {
        state.status().await
    };
    Ok(ValuesResponse {
        values: session.values().to_vec(),
        playback,
    })
}

async fn values_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ValuesRequest>,
) -> Result<Json<ValuesResponse>> {
    Ok(Json(shuffle_values(&state, req).await?))
}

async fn playback_status_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    Json(state.status().await)
}

async fn play_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    Json(state.control(Playback::play).await)
}

async fn pause_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    Json(state.control(Playback::pause).await)
}

async fn reset_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    Json(state.control(Playback::reset).await)
}

#[derive(Debug, Deserialize)]
struct StepRequest {
    direction: Direction,
}

async fn step_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StepRequest>,
) -> Json<PlaybackStatus> {
    Json(state.control(|p| p.step_in(req.direction)).await)
}

#[derive(Debug, Deserialize)]
struct SeekRequest {
    step: usize,
}

async fn seek_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SeekRequest>,
) -> Json<PlaybackStatus> {
    Json(state.control(|p| p.seek(req.step)).await)
}

#[derive(Debug, Deserialize)]
struct SpeedRequest {
    speed: u32,
}

async fn speed_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpeedRequest>,
) -> Json<PlaybackStatus> {
    // Speed only changes the delay of the next sleep; the timer keeps running.
    let mut playback = state.playback.write().await;
    playback.set_speed(req.speed);
    Json(PlaybackStatus::from(&*playback))
}

/// Grid after an edit plus the playback status it left behind.
#[derive(Debug, Serialize)]
struct GridResponse {
    grid: Grid,
    playback: PlaybackStatus,
}

async fn grid_handler(State(state): State<Arc<AppState>>) -> Json<Grid> {
    Json(state.session.read().await.grid().clone())
}

/// Apply a grid edit and reload when a search is selected.
async fn edit_grid(
    state: &AppState,
    edit: impl FnOnce(&mut Session) -> Result<()>,
) -> Result<Json<GridResponse>> {
    let mut session = state.session.write().await;
    edit(&mut session)?;
    let playback = if session.uses_grid() {
        state.reload(&session).await?
    } else {
        state.status().await
    };
    Ok(Json(GridResponse {
        grid: session.grid().clone(),
        playback,
    }))
}

async fn wall_handler(
    State(state): State<Arc<AppState>>,
    Json(cell): Json<Cell>,
) -> Result<Json<GridResponse>> {
    edit_grid(&state, |s| s.toggle_wall(cell).map(|_| ())).await
}

async fn start_handler(
    State(state): State<Arc<AppState>>,
    Json(cell): Json<Cell>,
) -> Result<Json<GridResponse>> {
    edit_grid(&state, |s| s.move_start(cell)).await
}

async fn end_handler(
    State(state): State<Arc<AppState>>,
    Json(cell): Json<Cell>,
) -> Result<Json<GridResponse>> {
    edit_grid(&state, |s| s.move_end(cell)).await
}

#[derive(Debug, Deserialize)]
struct RandomizeRequest {
    density: f64,
    seed: Option<u64>,
}

async fn randomize_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RandomizeRequest>,
) -> Result<Json<GridResponse>> {
    edit_grid(&state, |s| s.randomize_walls(req.density, req.seed)).await
}

async fn clear_handler(State(state): State<Arc<AppState>>) -> Result<Json<GridResponse>> {
    edit_grid(&state, |s| {
        s.clear_walls();
        Ok(())
    })
    .await
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    // Send the current frame first
    let hello = respond(state.frame().await.map(WsResponse::Frame));
    if let Ok(json) = serde_json::to_string(&hello) {
        let _ = socket.send(Message::Text(json.into())).await;
    }

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                let response = match serde_json::from_str::<WsCommand>(&text) {
                    Ok(cmd) => handle_ws_command(&state, cmd).await,
                    Err(e) => respond(Err(e.into())),
                };
                if let Ok(json) = serde_json::to_string(&response) {
                    let _ = socket.send(Message::Text(json.into())).await;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsCommand {
    GetFrame,
    GetStatus,
    Play,
    Pause,
    Reset,
    Step { direction: Direction },
    Seek { step: usize },
    Speed { speed: u32 },
    ShuffleValues { size: Option<usize>, seed: Option<u64> },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsResponse {
    Frame(Frame),
    Status(PlaybackStatus),
    Values(ValuesResponse),
    Error { message: String },
}

fn respond(result: Result<WsResponse>) -> WsResponse {
    result.unwrap_or_else(|e| WsResponse::Error {
        message: e.to_string(),
    })
}

async fn handle_ws_command(state: &AppState, cmd: WsCommand) -> WsResponse {
    match cmd {
        WsCommand::GetFrame => respond(state.frame().await.map(WsResponse::Frame)),
        WsCommand::GetStatus => WsResponse::Status(state.status().await),
        WsCommand::Play => WsResponse::Status(state.control(Playback::play).await),
        WsCommand::Pause => WsResponse::Status(state.control(Playback::pause).await),
        WsCommand::Reset => WsResponse::Status(state.control(Playback::reset).await),
        WsCommand::Step { direction } => {
            WsResponse::Status(state.control(|p| p.step_in(direction)).await)
        }
        WsCommand::Seek { step } => WsResponse::Status(state.control(|p| p.seek(step)).await),
        WsCommand::Speed { speed } => {
            let mut playback = state.playback.write().await;
            playback.set_speed(speed);
            WsResponse::Status(PlaybackStatus::from(&*playback))
        }
        WsCommand::ShuffleValues { size, seed } => respond(
            shuffle_values(state, ValuesRequest { size, seed })
                .await
                .map(WsResponse::Values),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use algoviz_steps::{PathAlgorithm, SortAlgorithm};
    use tokio_test::{assert_err, assert_ok};

    use crate::playback::PlaybackState;
    use crate::session::MAX_VALUES;

    fn app() -> Arc<AppState> {
        let config = VisConfig {
            wall_density: 0.0,
            ..VisConfig::default()
        };
        Arc::new(AppState::new(&config).unwrap())
    }

    fn load(algorithm: &str) -> Json<LoadRequest> {
        Json(LoadRequest {
            algorithm: algorithm.to_string(),
            values: None,
            start: None,
        })
    }

    #[test]
    fn router_builds() {
        let server = VisServer::new(&VisConfig::default()).unwrap();
        let _router = server.router();
    }

    #[tokio::test]
    async fn starts_ready_on_configured_algorithm() {
        let state = app();
        let Json(status) = status_handler(State(state)).await;
        assert_eq!(status.algorithm, Algorithm::Sort(SortAlgorithm::Bubble));
        assert_eq!(status.playback.state, PlaybackState::Ready);
        assert!(status.steps > 0);
    }

    #[tokio::test]
    async fn catalogue_lists_everything() {
        let Json(catalogue) = algorithms_handler().await;
        assert_eq!(catalogue.len(), Algorithm::all().len());
        assert!(catalogue.iter().any(|a| a.slug == "astar" && a.family == "pathfinding"));
    }

    #[tokio::test]
    async fn load_switches_trace() {
        let state = app();
        let req = Json(LoadRequest {
            algorithm: "merge".to_string(),
            values: Some(vec![3, 1, 2]),
            start: None,
        });
        let Json(status) = assert_ok!(load_handler(State(state.clone()), req).await);
        assert_eq!(status.algorithm, Some(Algorithm::Sort(SortAlgorithm::Merge)));
        assert_eq!(status.step, 0);

        let Json(trace) = assert_ok!(trace_handler(State(state)).await);
        assert_eq!(trace.operations.len(), status.total);
    }

    #[tokio::test]
    async fn bad_load_is_rejected() {
        let state = app();
        assert_err!(load_handler(State(state.clone()), load("bogosort")).await);
        let req = Json(LoadRequest {
            algorithm: "graph-bfs".to_string(),
            values: None,
            start: Some("Q".to_string()),
        });
        let err = assert_err!(load_handler(State(state), req).await);
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn step_and_seek() {
        let state = app();
        let forward = Json(StepRequest { direction: Direction::Forward });
        let Json(status) = step_handler(State(state.clone()), forward).await;
        assert_eq!(status.step, 1);
        assert_eq!(status.state, PlaybackState::Paused);

        let Json(status) = seek_handler(State(state.clone()), Json(SeekRequest { step: 10_000 })).await;
        assert_eq!(status.step, status.total);
        assert_eq!(status.state, PlaybackState::Finished);

        let Json(status) = reset_handler(State(state.clone())).await;
        assert_eq!(status.state, PlaybackState::Ready);
        let Json(frame) = assert_ok!(frame_handler(State(state)).await);
        assert_eq!(frame.step, 0);
    }

    #[tokio::test]
    async fn play_pause_drive_timer() {
        let state = app();
        let Json(status) = play_handler(State(state.clone())).await;
        assert_eq!(status.state, PlaybackState::Playing);
        assert!(state.autoplay.lock().await.is_running());

        let Json(status) = pause_handler(State(state.clone())).await;
        assert_eq!(status.state, PlaybackState::Paused);
        assert!(!state.autoplay.lock().await.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn load_while_playing_stops_timer() {
        let state = app();
        assert_ok!(load_handler(State(state.clone()), load("bfs")).await);
        play_handler(State(state.clone())).await;
        assert!(state.autoplay.lock().await.is_running());

        let Json(status) = assert_ok!(load_handler(State(state.clone()), load("dfs")).await);
        assert_eq!(status.state, PlaybackState::Ready);
        assert!(!state.autoplay.lock().await.is_running());

        tokio::time::sleep(Duration::from_secs(5)).await;
        let Json(status) = playback_status_handler(State(state)).await;
        assert_eq!(status.step, 0);
        assert_eq!(status.state, PlaybackState::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn wall_edit_while_playing_stops_timer() {
        let state = app();
        assert_ok!(load_handler(State(state.clone()), load("bfs")).await);
        play_handler(State(state.clone())).await;
        assert!(state.autoplay.lock().await.is_running());

        let Json(edit) = assert_ok!(wall_handler(State(state.clone()), Json(Cell::new(0, 0))).await);
        assert_eq!(edit.playback.step, 0);
        assert!(!state.autoplay.lock().await.is_running());

        tokio::time::sleep(Duration::from_secs(5)).await;
        let Json(status) = playback_status_handler(State(state)).await;
        assert_eq!(status.step, 0);
        assert_eq!(status.state, PlaybackState::Ready);
    }

    #[tokio::test]
    async fn shuffled_values_reload_sort() {
        let state = app();
        step_handler(State(state.clone()), Json(StepRequest { direction: Direction::Forward })).await;

        let req = Json(ValuesRequest { size: Some(5), seed: Some(9) });
        let Json(shuffled) = assert_ok!(values_handler(State(state.clone()), req).await);
        assert_eq!(shuffled.values.len(), 5);
        assert_eq!(shuffled.playback.step, 0);
        assert_eq!(shuffled.playback.state, PlaybackState::Ready);

        let req = Json(ValuesRequest { size: None, seed: Some(9) });
        let Json(again) = assert_ok!(values_handler(State(state.clone()), req).await);
        assert_eq!(again.values.len(), 5);

        let req = Json(ValuesRequest { size: Some(MAX_VALUES + 1), seed: None });
        let err = assert_err!(values_handler(State(state), req).await);
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn shuffled_values_leave_search_alone() {
        let state = app();
        assert_ok!(load_handler(State(state.clone()), load("bfs")).await);
        step_handler(State(state.clone()), Json(StepRequest { direction: Direction::Forward })).await;

        let req = Json(ValuesRequest { size: Some(4), seed: Some(1) });
        let Json(shuffled) = assert_ok!(values_handler(State(state), req).await);
        assert_eq!(shuffled.values.len(), 4);
        assert_eq!(shuffled.playback.step, 1);
        assert_eq!(shuffled.playback.algorithm, Some(Algorithm::Path(PathAlgorithm::Bfs)));
    }

    #[tokio::test]
    async fn speed_is_clamped() {
        let state = app();
        let Json(status) = speed_handler(State(state), Json(SpeedRequest { speed: 400 })).await;
        assert_eq!(status.speed, 100);
        assert_eq!(status.delay_ms, Some(80));
    }

    #[tokio::test]
    async fn grid_edits_reload_search() {
        let state = app();
        assert_ok!(load_handler(State(state.clone()), load("bfs")).await);
        step_handler(State(state.clone()), Json(StepRequest { direction: Direction::Forward })).await;

        let Json(edit) = assert_ok!(wall_handler(State(state.clone()), Json(Cell::new(0, 0))).await);
        assert!(edit.grid.is_wall(Cell::new(0, 0)));
        assert_eq!(edit.playback.step, 0);
        assert_eq!(edit.playback.algorithm, Some(Algorithm::Path(PathAlgorithm::Bfs)));

        let req = Json(RandomizeRequest { density: 0.3, seed: Some(5) });
        let Json(edit) = assert_ok!(randomize_handler(State(state.clone()), req).await);
        assert!(edit.grid.wall_count() > 0);

        let Json(edit) = assert_ok!(clear_handler(State(state.clone())).await);
        assert_eq!(edit.grid.wall_count(), 0);

        let start = edit.grid.start();
        assert_err!(wall_handler(State(state.clone()), Json(start)).await);
        assert_err!(end_handler(State(state), Json(Cell::new(500, 500))).await);
    }

    #[tokio::test]
    async fn ws_commands() {
        let state = app();
        let cmd: WsCommand = serde_json::from_str(r#"{"type":"step","direction":"forward"}"#).unwrap();
        match handle_ws_command(&state, cmd).await {
            WsResponse::Status(status) => assert_eq!(status.step, 1),
            other => panic!("unexpected response {other:?}"),
        }

        let cmd: WsCommand = serde_json::from_str(r#"{"type":"get_frame"}"#).unwrap();
        let response = handle_ws_command(&state, cmd).await;
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["type"], "frame");
        assert_eq!(json["step"], 1);
        assert_eq!(json["scene"]["widget"], "bars");

        let cmd: WsCommand =
            serde_json::from_str(r#"{"type":"shuffle_values","size":3,"seed":2}"#).unwrap();
        match handle_ws_command(&state, cmd).await {
            WsResponse::Values(shuffled) => {
                assert_eq!(shuffled.values.len(), 3);
                assert_eq!(shuffled.playback.step, 0);
            }
            other => panic!("unexpected response {other:?}"),
        }
    }
}
