use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::constants::TICK_MS;
use crate::engine::GameEngine;
use crate::log::{self, LogContext};
use crate::types::{Direction, GameConfig, GameSummary, MazeInit, Snapshot};

#[derive(Clone, Debug)]
pub enum SessionCommand {
    SetDirection(Direction),
    /// A missing seed picks a fresh random one.
    Restart { seed: Option<u32> },
    Stop,
}

#[derive(Clone, Debug)]
pub enum SessionUpdate {
    Started { init: MazeInit, config: GameConfig },
    Frame(Snapshot),
    Ended(GameSummary),
}

pub struct SessionHandle {
    pub commands: mpsc::Sender<SessionCommand>,
    pub updates: mpsc::Receiver<SessionUpdate>,
    pub task: JoinHandle<()>,
}

const COMMAND_QUEUE: usize = 64;
const UPDATE_QUEUE: usize = 256;

pub fn spawn_session(session_id: String, seed: u32, config: GameConfig) -> SessionHandle {
    let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE);
    let (update_tx, update_rx) = mpsc::channel(UPDATE_QUEUE);
    let engine = GameEngine::new(seed, config);
    let task = tokio::spawn(run_session(session_id, engine, command_rx, update_tx));
    SessionHandle {
        commands: command_tx,
        updates: update_rx,
        task,
    }
}

fn started(engine: &GameEngine) -> SessionUpdate {
    SessionUpdate::Started {
        init: engine.maze_init(),
        config: engine.config.clone(),
    }
}

/// Ticks one engine at the display rate until stopped. Ticking pauses on a
/// terminal state and resumes on restart. Exits when either side hangs up.
pub async fn run_session(
    session_id: String,
    mut engine: GameEngine,
    mut commands: mpsc::Receiver<SessionCommand>,
    updates: mpsc::Sender<SessionUpdate>,
) {
    log::info(
        "session_started",
        &LogContext::session(session_id.clone()).with_seed(engine.seed),
        json!({ "cols": engine.config.cols, "rows": engine.config.rows }),
    );
    if updates.send(started(&engine)).await.is_err() {
        return;
    }

    let mut interval = tokio::time::interval(Duration::from_millis(TICK_MS));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut armed = true;
    let mut last_tick = Instant::now();

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(SessionCommand::SetDirection(dir)) => {
                    engine.set_direction_intent(dir);
                }
                Some(SessionCommand::Restart { seed }) => {
                    engine.restart(seed.unwrap_or_else(rand::random));
                    log::info(
                        "session_restarted",
                        &LogContext::session(session_id.clone()).with_seed(engine.seed),
                        json!({}),
                    );
                    if updates.send(started(&engine)).await.is_err() {
                        break;
                    }
                    armed = true;
                    interval.reset();
                    last_tick = Instant::now();
                }
                Some(SessionCommand::Stop) | None => break,
            },
            _ = interval.tick(), if armed => {
                let now = Instant::now();
                let dt_ms = now.duration_since(last_tick).as_millis() as u64;
                last_tick = now;
                engine.step(dt_ms);

                if !engine.is_ended() {
                    // Events are drained only once a slot is reserved, so a
                    // skipped frame leaves them for the next one.
                    match updates.try_reserve() {
                        Ok(permit) => permit.send(SessionUpdate::Frame(engine.build_snapshot(true))),
                        Err(TrySendError::Full(())) => {}
                        Err(TrySendError::Closed(())) => break,
                    }
                } else {
                    armed = false;
                    if updates
                        .send(SessionUpdate::Frame(engine.build_snapshot(true)))
                        .await
                        .is_err()
                    {
                        break;
                    }
                    let summary = engine.build_summary();
                    log::info(
                        "game_finished",
                        &LogContext::session(session_id.clone())
                            .with_seed(summary.seed)
                            .with_tick(summary.ticks),
                        json!({
                            "status": summary.status,
                            "score": summary.score,
                            "lives": summary.lives,
                            "durationMs": summary.duration_ms,
                        }),
                    );
                    if updates.send(SessionUpdate::Ended(summary)).await.is_err() {
                        break;
                    }
                }
            }
        }
    }

    log::info(
        "session_stopped",
        &LogContext::session(session_id).with_seed(engine.seed).with_tick(engine.tick()),
        json!({ "status": engine.status() }),
    );
}
