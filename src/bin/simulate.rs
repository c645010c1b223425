use clap::Parser;
use maze_chase::autopilot::choose_direction;
use maze_chase::constants::{COLS, PURSUER_COUNT, ROWS, TICK_MS, WANDER_CHANCE};
use maze_chase::engine::GameEngine;
use maze_chase::log::{self, LogContext};
use maze_chase::maze::Maze;
use maze_chase::types::{Cell, GameConfig, GameStatus, RuntimeEvent, Snapshot};
use serde::Serialize;
use serde_json::json;
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Runs seeded games headless with an autopilot player.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 1)]
    games: u32,
    #[arg(long, default_value_t = COLS)]
    cols: i32,
    #[arg(long, default_value_t = ROWS)]
    rows: i32,
    #[arg(long, default_value_t = PURSUER_COUNT)]
    pursuers: usize,
    #[arg(long, default_value_t = WANDER_CHANCE)]
    wander: f32,
    /// Games still running after this many ticks end as a timeout.
    #[arg(long, default_value_t = 60 * 60 * 5)]
    max_ticks: u64,
    #[arg(long)]
    match_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize)]
struct GameResultLine {
    game: u32,
    seed: u32,
    outcome: String,
    score: u32,
    lives: u32,
    ticks: u64,
    #[serde(rename = "durationMs")]
    duration_ms: u64,
    #[serde(rename = "pickupsLeft")]
    pickups_left: usize,
    #[serde(rename = "standardCollected")]
    standard_collected: u32,
    #[serde(rename = "powerCollected")]
    power_collected: u32,
    #[serde(rename = "livesLost")]
    lives_lost: u32,
    freezes: u32,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    tick: u64,
    message: String,
}

#[derive(Clone, Debug)]
struct GameRunResult {
    result: GameResultLine,
    anomaly_records: Vec<AnomalyRecord>,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "matchId")]
    match_id: String,
    #[serde(rename = "startedAtMs")]
    started_at_ms: u64,
    #[serde(rename = "finishedAtMs")]
    finished_at_ms: u64,
    #[serde(rename = "gameCount")]
    game_count: usize,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "averageScore")]
    average_score: u32,
    #[serde(rename = "averageTicks")]
    average_ticks: u64,
    #[serde(rename = "outcomeCounts")]
    outcome_counts: BTreeMap<String, usize>,
    games: Vec<GameResultLine>,
}

fn main() {
    let cli = Cli::parse();
    let run_started_at_ms = now_ms();
    let base_seed = normalize_seed(cli.seed.unwrap_or(run_started_at_ms));
    let match_id = cli
        .match_id
        .clone()
        .unwrap_or_else(|| default_match_id(base_seed, run_started_at_ms));
    let config = build_config(&cli);

    let mut has_anomaly = false;
    let mut results = Vec::new();
    let mut total_anomalies = 0usize;

    for game in 0..cli.games {
        let seed = base_seed.wrapping_add(game);
        let ctx = LogContext::session(match_id.clone()).with_seed(seed);
        log::info(
            "game_started",
            &ctx,
            json!({
                "game": game,
                "cols": config.cols,
                "rows": config.rows,
                "pursuers": config.pursuer_count,
                "wander": config.wander_chance,
            }),
        );

        let run = run_game(game, seed, config.clone(), cli.max_ticks);
        for anomaly in &run.anomaly_records {
            log::warn(
                "anomaly_detected",
                &ctx.clone().with_tick(anomaly.tick),
                json!({ "message": anomaly.message }),
            );
        }
        if !run.result.anomalies.is_empty() {
            has_anomaly = true;
        }
        total_anomalies += run.anomaly_records.len();

        log::info(
            "game_finished",
            &ctx.clone().with_tick(run.result.ticks),
            json!({
                "outcome": run.result.outcome,
                "score": run.result.score,
                "lives": run.result.lives,
                "durationMs": run.result.duration_ms,
            }),
        );

        match serde_json::to_string(&run.result) {
            Ok(line) => println!("{line}"),
            Err(error) => log::error(
                "result_serialize_failed",
                &ctx,
                json!({ "error": error.to_string() }),
            ),
        }
        results.push(run.result);
    }

    let summary = build_run_summary(
        match_id.clone(),
        run_started_at_ms,
        now_ms(),
        results,
        total_anomalies,
    );
    let run_ctx = LogContext::session(match_id);

    let mut summary_out_written: Option<String> = None;
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            log::error(
                "summary_write_failed",
                &run_ctx,
                json!({
                    "path": path.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
        summary_out_written = Some(path.to_string_lossy().to_string());
    }

    log::info(
        "run_finished",
        &run_ctx,
        json!({
            "gameCount": summary.game_count,
            "anomalyCount": summary.anomaly_count,
            "averageScore": summary.average_score,
            "outcomeCounts": summary.outcome_counts,
            "summaryOut": summary_out_written,
        }),
    );

    if has_anomaly {
        std::process::exit(1);
    }
}

fn build_config(cli: &Cli) -> GameConfig {
    GameConfig {
        cols: cli.cols.clamp(3, 201),
        rows: cli.rows.clamp(3, 201),
        pursuer_count: cli.pursuers.min(16),
        wander_chance: cli.wander.clamp(0.0, 1.0),
        ..GameConfig::default()
    }
}

fn run_game(game: u32, seed: u32, config: GameConfig, max_ticks: u64) -> GameRunResult {
    let mut engine = GameEngine::new(seed, config);
    let mut anomalies = Vec::new();
    let mut anomaly_records = Vec::new();
    let mut anomaly_seen = HashSet::new();
    let mut freezes = 0;
    let mut previous = engine.build_snapshot(false);

    while !engine.is_ended() && engine.tick() < max_ticks {
        if let Some(dir) = choose_direction(&engine) {
            engine.set_direction_intent(dir);
        }
        engine.step(TICK_MS);
        let snapshot = engine.build_snapshot(true);
        let found = collect_snapshot_anomalies(&previous, &snapshot, engine.maze(), &engine.config);
        for message in found {
            push_anomaly(
                &mut anomalies,
                &mut anomaly_records,
                &mut anomaly_seen,
                snapshot.tick,
                message,
            );
        }
        freezes += snapshot
            .events
            .iter()
            .filter(|event| matches!(event, RuntimeEvent::FreezeStarted { .. }))
            .count() as u32;
        previous = snapshot;
    }

    let summary = engine.build_summary();
    GameRunResult {
        result: GameResultLine {
            game,
            seed,
            outcome: outcome_key(summary.status).to_string(),
            score: summary.score,
            lives: summary.lives,
            ticks: summary.ticks,
            duration_ms: summary.duration_ms,
            pickups_left: summary.pickups_left,
            standard_collected: summary.standard_collected,
            power_collected: summary.power_collected,
            lives_lost: summary.lives_lost,
            freezes,
            anomalies,
        },
        anomaly_records,
    }
}

fn collect_snapshot_anomalies(
    previous: &Snapshot,
    snapshot: &Snapshot,
    maze: &Maze,
    config: &GameConfig,
) -> Vec<String> {
    let mut anomalies = Vec::new();
    let player_cell = Cell::containing(snapshot.player.x, snapshot.player.y, config.cell_size);
    if !maze.is_open(player_cell) {
        anomalies.push(format!(
            "player inside wall at {},{}",
            player_cell.col, player_cell.row
        ));
    }
    if snapshot.score < previous.score {
        anomalies.push(format!(
            "score decreased: {} -> {}",
            previous.score, snapshot.score
        ));
    }
    if snapshot.lives > previous.lives || snapshot.lives > config.initial_lives {
        anomalies.push(format!(
            "lives increased: {} -> {}",
            previous.lives, snapshot.lives
        ));
    }
    if snapshot.pickups.len() > previous.pickups.len() {
        anomalies.push("pickup count increased".to_string());
    }
    for pickup in &snapshot.pickups {
        if !maze.is_open(Cell::new(pickup.col, pickup.row)) {
            anomalies.push(format!("pickup on wall at {},{}", pickup.col, pickup.row));
        }
    }
    match snapshot.status {
        GameStatus::Lost if snapshot.lives > 0 => {
            anomalies.push("lost with lives remaining".to_string());
        }
        GameStatus::Won if !snapshot.pickups.is_empty() => {
            anomalies.push("won with pickups remaining".to_string());
        }
        GameStatus::Playing if snapshot.lives == 0 => {
            anomalies.push("playing with no lives".to_string());
        }
        _ => {}
    }
    anomalies
}

fn normalize_seed(seed: u64) -> u32 {
    seed as u32
}

fn push_anomaly(
    anomalies: &mut Vec<String>,
    anomaly_records: &mut Vec<AnomalyRecord>,
    anomaly_seen: &mut HashSet<String>,
    tick: u64,
    message: String,
) {
    anomaly_records.push(AnomalyRecord {
        tick,
        message: message.clone(),
    });
    if anomaly_seen.insert(message.clone()) {
        anomalies.push(message);
    }
}

fn default_match_id(seed: u32, timestamp_ms: u64) -> String {
    format!("sim-{seed}-{timestamp_ms}")
}

fn outcome_key(status: GameStatus) -> &'static str {
    match status {
        GameStatus::Won => "won",
        GameStatus::Lost => "lost",
        GameStatus::Playing => "timeout",
    }
}

fn build_run_summary(
    match_id: String,
    started_at_ms: u64,
    finished_at_ms: u64,
    games: Vec<GameResultLine>,
    anomaly_count: usize,
) -> RunSummary {
    let game_count = games.len();
    let mut outcome_counts: BTreeMap<String, usize> = BTreeMap::new();
    for game in &games {
        *outcome_counts.entry(game.outcome.clone()).or_insert(0) += 1;
    }
    let (average_score, average_ticks) = if game_count == 0 {
        (0, 0)
    } else {
        let total_score: u64 = games.iter().map(|g| g.score as u64).sum();
        let total_ticks: u64 = games.iter().map(|g| g.ticks).sum();
        (
            (total_score / game_count as u64) as u32,
            total_ticks / game_count as u64,
        )
    };
    RunSummary {
        match_id,
        started_at_ms,
        finished_at_ms,
        game_count,
        anomaly_count,
        average_score,
        average_ticks,
        outcome_counts,
        games,
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).map_err(io::Error::other)?;
    std::fs::write(path, summary_text)
}
