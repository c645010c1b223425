use serde::Serialize;

use crate::constants::{
    CELL_SIZE, COLS, FREEZE_DURATION_MS, INITIAL_LIVES, PERTURB_CHANCE, PLAYER_SPEED,
    POWER_PICKUP_CHANCE, POWER_POINTS, PURSUER_COUNT, PURSUER_SPEED, ROWS, STANDARD_PICKUP_CHANCE,
    STANDARD_POINTS, WANDER_CHANCE,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    None,
}

impl Direction {
    /// Neighbour enumeration order used by path search.
    pub const MOVES: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn parse_move(value: &str) -> Option<Self> {
        match value {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "none" => Some(Self::None),
            _ => None,
        }
    }

    /// Accepts only the five unit vectors (screen coordinates, y grows down).
    pub fn from_vector(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Self::Up),
            (0, 1) => Some(Self::Down),
            (-1, 0) => Some(Self::Left),
            (1, 0) => Some(Self::Right),
            (0, 0) => Some(Self::None),
            _ => None,
        }
    }

    /// Normalizes a touch swipe: the dominant axis wins, ties go vertical.
    /// A zero-length swipe (a tap) is rejected instead of read as Up, so a tap
    /// never turns the player.
    pub fn from_swipe(dx: f32, dy: f32) -> Option<Self> {
        if !dx.is_finite() || !dy.is_finite() || (dx == 0.0 && dy == 0.0) {
            return None;
        }
        if dx.abs() > dy.abs() {
            Some(if dx > 0.0 { Self::Right } else { Self::Left })
        } else {
            Some(if dy > 0.0 { Self::Down } else { Self::Up })
        }
    }

    /// True for the four movement directions.
    pub fn is_move(self) -> bool {
        self != Self::None
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::None => (0, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    pub fn step(self, dir: Direction, distance: i32) -> Self {
        let (dx, dy) = dir.delta();
        Self {
            col: self.col + dx * distance,
            row: self.row + dy * distance,
        }
    }

    /// Direction of a single orthogonal hop to `to`, if it is one.
    pub fn direction_to(self, to: Cell) -> Option<Direction> {
        Direction::from_vector(to.col - self.col, to.row - self.row)
    }

    pub fn center(self, cell_size: f32) -> (f32, f32) {
        (
            self.col as f32 * cell_size + cell_size / 2.0,
            self.row as f32 * cell_size + cell_size / 2.0,
        )
    }

    /// The cell containing a continuous position. Never cached on entities.
    pub fn containing(x: f32, y: f32, cell_size: f32) -> Self {
        Self {
            col: (x / cell_size).floor() as i32,
            row: (y / cell_size).floor() as i32,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    Standard,
    Power,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

#[derive(Clone, Debug, Serialize)]
pub struct GameConfig {
    pub cols: i32,
    pub rows: i32,
    #[serde(rename = "cellSize")]
    pub cell_size: f32,
    #[serde(rename = "playerSpeed")]
    pub player_speed: f32,
    #[serde(rename = "pursuerSpeed")]
    pub pursuer_speed: f32,
    #[serde(rename = "pursuerCount")]
    pub pursuer_count: usize,
    #[serde(rename = "initialLives")]
    pub initial_lives: u32,
    #[serde(rename = "freezeDurationMs")]
    pub freeze_duration_ms: u64,
    #[serde(rename = "standardPoints")]
    pub standard_points: u32,
    #[serde(rename = "powerPoints")]
    pub power_points: u32,
    #[serde(rename = "standardChance")]
    pub standard_chance: f32,
    #[serde(rename = "powerChance")]
    pub power_chance: f32,
    #[serde(rename = "perturbChance")]
    pub perturb_chance: f32,
    #[serde(rename = "wanderChance")]
    pub wander_chance: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cols: COLS,
            rows: ROWS,
            cell_size: CELL_SIZE,
            player_speed: PLAYER_SPEED,
            pursuer_speed: PURSUER_SPEED,
            pursuer_count: PURSUER_COUNT,
            initial_lives: INITIAL_LIVES,
            freeze_duration_ms: FREEZE_DURATION_MS,
            standard_points: STANDARD_POINTS,
            power_points: POWER_POINTS,
            standard_chance: STANDARD_PICKUP_CHANCE,
            power_chance: POWER_PICKUP_CHANCE,
            perturb_chance: PERTURB_CHANCE,
            wander_chance: WANDER_CHANCE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub dir: Direction,
    #[serde(rename = "nextDir")]
    pub next_dir: Direction,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PursuerView {
    pub id: usize,
    pub x: f32,
    pub y: f32,
    pub dir: Direction,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PickupView {
    pub col: i32,
    pub row: i32,
    pub kind: PickupKind,
}

#[derive(Clone, Debug, Serialize)]
pub struct MazeInit {
    pub cols: i32,
    pub rows: i32,
    #[serde(rename = "cellSize")]
    pub cell_size: f32,
    pub tiles: Vec<String>,
    pub seed: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuntimeEvent {
    PickupCollected {
        col: i32,
        row: i32,
        kind: PickupKind,
        score: u32,
    },
    FreezeStarted {
        #[serde(rename = "untilMs")]
        until_ms: u64,
    },
    LifeLost {
        #[serde(rename = "livesLeft")]
        lives_left: u32,
    },
    GameWon {
        score: u32,
    },
    GameLost {
        score: u32,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    #[serde(rename = "nowMs")]
    pub now_ms: u64,
    pub status: GameStatus,
    pub score: u32,
    pub lives: u32,
    #[serde(rename = "freezeUntilMs")]
    pub freeze_until_ms: u64,
    pub frozen: bool,
    pub player: PlayerView,
    pub pursuers: Vec<PursuerView>,
    pub pickups: Vec<PickupView>,
    pub events: Vec<RuntimeEvent>,
}

#[derive(Clone, Debug, Serialize)]
pub struct GameSummary {
    pub status: GameStatus,
    pub seed: u32,
    pub ticks: u64,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
    pub score: u32,
    pub lives: u32,
    #[serde(rename = "pickupsLeft")]
    pub pickups_left: usize,
    #[serde(rename = "standardCollected")]
    pub standard_collected: u32,
    #[serde(rename = "powerCollected")]
    pub power_collected: u32,
    #[serde(rename = "livesLost")]
    pub lives_lost: u32,
}
