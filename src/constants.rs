pub const FPS: u32 = 60;
pub const TICK_MS: u64 = 1000 / FPS as u64;

pub const CELL_SIZE: f32 = 24.0;
pub const COLS: i32 = 21;
pub const ROWS: i32 = 21;

pub const PLAYER_SPEED: f32 = 2.0;
pub const PURSUER_SPEED: f32 = 1.0;
pub const PURSUER_COUNT: usize = 3;
pub const INITIAL_LIVES: u32 = 3;

pub const FREEZE_DURATION_MS: u64 = 5_000;
pub const STANDARD_POINTS: u32 = 10;
pub const POWER_POINTS: u32 = 50;

pub const STANDARD_PICKUP_CHANCE: f32 = 0.6;
pub const POWER_PICKUP_CHANCE: f32 = 0.02;
pub const PERTURB_CHANCE: f32 = 0.05;
pub const WANDER_CHANCE: f32 = 0.3;

pub const MAZE_ORIGIN: (i32, i32) = (1, 1);
