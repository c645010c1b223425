use crate::engine::GameEngine;
use crate::pathfinding::step_toward_nearest;
use crate::types::{Cell, Direction};

/// Pursuers closer than this many cells (Manhattan) trigger a flee.
pub const DANGER_RADIUS: i32 = 2;

fn manhattan(a: Cell, b: Cell) -> i32 {
    (a.col - b.col).abs() + (a.row - b.row).abs()
}

fn nearest_pursuer(cell: Cell, pursuers: &[Cell]) -> Option<i32> {
    pursuers.iter().map(|p| manhattan(cell, *p)).min()
}

/// Picks the intent for the next tick, or `None` to keep the current one.
pub fn choose_direction(engine: &GameEngine) -> Option<Direction> {
    let maze = engine.maze();
    let from = engine.player_cell();
    let cell_size = engine.config.cell_size;

    if !engine.is_frozen(engine.now_ms()) {
        let pursuers: Vec<Cell> = engine
            .pursuers()
            .iter()
            .map(|p| Cell::containing(p.x, p.y, cell_size))
            .collect();
        if nearest_pursuer(from, &pursuers).is_some_and(|d| d <= DANGER_RADIUS) {
            return choose_escape_direction(engine, from, &pursuers);
        }
    }

    let pickups = engine.pickups();
    step_toward_nearest(maze, from, |cell| pickups.contains_key(&cell))
}

fn choose_escape_direction(engine: &GameEngine, from: Cell, pursuers: &[Cell]) -> Option<Direction> {
    let mut best = None;
    let mut best_dist = i32::MIN;
    for (dir, next) in engine.maze().open_neighbors(from) {
        let dist = nearest_pursuer(next, pursuers).unwrap_or(i32::MAX);
        if dist > best_dist {
            best_dist = dist;
            best = Some(dir);
        }
    }
    best
}
