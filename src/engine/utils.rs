use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::Direction;

pub(super) fn now_ms() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    now as u64
}

pub(super) fn advance(x: f32, y: f32, dir: Direction, speed: f32) -> (f32, f32) {
    let (dx, dy) = dir.delta();
    (x + dx as f32 * speed, y + dy as f32 * speed)
}

pub(super) fn distance(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    (bx - ax).hypot(by - ay)
}
