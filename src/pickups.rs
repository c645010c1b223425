use std::collections::BTreeMap;

use crate::maze::Maze;
use crate::rng::Rng;
use crate::types::{Cell, PickupKind, PickupView};

/// Rolls one cell. The power roll only happens when the standard roll misses,
/// so power density is `(1 - standard_chance) * power_chance`.
pub fn roll_pickup(standard_chance: f32, power_chance: f32, rng: &mut Rng) -> Option<PickupKind> {
    if rng.bool(standard_chance) {
        return Some(PickupKind::Standard);
    }
    if rng.bool(power_chance) {
        return Some(PickupKind::Power);
    }
    None
}

pub fn place_pickups(
    maze: &Maze,
    standard_chance: f32,
    power_chance: f32,
    rng: &mut Rng,
) -> BTreeMap<Cell, PickupKind> {
    let mut pickups = BTreeMap::new();
    for cell in maze.open_cells() {
        if let Some(kind) = roll_pickup(standard_chance, power_chance, rng) {
            pickups.insert(cell, kind);
        }
    }
    pickups
}

pub fn to_pickup_views(pickups: &BTreeMap<Cell, PickupKind>) -> Vec<PickupView> {
    pickups
        .iter()
        .map(|(cell, kind)| PickupView {
            col: cell.col,
            row: cell.row,
            kind: *kind,
        })
        .collect()
}
