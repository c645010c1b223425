use std::collections::VecDeque;

use crate::maze::Maze;
use crate::rng::Rng;
use crate::types::{Cell, Direction};

/// Breadth-first search over open cells from `from`, stopping when a cell
/// satisfying `is_goal` is dequeued. Neighbours expand in up, down, left, right
/// order, so ties resolve the same way for a given maze. `from` itself may be a
/// wall cell (pursuers can stand in one); only the cells entered must be open.
/// Returns the hops after `from`, ending at the goal.
fn search<F>(maze: &Maze, from: Cell, is_goal: F) -> Option<Vec<Cell>>
where
    F: Fn(Cell) -> bool,
{
    if !maze.in_bounds(from) {
        return None;
    }

    let size = (maze.cols() * maze.rows()) as usize;
    let mut visited = vec![false; size];
    let mut prev: Vec<Option<Cell>> = vec![None; size];
    let mut queue = VecDeque::new();
    visited[maze.index(from)] = true;
    queue.push_back(from);

    let mut found = None;
    while let Some(current) = queue.pop_front() {
        if is_goal(current) {
            found = Some(current);
            break;
        }
        for (_, next) in maze.neighbors(current) {
            let idx = maze.index(next);
            if visited[idx] || !maze.is_open(next) {
                continue;
            }
            visited[idx] = true;
            prev[idx] = Some(current);
            queue.push_back(next);
        }
    }

    let goal = found?;
    let mut path = Vec::new();
    let mut cursor = goal;
    while let Some(before) = prev[maze.index(cursor)] {
        path.push(cursor);
        cursor = before;
    }
    path.reverse();
    Some(path)
}

/// Shortest path from `from` to `to` as the list of hops after `from`.
/// Empty when both cells are the same; `None` when unreachable or out of bounds.
pub fn shortest_path(maze: &Maze, from: Cell, to: Cell) -> Option<Vec<Cell>> {
    if !maze.in_bounds(to) {
        return None;
    }
    search(maze, from, |cell| cell == to)
}

/// First step of a shortest path, or `None` when there is nowhere to go.
pub fn next_step(maze: &Maze, from: Cell, to: Cell) -> Option<Direction> {
    let path = shortest_path(maze, from, to)?;
    let first = path.first()?;
    from.direction_to(*first)
}

/// First step toward the nearest cell matching `is_target`, excluding `from`.
pub fn step_toward_nearest<F>(maze: &Maze, from: Cell, is_target: F) -> Option<Direction>
where
    F: Fn(Cell) -> bool,
{
    let path = search(maze, from, |cell| cell != from && is_target(cell))?;
    let first = path.first()?;
    from.direction_to(*first)
}

/// Uniform choice among open neighbours; `None` when boxed in.
pub fn wander_direction(maze: &Maze, from: Cell, rng: &mut Rng) -> Option<Direction> {
    let options = maze.open_neighbors(from);
    if options.is_empty() {
        return None;
    }
    let idx = rng.pick_index(options.len());
    Some(options[idx].0)
}
