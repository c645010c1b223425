use std::collections::{HashSet, VecDeque};

use crate::constants::MAZE_ORIGIN;
use crate::rng::Rng;
use crate::types::{Cell, Direction};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Open,
    Wall,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    cols: i32,
    rows: i32,
    tiles: Vec<Tile>,
}

impl Maze {
    pub fn filled(cols: i32, rows: i32) -> Self {
        let cols = cols.max(0);
        let rows = rows.max(0);
        Self {
            cols,
            rows,
            tiles: vec![Tile::Wall; (cols * rows) as usize],
        }
    }

    /// Builds a maze from `#` (wall) / `.` (open) rows. Rows must share one width.
    pub fn from_rows(rows: &[&str]) -> Option<Self> {
        let cols = rows.first().map(|row| row.len()).unwrap_or(0);
        let mut tiles = Vec::with_capacity(cols * rows.len());
        for row in rows {
            if row.len() != cols {
                return None;
            }
            for byte in row.bytes() {
                tiles.push(match byte {
                    b'.' => Tile::Open,
                    b'#' => Tile::Wall,
                    _ => return None,
                });
            }
        }
        Some(Self {
            cols: cols as i32,
            rows: rows.len() as i32,
            tiles,
        })
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.col >= 0 && cell.row >= 0 && cell.col < self.cols && cell.row < self.rows
    }

    pub fn tile(&self, cell: Cell) -> Option<Tile> {
        if !self.in_bounds(cell) {
            return None;
        }
        self.tiles.get(self.index(cell)).copied()
    }

    /// Out-of-bounds cells read as walls.
    pub fn is_open(&self, cell: Cell) -> bool {
        self.tile(cell) == Some(Tile::Open)
    }

    pub fn set_tile(&mut self, cell: Cell, tile: Tile) -> bool {
        if !self.in_bounds(cell) {
            return false;
        }
        let idx = self.index(cell);
        self.tiles[idx] = tile;
        true
    }

    pub fn open_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows)
            .flat_map(move |row| (0..self.cols).map(move |col| Cell::new(col, row)))
            .filter(|cell| self.is_open(*cell))
    }

    pub fn first_open_cell(&self) -> Option<Cell> {
        self.open_cells().next()
    }

    /// In-bounds 4-neighbours in up, down, left, right order.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = (Direction, Cell)> + '_ {
        Direction::MOVES
            .into_iter()
            .map(move |dir| (dir, cell.step(dir, 1)))
            .filter(|(_, next)| self.in_bounds(*next))
    }

    pub fn open_neighbors(&self, cell: Cell) -> Vec<(Direction, Cell)> {
        self.neighbors(cell)
            .filter(|(_, next)| self.is_open(*next))
            .collect()
    }

    pub fn reachable_from(&self, start: Cell) -> HashSet<Cell> {
        let mut out = HashSet::new();
        if !self.is_open(start) {
            return out;
        }

        let mut queue = VecDeque::new();
        out.insert(start);
        queue.push_back(start);

        while let Some(cell) = queue.pop_front() {
            for (_, next) in self.neighbors(cell) {
                if !self.is_open(next) {
                    continue;
                }
                if out.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        out
    }

    pub fn to_rows(&self) -> Vec<String> {
        (0..self.rows)
            .map(|row| {
                (0..self.cols)
                    .map(|col| {
                        if self.is_open(Cell::new(col, row)) {
                            '.'
                        } else {
                            '#'
                        }
                    })
                    .collect()
            })
            .collect()
    }

    pub(crate) fn index(&self, cell: Cell) -> usize {
        (cell.row * self.cols + cell.col) as usize
    }
}

/// Carving order before shuffling.
const CARVE_ORDER: [Direction; 4] = [
    Direction::Up,
    Direction::Right,
    Direction::Down,
    Direction::Left,
];

struct CarveFrame {
    cell: Cell,
    order: [Direction; 4],
    next: usize,
}

impl CarveFrame {
    fn enter(cell: Cell, rng: &mut Rng) -> Self {
        let mut order = CARVE_ORDER;
        rng.shuffle(&mut order);
        Self {
            cell,
            order,
            next: 0,
        }
    }
}

/// Randomized depth-first carving on the odd lattice, starting at (1,1).
///
/// Each visited cell shuffles its four 2-step moves once on entry and tries them
/// in that order, exactly like the recursive formulation; the explicit stack only
/// replaces the call stack. With an even width or height the lattice lands on the
/// last column/row, so that side has no wall border and open cells touch the grid
/// edge; movement treats the outside as wall. A grid too small to contain the
/// origin comes back all wall.
pub fn generate_maze(cols: i32, rows: i32, rng: &mut Rng) -> Maze {
    let mut maze = Maze::filled(cols, rows);
    let origin = Cell::new(MAZE_ORIGIN.0, MAZE_ORIGIN.1);
    if !maze.in_bounds(origin) {
        return maze;
    }
    maze.set_tile(origin, Tile::Open);

    let mut stack = vec![CarveFrame::enter(origin, rng)];
    while let Some(frame) = stack.last_mut() {
        if frame.next >= frame.order.len() {
            stack.pop();
            continue;
        }
        let dir = frame.order[frame.next];
        frame.next += 1;
        let from = frame.cell;

        let target = from.step(dir, 2);
        if maze.tile(target) != Some(Tile::Wall) {
            continue;
        }
        maze.set_tile(from.step(dir, 1), Tile::Open);
        maze.set_tile(target, Tile::Open);
        stack.push(CarveFrame::enter(target, rng));
    }

    maze
}

/// Opens extra interior walls to add loops. A wall is opened only when one of its
/// 4-neighbours is open at that moment, so no isolated pocket can appear.
/// Border cells are never touched. Returns the opened cells in scan order.
pub fn perturb_maze(maze: &mut Maze, chance: f32, rng: &mut Rng) -> Vec<Cell> {
    let mut opened = Vec::new();
    for row in 1..(maze.rows - 1) {
        for col in 1..(maze.cols - 1) {
            let cell = Cell::new(col, row);
            if maze.tile(cell) != Some(Tile::Wall) || !rng.bool(chance) {
                continue;
            }
            let touches_open = maze.neighbors(cell).any(|(_, next)| maze.is_open(next));
            if touches_open {
                maze.set_tile(cell, Tile::Open);
                opened.push(cell);
            }
        }
    }
    opened
}
