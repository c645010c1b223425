use std::collections::BTreeMap;

use crate::constants::MAZE_ORIGIN;
use crate::maze::{generate_maze, perturb_maze, Maze};
use crate::pathfinding::{next_step, wander_direction};
use crate::pickups::{place_pickups, to_pickup_views};
use crate::rng::Rng;
use crate::types::{
    Cell, Direction, GameConfig, GameStatus, GameSummary, MazeInit, PickupKind, PlayerView,
    PursuerView, RuntimeEvent, Snapshot,
};

mod collision;
mod movement;
mod utils;

use self::utils::{advance, distance, now_ms};

#[derive(Clone, Debug, Default)]
struct GameStats {
    standard_collected: u32,
    power_collected: u32,
    lives_lost: u32,
}

#[derive(Clone, Debug)]
struct PlayerInternal {
    view: PlayerView,
    spawn: (f32, f32),
}

#[derive(Clone, Debug)]
struct PursuerInternal {
    view: PursuerView,
    spawn: (f32, f32),
}

/// One game: maze, pickups, entities, score, lives and the freeze timer.
///
/// Every instance owns its state; nothing is shared between engines. The clock
/// is `started_at_ms + elapsed_ms`, where `elapsed_ms` only advances through
/// [`GameEngine::step`].
#[derive(Clone, Debug)]
pub struct GameEngine {
    pub started_at_ms: u64,
    pub config: GameConfig,
    pub seed: u32,

    rng: Rng,
    maze: Maze,
    pickups: BTreeMap<Cell, PickupKind>,
    player: PlayerInternal,
    pursuers: Vec<PursuerInternal>,
    events: Vec<RuntimeEvent>,
    stats: GameStats,

    score: u32,
    lives: u32,
    freeze_until_ms: u64,
    status: GameStatus,
    elapsed_ms: u64,
    tick_counter: u64,
}

impl GameEngine {
    /// Fresh game: carve, perturb, scatter pickups, place entities at spawn.
    pub fn new(seed: u32, config: GameConfig) -> Self {
        let mut rng = Rng::new(seed);
        let mut maze = generate_maze(config.cols, config.rows, &mut rng);
        perturb_maze(&mut maze, config.perturb_chance, &mut rng);
        Self::assemble(seed, config, maze, rng)
    }

    /// Fresh game on a prepared maze. Pickups are still scattered from `seed`.
    pub fn with_maze(seed: u32, config: GameConfig, maze: Maze) -> Self {
        Self::assemble(seed, config, maze, Rng::new(seed))
    }

    fn assemble(seed: u32, config: GameConfig, maze: Maze, mut rng: Rng) -> Self {
        let pickups = place_pickups(&maze, config.standard_chance, config.power_chance, &mut rng);

        let player_spawn = maze
            .first_open_cell()
            .unwrap_or(Cell::new(MAZE_ORIGIN.0, MAZE_ORIGIN.1))
            .center(config.cell_size);
        let player = PlayerInternal {
            view: PlayerView {
                x: player_spawn.0,
                y: player_spawn.1,
                dir: Direction::None,
                next_dir: Direction::None,
            },
            spawn: player_spawn,
        };

        let center = Cell::new(maze.cols() / 2, maze.rows() / 2);
        let pursuers = (0..config.pursuer_count)
            .map(|id| {
                let spawn = Cell::new(center.col + id as i32, center.row).center(config.cell_size);
                PursuerInternal {
                    view: PursuerView {
                        id,
                        x: spawn.0,
                        y: spawn.1,
                        dir: Direction::None,
                    },
                    spawn,
                }
            })
            .collect();

        Self {
            started_at_ms: now_ms(),
            lives: config.initial_lives,
            config,
            seed,
            rng,
            maze,
            pickups,
            player,
            pursuers,
            events: Vec::new(),
            stats: GameStats::default(),
            score: 0,
            freeze_until_ms: 0,
            status: GameStatus::Playing,
            elapsed_ms: 0,
            tick_counter: 0,
        }
    }

    /// Discards everything and starts over, valid at any point of a game.
    pub fn restart(&mut self, seed: u32) {
        *self = Self::new(seed, self.config.clone());
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_ended(&self) -> bool {
        self.status != GameStatus::Playing
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn pickups(&self) -> &BTreeMap<Cell, PickupKind> {
        &self.pickups
    }

    pub fn player(&self) -> &PlayerView {
        &self.player.view
    }

    pub fn player_cell(&self) -> Cell {
        Cell::containing(self.player.view.x, self.player.view.y, self.config.cell_size)
    }

    pub fn pursuers(&self) -> Vec<PursuerView> {
        self.pursuers.iter().map(|p| p.view).collect()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn now_ms(&self) -> u64 {
        self.started_at_ms.saturating_add(self.elapsed_ms)
    }

    pub fn tick(&self) -> u64 {
        self.tick_counter
    }

    pub fn is_frozen(&self, now_ms: u64) -> bool {
        now_ms < self.freeze_until_ms
    }

    /// Latest intent wins; it is consumed by the next tick's player move.
    /// `Direction::None` is not an intent and leaves the buffer untouched.
    pub fn set_direction_intent(&mut self, dir: Direction) -> bool {
        if !dir.is_move() {
            return false;
        }
        self.player.view.next_dir = dir;
        true
    }

    /// Raw vector input. Only the four unit axis vectors are accepted.
    pub fn set_direction_vector(&mut self, dx: i32, dy: i32) -> bool {
        match Direction::from_vector(dx, dy) {
            Some(dir) => self.set_direction_intent(dir),
            None => false,
        }
    }

    pub fn step(&mut self, dt_ms: u64) {
        if self.is_ended() {
            return;
        }
        self.tick_counter += 1;
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms);
        let now_ms = self.now_ms();

        self.move_player();
        self.collect_pickups(now_ms);
        if self.pickups.is_empty() {
            self.finish(GameStatus::Won);
            return;
        }
        self.move_pursuers(now_ms);
        self.resolve_pursuer_collisions(now_ms);
    }

    pub fn maze_init(&self) -> MazeInit {
        MazeInit {
            cols: self.maze.cols(),
            rows: self.maze.rows(),
            cell_size: self.config.cell_size,
            tiles: self.maze.to_rows(),
            seed: self.seed,
        }
    }

    pub fn build_snapshot(&mut self, include_events: bool) -> Snapshot {
        let now_ms = self.now_ms();
        let snapshot = Snapshot {
            tick: self.tick_counter,
            now_ms,
            status: self.status,
            score: self.score,
            lives: self.lives,
            freeze_until_ms: self.freeze_until_ms,
            frozen: self.is_frozen(now_ms),
            player: self.player.view,
            pursuers: self.pursuers(),
            pickups: to_pickup_views(&self.pickups),
            events: if include_events {
                self.events.clone()
            } else {
                Vec::new()
            },
        };
        if include_events {
            self.events.clear();
        }
        snapshot
    }

    pub fn build_summary(&self) -> GameSummary {
        GameSummary {
            status: self.status,
            seed: self.seed,
            ticks: self.tick_counter,
            duration_ms: self.elapsed_ms,
            score: self.score,
            lives: self.lives,
            pickups_left: self.pickups.len(),
            standard_collected: self.stats.standard_collected,
            power_collected: self.stats.power_collected,
            lives_lost: self.stats.lives_lost,
        }
    }

    #[cfg(test)]
    pub(crate) fn move_player_to(&mut self, cell: Cell) {
        let (x, y) = cell.center(self.config.cell_size);
        self.player.view.x = x;
        self.player.view.y = y;
    }

    #[cfg(test)]
    pub(crate) fn restart_pursuers_at(&mut self, cells: &[Cell]) {
        for (pursuer, cell) in self.pursuers.iter_mut().zip(cells) {
            let spawn = cell.center(self.config.cell_size);
            pursuer.spawn = spawn;
            pursuer.view.x = spawn.0;
            pursuer.view.y = spawn.1;
            pursuer.view.dir = Direction::None;
        }
    }

    fn can_occupy(&self, x: f32, y: f32) -> bool {
        self.maze
            .is_open(Cell::containing(x, y, self.config.cell_size))
    }

    fn reset_positions(&mut self) {
        let (x, y) = self.player.spawn;
        self.player.view = PlayerView {
            x,
            y,
            dir: Direction::None,
            next_dir: Direction::None,
        };
        for pursuer in &mut self.pursuers {
            pursuer.view.x = pursuer.spawn.0;
            pursuer.view.y = pursuer.spawn.1;
            pursuer.view.dir = Direction::None;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::constants::{FREEZE_DURATION_MS, TICK_MS};
    use crate::engine::GameEngine;
    use crate::maze::Maze;
    use crate::types::{Cell, Direction, GameConfig, GameStatus, PickupKind, RuntimeEvent};

    fn no_wander() -> GameConfig {
        GameConfig {
            wander_chance: 0.0,
            ..GameConfig::default()
        }
    }

    /// Corridor row 1 plus a side room the pursuers start in.
    fn corridor_engine() -> GameEngine {
        let maze = Maze::from_rows(&[
            "###########",
            "#.........#",
            "#.#######.#",
            "#.#.....#.#",
            "#.#.....#.#",
            "#.#.....#.#",
            "#.#######.#",
            "#.........#",
            "###########",
        ])
        .expect("valid layout");
        let mut engine = GameEngine::with_maze(7, no_wander(), maze);
        engine.pickups.clear();
        engine
    }

    fn place_at(engine: &mut GameEngine, cell: Cell) {
        let (x, y) = cell.center(engine.config.cell_size);
        engine.player.view.x = x;
        engine.player.view.y = y;
    }

    fn park_pursuers_far(engine: &mut GameEngine) {
        for pursuer in &mut engine.pursuers {
            pursuer.view.x = 5.5 * 24.0;
            pursuer.view.y = 4.5 * 24.0;
            pursuer.spawn = (pursuer.view.x, pursuer.view.y);
        }
    }

    #[test]
    fn new_game_starts_with_three_lives_and_pickups() {
        let engine = GameEngine::new(1, GameConfig::default());
        assert_eq!(engine.lives(), 3);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.status(), GameStatus::Playing);
        assert_eq!(engine.pursuers().len(), 3);
        assert!(!engine.pickups().is_empty());
        assert!(engine.maze().is_open(engine.player_cell()));
        assert_eq!(engine.player_cell(), Cell::new(1, 1));
    }

    #[test]
    fn pursuers_spawn_along_the_centre_row() {
        let engine = GameEngine::new(2, GameConfig::default());
        let cells: Vec<Cell> = engine
            .pursuers()
            .iter()
            .map(|p| Cell::containing(p.x, p.y, 24.0))
            .collect();
        assert_eq!(cells, vec![Cell::new(10, 10), Cell::new(11, 10), Cell::new(12, 10)]);
    }

    #[test]
    fn same_seed_produces_same_progression() {
        let mut a = GameEngine::new(424_242, GameConfig::default());
        let mut b = GameEngine::new(424_242, GameConfig::default());
        let script = [Direction::Right, Direction::Down, Direction::Left, Direction::Up];

        for tick in 0..600 {
            let dir = script[(tick / 40) % script.len()];
            a.set_direction_intent(dir);
            b.set_direction_intent(dir);
            a.step(TICK_MS);
            b.step(TICK_MS);
            let sa = a.build_snapshot(false);
            let sb = b.build_snapshot(false);

            assert_eq!(sa.player, sb.player);
            assert_eq!(sa.pursuers, sb.pursuers);
            assert_eq!(sa.score, sb.score);
            assert_eq!(sa.lives, sb.lives);
            assert_eq!(sa.status, sb.status);
        }
    }

    #[test]
    fn follow_mode_is_deterministic_across_instances() {
        let mut a = GameEngine::new(99, no_wander());
        let mut b = GameEngine::new(99, no_wander());
        for _ in 0..300 {
            a.step(TICK_MS);
            b.step(TICK_MS);
        }
        assert_eq!(a.pursuers(), b.pursuers());
        assert_eq!(a.player(), b.player());
        assert_eq!(a.score(), b.score());
        assert_eq!(a.lives(), b.lives());
    }

    #[test]
    fn blocked_intent_falls_back_to_current_direction() {
        let mut engine = corridor_engine();
        park_pursuers_far(&mut engine);
        engine.pickups.insert(Cell::new(9, 7), PickupKind::Standard);
        place_at(&mut engine, Cell::new(3, 1));
        engine.player.view.y = 25.0;
        engine.player.view.dir = Direction::Right;
        engine.set_direction_intent(Direction::Up);

        engine.step(TICK_MS);
        assert_eq!(engine.player().x, 3.5 * 24.0 + 2.0);
        assert_eq!(engine.player().y, 25.0);
        assert_eq!(engine.player().dir, Direction::Right);
        assert_eq!(engine.player().next_dir, Direction::Up);
    }

    #[test]
    fn turn_into_dead_end_stops_at_the_wall_edge() {
        let mut engine = corridor_engine();
        park_pursuers_far(&mut engine);
        engine.pickups.insert(Cell::new(9, 7), PickupKind::Standard);
        place_at(&mut engine, Cell::new(3, 1));
        engine.player.view.dir = Direction::Right;
        engine.set_direction_intent(Direction::Down);

        // The turn is accepted while the player stays inside the open cell.
        for _ in 0..5 {
            engine.step(TICK_MS);
        }
        assert_eq!(engine.player().dir, Direction::Down);
        assert_eq!(engine.player().y, 46.0);

        for _ in 0..5 {
            engine.step(TICK_MS);
        }
        assert_eq!(engine.player().x, 3.5 * 24.0);
        assert_eq!(engine.player().y, 46.0);
    }

    #[test]
    fn player_stays_when_both_directions_are_blocked() {
        let mut engine = corridor_engine();
        park_pursuers_far(&mut engine);
        engine.pickups.insert(Cell::new(9, 7), PickupKind::Standard);
        place_at(&mut engine, Cell::new(9, 1));
        engine.player.view.x = 9.0 * 24.0 + 23.0;
        engine.player.view.y = 25.0;
        engine.player.view.dir = Direction::Right;
        engine.set_direction_intent(Direction::Up);

        let before = *engine.player();
        engine.step(TICK_MS);
        assert_eq!(engine.player().x, before.x);
        assert_eq!(engine.player().y, before.y);
        assert_eq!(engine.player().dir, Direction::Right);
    }

    #[test]
    fn player_takes_buffered_turn_at_junction() {
        let mut engine = corridor_engine();
        park_pursuers_far(&mut engine);
        engine.pickups.insert(Cell::new(9, 7), PickupKind::Standard);
        place_at(&mut engine, Cell::new(1, 1));
        engine.set_direction_intent(Direction::Down);
        engine.step(TICK_MS);
        assert_eq!(engine.player().dir, Direction::Down);
        assert_eq!(engine.player().y, 1.5 * 24.0 + 2.0);
    }

    #[test]
    fn rejected_vector_leaves_intent_untouched() {
        let mut engine = corridor_engine();
        engine.set_direction_intent(Direction::Left);
        assert!(!engine.set_direction_vector(2, 0));
        assert!(!engine.set_direction_vector(1, 1));
        assert_eq!(engine.player().next_dir, Direction::Left);
        assert!(engine.set_direction_vector(0, 1));
        assert_eq!(engine.player().next_dir, Direction::Down);
    }

    #[test]
    fn zero_vector_cannot_stop_the_player_mid_corridor() {
        let mut engine = corridor_engine();
        park_pursuers_far(&mut engine);
        engine.pickups.insert(Cell::new(9, 7), PickupKind::Standard);
        place_at(&mut engine, Cell::new(3, 1));
        assert!(engine.set_direction_intent(Direction::Right));
        engine.step(TICK_MS);
        let x_before = engine.player().x;

        assert!(!engine.set_direction_vector(0, 0));
        assert!(!engine.set_direction_intent(Direction::None));
        assert_eq!(engine.player().next_dir, Direction::Right);

        engine.step(TICK_MS);
        assert_eq!(engine.player().x, x_before + 2.0);
        assert_eq!(engine.player().dir, Direction::Right);
    }

    #[test]
    fn standard_pickup_adds_ten_points_and_disappears() {
        let mut engine = corridor_engine();
        park_pursuers_far(&mut engine);
        place_at(&mut engine, Cell::new(5, 1));
        engine.pickups.insert(Cell::new(5, 1), PickupKind::Standard);
        engine.pickups.insert(Cell::new(9, 7), PickupKind::Standard);

        engine.step(TICK_MS);

        assert_eq!(engine.score(), 10);
        let snapshot = engine.build_snapshot(true);
        assert!(!snapshot
            .pickups
            .iter()
            .any(|p| p.col == 5 && p.row == 1));
        assert_eq!(snapshot.pickups.len(), 1);
        assert!(snapshot.events.iter().any(|event| matches!(
            event,
            RuntimeEvent::PickupCollected {
                col: 5,
                row: 1,
                kind: PickupKind::Standard,
                score: 10
            }
        )));
    }

    #[test]
    fn power_pickup_freezes_pursuers_for_the_full_window() {
        let mut engine = corridor_engine();
        place_at(&mut engine, Cell::new(5, 1));
        engine.pickups.insert(Cell::new(5, 1), PickupKind::Power);
        engine.pickups.insert(Cell::new(9, 7), PickupKind::Standard);

        engine.step(TICK_MS);
        let collected_at = engine.now_ms();
        assert_eq!(engine.score(), 50);
        assert_eq!(engine.freeze_until_ms, collected_at + FREEZE_DURATION_MS);

        // Put a pursuer right on top of the player.
        engine.pursuers[0].view.x = engine.player.view.x;
        engine.pursuers[0].view.y = engine.player.view.y;
        for offset in [0, 1, 2_500, FREEZE_DURATION_MS - 1] {
            engine.resolve_pursuer_collisions(collected_at + offset);
            assert_eq!(engine.lives(), 3, "lost a life {offset}ms into the freeze");
        }
        assert!(!engine.is_frozen(collected_at + FREEZE_DURATION_MS));
        engine.resolve_pursuer_collisions(collected_at + FREEZE_DURATION_MS);
        assert_eq!(engine.lives(), 2);
    }

    #[test]
    fn frozen_pursuers_do_not_move() {
        let mut engine = corridor_engine();
        engine.pickups.insert(Cell::new(9, 7), PickupKind::Standard);
        place_at(&mut engine, Cell::new(1, 4));
        let (x, y) = Cell::new(1, 1).center(24.0);
        engine.pursuers[0].view.x = x;
        engine.pursuers[0].view.y = y;
        engine.freeze_until_ms = engine.now_ms() + 10_000;
        let before = engine.pursuers();
        for _ in 0..30 {
            engine.step(TICK_MS);
        }
        assert_eq!(engine.pursuers(), before);
    }

    #[test]
    fn last_life_lost_ends_the_game() {
        let mut engine = corridor_engine();
        engine.pickups.insert(Cell::new(9, 7), PickupKind::Standard);
        engine.lives = 1;
        place_at(&mut engine, Cell::new(5, 1));
        engine.pursuers.truncate(1);
        engine.pursuers[0].view.x = engine.player.view.x + 3.0;
        engine.pursuers[0].view.y = engine.player.view.y;

        engine.step(TICK_MS);
        assert_eq!(engine.lives(), 0);
        assert_eq!(engine.status(), GameStatus::Lost);

        let player = *engine.player();
        let pursuers = engine.pursuers();
        let tick = engine.tick();
        engine.set_direction_intent(Direction::Left);
        for _ in 0..10 {
            engine.step(TICK_MS);
        }
        assert_eq!((engine.player().x, engine.player().y), (player.x, player.y));
        assert_eq!(engine.player().dir, player.dir);
        assert_eq!(engine.pursuers(), pursuers);
        assert_eq!(engine.tick(), tick);
        assert_eq!(engine.build_summary().duration_ms, TICK_MS);
    }

    #[test]
    fn life_loss_resets_positions_but_keeps_score_and_pickups() {
        let mut engine = corridor_engine();
        engine.pickups.insert(Cell::new(9, 7), PickupKind::Standard);
        engine.pickups.insert(Cell::new(1, 7), PickupKind::Standard);
        engine.score = 120;
        place_at(&mut engine, Cell::new(5, 1));
        engine.player.view.dir = Direction::Right;
        engine.pursuers[1].view.x = engine.player.view.x;
        engine.pursuers[1].view.y = engine.player.view.y;

        engine.resolve_pursuer_collisions(engine.now_ms());

        assert_eq!(engine.lives(), 2);
        assert_eq!(engine.score(), 120);
        assert_eq!(engine.pickups().len(), 2);
        assert_eq!(engine.player_cell(), Cell::new(1, 1));
        assert_eq!(engine.player().dir, Direction::None);
        for pursuer in &engine.pursuers {
            assert_eq!((pursuer.view.x, pursuer.view.y), pursuer.spawn);
            assert_eq!(pursuer.view.dir, Direction::None);
        }
        assert_eq!(engine.status(), GameStatus::Playing);
    }

    #[test]
    fn one_life_per_tick_even_with_several_hits() {
        let mut engine = corridor_engine();
        engine.pickups.insert(Cell::new(9, 7), PickupKind::Standard);
        place_at(&mut engine, Cell::new(5, 1));
        for pursuer in &mut engine.pursuers {
            pursuer.view.x = engine.player.view.x;
            pursuer.view.y = engine.player.view.y;
        }
        engine.resolve_pursuer_collisions(engine.now_ms());
        assert_eq!(engine.lives(), 2);
    }

    #[test]
    fn collecting_the_last_pickup_wins_before_pursuers_move() {
        let mut engine = corridor_engine();
        place_at(&mut engine, Cell::new(5, 1));
        engine.pickups.insert(Cell::new(5, 1), PickupKind::Standard);
        engine.pursuers.truncate(1);
        engine.pursuers[0].view.x = engine.player.view.x + 6.0;
        engine.pursuers[0].view.y = engine.player.view.y;
        let pursuers_before = engine.pursuers();

        engine.step(TICK_MS);

        assert_eq!(engine.status(), GameStatus::Won);
        assert_eq!(engine.pursuers(), pursuers_before);
        assert_eq!(engine.lives(), 3);
        let snapshot = engine.build_snapshot(true);
        assert!(snapshot
            .events
            .iter()
            .any(|event| matches!(event, RuntimeEvent::GameWon { score: 10 })));
    }

    #[test]
    fn empty_pickup_set_wins_on_next_tick() {
        let mut engine = corridor_engine();
        engine.step(TICK_MS);
        assert_eq!(engine.status(), GameStatus::Won);
    }

    #[test]
    fn pursuer_follows_shortest_path_without_wander() {
        let mut engine = corridor_engine();
        engine.pickups.insert(Cell::new(9, 7), PickupKind::Standard);
        engine.pursuers.truncate(1);
        place_at(&mut engine, Cell::new(1, 4));
        let (x, y) = Cell::new(1, 1).center(24.0);
        engine.pursuers[0].view.x = x;
        engine.pursuers[0].view.y = y;

        engine.step(TICK_MS);
        assert_eq!(engine.pursuers[0].view.dir, Direction::Down);
        assert_eq!(engine.pursuers[0].view.y, y + 1.0);
    }

    #[test]
    fn pursuer_keeps_direction_when_sharing_the_player_cell() {
        let mut engine = corridor_engine();
        engine.pickups.insert(Cell::new(9, 7), PickupKind::Standard);
        engine.pursuers.truncate(1);
        place_at(&mut engine, Cell::new(5, 1));
        engine.freeze_until_ms = 0;
        let (x, y) = Cell::new(5, 1).center(24.0);
        engine.pursuers[0].view.x = x - 11.0;
        engine.pursuers[0].view.y = y;
        engine.pursuers[0].view.dir = Direction::Right;

        engine.move_pursuers(engine.now_ms());
        assert_eq!(engine.pursuers[0].view.dir, Direction::Right);
        assert_eq!(engine.pursuers[0].view.x, x - 10.0);
    }

    #[test]
    fn full_wander_only_picks_open_neighbours() {
        let maze = Maze::from_rows(&["#####", "#...#", "##.##", "#####"]).expect("valid layout");
        let config = GameConfig {
            wander_chance: 1.0,
            pursuer_count: 1,
            ..GameConfig::default()
        };
        let mut engine = GameEngine::with_maze(3, config, maze);
        engine.pickups = BTreeMap::from([(Cell::new(3, 1), PickupKind::Standard)]);
        for _ in 0..50 {
            let (x, y) = Cell::new(2, 1).center(24.0);
            engine.pursuers[0].view.x = x;
            engine.pursuers[0].view.y = y;
            engine.move_pursuers(engine.now_ms());
            assert_ne!(engine.pursuers[0].view.dir, Direction::Up);
            assert_ne!(engine.pursuers[0].view.dir, Direction::None);
        }
    }

    #[test]
    fn restart_rebuilds_fresh_state() {
        let mut engine = GameEngine::new(5, GameConfig::default());
        engine.lives = 1;
        engine.score = 300;
        engine.status = GameStatus::Lost;
        engine.restart(6);
        assert_eq!(engine.lives(), 3);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.status(), GameStatus::Playing);
        assert_eq!(engine.tick(), 0);
        assert_eq!(engine.seed, 6);
        let fresh = GameEngine::new(6, GameConfig::default());
        assert_eq!(engine.maze(), fresh.maze());
        assert_eq!(engine.pickups(), fresh.pickups());
    }

    #[test]
    fn finishing_as_playing_changes_nothing() {
        let mut engine = corridor_engine();
        engine.finish(GameStatus::Playing);
        assert_eq!(engine.status(), GameStatus::Playing);
        assert!(engine.events.is_empty());

        engine.finish(GameStatus::Won);
        engine.finish(GameStatus::Lost);
        assert_eq!(engine.status(), GameStatus::Won);
        assert_eq!(engine.events, vec![RuntimeEvent::GameWon { score: 0 }]);
    }

    #[test]
    fn build_snapshot_drains_events_when_requested() {
        let mut engine = corridor_engine();
        engine.events.push(RuntimeEvent::LifeLost { lives_left: 2 });

        let peek = engine.build_snapshot(false);
        let first = engine.build_snapshot(true);
        let second = engine.build_snapshot(true);
        assert!(peek.events.is_empty());
        assert_eq!(first.events.len(), 1);
        assert_eq!(second.events.len(), 0);
    }

    #[test]
    fn summary_counts_collections() {
        let mut engine = corridor_engine();
        park_pursuers_far(&mut engine);
        place_at(&mut engine, Cell::new(2, 1));
        engine.pickups.insert(Cell::new(2, 1), PickupKind::Power);
        engine.pickups.insert(Cell::new(9, 7), PickupKind::Standard);
        engine.step(TICK_MS);
        let summary = engine.build_summary();
        assert_eq!(summary.power_collected, 1);
        assert_eq!(summary.standard_collected, 0);
        assert_eq!(summary.score, 50);
        assert_eq!(summary.pickups_left, 1);
        assert_eq!(summary.ticks, 1);
        assert_eq!(summary.duration_ms, TICK_MS);
    }
}
