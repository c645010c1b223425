use super::*;

impl GameEngine {
    /// Buffered turn first, then the current heading, otherwise stay put.
    pub(super) fn move_player(&mut self) {
        let speed = self.config.player_speed;
        let PlayerView {
            x,
            y,
            dir,
            next_dir,
        } = self.player.view;

        let (tx, ty) = advance(x, y, next_dir, speed);
        if self.can_occupy(tx, ty) {
            self.player.view.x = tx;
            self.player.view.y = ty;
            self.player.view.dir = next_dir;
            return;
        }

        let (cx, cy) = advance(x, y, dir, speed);
        if self.can_occupy(cx, cy) {
            self.player.view.x = cx;
            self.player.view.y = cy;
        }
    }

    /// Pursuers chase the player's current cell. A wander roll swaps the chase
    /// step for a random open neighbour. No wall check follows the move.
    pub(super) fn move_pursuers(&mut self, now_ms: u64) {
        if self.is_frozen(now_ms) {
            return;
        }
        let target = self.player_cell();
        let cell_size = self.config.cell_size;
        let speed = self.config.pursuer_speed;

        for idx in 0..self.pursuers.len() {
            let view = self.pursuers[idx].view;
            let from = Cell::containing(view.x, view.y, cell_size);
            let chase = next_step(&self.maze, from, target);

            let mut dir = view.dir;
            if self.rng.bool(self.config.wander_chance) {
                if let Some(wander) = wander_direction(&self.maze, from, &mut self.rng) {
                    dir = wander;
                }
            } else if let Some(chase) = chase {
                dir = chase;
            }

            let (x, y) = advance(view.x, view.y, dir, speed);
            let pursuer = &mut self.pursuers[idx].view;
            pursuer.dir = dir;
            pursuer.x = x;
            pursuer.y = y;
        }
    }
}
