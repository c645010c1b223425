use super::*;

impl GameEngine {
    pub(super) fn collect_pickups(&mut self, now_ms: u64) {
        let cell = self.player_cell();
        let Some(kind) = self.pickups.remove(&cell) else {
            return;
        };

        match kind {
            PickupKind::Standard => {
                self.score = self.score.saturating_add(self.config.standard_points);
                self.stats.standard_collected += 1;
            }
            PickupKind::Power => {
                self.score = self.score.saturating_add(self.config.power_points);
                self.stats.power_collected += 1;
                // A second power pickup restarts the window rather than extending it.
                self.freeze_until_ms = now_ms.saturating_add(self.config.freeze_duration_ms);
                self.events.push(RuntimeEvent::FreezeStarted {
                    until_ms: self.freeze_until_ms,
                });
            }
        }

        self.events.push(RuntimeEvent::PickupCollected {
            col: cell.col,
            row: cell.row,
            kind,
            score: self.score,
        });
    }

    /// Costs at most one life per tick; a hit resets every entity to spawn.
    pub(super) fn resolve_pursuer_collisions(&mut self, now_ms: u64) {
        if self.is_frozen(now_ms) {
            return;
        }
        let reach = self.config.cell_size / 2.0;
        let PlayerView { x, y, .. } = self.player.view;
        let hit = self
            .pursuers
            .iter()
            .any(|p| distance(p.view.x, p.view.y, x, y) < reach);
        if !hit {
            return;
        }

        self.lives = self.lives.saturating_sub(1);
        self.stats.lives_lost += 1;
        self.events.push(RuntimeEvent::LifeLost {
            lives_left: self.lives,
        });

        if self.lives == 0 {
            self.finish(GameStatus::Lost);
        } else {
            self.reset_positions();
        }
    }

    pub(super) fn finish(&mut self, status: GameStatus) {
        if self.is_ended() {
            return;
        }
        let score = self.score;
        let event = match status {
            GameStatus::Playing => return,
            GameStatus::Won => RuntimeEvent::GameWon { score },
            GameStatus::Lost => RuntimeEvent::GameLost { score },
        };
        self.status = status;
        self.events.push(event);
    }
}
