//! Arena controller: growth, world mutation, scoring and respawns

use glam::{Vec2, Vec3};
use rand::Rng;

use super::orb::{Orb, pick_weighted};
use super::state::{ArenaState, GameEvent, GamePhase};
use super::tile::GroundTile;
use crate::consts::DESTROY_ID_RANGE;

impl ArenaState {
    /// Grow the platform and materialize any ground it now covers
    pub fn grow(&mut self, dt: f32) {
        self.half_size += self.tuning.arena.growth_rate * dt;
        if self.half_size > self.grid.extent() {
            self.materialize_ground();
        }
    }

    /// Create tiles for every ring needed to cover the current half size
    pub(crate) fn materialize_ground(&mut self) {
        let centers = self.grid.expand_to(self.half_size);
        if centers.is_empty() {
            return;
        }
        log::debug!(
            "Ground grew to {} rings (+{} tiles)",
            self.grid.rings(),
            centers.len()
        );
        self.tiles.reserve(centers.len());
        for center in centers {
            let id = self.next_entity_id();
            let random_id = self.rng.random_range(0..DESTROY_ID_RANGE);
            self.tiles.push(GroundTile::new(id, center, random_id));
        }
    }

    /// One world mutation: doom another tile id and spawn an orb
    pub fn periodic_mutate(&mut self) {
        self.roll_destroy_id();
        self.spawn_random_orb();
    }

    /// Append to the destroy set: a no-op sentinel during warm-up, afterwards an
    /// id not drawn before in this run
    pub fn roll_destroy_id(&mut self) -> Option<u8> {
        if self.destroy_set.len() < self.tuning.arena.warmup_mutations as usize {
            self.destroy_set.push_sentinel();
            return None;
        }
        let id = self.destroy_set.push_random(&mut self.rng, DESTROY_ID_RANGE);
        if let Some(id) = id {
            log::debug!("Tile id {} doomed", id);
        }
        id
    }

    /// Spawn one orb at a uniform in-bounds position with a weighted tier
    pub fn spawn_random_orb(&mut self) -> Option<u32> {
        let orb_tuning = &self.tuning.arena.orb;
        let weights: Vec<u32> = orb_tuning.tiers.iter().map(|t| t.weight).collect();
        let Some(tier) = pick_weighted(&weights, &mut self.rng) else {
            log::warn!("No orb tiers configured, skipping orb spawn");
            return None;
        };
        let kind = orb_tuning.tiers[tier];
        let (height, grow_time) = (orb_tuning.height, orb_tuning.grow_time);

        let bound = self.half_size.max(f32::EPSILON);
        let x = self.rng.random_range(-bound..bound);
        let z = self.rng.random_range(-bound..bound);
        let position = Vec3::new(x, height, z);

        let id = self.next_entity_id();
        self.orbs.push(Orb::new(id, position, tier, &kind, grow_time));
        self.events.push(GameEvent::OrbSpawned {
            orb_id: id,
            tier,
            position,
        });
        Some(id)
    }

    /// Live tile closest to the arena origin
    pub fn nearest_tile_to_origin(&self) -> Option<usize> {
        self.tiles
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.position
                    .length_squared()
                    .partial_cmp(&b.position.length_squared())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i)
    }

    /// Spend a life after a fall. Teleports the player above the tile nearest
    /// the center (locking it), or ends the run when no lives remain.
    pub fn respawn_player(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::HealthChanged {
            lives: self.lives,
            max_lives: self.tuning.arena.max_lives,
        });

        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            log::info!("Game over with {} points", self.score);
            self.events.push(GameEvent::GameOver {
                final_score: self.score,
            });
            return;
        }

        let mut position = Vec3::new(0.0, self.tuning.arena.level_height, 0.0);
        match self.nearest_tile_to_origin() {
            Some(index) => {
                let tile = &mut self.tiles[index];
                tile.locked = true;
                position += tile.position;
            }
            None => log::warn!("No ground left to respawn on, using arena origin"),
        }

        self.player.teleport(position);
        self.events.push(GameEvent::PlayerRespawned { position });
        self.events.push(GameEvent::OrbTrailsReset);
        log::info!("Player respawned at {:?}, {} lives left", position, self.lives);
    }

    /// Accumulate score and notify the HUD
    pub fn add_points(&mut self, value: u32) {
        self.score += value as u64;
        self.events.push(GameEvent::ScoreChanged {
            added: value,
            total: self.score,
        });
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
            self.events.push(GameEvent::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Playing;
            self.events.push(GameEvent::Resumed);
        }
    }

    /// Ground point of the player's feet
    pub fn player_ground_position(&self) -> Vec2 {
        Vec2::new(self.player.position.x, self.player.position.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn state() -> ArenaState {
        let mut state = ArenaState::new(1234, Tuning::default());
        state.drain_events();
        state
    }

    #[test]
    fn test_growth_materializes_next_ring() {
        let mut state = state();
        let before = state.tiles.len();
        // 0.1 u/s growth: pass the 10 unit extent
        state.grow(1.0);
        assert!(state.half_size > 10.0);
        assert_eq!(state.grid.rings(), 6);
        assert_eq!(state.tiles.len(), before + 8 * 6 - 4);
        let count = state.tiles.len();
        state.grow(0.5);
        assert_eq!(state.tiles.len(), count);
    }

    #[test]
    fn test_first_mutations_are_sentinels() {
        let mut state = state();
        for _ in 0..5 {
            assert_eq!(state.roll_destroy_id(), None);
        }
        assert_eq!(state.destroy_set.len(), 5);
        assert_eq!(state.destroy_set.ids().count(), 0);
        let id = state.roll_destroy_id().unwrap();
        assert!(id < 100);
        assert!(state.destroy_set.contains(id));
    }

    #[test]
    fn test_mutation_spawns_exactly_one_orb_in_bounds() {
        let mut state = state();
        for i in 1..=20 {
            state.periodic_mutate();
            assert_eq!(state.orbs.len(), i);
            assert_eq!(state.destroy_set.len(), i);
        }
        for orb in &state.orbs {
            assert!(orb.position.x.abs() < state.half_size);
            assert!(orb.position.z.abs() < state.half_size);
            assert_eq!(orb.position.y, state.tuning.arena.orb.height);
        }
    }

    #[test]
    fn test_respawn_with_last_life_ends_run() {
        let mut state = state();
        state.lives = 1;
        state.score = 420;
        state.respawn_player();
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(
            state
                .events
                .contains(&GameEvent::GameOver { final_score: 420 })
        );
    }

    #[test]
    fn test_respawn_anchors_on_nearest_tile() {
        let mut state = state();
        // knock out the four center tiles so the nearest is in ring 2
        state.tiles.retain(|t| t.position.length() > 2.0);
        let expected = state.tiles[state.nearest_tile_to_origin().unwrap()].clone();
        assert!(!expected.locked);

        state.respawn_player();
        assert_eq!(state.lives, 2);
        assert_eq!(state.phase, GamePhase::Playing);
        let offset = Vec3::new(0.0, state.tuning.arena.level_height, 0.0);
        assert_eq!(state.player.position, expected.position + offset);
        let tile = state.tiles.iter().find(|t| t.id == expected.id).unwrap();
        assert!(tile.locked);
    }

    #[test]
    fn test_respawn_without_ground_uses_origin() {
        let mut state = state();
        state.tiles.clear();
        state.respawn_player();
        assert_eq!(state.player.position, Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn test_add_points() {
        let mut state = state();
        state.add_points(10);
        state.add_points(50);
        assert_eq!(state.score, 60);
        assert_eq!(
            state.events.last(),
            Some(&GameEvent::ScoreChanged {
                added: 50,
                total: 60
            })
        );
    }
}
