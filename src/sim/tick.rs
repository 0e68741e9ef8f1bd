//! Fixed timestep simulation tick
//!
//! Core game loop that advances the arena by one step.

use glam::Vec2;

use super::state::{ArenaState, GameEvent, GamePhase};
use super::world::{ArenaWorld, Collider};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Local movement intent (x = strafe right, y = forward), clamped to unit length
    pub move_input: Vec2,
    /// Look deltas (x = yaw, y = pitch), already scaled by sensitivity
    pub look: Vec2,
    pub jump: bool,
    pub sprint: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the arena by one fixed timestep
pub fn tick(state: &mut ArenaState, input: &TickInput, dt: f32) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => state.pause(),
            GamePhase::Paused => state.resume(),
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time += dt;
    state.grow(dt);

    // World mutation runs on its own cadence, independent of frame rate
    state.mutate_timer -= dt;
    while state.mutate_timer <= 0.0 {
        state.periodic_mutate();
        state.mutate_timer += state.tuning.arena.mutate_interval.max(dt);
    }

    crumble_doomed_tiles(state);
    step_player(state, input, dt);
    if state.phase != GamePhase::Playing {
        return;
    }
    step_orbs(state, dt);
}

/// Remove every unlocked tile whose id is in the destroy set
fn crumble_doomed_tiles(state: &mut ArenaState) {
    let destroy_set = &state.destroy_set;
    let events = &mut state.events;
    state.tiles.retain(|tile| {
        if tile.is_doomed(destroy_set) {
            events.push(GameEvent::TileDestroyed {
                tile_id: tile.id,
                position: tile.position,
            });
            false
        } else {
            true
        }
    });
}

/// Locomotion plus the arena wrapper: tile contact locks, bounds and falls
fn step_player(state: &mut ArenaState, input: &TickInput, dt: f32) {
    let (report, contacts) = {
        let world = ArenaWorld::new(
            &state.tiles,
            state.tuning.arena.tile_size,
            state.tuning.arena.tile_thickness,
            state.half_size,
        );
        let report = state.player.step(&world, input, &state.tuning.locomotion, dt);
        let contacts = match state.player.ground_contact {
            Some(Collider::Tile(_)) => world.tiles_touching(&state.player.capsule()),
            _ => Vec::new(),
        };
        (report, contacts)
    };

    if report.jumped {
        state.events.push(GameEvent::Jumped);
    }
    if report.landed {
        state.events.push(GameEvent::Landed);
    }
    if report.footstep {
        state.events.push(GameEvent::Footstep {
            sprinting: report.sprinting,
        });
    }

    // Every tile under the player stays locked, not just the one the probe hit
    let previous = std::mem::take(&mut state.contacted_tiles);
    for &id in previous.iter().filter(|id| !contacts.contains(id)) {
        if let Some(tile) = state.tile_mut(id) {
            tile.on_contact_exit();
        }
    }
    for &id in contacts.iter().filter(|id| !previous.contains(id)) {
        if let Some(tile) = state.tile_mut(id) {
            tile.on_contact_enter();
        }
    }
    state.contacted_tiles = contacts;

    let bound = state.player_bound();
    state.player.clamp_horizontal(bound);

    let kill_plane = -state.tuning.arena.level_height;
    if !state.player.is_grounded() && state.player.position.y <= kill_plane {
        state.player.reset_horizontal_velocity();
        state.respawn_player();
    }
}

/// Patrol orbs and collect the ones the player touches
fn step_orbs(state: &mut ArenaState, dt: f32) {
    let capsule = state.player.capsule();
    let orb_tuning = &state.tuning.arena.orb;
    let mut collected = Vec::new();
    for orb in &mut state.orbs {
        orb.advance(state.half_size, orb_tuning, &mut state.rng, dt);
        if capsule.overlaps_sphere(orb.position, orb.contact_radius(orb_tuning)) {
            collected.push(orb.id);
        }
    }
    if collected.is_empty() {
        return;
    }

    let mut picked = Vec::with_capacity(collected.len());
    state.orbs.retain(|orb| {
        if collected.contains(&orb.id) {
            picked.push((orb.id, orb.points, orb.color, orb.position));
            false
        } else {
            true
        }
    });
    for (orb_id, points, color, position) in picked {
        state.events.push(GameEvent::OrbCollected {
            orb_id,
            points,
            color,
            position,
        });
        state.add_points(points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::effects::Effect;
    use crate::sim::orb::Orb;
    use crate::tuning::Tuning;
    use glam::Vec3;

    fn settled_state(seed: u64) -> ArenaState {
        let mut state = ArenaState::new(seed, Tuning::default());
        // fall from spawn height onto the floor
        for _ in 0..100 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        state.drain_events();
        state
    }

    #[test]
    fn test_player_lands_and_locks_tile() {
        let state = settled_state(1);
        assert!(state.player.is_grounded());
        let Some(Collider::Tile(id)) = state.player.ground_contact else {
            panic!("player should stand on a tile");
        };
        assert!(state.tiles.iter().find(|t| t.id == id).unwrap().locked);
    }

    #[test]
    fn test_every_tile_under_player_survives_doom() {
        let mut state = settled_state(1);
        // spawn is on the corner shared by four tiles
        let touched: Vec<u32> = state.contacted_tiles.clone();
        assert_eq!(touched.len(), 4);
        for id in &touched {
            let tile = state.tiles.iter().find(|t| t.id == *id).unwrap();
            assert!(tile.locked);
            state.destroy_set.push(tile.random_id);
        }

        tick(&mut state, &TickInput::default(), SIM_DT);
        for id in &touched {
            assert!(state.tiles.iter().any(|t| t.id == *id));
        }
    }

    #[test]
    fn test_jumping_unlocks_touched_tiles() {
        let mut state = settled_state(2);
        let touched = state.contacted_tiles.clone();
        assert!(!touched.is_empty());
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump, SIM_DT);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(!state.player.is_grounded());
        assert!(state.contacted_tiles.is_empty());
        for id in &touched {
            assert!(!state.tiles.iter().find(|t| t.id == *id).unwrap().locked);
        }
    }

    #[test]
    fn test_first_tick_mutates_then_every_interval() {
        let mut state = ArenaState::new(5, Tuning::default());
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.destroy_set.len(), 1);
        assert_eq!(state.orbs.len(), 1);
        // 3 seconds later exactly one more
        for _ in 0..150 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.destroy_set.len(), 2);
    }

    #[test]
    fn test_pause_freezes_world() {
        let mut state = settled_state(2);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);
        let half_size = state.half_size;
        let time = state.time;
        for _ in 0..50 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.half_size, half_size);
        assert_eq!(state.time, time);

        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_doomed_tiles_crumble_unless_locked() {
        let mut state = settled_state(3);
        let Some(Collider::Tile(standing)) = state.player.ground_contact else {
            panic!("player should stand on a tile");
        };
        let standing_id = state.tiles.iter().find(|t| t.id == standing).unwrap().random_id;
        let touched_ids: Vec<u8> = state
            .tiles
            .iter()
            .filter(|t| state.contacted_tiles.contains(&t.id))
            .map(|t| t.random_id)
            .collect();
        // doom the id of the tile under the player plus one id away from it
        let other = state
            .tiles
            .iter()
            .find(|t| !touched_ids.contains(&t.random_id))
            .unwrap()
            .random_id;
        state.destroy_set.push(standing_id);
        state.destroy_set.push(other);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.tiles.iter().any(|t| t.id == standing));
        assert!(state.tiles.iter().all(|t| t.random_id != other));
        assert!(
            state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::TileDestroyed { .. }))
        );
    }

    #[test]
    fn test_fall_triggers_exactly_one_respawn() {
        let mut state = settled_state(4);
        state.tiles.clear();
        let mut respawns = 0;
        for _ in 0..200 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            respawns += state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::PlayerRespawned { .. }))
                .count();
            if respawns > 0 {
                break;
            }
        }
        assert_eq!(respawns, 1);
        assert_eq!(state.lives, 2);
        assert_eq!(state.player.position.y, state.tuning.arena.level_height);
        assert_eq!(state.player.velocity.x, 0.0);
        assert_eq!(state.player.velocity.z, 0.0);
    }

    #[test]
    fn test_running_out_of_lives_stops_ticking() {
        let mut state = settled_state(6);
        state.lives = 1;
        state.tiles.clear();
        for _ in 0..500 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        let time = state.time;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time, time);
    }

    #[test]
    fn test_orb_contact_awards_points_once() {
        let mut state = settled_state(7);
        state.orbs.clear();
        let id = state.next_entity_id();
        let tier = state.tuning.arena.orb.tiers[1];
        let mut orb = Orb::new(id, state.player.position + Vec3::Y, 1, &tier, 0.0);
        orb.grow.advance(1.0);
        state.orbs.push(orb);

        let score = state.score;
        tick(&mut state, &TickInput::default(), SIM_DT);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.score, score + tier.points as u64);
        assert!(state.orbs.iter().all(|o| o.id != id));
        let collected = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::OrbCollected { orb_id, .. } if *orb_id == id))
            .count();
        assert_eq!(collected, 1);
    }

    #[test]
    fn test_player_clamped_to_arena() {
        let mut state = settled_state(8);
        state.player.position.x = 100.0;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.player.position.x <= state.player_bound());
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = ArenaState::new(99999, Tuning::default());
        let mut state2 = ArenaState::new(99999, Tuning::default());

        let inputs = [
            TickInput {
                move_input: Vec2::new(0.0, 1.0),
                ..Default::default()
            },
            TickInput {
                jump: true,
                ..Default::default()
            },
            TickInput {
                look: Vec2::new(0.1, 0.0),
                sprint: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..100 {
            for input in &inputs {
                tick(&mut state1, input, SIM_DT);
                tick(&mut state2, input, SIM_DT);
            }
        }

        assert_eq!(state1.tiles.len(), state2.tiles.len());
        assert_eq!(state1.orbs.len(), state2.orbs.len());
        assert_eq!(state1.player.position, state2.player.position);
        assert_eq!(state1.score, state2.score);
    }
}
