//! Demo driver: chases the nearest orb and hops over holes in the ground
//!
//! Produces the same [`TickInput`] a human would, so it exercises the full
//! locomotion path.

use glam::Vec2;

use super::state::ArenaState;
use super::tick::TickInput;
use crate::{dir_to_heading, heading_to_dir, normalize_angle};

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Largest yaw change per tick (degrees)
    pub max_turn: f32,
    /// Sprint when the target is further away than this
    pub sprint_distance: f32,
    /// How far ahead of the feet to look for missing ground
    pub lookahead: f32,
    /// Don't walk while the target is more than this far off the heading (degrees)
    pub walk_cone: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            max_turn: 10.0,
            sprint_distance: 6.0,
            lookahead: 1.5,
            walk_cone: 60.0,
        }
    }
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ground point to head for: the nearest orb, or the arena center
    pub fn target(&self, state: &ArenaState) -> Vec2 {
        let feet = state.player_ground_position();
        state
            .orbs
            .iter()
            .map(|orb| orb.ground_position())
            .min_by(|a, b| {
                a.distance_squared(feet)
                    .partial_cmp(&b.distance_squared(feet))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(Vec2::ZERO)
    }

    /// Input for the next tick
    pub fn drive(&self, state: &ArenaState) -> TickInput {
        let mut input = TickInput::default();
        let player = &state.player;
        let feet = state.player_ground_position();
        let to_target = self.target(state) - feet;
        let distance = to_target.length();
        if distance < 0.25 {
            return input;
        }

        let yaw = player.yaw.to_radians();
        let error = normalize_angle(dir_to_heading(to_target) - yaw).to_degrees();
        let turn = error.clamp(-self.max_turn, self.max_turn);
        let rotation_speed = state.tuning.locomotion.rotation_speed;
        if rotation_speed > 0.0 {
            input.look.x = turn / rotation_speed;
        }

        if error.abs() <= self.walk_cone {
            input.move_input = Vec2::Y;
            input.sprint = distance > self.sprint_distance;
        }

        if player.is_grounded() && input.move_input != Vec2::ZERO {
            let ahead = feet + heading_to_dir(yaw) * self.lookahead;
            let inside = ahead.x.abs() < state.half_size && ahead.y.abs() < state.half_size;
            input.jump = inside && state.tile_at(ahead).is_none();
        }

        input
    }
}
