//! First person character controller
//!
//! A two state machine (`Grounded` / `Airborne`) driven by player intent and
//! capsule casts against a [`CollisionWorld`].

use glam::{Quat, Vec2, Vec3};

use super::tick::TickInput;
use super::world::{CastHit, Capsule, Collider, CollisionWorld};
use crate::tuning::LocomotionTuning;

/// Gap kept between the capsule and whatever it slides against
const CONTACT_OFFSET: f32 = 0.001;
/// Max slide iterations per move
const MAX_SLIDES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    Grounded,
    Airborne,
}

/// Movement side effects of one step (for audio cues)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub jumped: bool,
    pub landed: bool,
    pub footstep: bool,
    pub sprinting: bool,
}

/// The player capsule's kinematic state
#[derive(Debug, Clone)]
pub struct PlayerState {
    /// Feet position
    pub position: Vec3,
    pub velocity: Vec3,
    pub motion: MotionState,
    /// Heading around +Y (degrees)
    pub yaw: f32,
    /// Camera pitch (degrees, positive looks down)
    pub pitch: f32,
    pub ground_normal: Vec3,
    /// What the player currently stands on
    pub ground_contact: Option<Collider>,
    /// Controller clock value of the last jump
    pub last_jump_time: f32,
    clock: f32,
    footstep_distance: f32,
    collision_suspended: bool,
    radius: f32,
    height: f32,
}

impl PlayerState {
    pub fn new(tuning: &LocomotionTuning) -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            motion: MotionState::Airborne,
            yaw: 0.0,
            pitch: 0.0,
            ground_normal: Vec3::Y,
            ground_contact: None,
            last_jump_time: f32::NEG_INFINITY,
            clock: 0.0,
            footstep_distance: 0.0,
            collision_suspended: false,
            radius: tuning.radius,
            height: tuning.height,
        }
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.motion == MotionState::Grounded
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Collision capsule at the current position
    pub fn capsule(&self) -> Capsule {
        Capsule {
            bottom: self.position + Vec3::Y * self.radius,
            top: self.position + Vec3::Y * (self.height - self.radius).max(self.radius),
            radius: self.radius,
        }
    }

    /// Rotation from local input space to world space
    pub fn orientation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw.to_radians())
    }

    /// Instantaneous relocation; the next move ignores collisions
    pub fn teleport(&mut self, position: Vec3) {
        self.position = position;
        self.collision_suspended = true;
    }

    /// Drop horizontal velocity, keeping the vertical part
    pub fn reset_horizontal_velocity(&mut self) {
        self.velocity = Vec3::Y * self.velocity.y;
    }

    /// Keep the player inside `[-limit, limit]` on both horizontal axes
    pub fn clamp_horizontal(&mut self, limit: f32) {
        self.position.x = self.position.x.clamp(-limit, limit);
        self.position.z = self.position.z.clamp(-limit, limit);
    }

    /// Apply look deltas (already scaled by sensitivity)
    pub fn look(&mut self, delta: Vec2, tuning: &LocomotionTuning) {
        self.yaw = (self.yaw + delta.x * tuning.rotation_speed).rem_euclid(360.0);
        self.pitch = (self.pitch + delta.y * tuning.rotation_speed)
            .clamp(-tuning.max_pitch, tuning.max_pitch);
    }

    /// Advance one fixed step
    pub fn step<W: CollisionWorld + ?Sized>(
        &mut self,
        world: &W,
        input: &TickInput,
        tuning: &LocomotionTuning,
        dt: f32,
    ) -> StepReport {
        self.clock += dt;
        self.look(input.look, tuning);

        let was_grounded = self.is_grounded();
        self.ground_check(world, tuning);

        let mut report = StepReport {
            sprinting: input.sprint,
            ..Default::default()
        };
        if self.is_grounded() && !was_grounded {
            report.landed = true;
            self.footstep_distance = 0.0;
        }

        self.handle_movement(world, input, tuning, dt, &mut report);
        report
    }

    fn ground_check<W: CollisionWorld + ?Sized>(&mut self, world: &W, tuning: &LocomotionTuning) {
        // a short probe while airborne avoids snapping to the ground mid-fall
        let probe = if self.is_grounded() {
            tuning.skin_width + tuning.ground_check_distance
        } else {
            tuning.ground_check_distance_in_air
        };

        self.motion = MotionState::Airborne;
        self.ground_normal = Vec3::Y;
        self.ground_contact = None;

        if self.clock < self.last_jump_time + tuning.jump_grace_time {
            return;
        }
        let Some(hit) = world.capsule_cast(&self.capsule(), Vec3::NEG_Y, probe) else {
            return;
        };
        self.ground_normal = hit.normal;
        if hit.normal.dot(Vec3::Y) <= 0.0 || !is_under_slope_limit(hit.normal, tuning.slope_limit) {
            return;
        }

        self.motion = MotionState::Grounded;
        self.ground_contact = Some(hit.collider);
        if hit.distance > tuning.skin_width {
            self.position.y -= hit.distance;
        }
    }

    fn handle_movement<W: CollisionWorld + ?Sized>(
        &mut self,
        world: &W,
        input: &TickInput,
        tuning: &LocomotionTuning,
        dt: f32,
        report: &mut StepReport,
    ) {
        let speed_modifier = if input.sprint {
            tuning.sprint_modifier
        } else {
            1.0
        };
        let local = Vec3::new(input.move_input.x, 0.0, input.move_input.y).clamp_length_max(1.0);
        let world_move = self.orientation() * local;

        match self.motion {
            MotionState::Grounded => {
                let target = world_move * speed_modifier * tuning.max_speed_on_ground;
                let target =
                    reorient_on_slope(target.normalize_or_zero(), self.ground_normal) * target.length();
                self.velocity = self
                    .velocity
                    .lerp(target, (tuning.ground_sharpness * dt).clamp(0.0, 1.0));

                if input.jump {
                    self.velocity.y = 0.0;
                    self.velocity += Vec3::Y * tuning.jump_force;
                    self.last_jump_time = self.clock;
                    self.motion = MotionState::Airborne;
                    self.ground_normal = Vec3::Y;
                    self.ground_contact = None;
                    report.jumped = true;
                } else {
                    let frequency = if input.sprint {
                        tuning.footstep_frequency_sprinting
                    } else {
                        tuning.footstep_frequency
                    };
                    if frequency > 0.0 && self.footstep_distance >= 1.0 / frequency {
                        self.footstep_distance = 0.0;
                        report.footstep = true;
                    }
                    self.footstep_distance += self.velocity.length() * dt;
                }
            }
            MotionState::Airborne => {
                self.velocity += world_move * tuning.air_acceleration * dt;
                // cap horizontal speed only
                let vertical = self.velocity.y;
                let horizontal = Vec3::new(self.velocity.x, 0.0, self.velocity.z)
                    .clamp_length_max(tuning.max_speed_in_air * speed_modifier);
                self.velocity = horizontal + Vec3::Y * vertical;
                self.velocity += Vec3::NEG_Y * tuning.gravity * dt;
            }
        }

        if let Some(hit) = self.move_and_slide(world, self.velocity * dt) {
            self.velocity = self.velocity.reject_from_normalized(hit.normal);
        }
    }

    /// Sweep the capsule along `displacement`, stopping at and sliding along
    /// surfaces. Returns the first surface hit.
    fn move_and_slide<W: CollisionWorld + ?Sized>(
        &mut self,
        world: &W,
        displacement: Vec3,
    ) -> Option<CastHit> {
        if std::mem::take(&mut self.collision_suspended) {
            self.position += displacement;
            return None;
        }

        let mut first_hit = None;
        let mut remaining = displacement;
        for _ in 0..MAX_SLIDES {
            let distance = remaining.length();
            if distance <= f32::EPSILON {
                break;
            }
            let direction = remaining / distance;
            let Some(hit) = world.capsule_cast(&self.capsule(), direction, distance) else {
                self.position += remaining;
                break;
            };
            let travel = (hit.distance - CONTACT_OFFSET).max(0.0);
            self.position += direction * travel;
            remaining = (direction * (distance - travel)).reject_from_normalized(hit.normal);
            first_hit.get_or_insert(hit);
        }
        first_hit
    }
}

/// Whether a ground normal is walkable
fn is_under_slope_limit(normal: Vec3, slope_limit_deg: f32) -> bool {
    normal.angle_between(Vec3::Y) <= slope_limit_deg.to_radians()
}

/// Direction tangent to the slope, keeping the heading of `direction`
fn reorient_on_slope(direction: Vec3, slope_normal: Vec3) -> Vec3 {
    let right = direction.cross(Vec3::Y);
    slope_normal.cross(right).normalize_or_zero()
}
