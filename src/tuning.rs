//! Data-driven game balance
//!
//! Every field has a default matching the shipped game; JSON documents only need
//! to name the fields they override.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to read a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("orb tier table is empty")]
    NoOrbTiers,
}

/// One orb reward tier: points awarded, display color and spawn weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrbTier {
    pub points: u32,
    /// 0xRRGGBB
    pub color: u32,
    pub weight: u32,
}

/// Orb behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbTuning {
    /// Height orbs float at
    pub height: f32,
    /// Contact radius at full scale
    pub radius: f32,
    /// Forward speed (units/s)
    pub speed: f32,
    /// Max heading change per tick (radians), drawn in [-range, range]
    pub turn_range: f32,
    /// Max time before a new turn offset is drawn (seconds)
    pub max_heading_timer: f32,
    /// Grow-in time constant (seconds)
    pub grow_time: f32,
    /// Reward tiers, sampled by weight
    pub tiers: Vec<OrbTier>,
}

impl Default for OrbTuning {
    fn default() -> Self {
        Self {
            height: 1.0,
            radius: 0.5,
            speed: 3.0,
            turn_range: 2.0_f32.to_radians(),
            max_heading_timer: 3.0,
            grow_time: 1.0,
            tiers: vec![
                OrbTier {
                    points: 10,
                    color: 0x4fc3f7,
                    weight: 70,
                },
                OrbTier {
                    points: 50,
                    color: 0x81c784,
                    weight: 25,
                },
                OrbTier {
                    points: 200,
                    color: 0xffd54f,
                    weight: 5,
                },
            ],
        }
    }
}

/// Arena growth, lives and world mutation cadence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaTuning {
    /// Platform half-extent at the start of a run
    pub initial_half_size: f32,
    /// Half-extent growth (units/s)
    pub growth_rate: f32,
    /// Edge length of a square ground tile
    pub tile_size: f32,
    /// Depth of a ground tile below its top face
    pub tile_thickness: f32,
    pub max_lives: u32,
    /// Spawn height above the ground; its negation is the kill plane
    pub level_height: f32,
    /// Seconds between world mutations
    pub mutate_interval: f32,
    /// Mutations at the start of a run that destroy nothing
    pub warmup_mutations: u32,
    pub orb: OrbTuning,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            initial_half_size: 10.0,
            growth_rate: 0.1,
            tile_size: 2.0,
            tile_thickness: 0.5,
            max_lives: 3,
            level_height: 5.0,
            mutate_interval: 3.0,
            warmup_mutations: 5,
            orb: OrbTuning::default(),
        }
    }
}

/// First person character controller parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionTuning {
    pub gravity: f32,
    /// Extra probe length below the skin while grounded
    pub ground_check_distance: f32,
    /// Probe length while airborne
    pub ground_check_distance_in_air: f32,
    /// Time after a jump during which ground detection is skipped
    pub jump_grace_time: f32,
    pub max_speed_on_ground: f32,
    pub ground_sharpness: f32,
    pub max_speed_in_air: f32,
    pub air_acceleration: f32,
    pub sprint_modifier: f32,
    /// Degrees of rotation per unit of look input
    pub rotation_speed: f32,
    /// Pitch limit (degrees)
    pub max_pitch: f32,
    pub jump_force: f32,
    pub radius: f32,
    pub height: f32,
    pub skin_width: f32,
    /// Steepest walkable slope (degrees)
    pub slope_limit: f32,
    /// Footsteps per unit travelled
    pub footstep_frequency: f32,
    pub footstep_frequency_sprinting: f32,
}

impl Default for LocomotionTuning {
    fn default() -> Self {
        Self {
            gravity: 10.0,
            ground_check_distance: 1.0,
            ground_check_distance_in_air: 0.1,
            jump_grace_time: 0.2,
            max_speed_on_ground: 13.0,
            ground_sharpness: 15.0,
            max_speed_in_air: 25.0,
            air_acceleration: 25.0,
            sprint_modifier: 1.5,
            rotation_speed: 200.0,
            max_pitch: 89.0,
            jump_force: 9.0,
            radius: 0.5,
            height: 2.0,
            skin_width: 0.08,
            slope_limit: 45.0,
            footstep_frequency: 0.3,
            footstep_frequency_sprinting: 0.4,
        }
    }
}

/// Complete balance sheet for a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena: ArenaTuning,
    pub locomotion: LocomotionTuning,
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        if tuning.arena.orb.tiers.is_empty() {
            return Err(TuningError::NoOrbTiers);
        }
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "arena": { "max_lives": 5 } }"#).unwrap();
        assert_eq!(tuning.arena.max_lives, 5);
        assert_eq!(tuning.arena.tile_size, 2.0);
        assert_eq!(tuning.locomotion.jump_force, 9.0);
        assert_eq!(tuning.arena.orb.tiers.len(), 3);
    }

    #[test]
    fn test_empty_tier_table_rejected() {
        let err = Tuning::from_json(r#"{ "arena": { "orb": { "tiers": [] } } }"#).unwrap_err();
        assert!(matches!(err, TuningError::NoOrbTiers));
    }

    #[test]
    fn test_malformed_document() {
        assert!(matches!(
            Tuning::from_json("{ nope"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_json_roundtrip_preserves_tiers() {
        let json = Tuning::default().to_json().unwrap();
        let back = Tuning::from_json(&json).unwrap();
        assert_eq!(back.arena.orb.tiers, Tuning::default().arena.orb.tiers);
    }
}
