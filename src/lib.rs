//! Orb Arena - an arena survival game core
//!
//! Core modules:
//! - `sim`: Fixed timestep simulation (arena, locomotion, tiles, orbs)
//! - `effects`: Resumable per-frame effects (fades, smoothing, grow-in)
//! - `ui`: HUD state fed by simulation events
//! - `audio`: Sound cue routing and mixer levels
//! - `platform`: Input mapping and keyboard layout detection
//! - `persistence`: key=value player data file
//! - `settings` / `leaderboard`: Persisted preferences and scores
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod effects;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use leaderboard::Leaderboard;
pub use settings::{DisplayMode, InputMode, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz)
    pub const SIM_DT: f32 = 1.0 / 50.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Height of the walkable top face of every ground tile
    pub const TILE_TOP_Y: f32 = 0.0;

    /// Number of distinct tile ids the destroy set draws from
    pub const DESTROY_ID_RANGE: u8 = 100;

    /// Default location of the player data file
    pub const PLAYER_DATA_FILE: &str = "player.config";
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Forward direction on the ground plane for a heading (radians, 0 = +Z)
#[inline]
pub fn heading_to_dir(heading: f32) -> Vec2 {
    Vec2::new(heading.sin(), heading.cos())
}

/// Heading (radians, 0 = +Z) pointing along a ground plane direction
#[inline]
pub fn dir_to_heading(dir: Vec2) -> f32 {
    dir.x.atan2(dir.y)
}

/// Linear interpolation with the blend factor clamped to [0, 1]
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(2.5 * PI) - FRAC_PI_2).abs() < 1e-5);
        let wrapped = normalize_angle(3.0 * PI);
        assert!((-PI..PI).contains(&wrapped));
        assert!((normalize_angle(-FRAC_PI_2) + FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_heading_roundtrip() {
        let dir = heading_to_dir(FRAC_PI_2);
        assert!((dir.x - 1.0).abs() < 1e-6);
        assert!(dir.y.abs() < 1e-6);
        assert!((dir_to_heading(dir) - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_lerp_clamps() {
        assert_eq!(lerp(0.0, 10.0, 2.0), 10.0);
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
    }
}
