//! Arena state and core simulation types
//!
//! Everything the fixed tick mutates lives in [`ArenaState`].

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::destroy::DestroySet;
use super::locomotion::PlayerState;
use super::orb::Orb;
use super::tile::{GroundTile, TileGrid};
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// World frozen (pause menu)
    Paused,
    /// Out of lives; the tick no longer advances anything
    GameOver,
}

/// Side effects reported to collaborators (HUD, audio, particles)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Lives changed; `max_lives` is included so the health bar can rescale
    HealthChanged { lives: u32, max_lives: u32 },
    /// Points were added to the score
    ScoreChanged { added: u32, total: u64 },
    /// A tile crumbled (spawn break particles + sound here)
    TileDestroyed { tile_id: u32, position: Vec3 },
    OrbSpawned {
        orb_id: u32,
        tier: usize,
        position: Vec3,
    },
    /// Orb picked up by the player (spawn break particles in its color)
    OrbCollected {
        orb_id: u32,
        points: u32,
        color: u32,
        position: Vec3,
    },
    PlayerRespawned { position: Vec3 },
    /// Orb trails should be cleared so they don't streak across the teleport
    OrbTrailsReset,
    Jumped,
    Landed,
    Footstep { sprinting: bool },
    Paused,
    Resumed,
    GameOver { final_score: u64 },
}

/// Complete arena state for one run
#[derive(Debug, Clone)]
pub struct ArenaState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Current platform extent from the center on both horizontal axes
    pub half_size: f32,
    pub lives: u32,
    pub score: u64,
    /// Simulated seconds since the run started
    pub time: f32,
    /// Materialized ground coverage
    pub grid: TileGrid,
    /// Live ground tiles (sorted by id)
    pub tiles: Vec<GroundTile>,
    pub destroy_set: DestroySet,
    /// Live orbs (sorted by id)
    pub orbs: Vec<Orb>,
    pub player: PlayerState,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    /// Tiles under the player's footprint last tick (sorted ids)
    pub(crate) contacted_tiles: Vec<u32>,
    /// Seconds until the next world mutation
    pub(crate) mutate_timer: f32,
    next_id: u32,
}

impl ArenaState {
    /// Create a new run with the given seed and balance sheet
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let half_size = tuning.arena.initial_half_size;
        let grid = TileGrid::new(tuning.arena.tile_size);
        let player = PlayerState::new(&tuning.locomotion);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            half_size,
            lives: tuning.arena.max_lives,
            score: 0,
            time: 0.0,
            grid,
            tiles: Vec::new(),
            destroy_set: DestroySet::new(),
            orbs: Vec::new(),
            player,
            events: Vec::new(),
            contacted_tiles: Vec::new(),
            mutate_timer: 0.0,
            next_id: 1,
            tuning,
        };

        state.materialize_ground();
        let spawn = Vec3::new(0.0, state.tuning.arena.level_height, 0.0);
        state.player.teleport(spawn);
        state.events.push(GameEvent::HealthChanged {
            lives: state.lives,
            max_lives: state.tuning.arena.max_lives,
        });
        log::info!(
            "Run started (seed {}, {} tiles, half size {:.1})",
            seed,
            state.tiles.len(),
            state.half_size
        );

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Live tile whose top face contains the given ground point
    pub fn tile_at(&self, point: Vec2) -> Option<&GroundTile> {
        let half = self.tuning.arena.tile_size / 2.0;
        self.tiles.iter().find(|t| {
            (point.x - t.position.x).abs() <= half && (point.y - t.position.z).abs() <= half
        })
    }

    pub fn tile_mut(&mut self, tile_id: u32) -> Option<&mut GroundTile> {
        self.tiles.iter_mut().find(|t| t.id == tile_id)
    }

    /// Maximum player offset from the center on either horizontal axis
    pub fn player_bound(&self) -> f32 {
        (self.half_size - self.tuning.locomotion.radius).max(0.0)
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Ensure tiles/orbs are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.tiles.sort_by_key(|t| t.id);
        self.orbs.sort_by_key(|o| o.id);
    }
}
