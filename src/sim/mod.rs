//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod arena;
pub mod autopilot;
pub mod destroy;
pub mod locomotion;
pub mod orb;
pub mod state;
pub mod tick;
pub mod tile;
pub mod world;

pub use autopilot::Autopilot;
pub use destroy::DestroySet;
pub use locomotion::{MotionState, PlayerState, StepReport};
pub use orb::{Orb, pick_weighted};
pub use state::{ArenaState, GameEvent, GamePhase};
pub use tick::{TickInput, tick};
pub use tile::{GroundTile, TileGrid};
pub use world::{ArenaWorld, CastHit, Capsule, Collider, CollisionWorld};
