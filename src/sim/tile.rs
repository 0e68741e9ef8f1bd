//! Ground tiles and the concentric ring grid they are laid out on
//!
//! The grid grows outward one ring at a time. Ring `n` is the square shell
//! between half-extents `(n - 1) * size` and `n * size`, holding `8n - 4` tiles.

use glam::{Vec2, Vec3};

use super::destroy::DestroySet;
use crate::consts::TILE_TOP_Y;

/// A square piece of walkable ground
#[derive(Debug, Clone)]
pub struct GroundTile {
    pub id: u32,
    /// Center of the top face
    pub position: Vec3,
    /// Doom id, matched against the destroy set
    pub random_id: u8,
    /// Set while the player stands on it (or is respawning onto it)
    pub locked: bool,
}

impl GroundTile {
    pub fn new(id: u32, center: Vec2, random_id: u8) -> Self {
        Self {
            id,
            position: Vec3::new(center.x, TILE_TOP_Y, center.y),
            random_id,
            locked: false,
        }
    }

    /// True when this tile must crumble this tick
    pub fn is_doomed(&self, destroy_set: &DestroySet) -> bool {
        !self.locked && destroy_set.contains(self.random_id)
    }

    /// Ground plane center
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.z)
    }

    /// Player contact began
    pub fn on_contact_enter(&mut self) {
        self.locked = true;
    }

    /// Player contact ended
    pub fn on_contact_exit(&mut self) {
        self.locked = false;
    }
}

/// Tracks how far the ground has been materialized
#[derive(Debug, Clone)]
pub struct TileGrid {
    tile_size: f32,
    rings: u32,
}

impl TileGrid {
    pub fn new(tile_size: f32) -> Self {
        Self {
            tile_size,
            rings: 0,
        }
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn rings(&self) -> u32 {
        self.rings
    }

    /// Half-extent covered by the rings created so far
    pub fn extent(&self) -> f32 {
        self.rings as f32 * self.tile_size
    }

    /// Grow until `[-half_size, half_size]^2` is covered, returning the tile
    /// centers of every newly created ring. Calling again with the same (or a
    /// smaller) half size returns nothing.
    pub fn expand_to(&mut self, half_size: f32) -> Vec<Vec2> {
        let mut centers = Vec::new();
        if self.tile_size <= 0.0 {
            return centers;
        }
        while self.extent() < half_size {
            self.rings += 1;
            push_ring(&mut centers, self.rings, self.tile_size);
        }
        centers
    }
}

/// Append the tile centers of ring `n`, mirrored into all four quadrants
fn push_ring(out: &mut Vec<Vec2>, n: u32, size: f32) {
    let half = size / 2.0;
    let edge = n as f32 * size - half;
    for j in 0..n {
        let offset = j as f32 * size;
        out.push(Vec2::new(offset + half, edge));
        out.push(Vec2::new(-offset - half, -edge));
        out.push(Vec2::new(-edge, offset + half));
        out.push(Vec2::new(edge, -offset - half));
        if j == 0 {
            continue;
        }
        out.push(Vec2::new(-offset + half, edge));
        out.push(Vec2::new(offset - half, -edge));
        out.push(Vec2::new(-edge, -offset + half));
        out.push(Vec2::new(edge, offset - half));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    /// Integer cell index of a tile center
    fn cell(center: Vec2, size: f32) -> (i32, i32) {
        (
            (center.x / size - 0.5).round() as i32,
            (center.y / size - 0.5).round() as i32,
        )
    }

    #[test]
    fn test_ring_sizes() {
        let mut grid = TileGrid::new(2.0);
        assert_eq!(grid.expand_to(2.0).len(), 4);
        assert_eq!(grid.expand_to(4.0).len(), 12);
        assert_eq!(grid.expand_to(6.0).len(), 20);
        assert_eq!(grid.rings(), 3);
    }

    #[test]
    fn test_expand_is_idempotent() {
        let mut grid = TileGrid::new(2.0);
        let first = grid.expand_to(7.3);
        assert!(!first.is_empty());
        assert!(grid.expand_to(7.3).is_empty());
        assert!(grid.expand_to(1.0).is_empty());
        assert_eq!(grid.extent(), 8.0);
    }

    #[test]
    fn test_doomed_respects_lock() {
        let mut set = DestroySet::new();
        set.push(42);
        let mut tile = GroundTile::new(1, Vec2::ZERO, 42);
        assert!(tile.is_doomed(&set));
        tile.on_contact_enter();
        assert!(!tile.is_doomed(&set));
        tile.on_contact_exit();
        assert!(tile.is_doomed(&set));
    }

    proptest! {
        #[test]
        fn prop_grid_covers_without_duplicates(
            steps in proptest::collection::vec(0.0f32..3.0, 1..20),
            size in 0.5f32..4.0,
        ) {
            let mut grid = TileGrid::new(size);
            let mut seen = HashSet::new();
            let mut half_size = 0.1;
            for step in steps {
                half_size += step;
                for center in grid.expand_to(half_size) {
                    prop_assert!(seen.insert(cell(center, size)), "duplicate tile at {:?}", center);
                }
                prop_assert!(grid.extent() >= half_size);
                // every cell intersecting the arena square exists
                let n = (half_size / size - 1e-4).ceil() as i32;
                for x in -n..n {
                    for z in -n..n {
                        prop_assert!(seen.contains(&(x, z)), "gap at cell ({}, {})", x, z);
                    }
                }
            }
        }
    }
}
