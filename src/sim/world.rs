//! Shape-cast queries against the arena
//!
//! The locomotion controller only consumes query results through
//! [`CollisionWorld`]; [`ArenaWorld`] answers them for flat ground tiles and the
//! four arena walls.

use glam::{Vec2, Vec3};

use super::tile::GroundTile;
use crate::consts::TILE_TOP_Y;

/// What a cast ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collider {
    Tile(u32),
    Wall,
}

/// Vertical capsule given by the centers of its two hemispheres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    pub bottom: Vec3,
    pub top: Vec3,
    pub radius: f32,
}

impl Capsule {
    /// Closest point on the capsule's core segment to `p`
    pub fn closest_axis_point(&self, p: Vec3) -> Vec3 {
        let axis = self.top - self.bottom;
        let len_sq = axis.length_squared();
        if len_sq <= f32::EPSILON {
            return self.bottom;
        }
        let t = ((p - self.bottom).dot(axis) / len_sq).clamp(0.0, 1.0);
        self.bottom + axis * t
    }

    /// Whether a sphere overlaps the capsule
    pub fn overlaps_sphere(&self, center: Vec3, radius: f32) -> bool {
        let reach = self.radius + radius;
        self.closest_axis_point(center).distance_squared(center) < reach * reach
    }
}

/// Result of a shape cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastHit {
    /// Travel distance along the cast direction before contact
    pub distance: f32,
    pub point: Vec3,
    /// Surface normal at contact
    pub normal: Vec3,
    pub collider: Collider,
}

/// Physics queries the locomotion controller depends on
pub trait CollisionWorld {
    /// Sweep `capsule` along unit `direction` up to `max_distance`
    fn capsule_cast(&self, capsule: &Capsule, direction: Vec3, max_distance: f32)
    -> Option<CastHit>;
}

/// Flat tile floor plus square walls at `±half_size`
pub struct ArenaWorld<'a> {
    tiles: &'a [GroundTile],
    tile_size: f32,
    tile_thickness: f32,
    half_size: f32,
}

impl<'a> ArenaWorld<'a> {
    pub fn new(tiles: &'a [GroundTile], tile_size: f32, tile_thickness: f32, half_size: f32) -> Self {
        Self {
            tiles,
            tile_size,
            tile_thickness,
            half_size,
        }
    }

    /// Tiles whose top face a circle at `center` overlaps
    fn tiles_under(&self, center: Vec2, radius: f32) -> impl Iterator<Item = &GroundTile> {
        let half = self.tile_size / 2.0;
        self.tiles.iter().filter(move |t| {
            let d = (center - t.center()).abs() - Vec2::splat(half);
            d.max(Vec2::ZERO).length_squared() < radius * radius
        })
    }

    /// Tile whose top face a circle at `center` rests on, nearest first
    fn support_under(&self, center: Vec2, radius: f32) -> Option<&GroundTile> {
        self.tiles_under(center, radius).min_by(|a, b| {
            let da = a.center().distance_squared(center);
            let db = b.center().distance_squared(center);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    /// Ids of every tile under the capsule's footprint, sorted
    pub fn tiles_touching(&self, capsule: &Capsule) -> Vec<u32> {
        let center = Vec2::new(capsule.bottom.x, capsule.bottom.z);
        let mut ids: Vec<u32> = self
            .tiles_under(center, capsule.radius)
            .map(|t| t.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    fn cast_floor(&self, capsule: &Capsule, direction: Vec3, max_distance: f32) -> Option<CastHit> {
        if direction.y >= -f32::EPSILON {
            return None;
        }
        let feet = capsule.bottom.y - capsule.radius;
        let mut t = (feet - TILE_TOP_Y) / -direction.y;
        if t > max_distance {
            return None;
        }
        if t < 0.0 {
            // already sunk into the top face; only counts while inside the slab
            if feet < TILE_TOP_Y - self.tile_thickness {
                return None;
            }
            t = 0.0;
        }
        let at = capsule.bottom + direction * t;
        let tile = self.support_under(Vec2::new(at.x, at.z), capsule.radius)?;
        Some(CastHit {
            distance: t,
            point: Vec3::new(at.x, TILE_TOP_Y, at.z),
            normal: Vec3::Y,
            collider: Collider::Tile(tile.id),
        })
    }

    fn cast_walls(&self, capsule: &Capsule, direction: Vec3, max_distance: f32) -> Option<CastHit> {
        let limit = self.half_size - capsule.radius;
        let mut best: Option<CastHit> = None;
        for (axis, dir) in [(0usize, direction.x), (2usize, direction.z)] {
            if dir.abs() <= f32::EPSILON {
                continue;
            }
            let pos = capsule.bottom[axis];
            let t = ((limit - pos * dir.signum()) / dir.abs()).max(0.0);
            if t > max_distance || best.is_some_and(|b| b.distance <= t) {
                continue;
            }
            let mut normal = Vec3::ZERO;
            normal[axis] = -dir.signum();
            let at = capsule.bottom + direction * t;
            best = Some(CastHit {
                distance: t,
                point: at - normal * capsule.radius,
                normal,
                collider: Collider::Wall,
            });
        }
        best
    }
}

impl CollisionWorld for ArenaWorld<'_> {
    fn capsule_cast(
        &self,
        capsule: &Capsule,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<CastHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO || max_distance < 0.0 {
            return None;
        }
        let floor = self.cast_floor(capsule, direction, max_distance);
        let wall = self.cast_walls(capsule, direction, max_distance);
        match (floor, wall) {
            (Some(f), Some(w)) => Some(if w.distance < f.distance { w } else { f }),
            (f, w) => f.or(w),
        }
    }
}
