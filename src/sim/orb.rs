//! Floating orbs: patrol the arena until the player picks them up

use glam::{Vec2, Vec3};
use rand::Rng;

use crate::effects::{Effect, GrowIn};
use crate::tuning::{OrbTier, OrbTuning};
use crate::{heading_to_dir, normalize_angle};

/// A collectible orb
#[derive(Debug, Clone)]
pub struct Orb {
    pub id: u32,
    pub position: Vec3,
    /// Travel direction around +Y (radians, 0 = +Z)
    pub heading: f32,
    /// Heading change applied every tick
    pub turn: f32,
    /// Seconds until a new turn is drawn
    pub heading_timer: f32,
    pub tier: usize,
    pub points: u32,
    pub color: u32,
    /// Scale animation after spawning
    pub grow: GrowIn,
}

impl Orb {
    pub fn new(id: u32, position: Vec3, tier: usize, kind: &OrbTier, grow_time: f32) -> Self {
        Self {
            id,
            position,
            heading: 0.0,
            turn: 0.0,
            heading_timer: 0.0,
            tier,
            points: kind.points,
            color: kind.color,
            grow: GrowIn::new(1.0, grow_time),
        }
    }

    /// Current visual/contact scale (0..=1)
    pub fn scale(&self) -> f32 {
        self.grow.scale()
    }

    /// Contact radius at the current scale
    pub fn contact_radius(&self, tuning: &OrbTuning) -> f32 {
        tuning.radius * self.scale()
    }

    /// Patrol one tick inside `[-half_size, half_size]^2`
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        half_size: f32,
        tuning: &OrbTuning,
        rng: &mut R,
        dt: f32,
    ) {
        if self.grow.is_active() {
            self.grow.advance(dt);
        }

        self.heading_timer -= dt;
        if self.heading_timer < f32::EPSILON {
            self.heading_timer = rng.random_range(0.0..=tuning.max_heading_timer.max(0.0));
            let range = tuning.turn_range.abs();
            self.turn = rng.random_range(-range..=range);
        }

        self.heading = normalize_angle(self.heading + self.turn);
        let step = heading_to_dir(self.heading) * tuning.speed * dt;
        self.position += Vec3::new(step.x, 0.0, step.y);

        if self.position.x.abs() >= half_size || self.position.z.abs() >= half_size {
            self.heading = normalize_angle(self.heading + std::f32::consts::PI);
        }
    }

    /// Ground plane position
    pub fn ground_position(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.z)
    }
}

/// Weighted discrete sampling over tier weights.
///
/// Draws uniformly in `[0, sum)` and walks the table subtracting weights; the
/// last tier is the fallback. `None` only for an empty table.
pub fn pick_weighted<R: Rng + ?Sized>(weights: &[u32], rng: &mut R) -> Option<usize> {
    let last = weights.len().checked_sub(1)?;
    let total: u64 = weights.iter().map(|&w| w as u64).sum();
    if total == 0 {
        return Some(last);
    }
    let mut r = rng.random_range(0..total);
    for (i, &w) in weights[..last].iter().enumerate() {
        if r < w as u64 {
            return Some(i);
        }
        r -= w as u64;
    }
    Some(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn tier() -> OrbTier {
        OrbTier {
            points: 10,
            color: 0xffffff,
            weight: 1,
        }
    }

    #[test]
    fn test_weighted_frequencies_converge() {
        let mut rng = Pcg32::seed_from_u64(42);
        let weights = [70, 25, 5];
        let draws = 100_000;
        let mut counts = [0usize; 3];
        for _ in 0..draws {
            counts[pick_weighted(&weights, &mut rng).unwrap()] += 1;
        }
        for (count, weight) in counts.iter().zip(weights) {
            let freq = *count as f64 / draws as f64;
            let expected = weight as f64 / 100.0;
            assert!((freq - expected).abs() < 0.01, "{freq} vs {expected}");
        }
    }

    #[test]
    fn test_weighted_edge_cases() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(pick_weighted(&[], &mut rng), None);
        assert_eq!(pick_weighted(&[0, 0], &mut rng), Some(1));
        assert_eq!(pick_weighted(&[5], &mut rng), Some(0));
        // zero weight tiers are never chosen unless they are the fallback
        for _ in 0..100 {
            assert_eq!(pick_weighted(&[0, 3, 0], &mut rng), Some(1));
        }
    }

    #[test]
    fn test_orb_moves_forward() {
        let mut rng = Pcg32::seed_from_u64(3);
        let tuning = OrbTuning {
            turn_range: 0.0,
            ..Default::default()
        };
        let mut orb = Orb::new(1, Vec3::new(0.0, 1.0, 0.0), 0, &tier(), 1.0);
        orb.advance(10.0, &tuning, &mut rng, 0.5);
        assert!(orb.position.x.abs() < 1e-5);
        assert!((orb.position.z - tuning.speed * 0.5).abs() < 1e-5);
        assert_eq!(orb.position.y, 1.0);
    }

    #[test]
    fn test_orb_reverses_at_bound() {
        let mut rng = Pcg32::seed_from_u64(3);
        let tuning = OrbTuning {
            turn_range: 0.0,
            ..Default::default()
        };
        let mut orb = Orb::new(1, Vec3::new(0.0, 1.0, 4.9), 0, &tier(), 1.0);
        orb.advance(5.0, &tuning, &mut rng, 0.1);
        assert!(orb.position.z >= 5.0);
        assert!((orb.heading.abs() - std::f32::consts::PI).abs() < 1e-5);
        orb.advance(5.0, &tuning, &mut rng, 0.1);
        assert!(orb.position.z < 5.0);
    }

    #[test]
    fn test_orb_grows_in() {
        let mut rng = Pcg32::seed_from_u64(3);
        let tuning = OrbTuning::default();
        let mut orb = Orb::new(1, Vec3::ZERO, 0, &tier(), tuning.grow_time);
        assert_eq!(orb.scale(), 0.0);
        for _ in 0..1000 {
            orb.advance(100.0, &tuning, &mut rng, 0.02);
        }
        assert_eq!(orb.scale(), 1.0);
        assert!(!orb.grow.is_active());
    }
}
