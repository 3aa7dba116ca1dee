//! Transient effects: sparks, skid dust
//!
//! Particle lifetime is measured in ticks, strictly decreasing; removal
//! happens exactly once, via `retain` in [`age_particles`].

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Hard cap on live particles per session
pub const MAX_PARTICLES: usize = 256;

/// A visual particle (never gameplay-affecting)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining lifetime in ticks
    pub life: u32,
    /// Packed RGBA color for the renderer
    pub color: u32,
}

impl Particle {
    /// Advance one tick; returns false once expired
    pub fn step(&mut self) -> bool {
        self.pos += self.vel;
        self.life = self.life.saturating_sub(1);
        self.life > 0
    }
}

/// Age all particles one tick and drop the expired ones
pub fn age_particles(particles: &mut Vec<Particle>) {
    particles.retain_mut(Particle::step);
}

/// Spawn a radial burst of sparks (attack impacts, drift sparks)
///
/// Velocities are drawn from the session RNG so replays with the same seed
/// produce the same burst.
pub fn spawn_burst(
    particles: &mut Vec<Particle>,
    rng: &mut Pcg32,
    origin: Vec2,
    count: usize,
    spread: f32,
    life: u32,
    color: u32,
) {
    for _ in 0..count {
        if particles.len() >= MAX_PARTICLES {
            return;
        }
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * spread,
            (rng.random::<f32>() - 0.5) * spread,
        );
        particles.push(Particle {
            pos: origin,
            vel,
            life,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_lifetime_strictly_decreases() {
        let mut p = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, 0.0),
            life: 3,
            color: 0xffffffff,
        };
        assert!(p.step());
        assert_eq!(p.life, 2);
        assert!(p.step());
        assert!(!p.step());
        assert_eq!(p.life, 0);
    }

    #[test]
    fn test_removed_exactly_once() {
        let mut particles = vec![
            Particle {
                pos: Vec2::ZERO,
                vel: Vec2::ZERO,
                life: 1,
                color: 0,
            },
            Particle {
                pos: Vec2::ZERO,
                vel: Vec2::ZERO,
                life: 5,
                color: 0,
            },
        ];
        age_particles(&mut particles);
        assert_eq!(particles.len(), 1);
        assert_eq!(particles[0].life, 4);
        // Another pass does not resurrect or double-remove anything
        age_particles(&mut particles);
        assert_eq!(particles.len(), 1);
    }

    #[test]
    fn test_burst_respects_cap_and_seed() {
        let mut particles = Vec::new();
        let mut rng = Pcg32::seed_from_u64(7);
        spawn_burst(&mut particles, &mut rng, Vec2::ZERO, 500, 15.0, 20, 0);
        assert_eq!(particles.len(), MAX_PARTICLES);

        let mut a = Vec::new();
        let mut b = Vec::new();
        spawn_burst(&mut a, &mut Pcg32::seed_from_u64(42), Vec2::ZERO, 10, 15.0, 20, 0);
        spawn_burst(&mut b, &mut Pcg32::seed_from_u64(42), Vec2::ZERO, 10, 15.0, 20, 0);
        for (pa, pb) in a.iter().zip(&b) {
            assert_eq!(pa.vel, pb.vel);
        }
    }
}
