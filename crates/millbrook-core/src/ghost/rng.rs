use rand::Rng;
use rand::rngs::StdRng;
use std::f64::consts::TAU;

/// Source of uniform draws for the ghost model.
///
/// The model only needs uniforms; normals and coin flips are derived here so
/// that any generator can be dropped in without touching the statistics.
pub trait DeterministicRng {
    /// Uniform draw in `[0, 1)`.
    fn next_uniform(&mut self) -> f64;

    /// Standard normal deviate via Box–Muller, consuming two uniforms.
    fn next_normal(&mut self) -> f64 {
        let u1 = self.next_uniform().max(f64::MIN_POSITIVE);
        let u2 = self.next_uniform();
        (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.next_uniform() < probability
    }
}

/// 32-bit linear congruential generator (Numerical Recipes constants).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub const MULTIPLIER: u32 = 1_664_525;
    pub const INCREMENT: u32 = 1_013_904_223;

    pub const fn new(seed: u64) -> Self {
        Self {
            state: (seed ^ (seed >> 32)) as u32,
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        self.state
    }
}

impl DeterministicRng for Lcg {
    fn next_uniform(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }
}

impl DeterministicRng for StdRng {
    fn next_uniform(&mut self) -> f64 {
        self.r#gen::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn lcg_is_reproducible() {
        let mut a = Lcg::new(42);
        let mut b = Lcg::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn lcg_first_step_matches_recurrence() {
        let mut rng = Lcg::new(0);
        assert_eq!(rng.next_u32(), Lcg::INCREMENT);
        assert_eq!(
            rng.next_u32(),
            Lcg::INCREMENT
                .wrapping_mul(Lcg::MULTIPLIER)
                .wrapping_add(Lcg::INCREMENT)
        );
    }

    #[test]
    fn uniforms_stay_in_unit_interval() {
        let mut rng = Lcg::new(7);
        for _ in 0..10_000 {
            let u = rng.next_uniform();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn normal_draws_have_roughly_unit_spread() {
        let mut rng = Lcg::new(2024);
        let draws = (0..20_000).map(|_| rng.next_normal()).collect::<Vec<_>>();
        let mean = draws.iter().sum::<f64>() / draws.len() as f64;
        let var = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / draws.len() as f64;
        assert!(mean.abs() < 0.05, "mean {mean}");
        assert!((var - 1.0).abs() < 0.08, "variance {var}");
    }

    #[test]
    fn std_rng_is_a_drop_in_source() {
        let mut rng = StdRng::seed_from_u64(9);
        let hits = (0..1_000).filter(|_| rng.chance(0.25)).count();
        assert!((150..350).contains(&hits));
    }
}
