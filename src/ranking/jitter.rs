use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::config::{JitterConfig, JitterMode};

/// Per-query source of tie-breaking noise in `[0, max)`.
///
/// Built fresh for every query, so concurrent searches never share state.
pub struct Jitter {
    rng: Option<StdRng>,
    max: f64,
}

impl Jitter {
    pub fn off() -> Self {
        Jitter { rng: None, max: 0.0 }
    }

    pub fn from_config(config: &JitterConfig) -> Self {
        if config.max <= 0.0 {
            return Self::off();
        }

        let rng = match config.mode {
            JitterMode::Off => None,
            JitterMode::Random => Some(StdRng::from_os_rng()),
            JitterMode::Seeded => Some(StdRng::seed_from_u64(config.seed)),
        };

        Jitter {
            rng,
            max: config.max,
        }
    }

    pub fn sample(&mut self) -> f64 {
        match self.rng.as_mut() {
            Some(rng) => rng.random_range(0.0..self.max),
            None => 0.0,
        }
    }
}
