use crate::error::{CasParseError, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};

/// Default growth-factor bounds applied over average unit cost when no live
/// market feed is wired in.
pub const DEFAULT_GROWTH_MIN: f64 = 1.05;
pub const DEFAULT_GROWTH_MAX: f64 = 1.35;

/// Supplies a current unit price for a holding given its average unit cost.
///
/// Production code can swap the simulated implementation for a real
/// market-data collaborator without touching aggregation or summarization.
pub trait ValuationSource {
    fn current_price(&mut self, avg_unit_cost: f64) -> f64;
}

/// Deterministic-if-seeded stand-in for a market feed: draws a growth factor
/// from a bounded uniform distribution per holding.
#[derive(Debug)]
pub struct SimulatedGrowth {
    rng: StdRng,
    growth: Uniform<f64>,
}

impl SimulatedGrowth {
    pub fn new(seed: u64, min: f64, max: f64) -> Result<Self> {
        if min <= 0.0 || min >= max {
            return Err(CasParseError::InvalidGrowthRange { min, max });
        }
        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            growth: Uniform::new(min, max),
        })
    }

    pub fn with_default_range(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            growth: Uniform::new(DEFAULT_GROWTH_MIN, DEFAULT_GROWTH_MAX),
        }
    }
}

impl ValuationSource for SimulatedGrowth {
    fn current_price(&mut self, avg_unit_cost: f64) -> f64 {
        avg_unit_cost * self.growth.sample(&mut self.rng)
    }
}
