//! Damping update

use crate::contribution::ContributionTable;
use crate::error::{EngineError, EngineResult};
use crate::rank::RankTable;
use rayon::prelude::*;

/// Default damping factor
pub const DEFAULT_DAMPING_FACTOR: f64 = 0.85;

/// Turns summed contributions into the next rank table:
/// `rank = (1 - d) + d * aggregate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DampingUpdater {
    damping_factor: f64,
}

impl Default for DampingUpdater {
    fn default() -> Self {
        Self { damping_factor: DEFAULT_DAMPING_FACTOR }
    }
}

impl DampingUpdater {
    /// `damping_factor` must lie in (0, 1) so that ranks stay non-negative
    pub fn new(damping_factor: f64) -> EngineResult<Self> {
        if !(damping_factor > 0.0 && damping_factor < 1.0) {
            return Err(EngineError::InvalidConfig(format!(
                "damping factor must lie in (0, 1), got {damping_factor}"
            )));
        }
        Ok(Self { damping_factor })
    }

    pub fn damping_factor(&self) -> f64 {
        self.damping_factor
    }

    /// Rank given to a node with no inbound contributions
    pub fn base_rank(&self) -> f64 {
        1.0 - self.damping_factor
    }

    pub fn apply(&self, aggregate: &ContributionTable) -> RankTable {
        let d = self.damping_factor;
        let base = self.base_rank();
        let ranks: Vec<f64> = aggregate.values().par_iter().map(|sum| base + d * sum).collect();
        aggregate.with_values(ranks)
    }
}
