//! Fixed-count iteration driver
//!
//! Runs contribution reduction followed by the damping update exactly
//! `iterations` times. There is no convergence check: the output of a run
//! depends only on the graph and the configuration.

use crate::contribution::ContributionReducer;
use crate::damping::{DampingUpdater, DEFAULT_DAMPING_FACTOR};
use crate::error::{EngineError, EngineResult};
use crate::graph::GraphStore;
use crate::rank::RankTable;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Default number of iterations
pub const DEFAULT_ITERATIONS: usize = 100;

/// Rank engine configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RankConfig {
    /// Number of iterations (always run in full)
    pub iterations: usize,
    /// Damping factor (usually 0.85)
    pub damping_factor: f64,
    /// Number of partitions to split the graph into when it is built from
    /// this configuration (`GraphStore::load_partitioned`). A driver runs on
    /// whatever partitioning its graph already has and ignores this value.
    pub partitions: usize,
    /// Size of a dedicated worker pool; `None` uses the global rayon pool
    pub threads: Option<usize>,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            damping_factor: DEFAULT_DAMPING_FACTOR,
            partitions: rayon::current_num_threads(),
            threads: None,
        }
    }
}

impl RankConfig {
    pub fn validate(&self) -> EngineResult<()> {
        if self.iterations == 0 {
            return Err(EngineError::InvalidConfig("iterations must be positive".to_string()));
        }
        if !(self.damping_factor > 0.0 && self.damping_factor < 1.0) {
            return Err(EngineError::InvalidConfig(format!(
                "damping factor must lie in (0, 1), got {}",
                self.damping_factor
            )));
        }
        if self.partitions == 0 {
            return Err(EngineError::InvalidConfig("partitions must be positive".to_string()));
        }
        if self.threads == Some(0) {
            return Err(EngineError::InvalidConfig("threads must be positive".to_string()));
        }
        Ok(())
    }
}

/// Driver lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Initial table not built yet
    Initializing,
    /// Table `k` is current and iteration `k` runs next
    Iterating(usize),
    /// All iterations done; the final table is available
    Done,
}

/// Owns the current rank table across iterations.
pub struct IterationDriver {
    graph: Arc<GraphStore>,
    config: RankConfig,
    reducer: ContributionReducer,
    updater: DampingUpdater,
    pool: Option<rayon::ThreadPool>,
    state: DriverState,
    current: Option<RankTable>,
}

impl IterationDriver {
    /// Start from the all-ones table
    pub fn new(graph: Arc<GraphStore>, config: RankConfig) -> EngineResult<Self> {
        config.validate()?;
        let pool = build_pool(config.threads)?;
        Ok(Self {
            updater: DampingUpdater::new(config.damping_factor)?,
            reducer: ContributionReducer::new(),
            graph,
            config,
            pool,
            state: DriverState::Initializing,
            current: None,
        })
    }

    /// Continue from a table produced by an earlier run over the same nodes.
    ///
    /// Tables derived from another `GraphStore` instance are re-keyed onto
    /// this graph and must cover exactly its nodes.
    pub fn resume(graph: Arc<GraphStore>, table: RankTable, config: RankConfig) -> EngineResult<Self> {
        let table = if table.belongs_to(&graph) {
            table
        } else {
            RankTable::from_entries(&graph, table.iter())?
        };
        let mut driver = Self::new(graph, config)?;
        driver.current = Some(table);
        driver.state = DriverState::Iterating(0);
        Ok(driver)
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn config(&self) -> &RankConfig {
        &self.config
    }

    pub fn graph(&self) -> &Arc<GraphStore> {
        &self.graph
    }

    /// Table of the latest completed version, if any
    pub fn current(&self) -> Option<&RankTable> {
        self.current.as_ref()
    }

    /// Advance one transition
    pub fn step(&mut self) -> EngineResult<DriverState> {
        let next_state = match self.state {
            DriverState::Initializing => {
                self.current = Some(RankTable::initial(&self.graph));
                debug!(nodes = self.graph.node_count(), "Initialized rank table");
                DriverState::Iterating(0)
            }
            DriverState::Iterating(k) => {
                let previous = self.current.take().ok_or_else(|| {
                    EngineError::InvalidTransition(format!("iteration {k} has no current table"))
                })?;
                let next = self.iterate(&previous)?;
                debug!(iteration = k, total_mass = next.total_mass(), "Iteration complete");
                self.current = Some(next);
                if k + 1 == self.config.iterations {
                    DriverState::Done
                } else {
                    DriverState::Iterating(k + 1)
                }
            }
            DriverState::Done => {
                return Err(EngineError::InvalidTransition(
                    "driver is done and accepts no further transitions".to_string(),
                ));
            }
        };
        self.state = next_state;
        Ok(next_state)
    }

    /// Drive to completion and return the final table
    pub fn run(mut self) -> EngineResult<RankTable> {
        let start = Instant::now();
        while self.state != DriverState::Done {
            self.step()?;
        }
        info!(
            iterations = self.config.iterations,
            nodes = self.graph.node_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Rank computation finished"
        );
        self.into_final()
    }

    /// Final table; only available once `Done`
    pub fn into_final(self) -> EngineResult<RankTable> {
        match (self.state, self.current) {
            (DriverState::Done, Some(table)) => Ok(table),
            (state, _) => Err(EngineError::InvalidTransition(format!(
                "final table requested in state {state:?}"
            ))),
        }
    }

    fn iterate(&self, previous: &RankTable) -> EngineResult<RankTable> {
        let work = || -> EngineResult<RankTable> {
            let aggregate = self.reducer.reduce(&self.graph, previous)?;
            Ok(self.updater.apply(&aggregate))
        };
        match &self.pool {
            Some(pool) => pool.install(work),
            None => work(),
        }
    }
}

fn build_pool(threads: Option<usize>) -> EngineResult<Option<rayon::ThreadPool>> {
    threads
        .map(|n| {
            rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .thread_name(|i| format!("linkrank-worker-{i}"))
                .build()
                .map_err(|e| EngineError::ThreadPool(e.to_string()))
        })
        .transpose()
}

/// Calculate ranks for `graph` with a fresh driver
pub fn page_rank(graph: Arc<GraphStore>, config: RankConfig) -> EngineResult<RankTable> {
    IterationDriver::new(graph, config)?.run()
}
