//! Batch analysis of independent hands with rayon parallelism.
//!
//! Every worker owns its own memoized oracle and every request its own copy
//! of the tile space, so nothing mutable is shared between analyses.

use anyhow::{anyhow, Result};
use log::debug;
use rayon::prelude::*;

use crate::config::AnalysisConfig;
use crate::discard::DiscardAnalysis;
use crate::improve::{Analysis13, Analyzer};
use crate::shanten::{Memoized, StandardOracle};
use crate::tile::Tiles34;

/// One hand snapshot to analyse.
#[derive(Debug, Clone, Copy)]
pub struct HandRequest {
    pub tiles: Tiles34,
    pub is_open: bool,
}

/// Parallel batch analyzer using a dedicated rayon ThreadPool.
pub struct BatchAnalyzer {
    pool: rayon::ThreadPool,
    config: AnalysisConfig,
}

impl BatchAnalyzer {
    /// Thread count comes from `config.threads`.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(n) = config.threads {
            builder = builder.num_threads(n);
        }
        let pool = builder
            .build()
            .map_err(|e| anyhow!("failed to build thread pool: {e}"))?;
        Ok(Self { pool, config })
    }

    #[must_use]
    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// One result per request, in request order. A failing request does not
    /// affect the others.
    pub fn analyze13_batch(&self, requests: &[HandRequest]) -> Vec<Result<Analysis13>> {
        self.run(requests, |analyzer, req| {
            analyzer.analyze13(&req.tiles, req.is_open)
        })
    }

    /// One result per request, in request order.
    pub fn analyze14_batch(&self, requests: &[HandRequest]) -> Vec<Result<DiscardAnalysis>> {
        self.run(requests, |analyzer, req| {
            analyzer.analyze14(&req.tiles, req.is_open)
        })
    }

    fn run<T, F>(&self, requests: &[HandRequest], analyze: F) -> Vec<Result<T>>
    where
        T: Send,
        F: Fn(&Analyzer<Memoized<StandardOracle>>, &HandRequest) -> Result<T> + Sync + Send,
    {
        let config = &self.config;
        let results: Vec<_> = self.pool.install(|| {
            requests
                .par_iter()
                .map_init(
                    || Analyzer::standard(config.clone()),
                    |analyzer, req| analyze(analyzer, req),
                )
                .collect()
        });

        let failed = results.iter().filter(|r| r.is_err()).count();
        debug!(
            "analysed {} hands on {} threads, {failed} failed",
            requests.len(),
            self.num_threads(),
        );
        results
    }
}
