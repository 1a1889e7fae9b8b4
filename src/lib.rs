//! Tile efficiency engine: shanten, waits, improvements and discard ranking
//! over a 34-kind tile count array.

pub mod batch;
pub mod config;
pub mod discard;
pub mod improve;
pub mod shanten;
pub mod tile;
pub mod waits;

use anyhow::Result;

pub use batch::{BatchAnalyzer, HandRequest};
pub use config::AnalysisConfig;
pub use discard::{rank_cmp, sort_candidates, Analysis14, DiscardAnalysis};
pub use improve::{Analysis13, Analyzer};
pub use shanten::{Memoized, ShantenOracle, StandardOracle};
pub use tile::{Tiles34, MAX_COPIES, TILE_KINDS};
pub use waits::{Improves, TileMap, Waits};

/// Shanten, waits and improvements of a 1/4/7/10/13 tile hand with the
/// bundled oracle.
pub fn eval_hand(tiles: &Tiles34, is_open: bool) -> Result<Analysis13> {
    Analyzer::standard(AnalysisConfig::default()).analyze13(tiles, is_open)
}

/// Ranked discard candidates of a 2/5/8/11/14 tile hand with the bundled
/// oracle.
pub fn eval_discards(tiles: &Tiles34, is_open: bool) -> Result<DiscardAnalysis> {
    Analyzer::standard(AnalysisConfig::default()).analyze14(tiles, is_open)
}

#[cfg(feature = "python")]
mod python {
    use std::collections::HashMap;

    use pyo3::prelude::*;

    use crate::{Analysis13, Tiles34};

    /// (shanten, waits, next_shanten_waits, improves, improve_way_count,
    ///  avg_improve_waits_count, avg_next_shanten_waits_count)
    type PyAnalysis13 = (
        i8,
        HashMap<usize, u8>,
        HashMap<usize, u32>,
        HashMap<usize, HashMap<usize, u8>>,
        u32,
        f64,
        f64,
    );

    fn to_py(r: &Analysis13) -> PyAnalysis13 {
        (
            r.shanten,
            r.waits.iter().collect(),
            r.next_shanten_waits.iter().map(|(t, &c)| (t, c)).collect(),
            r.improves
                .iter()
                .map(|(t, w)| (t, w.iter().collect()))
                .collect(),
            r.improve_way_count,
            r.avg_improve_waits_count,
            r.avg_next_shanten_waits_count,
        )
    }

    /// Python에서 1/4/7/10/13장 손패 분석
    ///
    /// Returns:
    ///   (shanten, {wait: left}, {wait: next_waits}, {draw: {wait: left}},
    ///    improve_ways, avg_improve, avg_next)
    #[pyfunction]
    #[pyo3(signature = (hand, is_open = false))]
    fn analyze13_py(py: Python<'_>, hand: Vec<u8>, is_open: bool) -> PyResult<PyAnalysis13> {
        let tiles = Tiles34::from_counts(&hand)?;
        let result = py.allow_threads(|| crate::eval_hand(&tiles, is_open))?;
        Ok(to_py(&result))
    }

    /// Python에서 2/5/8/11/14장 손패의 버림 후보 순위
    ///
    /// Returns:
    ///   (shanten, [(discard, analysis13)], [(regressive_discard, analysis13)])
    #[pyfunction]
    #[pyo3(signature = (hand, is_open = false))]
    #[allow(clippy::type_complexity)]
    fn analyze14_py(
        py: Python<'_>,
        hand: Vec<u8>,
        is_open: bool,
    ) -> PyResult<(i8, Vec<(usize, PyAnalysis13)>, Vec<(usize, PyAnalysis13)>)> {
        let tiles = Tiles34::from_counts(&hand)?;
        let result = py.allow_threads(|| crate::eval_discards(&tiles, is_open))?;
        let convert = |list: &[crate::Analysis14]| {
            list.iter()
                .map(|c| (c.discard_tile, to_py(&c.result13)))
                .collect::<Vec<_>>()
        };
        Ok((
            result.shanten,
            convert(&result.normal),
            convert(&result.regressive),
        ))
    }

    #[pymodule]
    fn shanten_improve(m: &Bound<'_, PyModule>) -> PyResult<()> {
        pyo3_log::init();
        m.add_function(wrap_pyfunction!(analyze13_py, m)?)?;
        m.add_function(wrap_pyfunction!(analyze14_py, m)?)?;
        Ok(())
    }
}
