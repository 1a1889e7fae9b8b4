//! 13-tile analysis: shanten, waits, and the draw/discard search for
//! improvements on 1/4/7/10/13 tile hands.

use std::fmt;

use anyhow::{ensure, Result};
use log::{debug, trace};

use crate::config::AnalysisConfig;
use crate::shanten::{Memoized, ShantenOracle, StandardOracle};
use crate::tile::{tile_name, Tiles34, MAX_COPIES, TILE_KINDS};
use crate::waits::{Improves, TileMap, Waits};

/// Result of analysing a 1/4/7/10/13 tile hand.
#[derive(Debug, Clone)]
pub struct Analysis13 {
    /// The hand this analysis was made on.
    pub tiles: Tiles34,

    pub shanten: i8,

    /// Draws that lower the shanten.
    pub waits: Waits,

    /// Wait tile -> wait count after drawing it and making the best advancing
    /// discard. Only filled when `shanten > 0`.
    pub next_shanten_waits: TileMap<u32>,

    /// Non-wait draws that, with the best discard, keep the shanten but widen
    /// the waits.
    pub improves: Improves,

    /// Every improving (draw, discard) pair counts once, so one draw tile can
    /// contribute several ways while keeping a single `improves` entry.
    pub improve_way_count: u32,

    /// Per draw tile, the wait count after drawing it. Stays at the base wait
    /// count unless an improvement beats it.
    pub improve_waits_count34: [u32; TILE_KINDS],

    /// Weighted mean of `improve_waits_count34` over unseen copies.
    pub avg_improve_waits_count: f64,

    /// Weighted mean of `next_shanten_waits` over unseen copies.
    pub avg_next_shanten_waits_count: f64,
}

impl Analysis13 {
    fn fill_averages(&mut self) {
        self.avg_improve_waits_count = if self.improves.is_empty() {
            self.waits.all_count() as f64
        } else {
            let (score, weight) = (0..TILE_KINDS).fold((0, 0), |(score, weight), tile| {
                let w = self.tiles.remaining(tile) as u32;
                (score + w * self.improve_waits_count34[tile], weight + w)
            });
            weighted_mean(score, weight)
        };

        self.avg_next_shanten_waits_count = if self.next_shanten_waits.is_empty() {
            0.
        } else {
            let (score, weight) =
                self.next_shanten_waits
                    .iter()
                    .fold((0, 0), |(score, weight), (tile, &count)| {
                        let w = self.tiles.remaining(tile) as u32;
                        (score + w * count, weight + w)
                    });
            weighted_mean(score, weight)
        };
    }
}

fn weighted_mean(score: u32, weight: u32) -> f64 {
    if weight == 0 {
        0.
    } else {
        score as f64 / weight as f64
    }
}

/// `14 waits: 2m[4] 5m[4] 3p[3] 6p[3] | 15.20 [18 improves] | 6.31 next`
impl fmt::Display for Analysis13 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {:.2} [{} improves]",
            self.waits, self.avg_improve_waits_count, self.improve_way_count,
        )?;
        if self.shanten > 0 {
            write!(f, " | {:.2} next", self.avg_next_shanten_waits_count)?;
        }
        Ok(())
    }
}

/// 샹텐 오라클 하나 위에서 도는 패효율 분석기.
pub struct Analyzer<O> {
    oracle: O,
    config: AnalysisConfig,
}

impl Analyzer<Memoized<StandardOracle>> {
    /// The bundled oracle behind a per-analyzer cache.
    pub fn standard(config: AnalysisConfig) -> Self {
        Self::new(Memoized::new(StandardOracle), config)
    }
}

impl<O> Analyzer<O> {
    pub fn new(oracle: O, config: AnalysisConfig) -> Self {
        Self { oracle, config }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }
}

/// Checks counts and that the hand holds `3n + rem` tiles, at most `12 + rem`.
pub(crate) fn ensure_hand(tiles: &Tiles34, rem: usize) -> Result<()> {
    ensure!(
        tiles.counts().iter().all(|&c| c <= MAX_COPIES),
        "more than 4 copies of a tile in {tiles}",
    );
    let len = tiles.len();
    ensure!(
        len % 3 == rem && len <= 12 + rem,
        "expected a hand of {rem}/{}/{}/{}/{} tiles, got {len}",
        rem + 3,
        rem + 6,
        rem + 9,
        rem + 12,
    );
    Ok(())
}

impl<O: ShantenOracle> Analyzer<O> {
    /// 1/4/7/10/13장 손패의 샹텐과 유효패 (남은 장수 포함).
    pub fn shanten_and_waits13(&self, tiles: &Tiles34, is_open: bool) -> Result<(i8, Waits)> {
        ensure_hand(tiles, 1)?;
        let mut tiles = *tiles;
        self.scan_waits(&mut tiles, is_open)
    }

    /// 1/4/7/10/13장 손패 분석: 샹텐, 유효패, 개량.
    ///
    /// 반환:
    ///   - next_shanten_waits: 유효패를 뽑고 최선으로 버렸을 때의 다음 유효패 수 (shanten > 0일 때만)
    ///   - improves: 샹텐은 그대로지만 유효패가 늘어나는 쯔모별 최선 결과
    ///   - improve_way_count: 개량이 되는 (쯔모, 버림) 쌍의 수
    pub fn analyze13(&self, tiles: &Tiles34, is_open: bool) -> Result<Analysis13> {
        ensure_hand(tiles, 1)?;
        let mut tiles = *tiles;
        let result = self.search_improves(&mut tiles, is_open)?;
        debug!(
            "{tiles}: shanten {}, {} waits, {} improve ways",
            result.shanten,
            result.waits.all_count(),
            result.improve_way_count,
        );
        Ok(result)
    }

    /// Single flat scan: every drawable kind is probed once.
    pub(crate) fn scan_waits(&self, tiles: &mut Tiles34, is_open: bool) -> Result<(i8, Waits)> {
        let shanten = self.oracle.shanten(tiles, is_open)?;

        let reachable = (self.config.prune_floating
            && self.oracle.floating_tiles_never_advance(tiles, is_open))
        .then(|| tiles.reachable());

        let mut waits = Waits::new();
        for tile in 0..TILE_KINDS {
            if tiles[tile] == MAX_COPIES {
                continue;
            }
            if reachable.is_some_and(|reach| !reach[tile]) {
                continue;
            }
            let remaining = tiles.remaining(tile);
            let hand = tiles.draw(tile);
            if self.oracle.shanten(&hand, is_open)? < shanten {
                waits.insert(tile, remaining);
            }
        }

        Ok((shanten, waits))
    }

    pub(crate) fn search_improves(&self, tiles: &mut Tiles34, is_open: bool) -> Result<Analysis13> {
        let (shanten, waits) = self.scan_waits(tiles, is_open)?;
        let waits_count = waits.all_count();

        let mut next_shanten_waits = TileMap::new();
        let mut improves = Improves::new();
        let mut improve_way_count = 0;
        let mut improve_waits_count34 = [waits_count; TILE_KINDS];

        for draw in 0..TILE_KINDS {
            if tiles[draw] == MAX_COPIES {
                continue;
            }
            let mut hand = tiles.draw(draw);

            if waits.contains(draw) {
                // a tenpai hand completes on its waits; nothing lies beyond
                if shanten == 0 {
                    continue;
                }
                let mut best = 0_u32;
                for discard in 0..TILE_KINDS {
                    if discard == draw || hand[discard] == 0 {
                        continue;
                    }
                    let mut after = hand.discard(discard);
                    let (next_shanten, next_waits) = self.scan_waits(&mut after, is_open)?;
                    if next_shanten < shanten {
                        best = best.max(next_waits.all_count());
                    }
                }
                if best > 0 {
                    next_shanten_waits.insert(draw, best);
                }
                continue;
            }

            for discard in 0..TILE_KINDS {
                if discard == draw || hand[discard] == 0 {
                    continue;
                }
                let mut after = hand.discard(discard);
                let (next_shanten, improve_waits) = self.scan_waits(&mut after, is_open)?;
                if next_shanten != shanten {
                    continue;
                }
                let count = improve_waits.all_count();
                if count <= waits_count {
                    continue;
                }

                improve_way_count += 1;
                if self.config.trace_improvements {
                    trace!(
                        "draw {} discard {}: {waits_count} -> {count} waits",
                        tile_name(draw),
                        tile_name(discard),
                    );
                }
                if count > improve_waits_count34[draw] {
                    improve_waits_count34[draw] = count;
                    improves.insert(draw, improve_waits);
                }
            }
        }

        let mut result = Analysis13 {
            tiles: *tiles,
            shanten,
            waits,
            next_shanten_waits,
            improves,
            improve_way_count,
            improve_waits_count34,
            avg_improve_waits_count: 0.,
            avg_next_shanten_waits_count: 0.,
        };
        result.fill_averages();
        Ok(result)
    }
}
