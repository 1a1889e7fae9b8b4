//! 14-tile analysis: run the 13-tile analysis once per discard candidate of a
//! 2/5/8/11/14 tile hand and rank the candidates.

use std::cmp::Ordering;
use std::fmt;

use anyhow::Result;
use log::debug;

use crate::improve::{ensure_hand, Analysis13, Analyzer};
use crate::shanten::ShantenOracle;
use crate::tile::{tile_name, Tiles34, TILE_KINDS};

/// One discard candidate.
#[derive(Debug, Clone)]
pub struct Analysis14 {
    pub discard_tile: usize,
    /// Shanten after the discard.
    pub shanten: i8,
    pub result13: Analysis13,
}

impl Analysis14 {
    /// See [`rank_cmp`].
    #[inline]
    #[must_use]
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        rank_cmp(self, other)
    }
}

impl fmt::Display for Analysis14 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "discard {}: {}", tile_name(self.discard_tile), self.result13)
    }
}

#[derive(Debug, Clone)]
pub struct DiscardAnalysis {
    /// Shanten before discarding.
    pub shanten: i8,
    /// Discards that keep the shanten, best first.
    pub normal: Vec<Analysis14>,
    /// Discards that move the hand backwards, best first.
    pub regressive: Vec<Analysis14>,
}

impl DiscardAnalysis {
    #[must_use]
    pub fn best(&self) -> Option<&Analysis14> {
        self.normal.first().or_else(|| self.regressive.first())
    }
}

/// Whether two wait counts differ by more than 10%. A zero count is outside
/// the band of any positive one.
#[inline]
fn outside_band(a: u32, b: u32) -> bool {
    let (hi, lo) = (a.max(b), a.min(b));
    if lo == 0 {
        hi > 0
    } else {
        10 * hi > 11 * lo
    }
}

/// 버림 후보 비교. `Less`면 `a`가 더 좋은 버림.
///
/// 정의:
///   - 유효패 수가 10% 넘게 차이나면 많은 쪽이 바로 이김
///   - 밴드 안이면 평균 다음 유효패 > 평균 개량 유효패 > 개량 가짓수 > 큰 타일 번호
///
/// 밴드 때문에 일부 체인은 추이적이지 않음 (10 < 11 < 12, 10 vs 12는 밴드 밖).
/// `sort_by` 대신 [`sort_candidates`]로 정렬할 것.
#[must_use]
pub fn rank_cmp(a: &Analysis14, b: &Analysis14) -> Ordering {
    let (ra, rb) = (&a.result13, &b.result13);
    let (ca, cb) = (ra.waits.all_count(), rb.waits.all_count());
    if outside_band(ca, cb) {
        return cb.cmp(&ca);
    }

    rb.avg_next_shanten_waits_count
        .total_cmp(&ra.avg_next_shanten_waits_count)
        .then_with(|| rb.avg_improve_waits_count.total_cmp(&ra.avg_improve_waits_count))
        .then_with(|| rb.improve_way_count.cmp(&ra.improve_way_count))
        .then_with(|| b.discard_tile.cmp(&a.discard_tile))
}

/// Stable insertion sort by [`rank_cmp`], best first. Deterministic for any
/// input order and never panics on intransitive chains.
pub fn sort_candidates(candidates: &mut [Analysis14]) {
    for i in 1..candidates.len() {
        let mut j = i;
        while j > 0 && rank_cmp(&candidates[j], &candidates[j - 1]).is_lt() {
            candidates.swap(j, j - 1);
            j -= 1;
        }
    }
}

impl<O: ShantenOracle> Analyzer<O> {
    /// 2/5/8/11/14장 손패의 모든 버림 후보 분석. 샹텐 유지/후퇴로 나눠 각각 정렬.
    pub fn analyze14(&self, tiles: &Tiles34, is_open: bool) -> Result<DiscardAnalysis> {
        ensure_hand(tiles, 2)?;
        let mut tiles = *tiles;
        let shanten = self.oracle().shanten(&tiles, is_open)?;

        let mut normal = vec![];
        let mut regressive = vec![];
        for discard in 0..TILE_KINDS {
            if tiles[discard] == 0 {
                continue;
            }
            let mut hand = tiles.discard(discard);
            let result13 = self.search_improves(&mut hand, is_open)?;
            let candidate = Analysis14 {
                discard_tile: discard,
                shanten: result13.shanten,
                result13,
            };
            debug_assert!(candidate.shanten >= shanten);
            if candidate.shanten == shanten {
                normal.push(candidate);
            } else {
                regressive.push(candidate);
            }
        }

        sort_candidates(&mut normal);
        sort_candidates(&mut regressive);

        if let Some(best) = normal.first() {
            debug!("{tiles}: shanten {shanten}, best {best}");
        } else {
            debug!("{tiles}: shanten {shanten}, every discard regresses");
        }
        Ok(DiscardAnalysis {
            shanten,
            normal,
            regressive,
        })
    }
}
