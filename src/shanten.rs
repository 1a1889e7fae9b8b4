//! Shanten oracle: the distance-to-completion function the analyzers probe.
//!
//! The analyzers only see [`ShantenOracle`]. [`StandardOracle`] evaluates the
//! normal form by block decomposition, plus seven pairs and thirteen orphans for
//! concealed 13/14 tile hands. [`Memoized`] caches any oracle per request.

use std::cell::{Cell, RefCell};

use ahash::AHashMap;
use anyhow::Result;

use crate::tile::{is_terminal_or_honor, Tiles34};

/// Distance from a hand to a complete shape. `0` is tenpai, `-1` is complete.
pub trait ShantenOracle {
    fn shanten(&self, tiles: &Tiles34, is_open: bool) -> Result<i8>;

    /// True when drawing a kind with no held tile within reach can never lower
    /// the shanten of `tiles`, which lets wait scans skip those kinds.
    fn floating_tiles_never_advance(&self, _tiles: &Tiles34, _is_open: bool) -> bool {
        false
    }
}

impl<F> ShantenOracle for F
where
    F: Fn(&Tiles34, bool) -> Result<i8>,
{
    fn shanten(&self, tiles: &Tiles34, is_open: bool) -> Result<i8> {
        self(tiles, is_open)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StandardOracle;

impl ShantenOracle for StandardOracle {
    #[inline]
    fn shanten(&self, tiles: &Tiles34, is_open: bool) -> Result<i8> {
        Ok(calc_all(tiles, tiles.len_div3(), is_open))
    }

    fn floating_tiles_never_advance(&self, tiles: &Tiles34, is_open: bool) -> bool {
        // seven pairs and thirteen orphans both gain from unrelated kinds
        is_open || tiles.len_div3() < 4
    }
}

// ----- normal form -----

/// Pareto-maximal `(melds, partials)` splits of one suit or of the honors.
#[derive(Default)]
struct BlockShapes {
    plain: Vec<(u8, u8)>,
    /// One pair of this block taken as the head.
    headed: Vec<(u8, u8)>,
}

fn push_pareto(shapes: &mut Vec<(u8, u8)>, melds: u8, partials: u8) {
    if shapes.iter().any(|&(m, p)| m >= melds && p >= partials) {
        return;
    }
    shapes.retain(|&(m, p)| m > melds || p > partials);
    shapes.push((melds, partials));
}

fn block_shapes(block: &[u8], sequences: bool) -> BlockShapes {
    let mut counts = [0; 9];
    let counts = &mut counts[..block.len()];
    counts.copy_from_slice(block);

    let mut shapes = BlockShapes::default();
    search_block(counts, 0, sequences, 0, 0, false, &mut shapes);
    shapes
}

fn search_block(
    c: &mut [u8],
    mut i: usize,
    sequences: bool,
    melds: u8,
    partials: u8,
    head: bool,
    out: &mut BlockShapes,
) {
    while i < c.len() && c[i] == 0 {
        i += 1;
    }
    if i == c.len() {
        let shapes = if head { &mut out.headed } else { &mut out.plain };
        push_pareto(shapes, melds, partials);
        return;
    }

    let has_next = sequences && i + 1 < c.len() && c[i + 1] > 0;
    let has_gap = sequences && i + 2 < c.len() && c[i + 2] > 0;

    if c[i] >= 3 {
        c[i] -= 3;
        search_block(c, i, sequences, melds + 1, partials, head, out);
        c[i] += 3;
    }
    if has_next && has_gap {
        c[i] -= 1;
        c[i + 1] -= 1;
        c[i + 2] -= 1;
        search_block(c, i, sequences, melds + 1, partials, head, out);
        c[i] += 1;
        c[i + 1] += 1;
        c[i + 2] += 1;
    }
    if c[i] >= 2 {
        c[i] -= 2;
        if !head {
            search_block(c, i, sequences, melds, partials, true, out);
        }
        search_block(c, i, sequences, melds, partials + 1, head, out);
        c[i] += 2;
    }
    if has_next {
        c[i] -= 1;
        c[i + 1] -= 1;
        search_block(c, i, sequences, melds, partials + 1, head, out);
        c[i] += 1;
        c[i + 1] += 1;
    }
    if has_gap {
        c[i] -= 1;
        c[i + 2] -= 1;
        search_block(c, i, sequences, melds, partials + 1, head, out);
        c[i] += 1;
        c[i + 2] += 1;
    }

    // leave one copy floating
    c[i] -= 1;
    search_block(c, i, sequences, melds, partials, head, out);
    c[i] += 1;
}

/// `len_div3` must be within [0, 4].
#[must_use]
pub fn calc_normal(tiles: &Tiles34, len_div3: u8) -> i8 {
    let counts = tiles.counts();
    let blocks = [
        block_shapes(&counts[..9], true),
        block_shapes(&counts[9..2 * 9], true),
        block_shapes(&counts[2 * 9..3 * 9], true),
        block_shapes(&counts[3 * 9..], false),
    ];

    // partials beyond len_div3 can never count, so cap them to keep the sets small
    let mut plain = vec![(0_u8, 0_u8)];
    let mut headed: Vec<(u8, u8)> = vec![];
    for block in &blocks {
        let mut next_plain = vec![];
        let mut next_headed = vec![];
        for &(m, p) in &plain {
            for &(bm, bp) in &block.plain {
                push_pareto(&mut next_plain, m + bm, (p + bp).min(len_div3));
            }
            for &(bm, bp) in &block.headed {
                push_pareto(&mut next_headed, m + bm, (p + bp).min(len_div3));
            }
        }
        for &(m, p) in &headed {
            for &(bm, bp) in &block.plain {
                push_pareto(&mut next_headed, m + bm, (p + bp).min(len_div3));
            }
        }
        plain = next_plain;
        headed = next_headed;
    }

    let score = |(melds, partials): (u8, u8)| {
        let melds = melds.min(len_div3);
        2 * melds + partials.min(len_div3 - melds)
    };
    let best = plain
        .into_iter()
        .map(score)
        .chain(headed.into_iter().map(|s| score(s) + 1))
        .max()
        .unwrap_or_default();

    (2 * len_div3) as i8 - best as i8
}

#[must_use]
pub fn calc_chitoi(tiles: &Tiles34) -> i8 {
    let mut pairs = 0;
    let mut kinds = 0;
    tiles.counts().iter().filter(|&&c| c > 0).for_each(|&c| {
        kinds += 1;
        if c >= 2 {
            pairs += 1;
        }
    });

    let redunct = 7_u8.saturating_sub(kinds) as i8;
    7 - pairs + redunct - 1
}

#[must_use]
pub fn calc_kokushi(tiles: &Tiles34) -> i8 {
    let mut pairs = 0;
    let mut kinds = 0;
    for (i, &c) in tiles.counts().iter().enumerate() {
        if c > 0 && is_terminal_or_honor(i) {
            kinds += 1;
            if c >= 2 {
                pairs += 1;
            }
        }
    }

    let redunct = (pairs > 0) as i8;
    14 - kinds - redunct - 1
}

/// Open hands only count the normal form.
#[must_use]
pub fn calc_all(tiles: &Tiles34, len_div3: u8, is_open: bool) -> i8 {
    let mut shanten = calc_normal(tiles, len_div3);
    if shanten <= 0 || len_div3 < 4 || is_open {
        return shanten;
    }

    shanten = shanten.min(calc_chitoi(tiles));
    if shanten > 0 {
        shanten.min(calc_kokushi(tiles))
    } else {
        shanten
    }
}

// ----- memoization -----

const MEMO_CAPACITY: usize = 1 << 20;

/// Caches oracle answers by exact tile space. Not `Sync`; keep one per
/// request or per worker thread.
pub struct Memoized<O> {
    inner: O,
    cache: RefCell<AHashMap<(Tiles34, bool), i8>>,
    hits: Cell<u64>,
    misses: Cell<u64>,
}

impl<O> Memoized<O> {
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            cache: RefCell::new(AHashMap::new()),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// `(hits, misses)` since construction.
    #[must_use]
    pub fn stats(&self) -> (u64, u64) {
        (self.hits.get(), self.misses.get())
    }
}

impl<O: ShantenOracle> ShantenOracle for Memoized<O> {
    fn shanten(&self, tiles: &Tiles34, is_open: bool) -> Result<i8> {
        let key = (*tiles, is_open);
        let cached = self.cache.borrow().get(&key).copied();
        if let Some(shanten) = cached {
            self.hits.set(self.hits.get() + 1);
            return Ok(shanten);
        }

        let shanten = self.inner.shanten(tiles, is_open)?;
        self.misses.set(self.misses.get() + 1);
        let mut cache = self.cache.borrow_mut();
        if cache.len() >= MEMO_CAPACITY {
            log::debug!("oracle cache reached {} entries, clearing", cache.len());
            cache.clear();
        }
        cache.insert(key, shanten);
        Ok(shanten)
    }

    fn floating_tiles_never_advance(&self, tiles: &Tiles34, is_open: bool) -> bool {
        self.inner.floating_tiles_never_advance(tiles, is_open)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::testing::hand;
    use anyhow::bail;


    fn shanten(tiles: &Tiles34) -> i8 {
        calc_all(tiles, tiles.len_div3(), false)
    }

    #[test]
    fn complete_and_tenpai() {
        // 123m 456p 789s 111z 22z
        let agari = hand("123m456p789s11122z");
        assert_eq!(shanten(&agari), -1);

        // 123m 456p 789s 111z 2z
        let tenpai = hand("123m456p789s1112z");
        assert_eq!(shanten(&tenpai), 0);
    }

    #[test]
    fn iishanten_two_sided() {
        // 23m 56m 456p 789s 111z
        let tiles = hand("2356m456p789s111z");
        assert_eq!(shanten(&tiles), 1);
    }

    #[test]
    fn small_hands() {
        assert_eq!(shanten(&hand("6m")), 0);
        assert_eq!(shanten(&hand("66m")), -1);
        assert_eq!(shanten(&hand("67m")), 0);
        // 13m 5z: kanchan plus a single, one useful tile short of tenpai
        assert_eq!(shanten(&hand("13m57z")), 1);
        assert_eq!(shanten(&hand("123m5z")), 0);
    }

    #[test]
    fn chitoi_and_kokushi_only_when_concealed() {
        // 11m 33m 55m 77m 22p 44p 6p
        let chitoi = hand("11335577m22446p");
        assert_eq!(calc_chitoi(&chitoi), 0);
        assert_eq!(shanten(&chitoi), 0);
        assert!(calc_all(&chitoi, 4, true) > 0);

        let kokushi = hand("19m19p19s1234567z");
        assert_eq!(calc_kokushi(&kokushi), 0);
        assert_eq!(shanten(&kokushi), 0);
    }

    #[test]
    fn pruning_only_for_normal_form() {
        let oracle = StandardOracle;
        let thirteen = hand("123m456p789s1112z");
        assert!(!oracle.floating_tiles_never_advance(&thirteen, false));
        assert!(oracle.floating_tiles_never_advance(&thirteen, true));
        assert!(oracle.floating_tiles_never_advance(&hand("1236m"), false));
    }

    #[test]
    fn memoized_matches_inner_and_counts_hits() {
        let memo = Memoized::new(StandardOracle);
        let tiles = hand("2356m456p789s111z");
        assert_eq!(memo.shanten(&tiles, false).unwrap(), 1);
        assert_eq!(memo.shanten(&tiles, false).unwrap(), 1);
        assert_eq!(memo.shanten(&tiles, true).unwrap(), 1);
        assert_eq!(memo.stats(), (1, 2));
    }

    #[test]
    fn memoized_does_not_cache_errors() {
        let calls = Cell::new(0);
        let failing = |_: &Tiles34, _: bool| -> Result<i8> {
            calls.set(calls.get() + 1);
            bail!("oracle unavailable")
        };
        let memo = Memoized::new(failing);
        assert!(memo.shanten(&hand("4m"), false).is_err());
        assert!(memo.shanten(&hand("4m"), false).is_err());
        assert_eq!(calls.get(), 2);
    }
}
