//! Tile space: one count per tile kind, mutated in place during search.
//!
//! Index layout follows the usual 34-kind order:
//! 0..9 = 1m..9m, 9..18 = 1p..9p, 18..27 = 1s..9s, 27..34 = 1z..7z (winds, dragons).

use std::fmt;
use std::ops::{Deref, DerefMut, Index};

use anyhow::{ensure, Result};

pub const TILE_KINDS: usize = 34;
pub const MAX_COPIES: u8 = 4;

#[rustfmt::skip]
const TILE_NAMES: [&str; TILE_KINDS] = [
    "1m", "2m", "3m", "4m", "5m", "6m", "7m", "8m", "9m",
    "1p", "2p", "3p", "4p", "5p", "6p", "7p", "8p", "9p",
    "1s", "2s", "3s", "4s", "5s", "6s", "7s", "8s", "9s",
    "1z", "2z", "3z", "4z", "5z", "6z", "7z",
];

// ----- index helpers -----

#[inline]
pub fn is_terminal_or_honor(idx: usize) -> bool {
    matches!(
        idx,
        0 | 8 |       // 1m, 9m
        9 | 17 |      // 1p, 9p
        18 | 26 |     // 1s, 9s
        27..=33       // 자패
    )
}

#[inline]
pub fn is_honor(idx: usize) -> bool {
    idx >= 27
}

#[inline]
pub fn tile_name(idx: usize) -> &'static str {
    TILE_NAMES[idx]
}

/// Counts per tile kind. Every count stays within `0..=4`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tiles34([u8; TILE_KINDS]);

impl Tiles34 {
    /// Wraps raw counts without checking them; use [`Tiles34::from_counts`] for
    /// untrusted input.
    #[must_use]
    pub const fn new(counts: [u8; TILE_KINDS]) -> Self {
        Self(counts)
    }

    /// Validating constructor for counts coming from outside the crate.
    pub fn from_counts(counts: &[u8]) -> Result<Self> {
        ensure!(
            counts.len() == TILE_KINDS,
            "hand must be length 34 (0..33 tile counts), got {}",
            counts.len(),
        );
        let mut tiles = [0; TILE_KINDS];
        for (i, &c) in counts.iter().enumerate() {
            ensure!(c <= MAX_COPIES, "{} has {c} copies, at most 4 exist", tile_name(i));
            tiles[i] = c;
        }
        Ok(Self(tiles))
    }

    #[inline]
    #[must_use]
    pub fn counts(&self) -> &[u8; TILE_KINDS] {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.iter().map(|&c| c as usize).sum()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&c| c == 0)
    }

    /// Number of melds a complete hand of this size needs.
    #[inline]
    #[must_use]
    pub fn len_div3(&self) -> u8 {
        (self.len() / 3) as u8
    }

    /// Copies still obtainable for `tile` from this hand's point of view.
    #[inline]
    #[must_use]
    pub fn remaining(&self, tile: usize) -> u8 {
        MAX_COPIES - self.0[tile]
    }

    /// Kinds held at least once, ascending.
    pub fn held(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(i, _)| i)
    }

    /// Adds one copy of `tile` until the returned guard is dropped.
    ///
    /// The caller must skip kinds already held four times.
    #[inline]
    pub fn draw(&mut self, tile: usize) -> Mutation<'_> {
        debug_assert!(self.0[tile] < MAX_COPIES, "drawing a 5th {}", tile_name(tile));
        self.0[tile] += 1;
        Mutation {
            tiles: self,
            tile,
            drawn: true,
        }
    }

    /// Removes one copy of `tile` until the returned guard is dropped.
    ///
    /// The caller must skip kinds not held.
    #[inline]
    pub fn discard(&mut self, tile: usize) -> Mutation<'_> {
        debug_assert!(self.0[tile] > 0, "discarding an unheld {}", tile_name(tile));
        self.0[tile] -= 1;
        Mutation {
            tiles: self,
            tile,
            drawn: false,
        }
    }

    /// Kinds that share a potential shape with some held tile: held kinds plus
    /// their same-suit neighbours within two ranks. Honors only reach themselves.
    #[must_use]
    pub fn reachable(&self) -> [bool; TILE_KINDS] {
        let mut ret = [false; TILE_KINDS];
        for idx in self.held() {
            if is_honor(idx) {
                ret[idx] = true;
                continue;
            }
            let suit_start = idx / 9 * 9;
            let lo = idx.saturating_sub(2).max(suit_start);
            let hi = (idx + 2).min(suit_start + 8);
            ret[lo..=hi].fill(true);
        }
        ret
    }
}

impl Default for Tiles34 {
    fn default() -> Self {
        Self([0; TILE_KINDS])
    }
}

impl Index<usize> for Tiles34 {
    type Output = u8;

    #[inline]
    fn index(&self, idx: usize) -> &u8 {
        &self.0[idx]
    }
}

impl TryFrom<&[u8]> for Tiles34 {
    type Error = anyhow::Error;

    fn try_from(counts: &[u8]) -> Result<Self> {
        Self::from_counts(counts)
    }
}

impl From<[u8; TILE_KINDS]> for Tiles34 {
    fn from(counts: [u8; TILE_KINDS]) -> Self {
        Self(counts)
    }
}

impl fmt::Debug for Tiles34 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tiles34({self})")
    }
}

/// Compact `123m456p11z` form, used in log lines.
impl fmt::Display for Tiles34 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (suit, start, len) in [('m', 0, 9), ('p', 9, 9), ('s', 18, 9), ('z', 27, 7)] {
            let block = &self.0[start..start + len];
            if block.iter().all(|&c| c == 0) {
                continue;
            }
            for (rank, &c) in block.iter().enumerate() {
                for _ in 0..c {
                    write!(f, "{}", rank + 1)?;
                }
            }
            write!(f, "{suit}")?;
        }
        Ok(())
    }
}

/// A pending draw or discard on a [`Tiles34`]; dropping it undoes the change.
pub struct Mutation<'a> {
    tiles: &'a mut Tiles34,
    tile: usize,
    drawn: bool,
}

impl Deref for Mutation<'_> {
    type Target = Tiles34;

    #[inline]
    fn deref(&self) -> &Tiles34 {
        self.tiles
    }
}

impl DerefMut for Mutation<'_> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Tiles34 {
        self.tiles
    }
}

impl Drop for Mutation<'_> {
    #[inline]
    fn drop(&mut self) {
        if self.drawn {
            self.tiles.0[self.tile] -= 1;
        } else {
            self.tiles.0[self.tile] += 1;
        }
    }
}
