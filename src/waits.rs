use std::fmt;

use crate::tile::{tile_name, TILE_KINDS};

/// Tiles that advance a hand, each with the number of copies still obtainable.
///
/// The total is kept alongside the counts since ranking and the improvement
/// search ask for it in their innermost loops.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Waits {
    counts: [u8; TILE_KINDS],
    total: u32,
}

impl Waits {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            counts: [0; TILE_KINDS],
            total: 0,
        }
    }

    /// Records `tile` as a wait with `remaining` obtainable copies.
    ///
    /// `remaining` must be within `1..=4`.
    pub fn insert(&mut self, tile: usize, remaining: u8) {
        debug_assert!((1..=4).contains(&remaining));
        self.total -= self.counts[tile] as u32;
        self.counts[tile] = remaining;
        self.total += remaining as u32;
    }

    #[inline]
    #[must_use]
    pub fn get(&self, tile: usize) -> Option<u8> {
        match self.counts[tile] {
            0 => None,
            c => Some(c),
        }
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, tile: usize) -> bool {
        self.counts[tile] > 0
    }

    /// Sum of obtainable copies over all waited kinds.
    #[inline]
    #[must_use]
    pub fn all_count(&self) -> u32 {
        self.total
    }

    /// Number of waited kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// `(tile, remaining)` pairs, ascending by tile.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u8)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(i, &c)| (i, c))
    }

    pub fn tiles(&self) -> impl Iterator<Item = usize> + '_ {
        self.iter().map(|(t, _)| t)
    }
}

impl FromIterator<(usize, u8)> for Waits {
    fn from_iter<I: IntoIterator<Item = (usize, u8)>>(iter: I) -> Self {
        let mut waits = Self::new();
        for (tile, remaining) in iter {
            waits.insert(tile, remaining);
        }
        waits
    }
}

impl fmt::Debug for Waits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(t, c)| (tile_name(t), c)))
            .finish()
    }
}

/// `12 waits: 1m[4] 4m[3] 7m[4]`
impl fmt::Display for Waits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} waits:", self.total)?;
        for (tile, c) in self.iter() {
            write!(f, " {}[{c}]", tile_name(tile))?;
        }
        Ok(())
    }
}

/// Sparse per-kind map; a slot per tile kind instead of a hash map.
#[derive(Clone, PartialEq, Eq)]
pub struct TileMap<T>([Option<T>; TILE_KINDS]);

impl<T> TileMap<T> {
    #[must_use]
    pub fn new() -> Self {
        Self(std::array::from_fn(|_| None))
    }

    #[inline]
    #[must_use]
    pub fn get(&self, tile: usize) -> Option<&T> {
        self.0[tile].as_ref()
    }

    #[inline]
    pub fn insert(&mut self, tile: usize, value: T) -> Option<T> {
        self.0[tile].replace(value)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, tile: usize) -> bool {
        self.0[tile].is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.iter().filter(|v| v.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_ref().map(|v| (i, v)))
    }
}

impl Default for Waits {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Default for TileMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for TileMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(t, v)| (tile_name(t), v)))
            .finish()
    }
}

/// Draw tile -> best wait set reachable by drawing it and discarding optimally.
pub type Improves = TileMap<Waits>;
