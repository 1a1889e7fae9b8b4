#![allow(dead_code)]

use shanten_improve::{Analysis13, Analysis14, Improves, TileMap, Tiles34, Waits, TILE_KINDS};

/// `"123m456p11z"` notation.
pub fn hand(s: &str) -> Tiles34 {
    let mut counts = [0; TILE_KINDS];
    let mut ranks = vec![];
    for ch in s.chars() {
        let base = match ch {
            '1'..='9' => {
                ranks.push(ch as usize - '1' as usize);
                continue;
            }
            'm' => 0,
            'p' => 9,
            's' => 18,
            'z' => 27,
            _ => panic!("bad tile notation {s:?}"),
        };
        for rank in ranks.drain(..) {
            counts[base + rank] += 1;
        }
    }
    Tiles34::new(counts)
}

/// Folds tile picks into counts, moving past kinds that already hold 4.
pub fn hand_from_picks(picks: &[usize]) -> Tiles34 {
    let mut counts = [0; TILE_KINDS];
    for &pick in picks {
        let mut t = pick % TILE_KINDS;
        while counts[t] == 4 {
            t = (t + 1) % TILE_KINDS;
        }
        counts[t] += 1;
    }
    Tiles34::new(counts)
}

pub fn waits_with_total(total: u32) -> Waits {
    let mut waits = Waits::new();
    let mut left = total;
    let mut tile = 0;
    while left > 0 {
        let c = left.min(4);
        waits.insert(tile, c as u8);
        left -= c;
        tile += 1;
    }
    waits
}

/// A discard candidate carrying only the metrics ranking looks at.
pub fn candidate(tile: usize, waits: u32, next: f64, improve: f64, ways: u32) -> Analysis14 {
    Analysis14 {
        discard_tile: tile,
        shanten: 1,
        result13: Analysis13 {
            tiles: Tiles34::default(),
            shanten: 1,
            waits: waits_with_total(waits),
            next_shanten_waits: TileMap::new(),
            improves: Improves::new(),
            improve_way_count: ways,
            improve_waits_count34: [waits; TILE_KINDS],
            avg_improve_waits_count: improve,
            avg_next_shanten_waits_count: next,
        },
    }
}
