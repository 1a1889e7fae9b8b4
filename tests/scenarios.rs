//! End-to-end scenarios over the public API.

mod common;

use std::cell::Cell;
use std::cmp::Ordering;

use anyhow::{ensure, Result};
use common::{candidate, hand};
use shanten_improve::{
    eval_discards, eval_hand, rank_cmp, sort_candidates, AnalysisConfig, Analyzer, ShantenOracle,
    StandardOracle, Tiles34,
};

#[test]
fn last_copy_of_a_triplet_counts_once() {
    // 111m 23m 456p 789p 55z: 1m finishes 111m 123m with a single copy left,
    // and 11m 55z also read as a double-pair wait on 1m/5z
    let result = eval_hand(&hand("11123m456789p55z"), false).unwrap();
    assert_eq!(result.shanten, 0);
    assert_eq!(
        result.waits.iter().collect::<Vec<_>>(),
        vec![(0, 1), (3, 4), (31, 2)],
    );
    assert_eq!(result.waits.all_count(), 7);
}

#[test]
fn four_held_copies_are_never_drawn() {
    // 1111m 23p 456s 789s 5z
    let tiles = hand("1111m23p456789s5z");
    let probes = Cell::new(0_u32);
    let strict = |t: &Tiles34, is_open: bool| -> Result<i8> {
        probes.set(probes.get() + 1);
        ensure!(t.counts().iter().all(|&c| c <= 4), "oracle saw a 5th copy");
        StandardOracle.shanten(t, is_open)
    };
    let analyzer = Analyzer::new(strict, AnalysisConfig::default());

    let result = analyzer.analyze13(&tiles, false).unwrap();
    assert!(probes.get() > 0);
    assert!(!result.waits.contains(0));
    assert!(!result.improves.contains(0));
    assert!(!result.next_shanten_waits.contains(0));
    assert_eq!(result.improve_waits_count34[0], result.waits.all_count());
    assert_eq!(result.tiles, tiles);
}

#[test]
fn wide_wait_gap_wins_outright() {
    let ten = candidate(2, 10, 0., 0., 0);
    let eight = candidate(30, 8, 50., 50., 50);
    assert_eq!(rank_cmp(&ten, &eight), Ordering::Less);

    let mut list = vec![eight, ten];
    sort_candidates(&mut list);
    assert_eq!(list[0].discard_tile, 2);
}

#[test]
fn ten_percent_band_boundary() {
    // 10 / 9 > 1.1: more waits win even with worse secondary metrics
    let ten = candidate(1, 10, 0., 0., 0);
    let nine = candidate(2, 9, 9., 9., 9);
    assert_eq!(rank_cmp(&ten, &nine), Ordering::Less);

    // 11 / 10 == 1.1 exactly: stays inside the band, secondary metrics decide
    let eleven = candidate(1, 11, 1., 0., 0);
    let ten = candidate(2, 10, 2., 0., 0);
    assert_eq!(rank_cmp(&ten, &eleven), Ordering::Less);
    assert_eq!(rank_cmp(&eleven, &ten), Ordering::Greater);
}

#[test]
fn iishanten_discards_partition_and_sort() {
    // 23m 56m 456p 789s 111z 2z
    let tiles = hand("2356m456p789s1112z");
    let result = eval_discards(&tiles, false).unwrap();
    assert_eq!(result.shanten, 1);
    assert!(!result.normal.is_empty());

    for c in &result.normal {
        assert_eq!(c.shanten, result.shanten);
        assert_eq!(c.result13.shanten, c.shanten);
        assert_eq!(c.result13.tiles.len(), 13);
    }
    for c in &result.regressive {
        assert!(c.shanten > result.shanten);
    }
    for list in [&result.normal, &result.regressive] {
        for pair in list.windows(2) {
            assert_ne!(rank_cmp(&pair[0], &pair[1]), Ordering::Greater);
        }
    }

    // dropping the lone 2z keeps both two-sided shapes
    let best = result.best().unwrap();
    assert_eq!(best.discard_tile, 28);
    assert_eq!(
        result.normal.len() + result.regressive.len(),
        tiles.held().count()
    );
}

#[test]
fn complete_hand_only_has_regressive_discards() {
    // 123m 456p 789s 111z 22z
    let result = eval_discards(&hand("123m456p789s11122z"), false).unwrap();
    assert_eq!(result.shanten, -1);
    assert!(result.normal.is_empty());
    assert_eq!(result.regressive.len(), 11);
    assert!(result.regressive.iter().all(|c| c.shanten == 0));
    assert!(result.best().is_some());
}

#[test]
fn open_hand_ignores_seven_pairs() {
    // 11m 33m 55m 77m 22p 44p 6p
    let tiles = hand("11335577m22446p");
    let closed = eval_hand(&tiles, false).unwrap();
    assert_eq!(closed.shanten, 0);
    assert_eq!(closed.waits.iter().collect::<Vec<_>>(), vec![(14, 3)]);

    let open = eval_hand(&tiles, true).unwrap();
    assert!(open.shanten > 0);
}
