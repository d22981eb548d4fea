use rect_binpack::config::{BinConfig, GuillotineChoice, GuillotineConfig, GuillotineSplit};
use rect_binpack::model::{Item, UNPLACED};
use rect_binpack::packer::GuillotinePacker;

fn disjoint(items: &[Item]) -> bool {
    for i in 0..items.len() {
        for j in (i + 1)..items.len() {
            let (a, b) = (&items[i], &items[j]);
            if !a.is_placed() || !b.is_placed() || a.bin != b.bin {
                continue;
            }
            let (aw, ah) = a.extent();
            let (bw, bh) = b.extent();
            let overlap = !(a.x >= b.x + bw || b.x >= a.x + aw || a.y >= b.y + bh || b.y >= a.y + ah);
            if overlap {
                return false;
            }
        }
    }
    true
}

fn cfg(w: u32, h: u32) -> GuillotineConfig {
    GuillotineConfig::new(BinConfig::new(w, h))
        .choice(GuillotineChoice::BestAreaFit)
        .split(GuillotineSplit::MinimizeArea)
}

#[test]
fn exact_fit_takes_the_whole_bin() {
    let mut p = GuillotinePacker::new(cfg(10, 10)).unwrap();
    let r = p.add("full".to_string(), 10, 10).unwrap();
    let summary = p.pack();

    assert!(summary.success);
    assert_eq!(summary.num_bins, 1);
    let item = p.item(r);
    assert_eq!((item.x, item.y), (0, 0));
    assert!(!item.flipped);
    assert_eq!(item.bin, 0);
}

#[test]
fn two_piece_split_stays_in_one_bin() {
    let mut p = GuillotinePacker::new(cfg(10, 10)).unwrap();
    let a = p.add("a".to_string(), 6, 4).unwrap();
    let b = p.add("b".to_string(), 4, 6).unwrap();
    let summary = p.pack();

    assert!(summary.success);
    assert_eq!(summary.num_bins, 1);
    assert_eq!((p.item(a).x, p.item(a).y), (0, 0));
    assert_eq!((p.item(b).x, p.item(b).y), (0, 4));
    assert!(disjoint(p.items()));
    for item in p.items() {
        let (w, h) = item.extent();
        assert!(item.x + w <= 10 && item.y + h <= 10);
    }
}

#[test]
fn merge_reunites_split_leftovers() {
    // Two 6x5 placements leave a 4x5 pair stacked along the right
    // edge; only the coalesced 4x10 column can host the last rect.
    let base = BinConfig::new(10, 10).can_flip(false).max_bins(1);
    let cfg = GuillotineConfig::new(base)
        .choice(GuillotineChoice::BestAreaFit)
        .split(GuillotineSplit::ShorterLeftoverAxis);

    let mut merged = GuillotinePacker::new(cfg.clone().merge(true)).unwrap();
    merged.add("a".to_string(), 6, 5).unwrap();
    merged.add("b".to_string(), 6, 5).unwrap();
    let c = merged.add("c".to_string(), 4, 10).unwrap();
    let summary = merged.pack();

    assert!(summary.success);
    assert_eq!(summary.num_bins, 1);
    assert_eq!((merged.item(c).x, merged.item(c).y), (6, 0));
    assert!(disjoint(merged.items()));

    let mut plain = GuillotinePacker::new(cfg.merge(false)).unwrap();
    plain.add("a".to_string(), 6, 5).unwrap();
    plain.add("b".to_string(), 6, 5).unwrap();
    let c = plain.add("c".to_string(), 4, 10).unwrap();
    let summary = plain.pack();

    assert!(!summary.success);
    assert_eq!(plain.item(c).bin, UNPLACED);
}

#[test]
fn worst_area_fit_prefers_the_larger_leftover() {
    let cfg = GuillotineConfig::new(BinConfig::new(10, 10))
        .choice(GuillotineChoice::WorstAreaFit)
        .split(GuillotineSplit::ShorterLeftoverAxis);
    let mut p = GuillotinePacker::new(cfg).unwrap();
    p.add("a".to_string(), 2, 2).unwrap();
    let b = p.add("b".to_string(), 2, 2).unwrap();
    let summary = p.pack();

    assert!(summary.success);
    // The second placement lands in the big bottom piece, not the
    // snug 8x2 strip to the right.
    assert_eq!((p.item(b).x, p.item(b).y), (0, 2));
}
