use rect_binpack::prelude::*;

#[test]
fn overflow_opens_one_bin_per_full_rect() {
    let cfg = PackerConfig::Guillotine(GuillotineConfig::new(BinConfig::new(4, 4)));
    let mut packer = Packer::new(cfg).unwrap();
    for i in 0..5 {
        packer.add(format!("r{}", i), 4, 4).unwrap();
    }
    let summary = packer.pack();

    assert!(summary.success);
    assert_eq!(summary.num_bins, 5);
    let mut bins: Vec<u32> = packer.items().iter().map(|i| i.bin).collect();
    bins.sort_unstable();
    assert_eq!(bins, vec![0, 1, 2, 3, 4]);
}

#[test]
fn bin_cap_fails_the_leftover_batch() {
    let cfg = PackerConfig::Guillotine(GuillotineConfig::new(
        BinConfig::new(4, 4).max_bins(2),
    ));
    let mut packer = Packer::new(cfg).unwrap();
    for i in 0..5 {
        packer.add(format!("r{}", i), 4, 4).unwrap();
    }
    let summary = packer.pack();

    assert!(!summary.success);
    assert_eq!(summary.num_bins, 2);
    let placed = packer.items().iter().filter(|i| i.is_placed()).count();
    let unplaced = packer.items().iter().filter(|i| i.bin == UNPLACED).count();
    assert_eq!((placed, unplaced), (2, 3));
    // Placements made before the failure keep their coordinates.
    for item in packer.items().iter().filter(|i| i.is_placed()) {
        assert_eq!((item.x, item.y), (0, 0));
        assert!(item.bin < 2);
    }
}

#[test]
fn min_bins_are_opened_even_when_idle() {
    let cfg = PackerConfig::Skyline(SkylineConfig::new(BinConfig::new(4, 4).min_bins(3)));
    let mut packer = Packer::new(cfg).unwrap();
    packer.add("only".to_string(), 2, 2).unwrap();
    let summary = packer.pack();

    assert!(summary.success);
    assert_eq!(summary.num_bins, 3);
    assert_eq!(packer.items()[0].bin, 0);
}

#[test]
fn bins_flagged_full_are_skipped_afterwards() {
    let cfg = PackerConfig::Guillotine(
        GuillotineConfig::new(BinConfig::new(10, 10).can_flip(false))
            .choice(GuillotineChoice::BestAreaFit)
            .split(GuillotineSplit::ShorterLeftoverAxis),
    );
    let mut packer = Packer::new(cfg).unwrap();
    packer.add("a".to_string(), 6, 6).unwrap();
    packer.add("b".to_string(), 6, 6).unwrap();
    let c = packer.add("c".to_string(), 4, 4).unwrap();
    let summary = packer.pack();

    assert!(summary.success);
    assert_eq!(summary.num_bins, 2);
    // Bin 0 still holds a 4x6 strip beside "a", but it was flagged
    // full when bin 1 opened, so "c" lands in bin 1.
    assert_eq!(packer.item(c).bin, 1);
    assert_eq!((packer.item(c).x, packer.item(c).y), (6, 0));
}
