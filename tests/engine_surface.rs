use rect_binpack::prelude::*;

#[test]
fn construct_allocates_no_bins() {
    let cfg = PackerConfig::Skyline(SkylineConfig::new(BinConfig::new(16, 16)));
    let packer: Packer = Packer::new(cfg).unwrap();
    assert_eq!(packer.num_bins(), 0);
    assert!(packer.items().is_empty());
}

#[test]
fn configure_switches_the_engine_and_resets() {
    let mut packer: Packer = Packer::new(PackerConfig::Guillotine(GuillotineConfig::new(
        BinConfig::new(16, 16),
    )))
    .unwrap();
    packer.add("a".to_string(), 8, 8).unwrap();
    packer.pack();
    assert_eq!(packer.num_bins(), 1);

    packer
        .configure(PackerConfig::Skyline(SkylineConfig::new(BinConfig::new(
            16, 16,
        ))))
        .unwrap();
    assert!(matches!(packer, Packer::Skyline(_)));
    assert_eq!(packer.num_bins(), 0);
    assert!(packer.items().is_empty());

    let r = packer.add("b".to_string(), 4, 4).unwrap();
    let summary = packer.pack();
    assert!(summary.success);
    assert!(packer.item(r).is_placed());
}

#[test]
fn invalid_dimensions_are_rejected_up_front() {
    let cfg = PackerConfig::MaxRects(MaxRectsConfig::new(BinConfig::new(0, 64)));
    let err = Packer::<String>::new(cfg).unwrap_err();
    assert!(matches!(
        err,
        PackError::InvalidDimensions { width: 0, height: 64 }
    ));
}

#[test]
fn handles_index_records_in_registration_order() {
    let cfg = PackerConfig::MaxRects(MaxRectsConfig::new(BinConfig::new(64, 64)));
    let mut packer = Packer::new(cfg).unwrap();
    let a = packer.add("a".to_string(), 8, 8).unwrap();
    let b = packer.add("b".to_string(), 8, 8).unwrap();
    assert_eq!(a.index(), 0);
    assert_eq!(b.index(), 1);
    assert_eq!(packer.items()[1].key, "b");
    packer.pack();
    assert_eq!(packer.item(b).key, "b");
}
