use matting::{
    DensityEstimator, Label, LikelihoodCombiner, Matter, MattingConfig, MattingError, Scribble,
    ScribbleState, MIN_LIKELIHOOD,
};

fn uniform(width: u32, height: u32, l: u8) -> Matter {
    let len = (width * height) as usize;
    Matter::new(&vec![l; len], &vec![128; len], &vec![128; len], width, height).unwrap()
}

fn mask_of(matter: &Matter) -> Vec<u8> {
    let mut mask = vec![0u8; (matter.width() * matter.height()) as usize];
    matter.foreground_mask(&mut mask).unwrap();
    mask
}

fn fields_of(matter: &Matter) -> [Vec<f64>; 4] {
    let len = (matter.width() * matter.height()) as usize;
    let mut fields = [vec![0.0; len], vec![0.0; len], vec![0.0; len], vec![0.0; len]];
    matter.foreground_likelihood(&mut fields[0]).unwrap();
    matter.background_likelihood(&mut fields[1]).unwrap();
    matter.foreground_dist(&mut fields[2]).unwrap();
    matter.background_dist(&mut fields[3]).unwrap();
    fields
}

#[test]
fn construction_with_zero_dimension_fails() {
    let result = Matter::new(&[], &[], &[], 0, 3);
    assert!(matches!(
        result,
        Err(MattingError::InvalidDimension {
            width: 0,
            height: 3
        })
    ));
    assert!(Matter::new(&[], &[], &[], 3, 0).is_err());
}

#[test]
fn construction_copies_caller_buffers() {
    let mut l = vec![50u8; 4];
    let matter = Matter::new(&l, &[128; 4], &[128; 4], 2, 2).unwrap();
    l[0] = 250;
    drop(l);
    assert_eq!(matter.num_scribbles(), 0);
    assert_eq!(mask_of(&matter), vec![0; 4]);
}

#[test]
fn mask_before_any_scribble_is_all_background() {
    let l: Vec<u8> = (0..20).map(|i| (i * 13) as u8).collect();
    let matter = Matter::new(&l, &[100; 20], &[140; 20], 5, 4).unwrap();

    assert_eq!(matter.state(), ScribbleState::Empty);
    assert!(mask_of(&matter).iter().all(|&value| value == 0));

    let [fg, bg, fg_dist, bg_dist] = fields_of(&matter);
    assert!(fg.iter().all(|&value| value == MIN_LIKELIHOOD));
    assert!(bg.iter().all(|&value| value == MIN_LIKELIHOOD));
    assert!(fg_dist.iter().all(|value| value.is_infinite()));
    assert!(bg_dist.iter().all(|value| value.is_infinite()));
}

#[test]
fn uniform_gray_resolves_equidistant_pixels_to_background() {
    let mut matter = uniform(4, 4, 128);
    matter.add_scribble(&Scribble::foreground([(0, 0)])).unwrap();
    matter.add_scribble(&Scribble::background([(3, 3)])).unwrap();

    let mask = mask_of(&matter);
    let at = |x: usize, y: usize| mask[y * 4 + x];

    assert_eq!(at(0, 0), 255);
    assert_eq!(at(3, 3), 0);
    assert_eq!(at(1, 2), 0);
    assert_eq!(at(2, 1), 0);
    assert_eq!(at(0, 3), 0);
    assert_eq!(at(3, 0), 0);
    // strictly closer to the foreground scribble
    assert_eq!(at(1, 0), 255);
    assert_eq!(at(1, 1), 255);
    assert_eq!(at(2, 2), 0);
}

#[test]
fn foreground_distance_is_zero_at_scribble_pixel() {
    let l: Vec<u8> = (0..25).map(|i| (i * 41 % 256) as u8).collect();
    let mut matter = Matter::new(&l, &[128; 25], &[128; 25], 5, 5).unwrap();
    matter.add_scribble(&Scribble::foreground([(2, 3)])).unwrap();

    let [_, _, fg_dist, bg_dist] = fields_of(&matter);
    assert_eq!(fg_dist[3 * 5 + 2], 0.0);
    assert!(fg_dist.iter().all(|&d| d >= 0.0 && d.is_finite()));
    assert!(bg_dist.iter().all(|d| d.is_infinite()));
}

#[test]
fn empty_scribble_changes_nothing() {
    let mut matter = uniform(4, 3, 90);
    matter.add_scribble(&Scribble::foreground([(0, 0)])).unwrap();
    matter.add_scribble(&Scribble::background([(3, 2)])).unwrap();
    let mask = mask_of(&matter);
    let fields = fields_of(&matter);

    matter
        .add_scribble(&Scribble::background(Vec::<(i32, i32)>::new()))
        .unwrap();

    assert_eq!(matter.num_scribbles(), 2);
    assert_eq!(mask_of(&matter), mask);
    assert_eq!(fields_of(&matter), fields);
}

#[test]
fn out_of_bounds_scribble_is_rejected_without_side_effects() {
    let mut matter = uniform(4, 4, 90);
    matter.add_scribble(&Scribble::background([(0, 3)])).unwrap();
    let mask = mask_of(&matter);
    let fields = fields_of(&matter);

    let result = matter.add_scribble(&Scribble::foreground([(1, 1), (4, 0)]));

    assert!(matches!(
        result,
        Err(MattingError::OutOfBounds {
            x: 4,
            y: 0,
            width: 4,
            height: 4
        })
    ));
    assert_eq!(matter.num_scribbles(), 1);
    assert_eq!(matter.state(), ScribbleState::Partial(Label::Background));
    assert_eq!(mask_of(&matter), mask);
    assert_eq!(fields_of(&matter), fields);

    assert!(matter
        .add_scribble(&Scribble::foreground([(-1, 2)]))
        .is_err());
}

#[test]
fn accessors_are_idempotent() {
    let l: Vec<u8> = (0..48).map(|i| if i % 8 < 4 { 40 } else { 210 }).collect();
    let mut matter = Matter::new(&l, &[128; 48], &[128; 48], 8, 6).unwrap();
    matter.add_scribble(&Scribble::foreground([(0, 0), (1, 1)])).unwrap();
    matter.add_scribble(&Scribble::background([(7, 5)])).unwrap();

    assert_eq!(mask_of(&matter), mask_of(&matter));
    assert_eq!(fields_of(&matter), fields_of(&matter));

    let mut first = vec![0u8; 48];
    let mut second = vec![0u8; 48];
    matter.background_mask(&mut first).unwrap();
    matter.background_mask(&mut second).unwrap();
    assert_eq!(first, second);
}

#[test]
fn later_overlapping_scribble_wins_and_order_matters() {
    let fg = Scribble::foreground([(1, 0), (2, 0)]);
    let bg = Scribble::background([(2, 0), (3, 0)]);

    let mut fg_first = uniform(5, 1, 120);
    fg_first.add_scribble(&fg).unwrap();
    fg_first.add_scribble(&bg).unwrap();

    let mut bg_first = uniform(5, 1, 120);
    bg_first.add_scribble(&bg).unwrap();
    bg_first.add_scribble(&fg).unwrap();

    let a = mask_of(&fg_first);
    let b = mask_of(&bg_first);

    assert_eq!(a[2], 0);
    assert_eq!(b[2], 255);
    assert_ne!(a, b);

    assert_eq!(a[1], 255);
    assert_eq!(a[3], 0);
    assert_eq!(b[1], 255);
    assert_eq!(b[3], 0);
}

#[test]
fn local_correction_leaves_distant_pixels_alone() {
    let mut matter = uniform(12, 1, 100);
    matter.add_scribble(&Scribble::foreground([(0, 0)])).unwrap();
    matter.add_scribble(&Scribble::background([(11, 0)])).unwrap();
    let [_, _, before, _] = fields_of(&matter);

    matter.add_scribble(&Scribble::foreground([(9, 0)])).unwrap();
    let [_, _, after, _] = fields_of(&matter);

    assert_eq!(&after[..5], &before[..5]);
    assert_eq!(after[9], 0.0);
    assert!(after[10] < before[10]);
}

#[test]
fn likelihood_does_not_increase_with_color_distance_at_fixed_evidence() {
    let config = MattingConfig::default();
    let estimator = DensityEstimator::new(config.bins, config.bandwidth);
    let combiner = LikelihoodCombiner::new(&config);
    let distribution = estimator.estimate([[100, 128, 128], [104, 130, 126]]);

    for distance in [0.0, 3.5, 40.0] {
        let mut previous = f64::INFINITY;
        for offset in [0u8, 8, 16, 24, 32, 48, 96] {
            let color = [100 + offset, 128, 128];
            let likelihood = combiner.combine(distribution.density(color), distance);
            assert!(
                likelihood <= previous,
                "likelihood rose at color offset {offset}, distance {distance}"
            );
            previous = likelihood;
        }
    }
}

#[test]
fn far_pixels_on_a_high_contrast_stripe_follow_the_nearer_scribble() {
    let width = 120u32;
    let l: Vec<u8> = (0..width).map(|x| if x % 2 == 0 { 0 } else { 255 }).collect();
    let mut matter = Matter::new(&l, &[128; 120], &[128; 120], width, 1).unwrap();
    matter.add_scribble(&Scribble::foreground([(0, 0)])).unwrap();
    matter.add_scribble(&Scribble::background([(119, 0)])).unwrap();

    let [fg, bg, fg_dist, bg_dist] = fields_of(&matter);
    assert!(fg_dist[54] > 13_000.0 && bg_dist[54] > 16_000.0);
    assert!(fg[54] > bg[54]);

    let mask = mask_of(&matter);
    assert_eq!(mask[54], 255);
    assert_eq!(mask[65], 0);
}

#[test]
fn likelihood_falls_across_a_color_edge() {
    let l = [100u8, 100, 100, 180];
    let mut matter = Matter::new(&l, &[128; 4], &[128; 4], 4, 1).unwrap();
    matter.add_scribble(&Scribble::foreground([(0, 0)])).unwrap();

    let [fg, _, dist, _] = fields_of(&matter);
    assert!(fg[1] > fg[2]);
    assert!(fg[2] > fg[3]);
    assert!(dist[3] > dist[2] + 80.0);
}

#[test]
fn eight_connectivity_session_produces_a_full_mask() {
    let config = MattingConfig {
        connectivity: matting::Connectivity::Eight,
        ..MattingConfig::default()
    };
    let l: Vec<u8> = (0..36)
        .map(|i| if (i % 6) + (i / 6) < 5 { 30 } else { 220 })
        .collect();
    let mut matter = Matter::with_config(&l, &[128; 36], &[128; 36], 6, 6, config).unwrap();
    matter.add_scribble(&Scribble::foreground([(0, 0)])).unwrap();
    matter.add_scribble(&Scribble::background([(5, 5)])).unwrap();

    let mask = mask_of(&matter);
    for (i, &value) in mask.iter().enumerate() {
        let dark = (i % 6) + (i / 6) < 5;
        assert_eq!(value == 255, dark, "pixel {i} misclassified");
    }
}

#[test]
fn matter_can_be_shared_across_reader_threads() {
    let mut matter = uniform(6, 6, 77);
    matter.add_scribble(&Scribble::foreground([(0, 0)])).unwrap();
    matter.add_scribble(&Scribble::background([(5, 5)])).unwrap();
    let expected = mask_of(&matter);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4).map(|_| scope.spawn(|| mask_of(&matter))).collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
