//! End-to-end scenarios run against every strategy

use hpcimg_algorithms::morphology::{
    MorphologyContext, OpeningClosing, Operation, StructuringElement,
};
use hpcimg_algorithms::strategy::StrategySelector;
use hpcimg_algorithms::terrain::{diamond_square, DiamondSquareParams, HeightMapSynthesis, Seed};
use hpcimg_core::{ChannelOrder, Error, PixelBuffer};
use hpcimg_parallel::ExecutionStrategy;

const STRATEGIES: [ExecutionStrategy; 4] = [
    ExecutionStrategy::Sequential,
    ExecutionStrategy::Threaded(1),
    ExecutionStrategy::Threaded(4),
    ExecutionStrategy::Offloaded,
];

// ── Diamond-square ────────────────────────────────────────────────────

#[test]
fn test_flat_grid_without_perturbation() {
    let params = DiamondSquareParams {
        size: 5,
        max_value: 0,
        seed: Seed::Fixed(0),
        corners: Some([0, 0, 0, 0]),
    };
    for strategy in STRATEGIES {
        let grid = diamond_square(&params, strategy).unwrap();
        assert_eq!(grid.size(), 5);
        assert!(
            grid.as_slice().iter().all(|&v| v == 0),
            "{} produced a non-flat grid",
            strategy
        );
    }
}

#[test]
fn test_corners_are_kept_at_every_size() {
    let selector = StrategySelector::default();
    for strategy in STRATEGIES {
        let engine = selector.diamond_square(strategy).unwrap();
        for n in 0..=8 {
            let size = (1 << n) + 1;
            let grid = engine
                .synthesize(&DiamondSquareParams {
                    size,
                    corners: Some([255, 0, 0, 255]),
                    seed: Seed::Fixed(n as u64),
                    ..Default::default()
                })
                .unwrap();
            assert_eq!(grid.len(), size * size);
            assert_eq!(grid.corners(), [255, 0, 0, 255], "{} size {}", strategy, size);
        }
    }
}

#[test]
fn test_extreme_corners_clamp_instead_of_wrapping() {
    // Every corner at 255 with the largest amplitude pushes sums past the
    // sample range; values must saturate, so the mean stays high.
    for strategy in STRATEGIES {
        let grid = diamond_square(
            &DiamondSquareParams {
                size: 129,
                max_value: 256,
                seed: Seed::Fixed(77),
                corners: Some([255, 255, 255, 255]),
            },
            strategy,
        )
        .unwrap();
        let stats = grid.statistics().unwrap();
        assert_eq!(stats.max, 255);
        assert!(stats.mean > 128.0, "{}: mean {}", strategy, stats.mean);
    }
}

#[test]
fn test_sequential_reproducible_threaded_bounded() {
    let params = DiamondSquareParams {
        size: 65,
        seed: Seed::Fixed(2024),
        ..Default::default()
    };
    let a = diamond_square(&params, ExecutionStrategy::Sequential).unwrap();
    let b = diamond_square(&params, ExecutionStrategy::Sequential).unwrap();
    assert_eq!(a, b);

    let threaded = diamond_square(&params, ExecutionStrategy::Threaded(3)).unwrap();
    assert_eq!(threaded.corners(), a.corners());
}

#[test]
fn test_rejects_sizes_that_are_not_power_of_two_plus_one() {
    for strategy in STRATEGIES {
        let result = diamond_square(&DiamondSquareParams::with_size(64), strategy);
        assert!(matches!(result, Err(Error::InvalidParameter { name: "size", .. })));
    }
}

// ── Morphology ────────────────────────────────────────────────────────

#[test]
fn test_uniform_image_survives_opening() {
    let image = PixelBuffer::filled(4, 4, ChannelOrder::Bgra, [100, 100, 100]).unwrap();
    let selector = StrategySelector::default();
    for strategy in STRATEGIES {
        let context = MorphologyContext::new(Some(&image), Some(StructuringElement::square(3).unwrap()));
        let result = selector.morphology(strategy, context).unwrap().opening().unwrap();
        assert_eq!(result.width(), 4);
        assert_eq!(result.height(), 4);
        assert_eq!(result.as_raw(), image.as_raw(), "{}", strategy);
    }
}

#[test]
fn test_missing_image_fails_for_every_strategy() {
    let selector = StrategySelector::default();
    for strategy in STRATEGIES {
        for operation in [Operation::Opening, Operation::Closing] {
            let context = MorphologyContext::new(None, Some(StructuringElement::default()));
            let engine = selector.morphology(strategy, context).unwrap();
            assert!(matches!(
                engine.execute(operation),
                Err(Error::MissingInput("image"))
            ));
        }
    }
}

#[test]
fn test_all_background_element_yields_sentinels() {
    let image = PixelBuffer::filled(6, 5, ChannelOrder::Rgba, [10, 20, 30]).unwrap();
    let empty = StructuringElement::from_mask(3, 3, vec![false; 9]).unwrap();
    let selector = StrategySelector::default();
    for strategy in STRATEGIES {
        let context = MorphologyContext::new(Some(&image), Some(empty.clone()));
        let engine = selector.morphology(strategy, context).unwrap();
        // The last pass decides: dilation of nothing is 0, erosion of nothing 255.
        let opened = engine.opening().unwrap();
        assert!(opened.as_raw().chunks(4).all(|px| px == [0, 0, 0, 255]));
        let closed = engine.closing().unwrap();
        assert!(closed.as_raw().chunks(4).all(|px| px == [255, 255, 255, 255]));
    }
}

#[test]
fn test_channels_are_processed_independently() {
    // A red-only spike and a blue-only pit on different pixels.
    let mut image = PixelBuffer::filled(9, 9, ChannelOrder::Rgba, [40, 80, 120]).unwrap();
    image.set_rgb(2, 2, [250, 80, 120]).unwrap();
    image.set_rgb(6, 6, [40, 80, 0]).unwrap();
    let element = StructuringElement::cross(3).unwrap();
    let selector = StrategySelector::default();
    for strategy in STRATEGIES {
        let opened = selector
            .morphology(strategy, MorphologyContext::new(Some(&image), Some(element.clone())))
            .unwrap()
            .opening()
            .unwrap();
        assert_eq!(opened.rgb(2, 2).unwrap(), [40, 80, 120]);
        assert_eq!(opened.rgb(6, 6).unwrap(), [40, 80, 0]);

        let closed = selector
            .morphology(strategy, MorphologyContext::new(Some(&image), Some(element.clone())))
            .unwrap()
            .closing()
            .unwrap();
        assert_eq!(closed.rgb(2, 2).unwrap(), [250, 80, 120]);
        assert_eq!(closed.rgb(6, 6).unwrap(), [40, 80, 120]);
    }
}
