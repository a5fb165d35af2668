//! Strategy comparison: sequential vs threaded vs offloaded
//!
//! Synthesizes a height-map and opens/closes its gray rendering with every
//! strategy, then prints a wall-clock comparison table.
//!
//! Run:
//!   cargo run -p hpcimg-algorithms --example bench_comparison --release
//!
//! Custom size (default 2049, must be 2^n + 1):
//!   cargo run -p hpcimg-algorithms --example bench_comparison --release -- --size 4097

use std::env;
use std::time::Instant;

use hpcimg_algorithms::morphology::{closing, opening, StructuringElement};
use hpcimg_algorithms::terrain::{diamond_square, DiamondSquareParams, Seed};
use hpcimg_parallel::{available_threads, ExecutionStrategy};

const STRATEGIES: [ExecutionStrategy; 3] = [
    ExecutionStrategy::Sequential,
    ExecutionStrategy::Threaded(0),
    ExecutionStrategy::Offloaded,
];

fn main() {
    let size = parse_size();
    println!("=== hpcimg Strategy Comparison ===");
    println!(
        "Grid: {}x{} ({:.1}M cells), {} worker threads\n",
        size,
        size,
        size as f64 * size as f64 / 1e6,
        available_threads()
    );

    let params = DiamondSquareParams {
        size,
        seed: Seed::Fixed(7),
        ..Default::default()
    };
    let image = diamond_square(&params, ExecutionStrategy::Sequential)
        .and_then(|grid| grid.to_bgra())
        .expect("cannot build input image");
    let se = StructuringElement::disk(5).expect("invalid element");

    println!("{:<16} {:>12} {:>12} {:>12}", "Strategy", "DS (ms)", "Open (ms)", "Close (ms)");
    println!("{:<16} {:>12} {:>12} {:>12}", "────────", "───────", "─────────", "──────────");

    let mut baseline = None;
    for strategy in STRATEGIES {
        let ds = time_ms(|| {
            diamond_square(&params, strategy).expect("diamond-square failed");
        });
        let open = time_ms(|| {
            opening(&image, &se, strategy).expect("opening failed");
        });
        let close = time_ms(|| {
            closing(&image, &se, strategy).expect("closing failed");
        });
        let base = *baseline.get_or_insert(ds + open + close);
        println!(
            "{:<16} {:>12.1} {:>12.1} {:>12.1}   x{:.2}",
            strategy.to_string(),
            ds,
            open,
            close,
            base / (ds + open + close)
        );
    }
}

fn time_ms<F: FnMut()>(mut f: F) -> f64 {
    // One warm-up run, then the best of three
    f();
    (0..3)
        .map(|_| {
            let start = Instant::now();
            f();
            start.elapsed().as_secs_f64() * 1000.0
        })
        .fold(f64::INFINITY, f64::min)
}

fn parse_size() -> usize {
    let args: Vec<String> = env::args().collect();
    args.iter()
        .position(|a| a == "--size")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(2049)
}
