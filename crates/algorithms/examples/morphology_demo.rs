//! Morphology demo: salt-and-pepper cleanup of a synthetic image
//!
//! Generates a 200x200 synthetic RGB image with:
//! - Uniform background (50, 60, 70)
//! - Large bright rectangle (200, 180, 160)
//! - Small bright spots (single-pixel, 250) ("salt" noise)
//! - Small dark spots (single-pixel, 5) ("pepper" noise)
//!
//! Then applies opening (removes salt), closing (removes pepper) and both,
//! printing how many noisy pixels survive each step.
//!
//! Run:
//!   cargo run -p hpcimg-algorithms --example morphology_demo

use hpcimg_algorithms::morphology::{closing, opening, StructuringElement};
use hpcimg_core::{ChannelOrder, PixelBuffer};
use hpcimg_parallel::ExecutionStrategy;

const ROWS: usize = 200;
const COLS: usize = 200;
const BACKGROUND: [u8; 3] = [50, 60, 70];
const RECT: [u8; 3] = [200, 180, 160];
const SALT: [u8; 3] = [250, 250, 250];
const PEPPER: [u8; 3] = [5, 5, 5];

fn main() {
    let input = build_synthetic_image();
    println!("Synthetic image: {}x{}", COLS, ROWS);
    print_noise("  input", &input);

    let se = StructuringElement::square(3).expect("invalid element");
    println!("\nStructuring element: 3x3 square");

    let strategy = ExecutionStrategy::Threaded(0);
    let opened = opening(&input, &se, strategy).expect("opening failed");
    print_noise("  opened", &opened);

    let closed = closing(&input, &se, strategy).expect("closing failed");
    print_noise("  closed", &closed);

    let cleaned = closing(&opened, &se, strategy).expect("closing failed");
    print_noise("  cleaned", &cleaned);

    let rect = cleaned.rgb(ROWS / 2, COLS / 2).expect("pixel out of range");
    println!("\nRectangle center after cleanup: {:?} (expected {:?})", rect, RECT);
}

fn build_synthetic_image() -> PixelBuffer {
    let mut image =
        PixelBuffer::filled(COLS, ROWS, ChannelOrder::Rgba, BACKGROUND).expect("allocation failed");
    for row in 60..140 {
        for col in 50..150 {
            image.set_rgb(row, col, RECT).expect("pixel out of range");
        }
    }
    // Deterministic scatter of isolated noise pixels
    for k in 0..400usize {
        let row = (k * 37 + 11) % ROWS;
        let col = (k * 91 + 5) % COLS;
        let color = if k % 2 == 0 { SALT } else { PEPPER };
        image.set_rgb(row, col, color).expect("pixel out of range");
    }
    image
}

fn print_noise(label: &str, image: &PixelBuffer) {
    let (mut salt, mut pepper) = (0, 0);
    for i in 0..image.width() * image.height() {
        match image.rgb_at(i) {
            SALT => salt += 1,
            PEPPER => pepper += 1,
            _ => {}
        }
    }
    println!("{}: {} salt, {} pepper", label, salt, pepper);
}
