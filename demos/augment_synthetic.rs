//! Example usage of the delta augmentation pipeline on synthetic features

use mfcc_dynamics::{augment, DeltaFilter, FeatureMatrix, FilterConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== MFCC Dynamics Examples ===\n");

    // Synthetic "recording": 20 frames of 13 coefficients, where each
    // coefficient follows its own linear trend plus a small wiggle.
    let frames: Vec<Vec<f64>> = (0..20)
        .map(|t| {
            (0..13)
                .map(|c| {
                    let slope = 0.1 * c as f64 - 0.5;
                    slope * t as f64 + (0.3 * t as f64 + c as f64).sin() * 0.05
                })
                .collect()
        })
        .collect();
    let features = FeatureMatrix::from_rows(frames)?;
    println!(
        "Base features: {} frames x {} coefficients",
        features.rows(),
        features.cols()
    );

    // Example 1: augmentation with the default parameters (window 9, order 2)
    println!("\n1. Default augmentation:");
    let augmented = augment(&features)?;
    println!(
        "Augmented: {} frames x {} values (original | delta | delta2)",
        augmented.rows(),
        augmented.cols()
    );
    print_frame(&augmented, 10);

    // Example 2: a reusable filter with custom parameters
    println!("\n2. Custom filter (window=5, poly_order=3):");
    let mut filter = DeltaFilter::new(5, 3)?;
    let custom = filter.augment(&features)?;
    print_frame(&custom, 10);

    // Example 3: the individual blocks
    println!("\n3. Delta block only:");
    let mut filter = DeltaFilter::with_config(FilterConfig::new(9, 2)?);
    let delta = filter.delta(&features)?;
    println!(
        "Delta at frame 10 (expected slopes -0.5 .. 0.7):"
    );
    print_frame(&delta, 10);

    // Example 4: performance with a long recording
    println!("\n4. Performance test with a long recording:");
    let long: Vec<Vec<f64>> = (0..100_000)
        .map(|t| (0..13).map(|c| ((t + c) as f64 * 0.001).sin()).collect())
        .collect();
    let long_features = FeatureMatrix::from_rows(long)?;

    let start = std::time::Instant::now();
    let mut perf_filter = DeltaFilter::new(9, 2)?;
    let _augmented = perf_filter.augment(&long_features)?;
    let duration = start.elapsed();
    println!(
        "Augmented {} frames in {:?}",
        long_features.rows(),
        duration
    );

    Ok(())
}

fn print_frame(matrix: &FeatureMatrix, frame: usize) {
    for (i, &value) in matrix.row(frame).iter().enumerate() {
        print!("{:8.3}", value);
        if i > 0 && (i + 1) % 13 == 0 {
            println!();
        }
    }
    if matrix.cols() % 13 != 0 {
        println!();
    }
}
