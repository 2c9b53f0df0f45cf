//! # MFCC Dynamics
//!
//! Savitzky-Golay delta and delta-delta augmentation for MFCC feature
//! matrices in Rust.
//!
//! Given a matrix of base cepstral coefficients (one frame per row, one
//! coefficient per column), this crate computes temporally smoothed first
//! and second derivatives of every coefficient trajectory by local
//! polynomial least-squares regression, and assembles the augmented matrix
//! `[original | delta | delta2]` that downstream classifiers consume.
//!
//! ## Features
//!
//! - Fast weight calculation using least squares polynomial fitting
//! - Weights precomputed once per configuration and cached across calls
//! - Boundary replication so edge frames see a full window
//! - Automatic window shrinking for recordings shorter than the window
//! - Whitespace-text and CSV matrix loaders, whitespace-text sink
//!
//! ## Example
//!
//! ```rust
//! use mfcc_dynamics::{DeltaFilter, FeatureMatrix};
//!
//! let frames = vec![vec![1.0, 2.0], vec![1.5, 2.5], vec![2.0, 3.0]];
//! let features = FeatureMatrix::from_rows(frames).unwrap();
//!
//! let mut filter = DeltaFilter::new(3, 1).expect("Invalid parameters");
//! let augmented = filter.augment(&features).unwrap();
//! assert_eq!(augmented.cols(), 3 * features.cols());
//! ```

mod coefficients;
mod error;
mod filter;
mod matrix;

pub mod io;

pub use coefficients::{compute_weights, DerivativeKernels, KernelCache};
pub use error::{FeatureError, Result};
pub use filter::{DeltaFilter, FilterConfig};
pub use matrix::{assemble_augmented, FeatureMatrix};

/// Augments a feature matrix with default filter parameters.
///
/// This is a convenience function that uses window length 9 and polynomial
/// order 2, the usual choice for MFCC dynamics over ~10 ms hops.
///
/// # Arguments
///
/// * `features` - The base coefficient matrix, one frame per row
///
/// # Returns
///
/// A Result containing the augmented matrix `[original | delta | delta2]`
///
/// # Example
///
/// ```rust
/// use mfcc_dynamics::{augment, FeatureMatrix};
///
/// let frames: Vec<Vec<f64>> = (0..12).map(|t| vec![t as f64, 0.5]).collect();
/// let features = FeatureMatrix::from_rows(frames).unwrap();
/// let augmented = augment(&features).unwrap();
/// assert_eq!(augmented.cols(), 6);
/// ```
pub fn augment(features: &FeatureMatrix) -> Result<FeatureMatrix> {
    let mut filter = DeltaFilter::new(9, 2).expect("Default parameters should be valid");
    filter.augment(features)
}

/// Computes the smoothed first derivative of each coefficient trajectory.
///
/// # Arguments
///
/// * `features` - The base coefficient matrix, one frame per row
/// * `window_length` - Length of the filter window (must be odd)
/// * `poly_order` - Degree of the fitted polynomial (must be less than window_length)
///
/// # Returns
///
/// A Result containing the delta matrix, same shape as the input
pub fn delta(
    features: &FeatureMatrix,
    window_length: usize,
    poly_order: usize,
) -> Result<FeatureMatrix> {
    let mut filter = DeltaFilter::new(window_length, poly_order)?;
    filter.delta(features)
}
