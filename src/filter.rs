use log::warn;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::coefficients::{DerivativeKernels, KernelCache};
use crate::error::{FeatureError, Result};
use crate::matrix::{assemble_augmented, FeatureMatrix};

/// Savitzky-Golay filter parameters.
///
/// `window_length` must be odd so the window is symmetric around its center
/// frame; `poly_order` must be strictly less than the window length to keep
/// the least-squares fit well-posed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterConfig {
    /// Length of the sliding window in frames (must be odd)
    pub window_length: usize,
    /// Degree of the polynomial fitted inside each window
    pub poly_order: usize,
}

impl FilterConfig {
    /// Creates a new filter configuration with validation
    pub fn new(window_length: usize, poly_order: usize) -> Result<Self> {
        if window_length % 2 == 0 || window_length == 0 {
            return Err(FeatureError::InvalidWindowLength(window_length));
        }

        if poly_order >= window_length {
            return Err(FeatureError::InvalidPolynomialOrder {
                poly_order,
                window_length,
            });
        }

        Ok(Self {
            window_length,
            poly_order,
        })
    }

    /// Number of frames on each side of the window center
    pub fn half_width(&self) -> usize {
        (self.window_length - 1) / 2
    }

    /// The configuration actually used for a recording of `frames` frames.
    ///
    /// Short recordings are normal input, so instead of failing when the
    /// window does not fit, the window shrinks to the largest odd length
    /// <= `frames` and the polynomial order drops with it. A single frame
    /// degenerates to window 1, order 0, which reproduces the input and
    /// yields zero derivatives.
    pub fn effective_for_len(&self, frames: usize) -> FilterConfig {
        if frames >= self.window_length {
            return *self;
        }

        let window_length = if frames % 2 == 0 {
            frames.saturating_sub(1)
        } else {
            frames
        };
        let window_length = window_length.max(1);
        FilterConfig {
            window_length,
            poly_order: self.poly_order.min(window_length - 1),
        }
    }
}

/// Savitzky-Golay derivative engine for feature matrices.
///
/// Treats each coefficient column of a [`FeatureMatrix`] as an independent
/// time series and filters it with precomputed polynomial-regression
/// weights. Holds a kernel cache, so reusing one filter across recordings
/// skips the least-squares solve.
///
/// At the series edges the first and last samples are replicated so every
/// frame still sees a full window. Output is deterministic: columns,
/// frames, and window offsets are always evaluated in ascending order.
///
/// # Example
///
/// ```rust
/// use mfcc_dynamics::{DeltaFilter, FeatureMatrix};
///
/// let frames = vec![vec![1.0, 2.0], vec![1.5, 2.5], vec![2.0, 3.0]];
/// let features = FeatureMatrix::from_rows(frames).unwrap();
///
/// let mut filter = DeltaFilter::new(3, 1).expect("valid parameters");
/// let augmented = filter.augment(&features).unwrap();
/// assert_eq!(augmented.rows(), 3);
/// assert_eq!(augmented.cols(), 6);
/// ```
pub struct DeltaFilter {
    config: FilterConfig,
    cache: KernelCache,
}

impl DeltaFilter {
    /// Creates a new filter with the specified parameters.
    ///
    /// # Arguments
    ///
    /// * `window_length` - Length of the sliding window (must be odd)
    /// * `poly_order` - Degree of the fitted polynomial (must be < window_length)
    pub fn new(window_length: usize, poly_order: usize) -> Result<Self> {
        let config = FilterConfig::new(window_length, poly_order)?;
        Ok(Self {
            config,
            cache: KernelCache::new(),
        })
    }

    /// Creates a filter from an already validated configuration
    pub fn with_config(config: FilterConfig) -> Self {
        Self {
            config,
            cache: KernelCache::new(),
        }
    }

    /// Returns the filter configuration
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Computes the augmented feature matrix `[original | delta | delta2]`.
    ///
    /// The output has the same frame count as the input and three times its
    /// column count. The original coefficients are carried over unchanged;
    /// the delta and delta-delta blocks hold the smoothed first and second
    /// derivatives of each coefficient trajectory, in per-frame units.
    pub fn augment(&mut self, features: &FeatureMatrix) -> Result<FeatureMatrix> {
        let kernels = self.kernels_for(features.rows())?;
        let delta = filter_matrix(features, &kernels.delta)?;
        let delta2 = filter_matrix(features, &kernels.delta_delta)?;
        assemble_augmented(features, &delta, &delta2)
    }

    /// Smooths every coefficient trajectory (derivative order 0).
    pub fn smoothed(&mut self, features: &FeatureMatrix) -> Result<FeatureMatrix> {
        let kernels = self.kernels_for(features.rows())?;
        filter_matrix(features, &kernels.smooth)
    }

    /// Computes the smoothed first derivative of every coefficient trajectory.
    pub fn delta(&mut self, features: &FeatureMatrix) -> Result<FeatureMatrix> {
        let kernels = self.kernels_for(features.rows())?;
        filter_matrix(features, &kernels.delta)
    }

    /// Computes the smoothed second derivative of every coefficient trajectory.
    pub fn delta_delta(&mut self, features: &FeatureMatrix) -> Result<FeatureMatrix> {
        let kernels = self.kernels_for(features.rows())?;
        filter_matrix(features, &kernels.delta_delta)
    }

    /// Kernels for the window that actually fits `frames` frames.
    fn kernels_for(&mut self, frames: usize) -> Result<DerivativeKernels> {
        let effective = self.config.effective_for_len(frames);
        if effective.window_length != self.config.window_length {
            warn!(
                "recording has {} frames, shrinking window from {} to {} (order {} -> {})",
                frames,
                self.config.window_length,
                effective.window_length,
                self.config.poly_order,
                effective.poly_order
            );
        }
        // Clone so the cache borrow does not outlive this call.
        Ok(self.cache.get(effective)?.clone())
    }
}

/// Filters every column of `features` with one weight vector.
fn filter_matrix(features: &FeatureMatrix, weights: &[f64]) -> Result<FeatureMatrix> {
    let columns = filter_columns(features, weights);
    FeatureMatrix::from_columns(columns)
}

#[cfg(not(feature = "parallel"))]
fn filter_columns(features: &FeatureMatrix, weights: &[f64]) -> Vec<Vec<f64>> {
    (0..features.cols())
        .map(|c| apply_weights(&features.column(c), weights))
        .collect()
}

#[cfg(feature = "parallel")]
fn filter_columns(features: &FeatureMatrix, weights: &[f64]) -> Vec<Vec<f64>> {
    // Columns share only the read-only weight vector, and collect() keeps
    // column order, so the result is bit-identical to the sequential path.
    (0..features.cols())
        .into_par_iter()
        .map(|c| apply_weights(&features.column(c), weights))
        .collect()
}

/// Convolves one series with a weight vector, replicating the first and
/// last samples past the series edges.
fn apply_weights(series: &[f64], weights: &[f64]) -> Vec<f64> {
    let frames = series.len();
    let last = (frames - 1) as isize;
    let half_width = (weights.len() / 2) as isize;

    let mut out = Vec::with_capacity(frames);
    for t in 0..frames as isize {
        let mut acc = 0.0;
        for (i, &w) in weights.iter().enumerate() {
            let idx = (t + i as isize - half_width).clamp(0, last);
            acc += w * series[idx as usize];
        }
        out.push(acc);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn single_column(values: &[f64]) -> FeatureMatrix {
        FeatureMatrix::from_rows(values.iter().map(|&v| vec![v]).collect()).unwrap()
    }

    #[test]
    fn test_config_validation() {
        assert!(matches!(
            FilterConfig::new(4, 2),
            Err(FeatureError::InvalidWindowLength(4))
        ));
        assert!(matches!(
            FilterConfig::new(0, 0),
            Err(FeatureError::InvalidWindowLength(0))
        ));
        assert!(matches!(
            FilterConfig::new(5, 5),
            Err(FeatureError::InvalidPolynomialOrder {
                poly_order: 5,
                window_length: 5
            })
        ));
        assert!(FilterConfig::new(9, 2).is_ok());
        assert!(FilterConfig::new(1, 0).is_ok());
    }

    #[test]
    fn test_effective_config_shrinks() {
        let config = FilterConfig::new(9, 2).unwrap();
        assert_eq!(config.effective_for_len(20), config);
        assert_eq!(config.effective_for_len(9), config);

        let shrunk = config.effective_for_len(6);
        assert_eq!(shrunk.window_length, 5);
        assert_eq!(shrunk.poly_order, 2);

        let tiny = config.effective_for_len(2);
        assert_eq!(tiny.window_length, 1);
        assert_eq!(tiny.poly_order, 0);

        let one = config.effective_for_len(1);
        assert_eq!(one.window_length, 1);
        assert_eq!(one.poly_order, 0);
    }

    #[test]
    fn test_smoothing_preserves_quadratic_interior() {
        let data: Vec<f64> = (0..20).map(|x| (x as f64).powi(2)).collect();
        let features = single_column(&data);

        let mut filter = DeltaFilter::new(5, 2).unwrap();
        let smoothed = filter.smoothed(&features).unwrap();

        // Interior frames see no replicated samples, so a quadratic fit
        // reproduces a quadratic exactly.
        for t in 2..18 {
            assert_abs_diff_eq!(smoothed.get(t, 0), data[t], epsilon = 1e-9);
        }
    }

    #[test]
    fn test_constant_series_has_zero_dynamics() {
        let features = single_column(&[5.0; 20]);
        let mut filter = DeltaFilter::new(7, 2).unwrap();

        let smoothed = filter.smoothed(&features).unwrap();
        let delta = filter.delta(&features).unwrap();
        let delta2 = filter.delta_delta(&features).unwrap();

        for t in 0..20 {
            assert_abs_diff_eq!(smoothed.get(t, 0), 5.0, epsilon = 1e-12);
            assert_abs_diff_eq!(delta.get(t, 0), 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(delta2.get(t, 0), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_linear_ramp_delta_is_slope_interior() {
        let data: Vec<f64> = (0..30).map(|t| 0.75 * t as f64 - 4.0).collect();
        let features = single_column(&data);

        let mut filter = DeltaFilter::new(9, 2).unwrap();
        let delta = filter.delta(&features).unwrap();
        let delta2 = filter.delta_delta(&features).unwrap();

        for t in 4..26 {
            assert_abs_diff_eq!(delta.get(t, 0), 0.75, epsilon = 1e-9);
            assert_abs_diff_eq!(delta2.get(t, 0), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_replicated_edges_damp_the_slope() {
        let data: Vec<f64> = (0..30).map(|t| t as f64).collect();
        let features = single_column(&data);

        let mut filter = DeltaFilter::new(9, 2).unwrap();
        let delta = filter.delta(&features).unwrap();

        // Replication flattens the series past the edges, so the slope
        // estimate at frame 0 sits strictly between 0 and the true slope.
        assert!(delta.get(0, 0) > 0.0);
        assert!(delta.get(0, 0) < 1.0);
        assert_abs_diff_eq!(delta.get(15, 0), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_single_frame_matrix() {
        let features = FeatureMatrix::from_rows(vec![vec![3.0, -1.0, 0.5]]).unwrap();
        let mut filter = DeltaFilter::new(9, 2).unwrap();

        let augmented = filter.augment(&features).unwrap();
        assert_eq!(augmented.rows(), 1);
        assert_eq!(augmented.cols(), 9);
        assert_eq!(augmented.row(0)[..3], [3.0, -1.0, 0.5]);
        for &value in &augmented.row(0)[3..] {
            assert_abs_diff_eq!(value, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_short_recording_still_tracks_slope() {
        // 5 frames against a window of 9: the filter drops to window 5.
        let data: Vec<f64> = (0..5).map(|t| 2.0 * t as f64).collect();
        let features = single_column(&data);

        let mut filter = DeltaFilter::new(9, 2).unwrap();
        let delta = filter.delta(&features).unwrap();

        assert_abs_diff_eq!(delta.get(2, 0), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_all_outputs_finite() {
        let data = vec![1e-10, 1e10, -1e10, 1e-10, 0.0, 3.5, -2.25, 1e8, -1e-8];
        let features = single_column(&data);

        let mut filter = DeltaFilter::new(5, 2).unwrap();
        let augmented = filter.augment(&features).unwrap();

        for t in 0..augmented.rows() {
            for &value in augmented.row(t) {
                assert!(value.is_finite(), "Got non-finite value: {}", value);
            }
        }
    }
}
