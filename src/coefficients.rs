use std::collections::HashMap;

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::error::{FeatureError, Result};
use crate::filter::FilterConfig;

/// Computes Savitzky-Golay convolution weights by least squares polynomial fitting.
///
/// A polynomial of degree `poly_order` fitted to the `window_length` samples
/// around a center point is fully determined by the window, so evaluating the
/// fit (or one of its derivatives) at the center reduces to a fixed dot
/// product with the window samples. This returns that weight vector for the
/// requested derivative order, parameterized over frame-index offsets
/// `-h..=h` with `h = (window_length - 1) / 2`.
///
/// Derivative weights are expressed per frame step; callers that want
/// wall-clock units must rescale themselves.
///
/// # Arguments
///
/// * `window_length` - Length of the sliding window (must be odd)
/// * `poly_order` - Degree of the fitted polynomial (must be < window_length)
/// * `derivative` - Derivative order (0 for smoothing, 1 for delta, 2 for delta-delta)
pub fn compute_weights(
    window_length: usize,
    poly_order: usize,
    derivative: usize,
) -> Result<Vec<f64>> {
    if window_length % 2 == 0 || window_length == 0 {
        return Err(FeatureError::InvalidWindowLength(window_length));
    }

    if poly_order >= window_length {
        return Err(FeatureError::InvalidPolynomialOrder {
            poly_order,
            window_length,
        });
    }

    // A derivative beyond the polynomial degree is identically zero.
    if derivative > poly_order {
        return Ok(vec![0.0; window_length]);
    }

    let half_width = (window_length - 1) / 2;

    // Vandermonde design matrix over the local offset axis: row i holds the
    // powers of offset (i - h).
    let mut design = DMatrix::<f64>::zeros(window_length, poly_order + 1);
    for i in 0..window_length {
        let k = (i as f64) - (half_width as f64);
        for j in 0..=poly_order {
            design[(i, j)] = k.powi(j as i32);
        }
    }

    // Solve the normal equations A^T A c = d! * e_d, where e_d selects the
    // derivative-order polynomial coefficient.
    let normal = design.transpose() * &design;
    let mut rhs = DVector::<f64>::zeros(poly_order + 1);
    let factorial = (1..=derivative).fold(1.0, |acc, x| acc * x as f64);
    rhs[derivative] = factorial;

    let poly_coeffs = normal.lu().solve(&rhs).ok_or_else(|| {
        FeatureError::Computation("Failed to solve least squares system".to_string())
    })?;

    // Map the polynomial coefficients back through the design matrix to get
    // one convolution weight per window sample.
    let mut weights = vec![0.0; window_length];
    for i in 0..window_length {
        let k = (i as f64) - (half_width as f64);
        for j in 0..=poly_order {
            weights[i] += poly_coeffs[j] * k.powi(j as i32);
        }
    }

    Ok(weights)
}

/// The three weight vectors a `FilterConfig` needs: smoothing, first
/// derivative, and second derivative, each of the configured window length.
#[derive(Debug, Clone)]
pub struct DerivativeKernels {
    pub smooth: Vec<f64>,
    pub delta: Vec<f64>,
    pub delta_delta: Vec<f64>,
}

impl DerivativeKernels {
    /// Computes all three weight vectors for a configuration.
    pub fn compute(config: FilterConfig) -> Result<Self> {
        Ok(Self {
            smooth: compute_weights(config.window_length, config.poly_order, 0)?,
            delta: compute_weights(config.window_length, config.poly_order, 1)?,
            delta_delta: compute_weights(config.window_length, config.poly_order, 2)?,
        })
    }
}

/// Weight vectors computed once per configuration and reused across calls.
///
/// The solve is cheap but there is no reason to repeat it per matrix, and a
/// filter that shrinks its window for short recordings can hold several
/// effective configurations at once.
pub struct KernelCache {
    kernels: HashMap<FilterConfig, DerivativeKernels, ahash::RandomState>,
}

impl KernelCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self {
            kernels: HashMap::default(),
        }
    }

    /// Gets the kernels for a configuration, computing them on first use
    pub fn get(&mut self, config: FilterConfig) -> Result<&DerivativeKernels> {
        if !self.kernels.contains_key(&config) {
            debug!(
                "computing Savitzky-Golay kernels for window {} order {}",
                config.window_length, config.poly_order
            );
            let kernels = DerivativeKernels::compute(config)?;
            self.kernels.insert(config, kernels);
        }

        Ok(&self.kernels[&config])
    }
}

impl Default for KernelCache {
    fn default() -> Self {
        Self::new()
    }
}
