use std::fmt;
use std::io;

/// Error types for feature augmentation operations
#[derive(Debug)]
pub enum FeatureError {
    /// Window length must be odd and at least 1
    InvalidWindowLength(usize),
    /// Polynomial order must be less than the window length
    InvalidPolynomialOrder {
        poly_order: usize,
        window_length: usize,
    },
    /// The feature matrix has zero rows or zero columns
    EmptyInput { rows: usize, cols: usize },
    /// A frame row does not match the matrix column count
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },
    /// Two matrices that must share a shape do not
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },
    /// Mathematical computation error (e.g., singular least-squares system)
    Computation(String),
    /// A text or CSV source contained a token that is not a number
    Parse { line: usize, message: String },
    /// Loader or sink I/O failure
    Io(io::Error),
}

impl fmt::Display for FeatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureError::InvalidWindowLength(len) => {
                write!(
                    f,
                    "Invalid window length: {}. Window length must be odd and at least 1",
                    len
                )
            }
            FeatureError::InvalidPolynomialOrder {
                poly_order,
                window_length,
            } => {
                write!(
                    f,
                    "Invalid polynomial order: {}. Must be less than window length ({})",
                    poly_order, window_length
                )
            }
            FeatureError::EmptyInput { rows, cols } => {
                write!(
                    f,
                    "Empty feature matrix: {} rows x {} columns. Need at least one frame with one coefficient",
                    rows, cols
                )
            }
            FeatureError::RaggedRow { row, expected, got } => {
                write!(
                    f,
                    "Ragged frame at row {}: expected {} coefficients, got {}",
                    row, expected, got
                )
            }
            FeatureError::ShapeMismatch { expected, got } => {
                write!(
                    f,
                    "Shape mismatch: expected {}x{}, got {}x{}",
                    expected.0, expected.1, got.0, got.1
                )
            }
            FeatureError::Computation(msg) => {
                write!(f, "Computation error: {}", msg)
            }
            FeatureError::Parse { line, message } => {
                write!(f, "Parse error at line {}: {}", line, message)
            }
            FeatureError::Io(err) => {
                write!(f, "I/O error: {}", err)
            }
        }
    }
}

impl std::error::Error for FeatureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeatureError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for FeatureError {
    fn from(err: io::Error) -> Self {
        FeatureError::Io(err)
    }
}

/// Result type for feature augmentation operations
pub type Result<T> = std::result::Result<T, FeatureError>;
