use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{FeatureError, Result};
use crate::matrix::FeatureMatrix;

/// Reads a whitespace-delimited text matrix, one frame per line.
///
/// Blank lines are skipped. Brackets and commas are treated as whitespace,
/// so both plain `1.0 2.0 3.0` rows and `[1.0, 2.0, 3.0]` rows parse; some
/// extractors export the latter.
pub fn read_matrix_txt<P: AsRef<Path>>(path: P) -> Result<FeatureMatrix> {
    let text = fs::read_to_string(path)?;
    parse_matrix_txt(&text)
}

/// Parses the text matrix format accepted by [`read_matrix_txt`].
pub fn parse_matrix_txt(text: &str) -> Result<FeatureMatrix> {
    let mut frames = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let cleaned = line.replace(['[', ']', ','], " ");
        if cleaned.trim().is_empty() {
            continue;
        }

        let mut frame = Vec::new();
        for token in cleaned.split_whitespace() {
            let value: f64 = token.parse().map_err(|_| FeatureError::Parse {
                line: index + 1,
                message: format!("invalid number {:?}", token),
            })?;
            frame.push(value);
        }
        frames.push(frame);
    }

    FeatureMatrix::from_rows(frames)
}

/// Reads a headerless CSV matrix, one frame per record.
pub fn read_matrix_csv<P: AsRef<Path>>(path: P) -> Result<FeatureMatrix> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_error)?;

    let mut frames = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(frames.len() + 1);

        let mut frame = Vec::with_capacity(record.len());
        for field in record.iter() {
            let value: f64 = field.parse().map_err(|_| FeatureError::Parse {
                line,
                message: format!("invalid number {:?}", field),
            })?;
            frame.push(value);
        }
        frames.push(frame);
    }

    FeatureMatrix::from_rows(frames)
}

/// Renders a matrix in the persisted text format: one line per frame,
/// values space-separated in coefficient order, no brackets, no header.
pub fn format_matrix_txt(matrix: &FeatureMatrix) -> String {
    let mut out = String::new();
    for r in 0..matrix.rows() {
        for (c, value) in matrix.row(r).iter().enumerate() {
            if c > 0 {
                out.push(' ');
            }
            // String formatting cannot fail
            let _ = write!(out, "{}", value);
        }
        out.push('\n');
    }
    out
}

/// Writes a matrix to `path` in the text format of [`format_matrix_txt`].
///
/// The matrix is rendered to memory, written to a `.tmp` sibling of the
/// target, and renamed into place only once the write has succeeded. A
/// failure at any point — rendering, writing, renaming — leaves nothing at
/// `path` that could be mistaken for real output; the staging file is
/// removed on the way out.
pub fn write_matrix_txt<P: AsRef<Path>>(path: P, matrix: &FeatureMatrix) -> Result<()> {
    let path = path.as_ref();
    let rendered = format_matrix_txt(matrix);

    let staging = staging_path(path);
    let written = fs::write(&staging, rendered).and_then(|_| fs::rename(&staging, path));
    if let Err(err) = written {
        let _ = fs::remove_file(&staging);
        return Err(err.into());
    }

    debug!(
        "wrote {}x{} matrix to {}",
        matrix.rows(),
        matrix.cols(),
        path.display()
    );
    Ok(())
}

/// The `.tmp` sibling a matrix is staged to before the final rename.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "matrix".into());
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}

fn csv_error(err: csv::Error) -> FeatureError {
    let line = err
        .position()
        .map(|p| p.line() as usize)
        .unwrap_or_default();
    match err.into_kind() {
        csv::ErrorKind::Io(io_err) => FeatureError::Io(io_err),
        other => FeatureError::Parse {
            line,
            message: format!("malformed CSV record: {:?}", other),
        },
    }
}
