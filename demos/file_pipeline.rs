//! File-to-file augmentation pipeline.
//!
//! Reads a base coefficient matrix from a whitespace text file (the format
//! an external MFCC extractor writes, e.g. 13 coefficients per frame from
//! 48 kHz audio with FFT size 512, 128 mel bands, and a 160-sample hop),
//! augments it with delta and delta-delta blocks, and writes the result
//! back out in the same text format.
//!
//! Usage: file_pipeline <input.txt> <output.txt> [window_length] [poly_order]

use std::process::ExitCode;

use log::{error, info};
use mfcc_dynamics::{io, DeltaFilter};

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Either the full augmented matrix was written, or nothing was.
            error!("pipeline failed: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        return Err("usage: file_pipeline <input.txt> <output.txt> [window_length] [poly_order]".into());
    }
    let window_length: usize = args.get(3).map(|a| a.parse()).transpose()?.unwrap_or(9);
    let poly_order: usize = args.get(4).map(|a| a.parse()).transpose()?.unwrap_or(2);

    let features = io::read_matrix_txt(&args[1])?;
    info!(
        "loaded {} frames x {} coefficients from {}",
        features.rows(),
        features.cols(),
        args[1]
    );

    let mut filter = DeltaFilter::new(window_length, poly_order)?;
    let augmented = filter.augment(&features)?;

    io::write_matrix_txt(&args[2], &augmented)?;
    info!(
        "wrote {} frames x {} values to {}",
        augmented.rows(),
        augmented.cols(),
        args[2]
    );

    Ok(())
}
