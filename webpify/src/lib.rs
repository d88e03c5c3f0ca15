#![forbid(unsafe_code)]

use crate::convert::{convert_image, is_webp_path};
use crate::discover::discover_image_files;
use crate::report::{format_banner, format_conversion, format_failure, format_skip, format_summary};

use std::ops::Not;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

mod color;
mod convert;
mod discover;
mod report;
mod statistics;

pub use crate::statistics::Summary;

pub const DEFAULT_IMAGES_DIRECTORY: &str = "assets/images";

pub struct RunOptions {
    pub directory: PathBuf,
    /// Checked between files; set from the interrupt handler.
    pub cancelled: Arc<AtomicBool>,
}

impl RunOptions {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    MissingDirectory,
    NothingToDo,
    Completed(Summary),
    Cancelled(Summary),
}

pub fn run(options: RunOptions) -> anyhow::Result<RunOutcome> {
    if options.directory.exists().not() {
        log::error!("{} directory not found!", options.directory.display());
        return Ok(RunOutcome::MissingDirectory);
    }

    let (paths, errors) = discover_image_files(&options.directory)?;

    if errors.is_empty().not() {
        log::warn!(
            "Some paths below '{}' could not be read while looking for images. \
            Make sure you have the permissions for these paths and symlinks are not broken.",
            options.directory.display()
        );

        for error in errors.iter() {
            log::warn!("{}", error);
        }
    }

    if paths.is_empty() {
        println!("No PNG/JPG images found to optimize!");
        return Ok(RunOutcome::NothingToDo);
    }

    println!("{}", format_banner(paths.len()));

    let mut summary = Summary::new();

    for path in paths {
        if options.cancelled.load(Ordering::SeqCst) {
            log::debug!(
                "Stopping after {} converted, {} failed and {} skipped files",
                summary.converted_files,
                summary.failed_files,
                summary.skipped_files
            );
            return Ok(RunOutcome::Cancelled(summary));
        }

        if is_webp_path(&path) {
            println!("{}", format_skip(&path));
            summary.skipped_files += 1;
            continue;
        }

        match convert_image(&path) {
            Ok(conversion) => {
                println!("{}", format_conversion(&conversion));
                summary.record_conversion(conversion.bytes_saved());
            }
            Err(error) => {
                println!("{}", format_failure(&path, &error));
                summary.failed_files += 1;
            }
        }
    }

    println!("{}", format_summary(&summary));

    if summary.failed_files > 0 {
        log::debug!("{} files could not be converted", summary.failed_files);
    }

    Ok(RunOutcome::Completed(summary))
}
