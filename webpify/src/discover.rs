use anyhow::Context;
use glob::{GlobError, MatchOptions, Pattern};
use std::path::{Path, PathBuf};

/// Extensions picked up below the root directory, in the order they are collected.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

pub fn discover_image_files(directory: &Path) -> anyhow::Result<(Vec<PathBuf>, Vec<GlobError>)> {
    let match_options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: true,
    };

    let escaped_directory = Pattern::escape(&directory.to_string_lossy());
    let escaped_directory = escaped_directory.trim_end_matches('/');

    let mut paths = Vec::<PathBuf>::new();
    let mut errors = Vec::<GlobError>::new();

    for extension in IMAGE_EXTENSIONS {
        let pattern = format!("{}/**/*.{}", escaped_directory, extension);

        let glob_results = glob::glob_with(&pattern, match_options).with_context(|| format!("Failed to interpret glob pattern '{}'", pattern))?;

        let (mut extension_paths, extension_errors) = glob_results.fold(
            (Vec::<PathBuf>::new(), Vec::<GlobError>::new()),
            |(mut paths, mut errors), glob_result| {
                match glob_result {
                    Ok(path) => paths.push(path),
                    Err(error) => errors.push(error),
                };
                (paths, errors)
            },
        );

        extension_paths.retain(|path| path.is_file());
        extension_paths.sort();

        paths.extend(extension_paths);
        errors.extend(extension_errors);
    }

    errors.sort_by_key(|glob_error| glob_error.path().to_path_buf());

    Ok((paths, errors))
}
