//! Input discovery.

use anyhow::{Context, Result, bail};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions picked up when walking a directory.
pub const LINTABLE_EXTENSIONS: &[&str] = &["js", "htm", "html"];

pub fn is_lintable(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            LINTABLE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

pub fn build_exclude_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(false)
            .build()
            .with_context(|| format!("invalid exclude pattern {pattern:?}"))?;
        builder.add(glob);
    }
    builder.build().context("failed to compile exclude patterns")
}

/// Expand the inputs into the files to lint, in a stable order.
///
/// A file named directly is always linted. Directories are walked
/// recursively for lintable files; excludes are matched against the path
/// relative to the walked directory and against the file name.
pub fn discover_files(inputs: &[PathBuf], excludes: &GlobSet) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
            continue;
        }
        if !input.is_dir() {
            bail!("no such file or directory: {}", input.display());
        }

        let mut found = 0usize;
        for entry in WalkDir::new(input)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !entry.file_type().is_file() || !is_lintable(path) {
                continue;
            }
            let relative = path.strip_prefix(input).unwrap_or(path);
            if excludes.is_match(relative) || path.file_name().is_some_and(|n| excludes.is_match(n))
            {
                tracing::trace!(path = %path.display(), "excluded");
                continue;
            }
            files.push(path.to_path_buf());
            found += 1;
        }
        tracing::debug!(dir = %input.display(), found, "walked directory");
    }

    let mut seen = rustc_hash::FxHashSet::default();
    files.retain(|path| seen.insert(path.clone()));
    Ok(files)
}
