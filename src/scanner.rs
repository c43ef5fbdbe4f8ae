//! Candidate discovery and per-file rewriting.

use crate::classifier::LineClassifier;
use crate::config::SweepConfig;
use crate::remover::{find_matches, remove_all, MatchSpan};

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

/// VCS internal directories that should never be traversed
pub const VCS_INTERNALS: &[&str] = &[
    ".git", ".jj", ".svn", ".hg", ".bzr", "_darcs", ".pijul", "CVS", ".fossil",
];

/// Options controlling sweep behavior (runtime flags)
#[derive(Clone, Copy, Default)]
pub struct ScanOptions {
    pub dry_run: bool,
    pub verbose: bool,
}

/// A file that contained at least one removable call
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    /// Calls removed from the file
    pub matches: Vec<MatchSpan>,
    /// Calls left in the file because they could not be cut out of their line
    pub kept: Vec<MatchSpan>,
    pub removed: usize,
    pub bytes_before: u64,
    pub bytes_after: u64,
    /// False in dry-run mode
    pub written: bool,
}

/// Result of sweeping one root
#[derive(Debug, Default)]
pub struct SweepResult {
    pub files: Vec<FileReport>,
    /// Number of candidate files examined
    pub scanned: usize,
    /// Number of files that could not be read or written
    pub failed: usize,
}

impl SweepResult {
    pub fn total_removed(&self) -> usize {
        self.files.iter().map(|f| f.removed).sum()
    }

    pub fn bytes_trimmed(&self) -> u64 {
        self.files
            .iter()
            .map(|f| f.bytes_before.saturating_sub(f.bytes_after))
            .sum()
    }
}

/// Check if a path should be excluded based on directory name matching
pub fn should_exclude_path(path: &Path, excludes: &[String]) -> bool {
    if excludes.is_empty() {
        return false;
    }

    path.components().any(|component| {
        if let std::path::Component::Normal(name) = component {
            let dir_name = name.to_string_lossy();
            excludes.iter().any(|exclude| exclude == dir_name.as_ref())
        } else {
            false
        }
    })
}

/// Walk the root and return files with a configured extension, sorted by path
pub fn collect_candidates(config: &SweepConfig, options: ScanOptions) -> Vec<PathBuf> {
    let root = config.root.clone();
    let exclude = config.exclude.clone();

    let walker = WalkBuilder::new(&config.root)
        .hidden(false)
        .git_ignore(true)
        .filter_entry(move |entry| {
            let path = entry.path();

            // Never traverse VCS internals
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if VCS_INTERNALS.contains(&name) {
                    return false;
                }
            }

            // Only directories below the root are matched, so an excluded
            // name in the root path itself doesn't hide everything
            if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                if let Ok(relative) = path.strip_prefix(&root) {
                    if should_exclude_path(relative, &exclude) {
                        return false;
                    }
                }
            }

            true
        })
        .build();

    let mut candidates = Vec::new();
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                eprintln!("Warning: Failed to access entry: {}", err);
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        if options.verbose {
            println!("DEBUG: Checking path: {}", path.display());
        }
        if config.matches_extension(path) {
            candidates.push(path.to_path_buf());
        }
    }

    candidates.sort();
    candidates
}

/// Strip every call from one file, writing it back unless this is a dry run.
/// Returns `None` when there was nothing to remove.
pub fn process_file(
    path: &Path,
    classifier: &LineClassifier,
    options: ScanOptions,
) -> Result<Option<FileReport>> {
    let original = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let sites = find_matches(&original, classifier);
    if sites.is_empty() {
        return Ok(None);
    }
    if options.verbose {
        println!("DEBUG: {} call sites in {}", sites.len(), path.display());
    }

    let removal = remove_all(&original, classifier);
    if !removal.changed() {
        if options.verbose {
            println!(
                "DEBUG: {} has calls that could not be removed safely",
                path.display()
            );
        }
        return Ok(None);
    }

    let written = if options.dry_run {
        false
    } else {
        fs::write(path, &removal.text)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        true
    };

    Ok(Some(FileReport {
        path: path.to_path_buf(),
        matches: removal.calls,
        kept: removal.skipped,
        removed: removal.removed,
        bytes_before: original.len() as u64,
        bytes_after: removal.text.len() as u64,
        written,
    }))
}

/// Sweep every candidate file under the configured root.
/// Failures on individual files are reported and counted, never fatal.
pub fn sweep(config: &SweepConfig, options: ScanOptions) -> Result<SweepResult> {
    if !config.root.exists() {
        anyhow::bail!("Path does not exist: {}", config.root.display());
    }

    let classifier = LineClassifier::new(&config.marker)?;

    if options.verbose {
        println!("DEBUG: Scanning directory {}", config.root.display());
    }

    let progress = if options.verbose {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .context("Invalid progress template")?,
    );
    progress.enable_steady_tick(std::time::Duration::from_millis(100));

    let candidates = collect_candidates(config, options);
    let mut result = SweepResult {
        scanned: candidates.len(),
        ..SweepResult::default()
    };

    for path in &candidates {
        progress.set_message(format!("{}", path.display()));

        match process_file(path, &classifier, options) {
            Ok(Some(report)) => result.files.push(report),
            Ok(None) => {}
            Err(err) => {
                progress.suspend(|| eprintln!("Warning: {:#}. Skipping.", err));
                result.failed += 1;
            }
        }
    }

    progress.finish_and_clear();

    Ok(result)
}
