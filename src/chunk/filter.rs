//! Binary filtering and per-file truncation.

use crate::domain::{DiffFile, DiffLimits};
use tracing::debug;

/// Drop binary files and cut oversized patches down to `limits.truncate_lines`.
///
/// Never fails and never touches `files`. Non-binary files are always kept,
/// and a truncated patch is never larger than the patch it replaces.
pub fn filter_and_truncate(files: &[DiffFile], limits: &DiffLimits) -> Vec<DiffFile> {
    files
        .iter()
        .filter(|file| {
            let binary = is_binary_path(&file.path, limits);
            if binary {
                debug!(path = %file.path, "skipping binary file");
            }
            !binary
        })
        .map(|file| truncate_file(file, limits))
        .collect()
}

/// True when `path` ends with one of the configured binary extensions.
pub fn is_binary_path(path: &str, limits: &DiffLimits) -> bool {
    let lower = path.to_ascii_lowercase();
    limits.binary_extensions.iter().any(|ext| lower.ends_with(ext.as_str()))
}

fn truncate_file(file: &DiffFile, limits: &DiffLimits) -> DiffFile {
    let total_changes = file.changes();
    if total_changes <= limits.max_changes_per_file {
        return file.clone();
    }
    let Some(patch) = file.patch.as_deref() else {
        return file.clone();
    };

    let keep = limits.truncate_lines.saturating_sub(1);
    let kept: Vec<&str> = patch.lines().take(keep).collect();
    let shown = kept.iter().filter(|line| is_change_line(line)).count();

    let mut truncated = kept.join("\n");
    if !truncated.is_empty() {
        truncated.push('\n');
    }
    truncated.push_str(&truncation_marker(shown, total_changes));

    if truncated.len() >= patch.len() {
        return file.clone();
    }

    debug!(
        path = %file.path,
        changes = total_changes,
        shown,
        "truncated oversized patch"
    );
    DiffFile { patch: Some(truncated), ..file.clone() }
}

/// Annotation appended to a truncated patch.
pub fn truncation_marker(shown: usize, total: usize) -> String {
    format!("[TRUNCATED — {shown} of {total} changes shown]")
}

fn is_change_line(line: &str) -> bool {
    (line.starts_with('+') && !line.starts_with("+++"))
        || (line.starts_with('-') && !line.starts_with("---"))
}
