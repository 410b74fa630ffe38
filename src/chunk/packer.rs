//! Diff serialization, chunking decision and greedy chunk packing.

use crate::domain::{DiffChunk, DiffFile};
use crate::utils::estimate_tokens;

/// Render one file the way it is forwarded to the model.
pub fn serialize_file(file: &DiffFile) -> String {
    let patch = file.patch_text();
    let mut out = String::with_capacity(patch.len() + file.path.len() + 64);
    out.push_str("File: ");
    out.push_str(&file.path);
    out.push('\n');
    if let Some(previous) = &file.previous_path {
        out.push_str(&format!("Renamed from: {previous}\n"));
    }
    out.push_str(&format!("Status: {}\n", file.status));
    out.push_str(&format!("Additions: {}, Deletions: {}\n", file.additions, file.deletions));
    out.push_str("---\n");
    out.push_str(patch);
    out.push_str("\n\n");
    out
}

/// Concatenate the rendering of every file, in order.
pub fn serialize_files(files: &[DiffFile]) -> String {
    files.iter().map(serialize_file).collect()
}

/// Whether the diff must be split into chunks before review.
///
/// An empty list is never chunked, even when forced.
pub fn should_chunk(files: &[DiffFile], budget_tokens: usize, force: bool) -> bool {
    if files.is_empty() {
        return false;
    }
    force || estimate_tokens(&serialize_files(files)) > budget_tokens
}

/// Greedily pack files, in order, into chunks whose estimate stays within `budget_tokens`.
///
/// A file whose own estimate exceeds the budget gets a chunk to itself; files
/// are never split.
pub fn make_chunks(files: &[DiffFile], budget_tokens: usize) -> Vec<DiffChunk> {
    let mut chunks = Vec::new();
    let mut current: Vec<DiffFile> = Vec::new();
    let mut running = 0usize;

    for file in files {
        let estimate = estimate_tokens(&serialize_file(file));
        if !current.is_empty() && running + estimate > budget_tokens {
            push_chunk(&mut chunks, &mut current, &mut running);
        }

        current.push(file.clone());
        running += estimate;

        if running > budget_tokens {
            push_chunk(&mut chunks, &mut current, &mut running);
        }
    }
    if !current.is_empty() {
        push_chunk(&mut chunks, &mut current, &mut running);
    }

    chunks
}

fn push_chunk(chunks: &mut Vec<DiffChunk>, current: &mut Vec<DiffFile>, running: &mut usize) {
    chunks.push(DiffChunk {
        index: chunks.len(),
        files: std::mem::take(current),
        estimated_tokens: *running,
    });
    *running = 0;
}
