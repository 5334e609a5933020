//! Splits combined diff output into one text block per file.

/// Literal that opens every per-file diff block.
pub const DIFF_MARKER: &str = "diff --git";

/// Splits `raw` into per-file blocks, preserving line terminators exactly.
///
/// Every line starting with [`DIFF_MARKER`] opens a new block. Text before the
/// first marker is kept at the front of the first block rather than dropped,
/// so for non-blank input the concatenation of the blocks equals `raw`.
/// Blank or whitespace-only input yields no blocks.
pub fn split_blocks(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    let mut blocks = Vec::new();
    let mut current = String::new();
    let mut seen_marker = false;

    for line in raw.split_inclusive('\n') {
        if line.starts_with(DIFF_MARKER) {
            if seen_marker {
                blocks.push(std::mem::take(&mut current));
            }
            seen_marker = true;
        }
        current.push_str(line);
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}
