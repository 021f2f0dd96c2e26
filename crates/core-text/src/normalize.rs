//! Grapheme accounting for committed text.
//!
//! Committed text is inserted verbatim; callers log only byte lengths and
//! cluster counts, never content.

use unicode_segmentation::UnicodeSegmentation;

/// Number of extended grapheme clusters in `input` (telemetry only).
pub fn cluster_count(input: &str) -> usize {
    input.graphemes(true).count()
}
