//! Record-level filters applied while paging.

use crate::record::CommentRecord;

/// Minimum-likes gate. An unknown like count counts as zero, so such records
/// are dropped whenever `threshold > 0`.
#[inline]
pub fn passes_min_likes(rec: &CommentRecord, threshold: u64) -> bool {
    rec.likes_or_zero() >= threshold
}

/// True once `collected` has reached the optional cap.
#[inline]
pub fn cap_reached(collected: usize, max: Option<usize>) -> bool {
    matches!(max, Some(m) if collected >= m)
}
