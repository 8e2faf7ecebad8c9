//! Block segmentation for the frame encoder

use std::slice::Chunks;

/// Samples per encoder block, one MPEG-1 Layer III frame
pub const BLOCK_SIZE: usize = 1152;

/// Split samples into consecutive blocks of [`BLOCK_SIZE`].
///
/// The last block may be shorter. An empty input yields no blocks at all.
pub fn blocks(samples: &[i16]) -> Chunks<'_, i16> {
    samples.chunks(BLOCK_SIZE)
}

/// Number of blocks `blocks` yields for `len` samples
pub const fn block_count(len: usize) -> usize {
    len.div_ceil(BLOCK_SIZE)
}

/// Length of the final block, `None` when there are no blocks
pub const fn last_block_len(len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else if len % BLOCK_SIZE == 0 {
        Some(BLOCK_SIZE)
    } else {
        Some(len % BLOCK_SIZE)
    }
}
