//! Line-preserving batching of input text.
//!
//! The input is cut on `\n` boundaries into chunks of at most
//! `limit_bytes` bytes. A single line longer than the limit is never broken
//! apart; it becomes a batch of its own. Concatenating the `content` of every
//! batch in order reproduces the input byte for byte.

/// Default upper bound for a batch, in bytes.
pub const DEFAULT_BATCH_LIMIT: usize = 10_000;

/// A contiguous slice of the input text sent to the model in one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch<'a> {
    /// Exact substring of the input, newlines included.
    pub content: &'a str,
    /// Number of newline-delimited segments folded into this batch.
    pub line_count: usize,
}

impl Batch<'_> {
    /// Length of `content` in bytes.
    pub const fn byte_size(&self) -> usize {
        self.content.len()
    }
}

/// Splits `content` into ordered batches no larger than `limit_bytes`.
///
/// Segments keep their trailing `\n` (the last segment has none), and a batch
/// is closed only when it already holds a segment and the next one would push
/// it strictly past the limit. Empty input yields no batches.
pub fn split_into_batches(content: &str, limit_bytes: usize) -> Vec<Batch<'_>> {
    let mut batches = Vec::new();

    if content.is_empty() {
        return batches;
    }

    let segment_count = content.split('\n').count();
    let mut start = 0;
    let mut size = 0;
    let mut lines = 0;

    for (index, segment) in content.split('\n').enumerate() {
        // Every segment but the last was followed by a newline in the source.
        let segment_len = if index + 1 == segment_count {
            segment.len()
        } else {
            segment.len() + 1
        };

        if lines > 0 && size + segment_len > limit_bytes {
            batches.push(Batch {
                content: &content[start..start + size],
                line_count: lines,
            });
            start += size;
            size = 0;
            lines = 0;
        }

        size += segment_len;
        lines += 1;
    }

    if lines > 0 {
        batches.push(Batch {
            content: &content[start..start + size],
            line_count: lines,
        });
    }

    batches
}
