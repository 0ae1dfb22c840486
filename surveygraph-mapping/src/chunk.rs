//! Chunk policy: when the assembler hands a finished sub-graph to the caller.

use std::num::NonZeroUsize;

/// How many rows go into one sub-graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChunkPolicy {
    /// One sub-graph for the whole file
    #[default]
    AtEnd,
    /// A sub-graph every `n` rows, plus the remainder
    Every(NonZeroUsize),
}

impl ChunkPolicy {
    /// Policy for a caller-supplied chunk size; zero, negative and `None`
    /// all mean one sub-graph.
    pub fn from_size(size: Option<i64>) -> Self {
        size.and_then(|n| usize::try_from(n).ok())
            .and_then(NonZeroUsize::new)
            .map_or(ChunkPolicy::AtEnd, ChunkPolicy::Every)
    }

    /// Whether a chunk holding `rows` rows should be yielded now.
    ///
    /// The final row always yields regardless of this answer.
    #[inline]
    pub fn should_yield(&self, rows: usize) -> bool {
        match self {
            ChunkPolicy::AtEnd => false,
            ChunkPolicy::Every(n) => rows >= n.get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_size() {
        assert_eq!(ChunkPolicy::from_size(None), ChunkPolicy::AtEnd);
        assert_eq!(ChunkPolicy::from_size(Some(0)), ChunkPolicy::AtEnd);
        assert_eq!(ChunkPolicy::from_size(Some(-4)), ChunkPolicy::AtEnd);
        assert_eq!(
            ChunkPolicy::from_size(Some(3)),
            ChunkPolicy::Every(NonZeroUsize::new(3).unwrap())
        );
    }

    #[test]
    fn test_should_yield() {
        let every3 = ChunkPolicy::from_size(Some(3));
        assert!(!every3.should_yield(2));
        assert!(every3.should_yield(3));
        assert!(!ChunkPolicy::AtEnd.should_yield(1_000_000));
    }
}
