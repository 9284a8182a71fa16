//! Longest-matching-blocks alignment of two phoneme sequences
//!
//! Tokens are opaque atoms. The algorithm repeatedly finds the longest run
//! of equal tokens, then recurses on the unmatched regions to its left and
//! right, maximizing the total length of equal runs.
//!
//! Ties are deterministic: among equally long runs the one starting at the
//! lowest expected index wins, then the lowest produced index.

use std::collections::HashMap;
use std::ops::Range;

use crate::value_objects::{PhonemeSequence, PhonemeToken};

/// One step of the edit path from the expected to the produced sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlignmentOp {
    /// A run of identical tokens on both sides
    Equal {
        /// Span in the expected sequence
        expected: Range<usize>,
        /// Span in the produced sequence
        produced: Range<usize>,
    },
    /// One expected token replaced by one produced token
    Substitute {
        expected_index: usize,
        expected: PhonemeToken,
        produced_index: usize,
        produced: PhonemeToken,
    },
    /// A produced token with no expected counterpart
    Insert {
        produced_index: usize,
        produced: PhonemeToken,
    },
    /// An expected token that was not produced
    Delete {
        expected_index: usize,
        expected: PhonemeToken,
    },
}

impl AlignmentOp {
    /// Whether this op is a run of equal tokens
    #[must_use]
    pub const fn is_equal(&self) -> bool {
        matches!(self, Self::Equal { .. })
    }

    /// Span consumed from the expected sequence, `None` for insertions
    #[must_use]
    pub fn expected_span(&self) -> Option<Range<usize>> {
        match self {
            Self::Equal { expected, .. } => Some(expected.clone()),
            Self::Substitute { expected_index, .. } | Self::Delete { expected_index, .. } => {
                Some(*expected_index..*expected_index + 1)
            },
            Self::Insert { .. } => None,
        }
    }

    /// Span consumed from the produced sequence, `None` for deletions
    #[must_use]
    pub fn produced_span(&self) -> Option<Range<usize>> {
        match self {
            Self::Equal { produced, .. } => Some(produced.clone()),
            Self::Substitute { produced_index, .. } | Self::Insert { produced_index, .. } => {
                Some(*produced_index..*produced_index + 1)
            },
            Self::Delete { .. } => None,
        }
    }
}

/// A matching block: `expected[a..a + size] == produced[b..b + size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Block {
    a: usize,
    b: usize,
    size: usize,
}

struct Matcher<'s> {
    a: &'s [PhonemeToken],
    b: &'s [PhonemeToken],
    b2j: HashMap<&'s PhonemeToken, Vec<usize>>,
}

impl<'s> Matcher<'s> {
    fn new(a: &'s [PhonemeToken], b: &'s [PhonemeToken]) -> Self {
        let mut b2j: HashMap<&PhonemeToken, Vec<usize>> = HashMap::new();
        for (j, token) in b.iter().enumerate() {
            b2j.entry(token).or_default().push(j);
        }
        Self { a, b, b2j }
    }

    /// Longest block inside `a[alo..ahi]` x `b[blo..bhi]`
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
        let mut best = Block {
            a: alo,
            b: blo,
            size: 0,
        };
        // j2len[j] = length of the match ending at a[i - 1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > best.size {
                        best = Block {
                            a: i + 1 - k,
                            b: j + 1 - k,
                            size: k,
                        };
                    }
                }
            }
            j2len = next;
        }
        best
    }

    /// All matching blocks in order, adjacent blocks merged, terminated by a
    /// zero-sized sentinel at `(len(a), len(b))`
    fn matching_blocks(&self) -> Vec<Block> {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let block = self.longest_match(alo, ahi, blo, bhi);
            if block.size == 0 {
                continue;
            }
            blocks.push(block);
            if alo < block.a && blo < block.b {
                queue.push((alo, block.a, blo, block.b));
            }
            if block.a + block.size < ahi && block.b + block.size < bhi {
                queue.push((block.a + block.size, ahi, block.b + block.size, bhi));
            }
        }
        blocks.sort_unstable();

        let mut merged: Vec<Block> = Vec::with_capacity(blocks.len() + 1);
        for block in blocks {
            match merged.last_mut() {
                Some(last) if last.a + last.size == block.a && last.b + last.size == block.b => {
                    last.size += block.size;
                },
                _ => merged.push(block),
            }
        }
        merged.push(Block {
            a: self.a.len(),
            b: self.b.len(),
            size: 0,
        });
        merged
    }
}

/// Align the expected sequence against the produced one
///
/// The returned ops cover every index of both sequences exactly once, in
/// left-to-right order. A replaced region of unequal length pairs tokens
/// index by index and reports the excess as insertions or deletions.
#[must_use]
pub fn align(expected: &PhonemeSequence, produced: &PhonemeSequence) -> Vec<AlignmentOp> {
    let a = expected.tokens();
    let b = produced.tokens();
    let matcher = Matcher::new(a, b);

    let mut ops = Vec::new();
    let (mut i, mut j) = (0, 0);
    for block in matcher.matching_blocks() {
        push_unmatched(&mut ops, a, i..block.a, b, j..block.b);
        i = block.a + block.size;
        j = block.b + block.size;
        if block.size > 0 {
            ops.push(AlignmentOp::Equal {
                expected: block.a..i,
                produced: block.b..j,
            });
        }
    }
    ops
}

/// Emit substitutions, then any excess insertions or deletions, for an
/// unmatched region
fn push_unmatched(
    ops: &mut Vec<AlignmentOp>,
    a: &[PhonemeToken],
    a_range: Range<usize>,
    b: &[PhonemeToken],
    b_range: Range<usize>,
) {
    let width = a_range.len().max(b_range.len());
    for k in 0..width {
        let ai = a_range.start + k;
        let bj = b_range.start + k;
        match (a_range.contains(&ai), b_range.contains(&bj)) {
            (true, true) => ops.push(AlignmentOp::Substitute {
                expected_index: ai,
                expected: a[ai].clone(),
                produced_index: bj,
                produced: b[bj].clone(),
            }),
            (true, false) => ops.push(AlignmentOp::Delete {
                expected_index: ai,
                expected: a[ai].clone(),
            }),
            (false, true) => ops.push(AlignmentOp::Insert {
                produced_index: bj,
                produced: b[bj].clone(),
            }),
            (false, false) => {},
        }
    }
}
