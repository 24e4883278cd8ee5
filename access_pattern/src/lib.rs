//! For every block, the state manager emits one sequence of trie operations
//! ("traces") per account it touched: the operations on the leaf of the
//! account in the world-state trie, and on the slots of its storage trie.
//!
//! The arithmetization independently claims the same state transitions. Before
//! those claims are compared, each account's segment must be shown to follow
//! one of six legal shapes, or _access patterns_. Anything else is a bug or a
//! forged trace, and must abort the block.
//!
//! This library recognizes those access patterns, and puts recognized
//! segments in canonical order.
//!
//! ```
//! use access_pattern::{classify, testing_utils::segment, AccessPattern, TraceKind::*};
//!
//! let mut it = segment([ReadNonZeroWS, ReadZeroST, ReadNonZeroST]);
//! assert_eq!(classify(&mut it), Ok(AccessPattern::ReadOnly));
//! // the account read is now last
//! assert_eq!(it.last().kind(), ReadNonZeroWS);
//! ```
//!
//! # Non-Goals
//! - Merkle proofs or any other commitment. Only the _shape_ of a segment is
//!   checked, never the values it carries.
//! - Decoding the state manager's own output format.

#![deny(rustdoc::broken_intra_doc_links)]
#![warn(missing_debug_implementations)]

mod classify;
mod error;
mod matchers;
mod report;
mod segment;
pub mod testing_utils;
mod trace;

pub use classify::{classify, AccessPattern, Classifier, Mode, Normalization, Verdict};
pub use error::{ClassificationError, ClassificationResult, Shape};
pub use report::{BlockReport, Outcome, SegmentReport};
pub use segment::{segments, BlockTraces, Segment};
pub use trace::{Account, DecodedTrace, Op, Scope, Trace, TraceKind};
