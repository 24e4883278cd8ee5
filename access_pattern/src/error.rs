//! Rejections produced while classifying a trace segment.

use std::fmt;

use itertools::Itertools as _;
use strum::IntoStaticStr;
use thiserror::Error;

use crate::{trace::TraceKind, AccessPattern};

/// Stores the result of classifying a segment. Returns a
/// [`ClassificationError`] upon failure.
pub type ClassificationResult<T> = Result<T, ClassificationError>;

/// Why a segment is not one of the legal access patterns.
///
/// Positions are indices into the segment as it was handed to the classifier.
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq, IntoStaticStr)]
pub enum ClassificationError {
    /// Both ends of the segment are [`TraceKind::ReadNonZeroWS`], so there is
    /// no telling which one is the account read.
    #[error("the segment contains two account reads (len: {len})")]
    AmbiguousDoubleRead {
        /// Length of the segment.
        len: usize,
    },

    /// A [`TraceKind::ReadZeroWS`] marks the account as missing, nothing else
    /// may happen to it in the same segment.
    #[error("found a missing-account read in a segment whose length is larger than 1 (position: {position}, len: {len})")]
    MisplacedTerminalRead {
        /// Index of the first offending read.
        position: usize,
        /// Length of the segment.
        len: usize,
    },

    /// A body trace is not whitelisted by the pattern whose head matched.
    #[error("invalid trace: found {found} in {pattern} body (position: {position})")]
    IllegalBodyToken {
        /// The pattern whose head test succeeded.
        pattern: AccessPattern,
        /// Index of the offending trace.
        position: usize,
        /// The offending trace kind.
        found: TraceKind,
    },

    /// A world-state trace sits where only storage traces may.
    #[error("found world-state trace {found} in {pattern} body (position: {position})")]
    IllegalWorldStateInBody {
        /// The pattern whose head test succeeded.
        pattern: AccessPattern,
        /// Index of the offending trace.
        position: usize,
        /// The offending trace kind.
        found: TraceKind,
    },

    /// A redeploy body deletes the account more than once.
    #[error("found more than one account deletion (first: {first}, position: {position})")]
    DuplicateDeletion {
        /// Index of the deletion that opened the redeploy.
        first: usize,
        /// Index of the second deletion.
        position: usize,
    },

    /// No pattern's head test succeeded.
    #[error("no match found: {}", Shape(.kinds))]
    NoPatternMatched {
        /// Every trace kind of the segment, in order.
        kinds: Vec<TraceKind>,
    },
}

impl ClassificationError {
    /// The variant name, e.g. `"DuplicateDeletion"`.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Index of the trace that caused the rejection, if there is a single one.
    pub const fn position(&self) -> Option<usize> {
        match self {
            Self::MisplacedTerminalRead { position, .. }
            | Self::IllegalBodyToken { position, .. }
            | Self::IllegalWorldStateInBody { position, .. }
            | Self::DuplicateDeletion { position, .. } => Some(*position),
            Self::AmbiguousDoubleRead { .. } | Self::NoPatternMatched { .. } => None,
        }
    }
}

/// Renders a sequence of trace kinds as `[InsertionST, ReadZeroST, InsertionWS]`.
#[derive(Debug, Clone, Copy)]
pub struct Shape<'a>(pub &'a [TraceKind]);

impl fmt::Display for Shape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.iter().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape() {
        assert_eq!(Shape(&[]).to_string(), "[]");
        assert_eq!(Shape(&[TraceKind::UpdateWS]).to_string(), "[UpdateWS]");
        assert_eq!(
            Shape(&[
                TraceKind::InsertionST,
                TraceKind::ReadZeroST,
                TraceKind::InsertionWS
            ])
            .to_string(),
            "[InsertionST, ReadZeroST, InsertionWS]"
        );
    }

    #[test]
    fn no_match_lists_every_kind() {
        let err = ClassificationError::NoPatternMatched {
            kinds: vec![TraceKind::UpdateWS, TraceKind::ReadZeroST],
        };
        assert_eq!(err.to_string(), "no match found: [UpdateWS, ReadZeroST]");
        assert_eq!(err.name(), "NoPatternMatched");
        assert_eq!(err.position(), None);
    }

    #[test]
    fn body_errors_name_pattern_and_position() {
        let err = ClassificationError::IllegalBodyToken {
            pattern: AccessPattern::AccountDeletion,
            position: 2,
            found: TraceKind::InsertionST,
        };
        assert_eq!(
            err.to_string(),
            "invalid trace: found InsertionST in account deletion body (position: 2)"
        );
        assert_eq!(err.position(), Some(2));
    }
}
