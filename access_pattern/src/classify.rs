//! Fixed-priority dispatch over the [matchers](crate::matchers).

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{
    error::{ClassificationError, ClassificationResult, Shape},
    matchers,
    segment::Segment,
    trace::TraceKind,
};

/// The legal shapes of an account's segment.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AccessPattern {
    /// The account doesn't exist, and stays that way.
    #[strum(serialize = "missing account read")]
    MissingAccountRead,
    /// The account is created, and its fresh storage filled.
    #[strum(serialize = "account creation")]
    AccountCreation,
    /// The account is deleted, after its storage was read.
    #[strum(serialize = "account deletion")]
    AccountDeletion,
    /// The account and its storage are only read.
    #[strum(serialize = "read-only access")]
    ReadOnly,
    /// The account is updated, and its storage accessed in any way.
    #[strum(serialize = "write access")]
    Write,
    /// The account is deleted, then created again.
    #[strum(serialize = "account redeploy")]
    AccountRedeploy,
}

/// How lenient the classifier is with body traces a pattern does not
/// whitelist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// The first non-whitelisted body trace rejects the segment.
    #[default]
    Strict,
    /// Non-whitelisted body traces are tolerated, matching the historical
    /// behaviour of the state-manager consistency check.
    ///
    /// Every other check is identical to [`Mode::Strict`].
    ReferenceParity,
}

/// What must be done to a matched segment to put it in canonical order, where
/// the world-state trace is last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normalization {
    /// Already canonical.
    Keep,
    /// The first and the last traces must be exchanged.
    SwapEnds,
}

/// A successful classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Verdict {
    pub pattern: AccessPattern,
    pub normalization: Normalization,
}

type Matcher = fn(&[TraceKind], Mode) -> ClassificationResult<Option<Normalization>>;

/// Tried in order, the first definite answer wins.
///
/// Creation and redeploy both end with an `InsertionWS`. Creation must come
/// first: it gives up on any world-state trace in its body, so that redeploys
/// fall through to [`matchers::account_redeploy`].
pub(crate) const MATCHERS: [(AccessPattern, Matcher); 6] = [
    (
        AccessPattern::MissingAccountRead,
        matchers::missing_account_read,
    ),
    (AccessPattern::AccountCreation, matchers::account_creation),
    (AccessPattern::AccountDeletion, matchers::account_deletion),
    (AccessPattern::ReadOnly, matchers::read_only),
    (AccessPattern::Write, matchers::write),
    (AccessPattern::AccountRedeploy, matchers::account_redeploy),
];

/// Decides which [`AccessPattern`] a segment follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Classifier {
    pub mode: Mode,
}

impl Classifier {
    pub const fn new(mode: Mode) -> Self {
        Self { mode }
    }

    /// Classify a sequence of trace kinds without touching any segment.
    ///
    /// # Panics
    /// - If `kinds` is empty.
    pub fn inspect(&self, kinds: &[TraceKind]) -> ClassificationResult<Verdict> {
        for (pattern, matcher) in MATCHERS {
            trace!("trying {pattern} on {}", Shape(kinds));
            if let Some(normalization) = matcher(kinds, self.mode)? {
                debug!("matched {pattern} (len: {})", kinds.len());
                return Ok(Verdict {
                    pattern,
                    normalization,
                });
            }
        }
        Err(ClassificationError::NoPatternMatched {
            kinds: kinds.to_vec(),
        })
    }

    /// Classify `segment`, and put it in canonical order.
    ///
    /// On success, the world-state trace of a read-only segment is last: if it
    /// was first, the first and last traces have been exchanged. No other
    /// pattern is reordered, and a rejected segment is left untouched.
    pub fn classify(&self, segment: &mut Segment) -> ClassificationResult<AccessPattern> {
        let kinds = segment.kinds().collect::<Vec<_>>();
        let Verdict {
            pattern,
            normalization,
        } = self.inspect(&kinds)?;
        if let Normalization::SwapEnds = normalization {
            debug!(
                "moving account read of {:?} to the end of its segment",
                segment.account()
            );
            segment.swap_ends();
        }
        Ok(pattern)
    }
}

/// [`Classifier::classify`] in [`Mode::Strict`].
pub fn classify(segment: &mut Segment) -> ClassificationResult<AccessPattern> {
    Classifier::default().classify(segment)
}
