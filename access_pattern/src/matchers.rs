//! One recognizer per legal access pattern.
//!
//! ```text
//! missing account read:   READ_ZERO_WS
//! account creation:       (INSERT_ST | READ_ZERO_ST)* INSERT_WS
//! account deletion:       (READ_ZERO_ST | READ_NON_ZERO_ST)* DELETE_WS
//! read-only access:       (READ_NON_ZERO_ST | READ_ZERO_ST)* READ_NON_ZERO_WS
//! write access:           (ANY_ST)* UPDATE_WS
//! account redeploy:       (READ_ZERO_ST | READ_NON_ZERO_ST)* DELETE_WS
//!                         (INSERT_ST | READ_ZERO_ST)* INSERT_WS
//! ```
//!
//! Each matcher first tests the _head_ of the segment (its last trace, or
//! either end for read-only access). A failed head test is always `Ok(None)`:
//! the segment may well belong to another pattern. Once the head matches, the
//! _body_ (every other trace) is checked, and violations are hard errors.
//!
//! The matchers assume they are tried in the order of
//! [`crate::classify::MATCHERS`].

use log::trace;

use crate::{
    classify::{AccessPattern, Mode, Normalization},
    error::{ClassificationError, ClassificationResult},
    trace::TraceKind::{self, *},
};

/// # Panics
/// - If `kinds` is empty.
fn split_head(kinds: &[TraceKind]) -> (&[TraceKind], TraceKind) {
    let (head, body) = kinds.split_last().expect("segments are never empty");
    (body, *head)
}

/// A body trace that is not on `pattern`'s whitelist.
fn not_whitelisted(
    mode: Mode,
    pattern: AccessPattern,
    position: usize,
    found: TraceKind,
) -> ClassificationResult<()> {
    match mode {
        Mode::Strict => Err(ClassificationError::IllegalBodyToken {
            pattern,
            position,
            found,
        }),
        Mode::ReferenceParity => {
            trace!("ignoring {found} at position {position} in {pattern} body");
            Ok(())
        }
    }
}

const fn world_state_in_body(
    pattern: AccessPattern,
    position: usize,
    found: TraceKind,
) -> ClassificationError {
    ClassificationError::IllegalWorldStateInBody {
        pattern,
        position,
        found,
    }
}

pub(crate) fn missing_account_read(
    kinds: &[TraceKind],
    _: Mode,
) -> ClassificationResult<Option<Normalization>> {
    if let [ReadZeroWS] = kinds {
        return Ok(Some(Normalization::Keep));
    }
    match kinds.iter().position(|it| *it == ReadZeroWS) {
        Some(position) => Err(ClassificationError::MisplacedTerminalRead {
            position,
            len: kinds.len(),
        }),
        None => Ok(None),
    }
}

/// Never errors on a world-state trace in the body: that segment may be a
/// redeploy, which is tried later.
///
/// Because of that, a whitelist violation is only reported once the whole body
/// has been seen to be storage traces. It is the first violation that is
/// reported.
pub(crate) fn account_creation(
    kinds: &[TraceKind],
    mode: Mode,
) -> ClassificationResult<Option<Normalization>> {
    const PATTERN: AccessPattern = AccessPattern::AccountCreation;
    let (body, head) = split_head(kinds);
    if head != InsertionWS {
        return Ok(None);
    }

    let mut pending = None;
    for (position, &kind) in body.iter().enumerate() {
        match kind {
            InsertionST | ReadZeroST => {}
            ReadNonZeroST | UpdateST | DeletionST => {
                if pending.is_none() {
                    pending = not_whitelisted(mode, PATTERN, position, kind).err();
                }
            }
            ReadZeroWS | ReadNonZeroWS | InsertionWS | UpdateWS | DeletionWS => return Ok(None),
        }
    }

    match pending {
        Some(e) => Err(e),
        None => Ok(Some(Normalization::Keep)),
    }
}

pub(crate) fn account_deletion(
    kinds: &[TraceKind],
    mode: Mode,
) -> ClassificationResult<Option<Normalization>> {
    const PATTERN: AccessPattern = AccessPattern::AccountDeletion;
    let (body, head) = split_head(kinds);
    if head != DeletionWS {
        return Ok(None);
    }

    for (position, &kind) in body.iter().enumerate() {
        match kind {
            ReadZeroST | ReadNonZeroST => {}
            InsertionST | UpdateST | DeletionST => {
                not_whitelisted(mode, PATTERN, position, kind)?
            }
            ReadZeroWS | ReadNonZeroWS | InsertionWS | UpdateWS | DeletionWS => {
                return Err(world_state_in_body(PATTERN, position, kind))
            }
        }
    }
    Ok(Some(Normalization::Keep))
}

/// The state manager sometimes places the account read first rather than
/// last. Such a segment matches with [`Normalization::SwapEnds`].
pub(crate) fn read_only(
    kinds: &[TraceKind],
    mode: Mode,
) -> ClassificationResult<Option<Normalization>> {
    const PATTERN: AccessPattern = AccessPattern::ReadOnly;
    let (Some(&first), Some(&last)) = (kinds.first(), kinds.last()) else {
        panic!("segments are never empty")
    };
    let (read_first, read_last) = (first == ReadNonZeroWS, last == ReadNonZeroWS);
    if !read_first && !read_last {
        return Ok(None);
    }
    if kinds.len() == 1 {
        return Ok(Some(Normalization::Keep));
    }
    if read_first && read_last {
        return Err(ClassificationError::AmbiguousDoubleRead { len: kinds.len() });
    }

    let (body, offset) = match read_last {
        true => (&kinds[..kinds.len() - 1], 0),
        false => (&kinds[1..], 1),
    };
    for (ix, &kind) in body.iter().enumerate() {
        let position = ix + offset;
        match kind {
            ReadNonZeroST | ReadZeroST => {}
            InsertionST | UpdateST | DeletionST => {
                not_whitelisted(mode, PATTERN, position, kind)?
            }
            ReadZeroWS | ReadNonZeroWS | InsertionWS | UpdateWS | DeletionWS => {
                return Err(world_state_in_body(PATTERN, position, kind))
            }
        }
    }

    Ok(Some(match read_last {
        true => Normalization::Keep,
        false => Normalization::SwapEnds,
    }))
}

pub(crate) fn write(kinds: &[TraceKind], _: Mode) -> ClassificationResult<Option<Normalization>> {
    const PATTERN: AccessPattern = AccessPattern::Write;
    let (body, head) = split_head(kinds);
    if head != UpdateWS {
        return Ok(None);
    }

    match body.iter().position(|it| it.is_world_state()) {
        Some(position) => Err(world_state_in_body(PATTERN, position, body[position])),
        None => Ok(Some(Normalization::Keep)),
    }
}

/// A body with no deletion at all is not a redeploy. It cannot reach this
/// matcher in practice, since [`account_creation`] claims every all-storage
/// body.
pub(crate) fn account_redeploy(
    kinds: &[TraceKind],
    mode: Mode,
) -> ClassificationResult<Option<Normalization>> {
    const PATTERN: AccessPattern = AccessPattern::AccountRedeploy;
    let (body, head) = split_head(kinds);
    if head != InsertionWS {
        return Ok(None);
    }

    let mut deletion = None;
    for (position, &kind) in body.iter().enumerate() {
        match (kind, deletion) {
            (DeletionWS, Some(first)) => {
                return Err(ClassificationError::DuplicateDeletion { first, position })
            }
            (DeletionWS, None) => deletion = Some(position),
            (ReadZeroWS | ReadNonZeroWS | InsertionWS | UpdateWS, _) => {
                return Err(world_state_in_body(PATTERN, position, kind))
            }
            // storage of the deleted account
            (ReadZeroST | ReadNonZeroST, None) => {}
            (InsertionST | UpdateST | DeletionST, None) => {
                not_whitelisted(mode, PATTERN, position, kind)?
            }
            // storage of the recreated account
            (ReadZeroST | InsertionST, Some(_)) => {}
            (ReadNonZeroST | UpdateST | DeletionST, Some(_)) => {
                not_whitelisted(mode, PATTERN, position, kind)?
            }
        }
    }

    Ok(deletion.map(|_| Normalization::Keep))
}
