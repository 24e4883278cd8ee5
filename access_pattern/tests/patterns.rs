//! Randomized checks that every legal access pattern is accepted, and that
//! the documented rejections happen, over many segment lengths.

use access_pattern::{
    classify,
    testing_utils::{segment, trace_kinds},
    AccessPattern, ClassificationError, Classifier, Mode,
    TraceKind::{self, *},
};
use assert2::{check, let_assert};
use itertools::Itertools as _;
use rand::{rngs::StdRng, seq::SliceRandom as _, Rng as _, SeedableRng as _};
use strum::IntoEnumIterator as _;

const ROUNDS: usize = 200;
const ANY_ST: [TraceKind; 5] = [ReadZeroST, ReadNonZeroST, InsertionST, UpdateST, DeletionST];

fn rng() -> StdRng {
    StdRng::seed_from_u64(0x5eed)
}

/// Up to 8 traces drawn from `alphabet`.
fn body(rng: &mut StdRng, alphabet: &[TraceKind]) -> Vec<TraceKind> {
    let len = rng.gen_range(0..=8);
    (0..len)
        .map(|_| *alphabet.choose(rng).expect("alphabet is not empty"))
        .collect()
}

fn ends_with(mut body: Vec<TraceKind>, head: TraceKind) -> Vec<TraceKind> {
    body.push(head);
    body
}

#[test]
fn missing_account_read() {
    check!(classify(&mut segment([ReadZeroWS])) == Ok(AccessPattern::MissingAccountRead));
}

#[test]
fn misplaced_missing_account_read() {
    let mut rng = rng();
    for _ in 0..ROUNDS {
        let mut kinds = body(&mut rng, &TraceKind::iter().collect::<Vec<_>>());
        let position = rng.gen_range(0..=kinds.len());
        kinds.insert(position, ReadZeroWS);
        if kinds.len() == 1 {
            continue;
        }
        let_assert!(
            Err(ClassificationError::MisplacedTerminalRead { len, .. }) =
                classify(&mut segment(kinds.clone()))
        );
        check!(len == kinds.len());
    }
}

#[test]
fn account_creation() {
    let mut rng = rng();
    for _ in 0..ROUNDS {
        let kinds = ends_with(body(&mut rng, &[InsertionST, ReadZeroST]), InsertionWS);
        check!(classify(&mut segment(kinds)) == Ok(AccessPattern::AccountCreation));
    }
}

#[test]
fn account_deletion() {
    let mut rng = rng();
    for _ in 0..ROUNDS {
        let kinds = ends_with(body(&mut rng, &[ReadZeroST, ReadNonZeroST]), DeletionWS);
        check!(classify(&mut segment(kinds)) == Ok(AccessPattern::AccountDeletion));
    }
}

#[test]
fn write_access_with_any_storage() {
    let mut rng = rng();
    for _ in 0..ROUNDS {
        let kinds = ends_with(body(&mut rng, &ANY_ST), UpdateWS);
        check!(classify(&mut segment(kinds)) == Ok(AccessPattern::Write));
    }
}

#[test]
fn read_only_ends_up_last() {
    let mut rng = rng();
    for _ in 0..ROUNDS {
        let storage = body(&mut rng, &[ReadNonZeroST, ReadZeroST]);
        let read_first = rng.gen_bool(0.5);
        let kinds = match read_first {
            true => [ReadNonZeroWS].into_iter().chain(storage).collect_vec(),
            false => ends_with(storage, ReadNonZeroWS),
        };
        let mut it = segment(kinds.clone());
        check!(classify(&mut it) == Ok(AccessPattern::ReadOnly));
        let normalized = trace_kinds(&it);
        check!(normalized.last() == Some(&ReadNonZeroWS));
        check!(normalized.iter().filter(|it| it.is_world_state()).count() == 1);

        // a second pass is a no-op
        check!(classify(&mut it) == Ok(AccessPattern::ReadOnly));
        check!(trace_kinds(&it) == normalized);
    }
}

#[test]
fn read_at_both_ends_is_ambiguous() {
    let mut rng = rng();
    for _ in 0..ROUNDS {
        let storage = body(&mut rng, &[ReadNonZeroST, ReadZeroST]);
        let kinds = [ReadNonZeroWS]
            .into_iter()
            .chain(storage)
            .chain([ReadNonZeroWS])
            .collect_vec();
        let mut it = segment(kinds.clone());
        check!(
            classify(&mut it)
                == Err(ClassificationError::AmbiguousDoubleRead { len: kinds.len() })
        );
        check!(trace_kinds(&it) == kinds);
    }
}

#[test]
fn account_redeploy() {
    let mut rng = rng();
    for _ in 0..ROUNDS {
        let kinds = body(&mut rng, &[ReadZeroST, ReadNonZeroST])
            .into_iter()
            .chain([DeletionWS])
            .chain(body(&mut rng, &[ReadZeroST, InsertionST]))
            .chain([InsertionWS])
            .collect_vec();
        check!(classify(&mut segment(kinds)) == Ok(AccessPattern::AccountRedeploy));
    }
}

#[test]
fn redeploy_with_second_deletion() {
    let mut rng = rng();
    for _ in 0..ROUNDS {
        let before = body(&mut rng, &[ReadZeroST, ReadNonZeroST]);
        let after = body(&mut rng, &[ReadZeroST, InsertionST]);
        let first = before.len();
        let second = rng.gen_range(first + 1..=first + 1 + after.len());
        let mut kinds = before
            .into_iter()
            .chain([DeletionWS])
            .chain(after)
            .chain([InsertionWS])
            .collect_vec();
        kinds.insert(second, DeletionWS);
        check!(
            classify(&mut segment(kinds))
                == Err(ClassificationError::DuplicateDeletion {
                    first,
                    position: second
                })
        );
    }
}

#[test]
fn storage_updates_only_in_writes() {
    for found in [UpdateST, DeletionST] {
        for (pattern, kinds) in [
            (AccessPattern::AccountCreation, vec![found, InsertionWS]),
            (AccessPattern::AccountDeletion, vec![found, DeletionWS]),
            (AccessPattern::ReadOnly, vec![found, ReadNonZeroWS]),
            (
                AccessPattern::AccountRedeploy,
                vec![DeletionWS, found, InsertionWS],
            ),
        ] {
            let position = kinds.iter().position(|it| *it == found).unwrap();
            check!(
                classify(&mut segment(kinds))
                    == Err(ClassificationError::IllegalBodyToken {
                        pattern,
                        position,
                        found
                    })
            );
        }
        check!(classify(&mut segment([found, UpdateWS])) == Ok(AccessPattern::Write));
    }
}

#[test]
fn world_state_not_last_never_matches() {
    // no storage trace may close a segment
    let mut rng = rng();
    for _ in 0..ROUNDS {
        let head = *[UpdateWS, InsertionWS, DeletionWS].choose(&mut rng).unwrap();
        let kinds = [head]
            .into_iter()
            .chain(ends_with(body(&mut rng, &ANY_ST), *ANY_ST.choose(&mut rng).unwrap()))
            .collect_vec();
        let_assert!(
            Err(ClassificationError::NoPatternMatched { kinds: reported }) =
                classify(&mut segment(kinds.clone()))
        );
        check!(reported == kinds);
    }
}

#[test]
fn reference_parity_tolerates_whitelist_violations() {
    let parity = Classifier::new(Mode::ReferenceParity);
    let mut rng = rng();
    for _ in 0..ROUNDS {
        let kinds = ends_with(body(&mut rng, &ANY_ST), InsertionWS);
        check!(parity.classify(&mut segment(kinds)) == Ok(AccessPattern::AccountCreation));

        let kinds = ends_with(body(&mut rng, &ANY_ST), DeletionWS);
        check!(parity.classify(&mut segment(kinds)) == Ok(AccessPattern::AccountDeletion));
    }
    // but not world-state traces in the body
    check!(
        parity.classify(&mut segment([ReadZeroST, UpdateWS, DeletionWS]))
            == Err(ClassificationError::IllegalWorldStateInBody {
                pattern: AccessPattern::AccountDeletion,
                position: 1,
                found: UpdateWS,
            })
    );
}

#[test]
fn single_trace_segments() {
    // only world-state traces can stand alone
    for kind in TraceKind::iter() {
        let verdict = classify(&mut segment([kind]));
        match kind {
            ReadZeroWS => {
                check!(verdict == Ok(AccessPattern::MissingAccountRead));
            }
            InsertionWS => {
                check!(verdict == Ok(AccessPattern::AccountCreation));
            }
            DeletionWS => {
                check!(verdict == Ok(AccessPattern::AccountDeletion));
            }
            ReadNonZeroWS => {
                check!(verdict == Ok(AccessPattern::ReadOnly));
            }
            UpdateWS => {
                check!(verdict == Ok(AccessPattern::Write));
            }
            ReadZeroST | ReadNonZeroST | InsertionST | UpdateST | DeletionST => {
                let_assert!(Err(ClassificationError::NoPatternMatched { kinds }) = verdict);
                check!(kinds == [kind]);
            }
        }
    }
}
