//! Builders for trace segments whose payloads don't matter, for tests and
//! benchmarks.

use ethereum_types::{Address, H160, H256, U256};

use crate::{
    segment::Segment,
    trace::{Account, DecodedTrace, Trace, TraceKind},
};

/// The account every trace built by [`segment`] belongs to.
pub const ACCOUNT: Address = H160([0xaa; 20]);

/// A trace of the given kind, whose slot key (or account nonce) is `n`.
pub fn placeholder(kind: TraceKind, n: u64) -> Trace {
    let account = Account {
        nonce: U256::from(n),
        ..Default::default()
    };
    let key = H256::from_low_u64_be(n);
    let value = H256::from_low_u64_be(n + 1);
    match kind {
        TraceKind::ReadZeroWS => Trace::ReadZeroWS { key: ACCOUNT },
        TraceKind::ReadNonZeroWS => Trace::ReadNonZeroWS {
            key: ACCOUNT,
            value: account,
        },
        TraceKind::InsertionWS => Trace::InsertionWS {
            key: ACCOUNT,
            value: account,
        },
        TraceKind::UpdateWS => Trace::UpdateWS {
            key: ACCOUNT,
            prior: Account::default(),
            next: account,
        },
        TraceKind::DeletionWS => Trace::DeletionWS {
            key: ACCOUNT,
            prior: account,
        },
        TraceKind::ReadZeroST => Trace::ReadZeroST { key },
        TraceKind::ReadNonZeroST => Trace::ReadNonZeroST { key, value },
        TraceKind::InsertionST => Trace::InsertionST { key, value },
        TraceKind::UpdateST => Trace::UpdateST {
            key,
            prior: H256::zero(),
            next: value,
        },
        TraceKind::DeletionST => Trace::DeletionST { key, prior: value },
    }
}

pub fn trace_of(account: Address, kind: TraceKind) -> DecodedTrace {
    DecodedTrace {
        account,
        trace: placeholder(kind, 0),
    }
}

/// # Panics
/// - If `kinds` is empty.
pub fn segment(kinds: impl IntoIterator<Item = TraceKind>) -> Segment {
    let traces = kinds
        .into_iter()
        .zip(0..)
        .map(|(kind, n)| DecodedTrace {
            account: ACCOUNT,
            trace: placeholder(kind, n),
        })
        .collect();
    Segment::new(traces).expect("test segments should not be empty")
}

pub fn trace_kinds(segment: &Segment) -> Vec<TraceKind> {
    segment.kinds().collect()
}
