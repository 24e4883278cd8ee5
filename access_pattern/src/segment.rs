//! Per-account trace segments, and how a block's traces are split into them.

use std::collections::HashSet;

use anyhow::ensure;
use ethereum_types::Address;
use serde::{Deserialize, Serialize};

use crate::trace::{DecodedTrace, TraceKind};

/// The chronologically ordered traces of one account in one block.
///
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment(Vec<DecodedTrace>);

impl Segment {
    /// Returns an error if `traces` is empty.
    pub fn new(traces: Vec<DecodedTrace>) -> anyhow::Result<Self> {
        ensure!(!traces.is_empty(), "a trace segment must not be empty");
        Ok(Self(traces))
    }

    /// The account of the first trace.
    pub fn account(&self) -> Address {
        self.first().account
    }

    pub fn first(&self) -> &DecodedTrace {
        self.0.first().expect("segments are never empty")
    }

    pub fn last(&self) -> &DecodedTrace {
        self.0.last().expect("segments are never empty")
    }

    pub fn kinds(&self) -> impl Iterator<Item = TraceKind> + '_ {
        self.0.iter().map(DecodedTrace::kind)
    }

    pub fn as_slice(&self) -> &[DecodedTrace] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<DecodedTrace> {
        self.0
    }

    /// Exchange the first and last traces.
    pub(crate) fn swap_ends(&mut self) {
        let last = self.0.len() - 1;
        self.0.swap(0, last)
    }
}

impl AsRef<[DecodedTrace]> for Segment {
    fn as_ref(&self) -> &[DecodedTrace] {
        self.as_slice()
    }
}

impl TryFrom<Vec<DecodedTrace>> for Segment {
    type Error = anyhow::Error;
    fn try_from(value: Vec<DecodedTrace>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl IntoIterator for Segment {
    type Item = DecodedTrace;
    type IntoIter = std::vec::IntoIter<DecodedTrace>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// All the traces the state manager emitted for one block, in chronological
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTraces {
    /// Block number.
    pub block: u64,
    pub traces: Vec<DecodedTrace>,
}

/// Split a block's traces into one [`Segment`] per account.
///
/// The traces of an account must be contiguous: an account which shows up
/// again after another account's traces is an error, rather than a second
/// segment.
pub fn segments(traces: impl IntoIterator<Item = DecodedTrace>) -> anyhow::Result<Vec<Segment>> {
    let mut seen = HashSet::new();
    let mut runs = Vec::<Vec<DecodedTrace>>::new();
    for (ix, trace) in traces.into_iter().enumerate() {
        if let Some(run) = runs.last_mut() {
            if run[0].account == trace.account {
                run.push(trace);
                continue;
            }
        }
        ensure!(
            seen.insert(trace.account),
            "traces of account {:?} are split, the second run starts at index {}",
            trace.account,
            ix
        );
        runs.push(vec![trace]);
    }
    Ok(runs.into_iter().map(Segment).collect())
}
