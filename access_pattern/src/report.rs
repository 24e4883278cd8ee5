//! Whole-block checking, and reports for operators.

use anyhow::Context as _;
use ethereum_types::Address;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    classify::{AccessPattern, Classifier},
    error::{ClassificationResult, Shape},
    segment::{segments, BlockTraces, Segment},
    trace::TraceKind,
};

/// The outcome of classifying every account segment of a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockReport {
    pub block: u64,
    pub segments: Vec<SegmentReport>,
}

impl BlockReport {
    /// `true` iff every segment matched a pattern.
    pub fn is_valid(&self) -> bool {
        self.rejections().next().is_none()
    }

    pub fn rejections(&self) -> impl Iterator<Item = &SegmentReport> {
        self.segments
            .iter()
            .filter(|it| matches!(it.outcome, Outcome::Rejected { .. }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentReport {
    pub account: Address,
    /// As received, before any normalization.
    pub kinds: Vec<TraceKind>,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Matched { pattern: AccessPattern },
    Rejected { error: String },
}

impl<E: ToString> From<Result<AccessPattern, E>> for Outcome {
    fn from(value: Result<AccessPattern, E>) -> Self {
        match value {
            Ok(pattern) => Self::Matched { pattern },
            Err(e) => Self::Rejected {
                error: e.to_string(),
            },
        }
    }
}

impl Classifier {
    /// Classify every account segment of `block`, stopping at the first
    /// rejection.
    ///
    /// Returns the segments in canonical order.
    pub fn check_block(&self, block: BlockTraces) -> anyhow::Result<Vec<Segment>> {
        let BlockTraces { block, traces } = block;
        segments(traces)
            .with_context(|| format!("couldn't split the traces of block {block}"))?
            .into_iter()
            .map(|mut segment| -> anyhow::Result<_> {
                let kinds = segment.kinds().collect::<Vec<_>>();
                let result = self.classify(&mut segment);
                if let Err(e) = &result {
                    warn!(
                        "block {block}, account {:?}: rejected {}: {e}",
                        segment.account(),
                        Shape(&kinds)
                    );
                }
                result.with_context(|| {
                    format!(
                        "invalid trace segment for account {:?} in block {block}",
                        segment.account()
                    )
                })?;
                Ok(segment)
            })
            .collect()
    }

    /// Classify every account segment of `block`, reporting on each one.
    ///
    /// Only fails if the block cannot be split into segments.
    pub fn report_block(&self, block: &BlockTraces) -> anyhow::Result<BlockReport> {
        let segments = segments(block.traces.iter().cloned())
            .with_context(|| format!("couldn't split the traces of block {}", block.block))?;
        Ok(BlockReport {
            block: block.block,
            segments: segments
                .into_iter()
                .map(|mut segment| {
                    let kinds = segment.kinds().collect::<Vec<_>>();
                    let result: ClassificationResult<_> = self.classify(&mut segment);
                    if let Err(e) = &result {
                        warn!(
                            "block {}, account {:?}: rejected {}: {e}",
                            block.block,
                            segment.account(),
                            Shape(&kinds)
                        );
                    }
                    SegmentReport {
                        account: segment.account(),
                        kinds,
                        outcome: result.into(),
                    }
                })
                .collect(),
        })
    }
}
