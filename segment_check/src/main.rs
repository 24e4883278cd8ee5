//! This binary is a debugging tool which classifies every account segment of
//! state-manager traces.
//!
//! As input, it takes one block's traces or an array of them (see
//! [`access_pattern::BlockTraces`]) on stdin. It prints a report per block,
//! and fails if any segment was rejected.
//!
//! Example usage:
//! ```
//! RUST_LOG=info cargo run --bin segment_check -- --keep-going --pretty < ./traces_b1337.json
//! ```

mod logging;

use std::io;

use access_pattern::{BlockReport, BlockTraces, Classifier, Mode, Outcome, Shape};
use anyhow::{bail, Context as _};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use tracing::info;

#[derive(Parser)]
#[command(version, propagate_version = true)]
struct Cli {
    /// How to treat storage traces that the matched pattern does not allow.
    #[arg(long, value_enum, env = "SEGMENT_CHECK_MODE", default_value_t = CliMode::Strict)]
    mode: CliMode,
    /// Report every block, rather than stopping at the first block with a
    /// rejected segment.
    #[arg(long, env = "SEGMENT_CHECK_KEEP_GOING", default_value_t = false)]
    keep_going: bool,
    #[arg(long)]
    pretty: bool,
    /// Don't print the reports.
    #[arg(long)]
    quiet: bool,
}

#[derive(ValueEnum, Clone, Copy)]
enum CliMode {
    Strict,
    ReferenceParity,
}

impl From<CliMode> for Mode {
    fn from(value: CliMode) -> Self {
        match value {
            CliMode::Strict => Mode::Strict,
            CliMode::ReferenceParity => Mode::ReferenceParity,
        }
    }
}

fn main() -> anyhow::Result<()> {
    logging::init();

    let Cli {
        mode,
        keep_going,
        pretty,
        quiet,
    } = Cli::parse();
    let classifier = Classifier::new(mode.into());

    let input: Input<BlockTraces> = serde_path_to_error::deserialize(
        &mut serde_json::Deserializer::from_reader(io::stdin()),
    )
    .context("couldn't parse block traces from stdin")?;

    let mut reports = vec![];
    let mut invalid = vec![];
    for block in input.into_iter() {
        let report = classifier.report_block(&block)?;
        log_report(&report);
        let valid = report.is_valid();
        if !valid {
            invalid.push(report.block);
        }
        reports.push(report);
        if !valid && !keep_going {
            break;
        }
    }

    if !quiet {
        let printer = match pretty {
            true => serde_json::to_writer_pretty as fn(_, _) -> _,
            false => serde_json::to_writer as _,
        };
        printer(io::stdout(), &reports)?;
    }

    if !invalid.is_empty() {
        bail!("invalid trace segments in blocks {invalid:?}")
    }
    Ok(())
}

fn log_report(report: &BlockReport) {
    for segment in &report.segments {
        match &segment.outcome {
            Outcome::Matched { pattern } => info!(
                block = report.block,
                account = ?segment.account,
                len = segment.kinds.len(),
                "{pattern}"
            ),
            // the library has already warned about it
            Outcome::Rejected { error } => info!(
                block = report.block,
                account = ?segment.account,
                shape = %Shape(&segment.kinds),
                "{error}"
            ),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Input<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Input<T> {
    fn into_iter(self) -> impl Iterator<Item = T> {
        match self {
            Input::One(it) => vec![it].into_iter(),
            Input::Many(it) => it.into_iter(),
        }
    }
}
