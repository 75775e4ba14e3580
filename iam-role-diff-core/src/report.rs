//! Report output: one service header and one diff block per pairing decision

use log::info;
use std::io::Write;

use crate::align::{Aligner, PairingDecision};
use crate::error::{CompareError, RenderError};
use crate::policy::Policy;
use crate::render::DiffRenderer;

/// Write the report for already aligned decisions, in decision order.
pub fn render_report(
    decisions: &[PairingDecision<'_>],
    renderer: &dyn DiffRenderer,
    out: &mut dyn Write,
) -> Result<(), RenderError> {
    for decision in decisions {
        writeln!(out, "[AWS Service: {}]", decision.service())?;
        let (old, new) = match decision {
            PairingDecision::Matched { old, new, .. } => (old.text.as_str(), new.text.as_str()),
            PairingDecision::RemovedOnly(old) => (old.text.as_str(), ""),
            PairingDecision::AddedOnly(new) => ("", new.text.as_str()),
        };
        renderer.render(old.as_bytes(), new.as_bytes(), out)?;
    }
    Ok(())
}

/// Counts of each decision kind in a finished comparison
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompareSummary {
    pub matched: usize,
    pub changed: usize,
    pub removed: usize,
    pub added: usize,
}

impl CompareSummary {
    pub fn from_decisions(decisions: &[PairingDecision<'_>]) -> Self {
        decisions
            .iter()
            .fold(Self::default(), |mut summary, decision| {
                match decision {
                    PairingDecision::Matched { distance, .. } => {
                        summary.matched += 1;
                        if *distance > 0 {
                            summary.changed += 1;
                        }
                    }
                    PairingDecision::RemovedOnly(_) => summary.removed += 1,
                    PairingDecision::AddedOnly(_) => summary.added += 1,
                }
                summary
            })
    }
}

/// Align two combined policies and write the report.
///
/// Nothing is written if alignment fails, so a malformed statement never
/// leaves a partial report behind.
pub fn compare(
    old: &Policy,
    new: &Policy,
    aligner: &dyn Aligner,
    renderer: &dyn DiffRenderer,
    out: &mut dyn Write,
) -> Result<CompareSummary, CompareError> {
    let decisions = aligner.align(old, new)?;
    render_report(&decisions, renderer, out)?;

    let summary = CompareSummary::from_decisions(&decisions);
    info!(
        "{} matched ({} changed), {} removed, {} added",
        summary.matched, summary.changed, summary.removed, summary.added
    );
    Ok(summary)
}
