//! Statement alignment
//!
//! Statements carry no identity that survives across unrelated policy
//! documents, so pairing an old statement with its new form is a heuristic.
//! [`GreedyAligner`] walks both sorted statement lists once and pairs two
//! statements when they target the same service and their serialized forms
//! are textually close.

use log::debug;

use crate::config::DiffConfig;
use crate::error::{AlignError, AlignResult, Side};
use crate::policy::{Policy, Statement};
use crate::serialize::to_indented_json;

/// One side of a pairing decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedStatement<'a> {
    /// Position of the statement in its policy
    pub index: usize,
    pub statement: &'a Statement,
    /// Service named by the statement's first resource, e.g. `s3`
    pub service: &'a str,
    /// Tab-indented JSON form used for comparison and diffing
    pub text: String,
}

impl<'a> AlignedStatement<'a> {
    fn new(side: Side, index: usize, statement: &'a Statement) -> AlignResult<Self> {
        Ok(Self {
            index,
            statement,
            service: resource_service(statement, side, index)?,
            text: to_indented_json(statement)?,
        })
    }
}

/// How a statement of the old policy relates to a statement of the new one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairingDecision<'a> {
    /// Both statements are taken to be versions of the same rule
    Matched {
        old: AlignedStatement<'a>,
        new: AlignedStatement<'a>,
        distance: usize,
    },
    /// Only present in the old policy
    RemovedOnly(AlignedStatement<'a>),
    /// Only present in the new policy
    AddedOnly(AlignedStatement<'a>),
}

impl<'a> PairingDecision<'a> {
    /// Service shown in the report header
    pub fn service(&self) -> &'a str {
        match self {
            Self::Matched { old, .. } | Self::RemovedOnly(old) => old.service,
            Self::AddedOnly(new) => new.service,
        }
    }

    pub fn old_side(&self) -> Option<&AlignedStatement<'a>> {
        match self {
            Self::Matched { old, .. } | Self::RemovedOnly(old) => Some(old),
            Self::AddedOnly(_) => None,
        }
    }

    pub fn new_side(&self) -> Option<&AlignedStatement<'a>> {
        match self {
            Self::Matched { new, .. } | Self::AddedOnly(new) => Some(new),
            Self::RemovedOnly(_) => None,
        }
    }
}

/// Strategy for pairing the statements of two canonical policies
pub trait Aligner {
    /// Produce pairing decisions in the order statements were consumed
    fn align<'a>(
        &self,
        old: &'a Policy,
        new: &'a Policy,
    ) -> AlignResult<Vec<PairingDecision<'a>>>;
}

/// Single-pass aligner using two cursors and an edit-distance gate.
///
/// Runs `max(len(old), len(new))` rounds. When both cursors point at a
/// statement, the pair is matched if the services agree and the Levenshtein
/// distance of their serialized forms is below `max_distance`. Otherwise the
/// cursor tie-break `i < j` decides which side is reported alone. This
/// compares raw positions rather than anything about the statements, so
/// pairings can drift once the cursors diverge; there is no backtracking.
///
/// Statements still unconsumed after the rounds are reported one-sided, old
/// side first, so every statement appears in exactly one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreedyAligner {
    max_distance: usize,
}

impl GreedyAligner {
    pub fn new(max_distance: usize) -> Self {
        Self { max_distance }
    }

    pub fn from_config(config: &DiffConfig) -> Self {
        Self::new(config.max_distance)
    }

    pub fn max_distance(&self) -> usize {
        self.max_distance
    }
}

impl Default for GreedyAligner {
    fn default() -> Self {
        Self::from_config(&DiffConfig::default())
    }
}

impl Aligner for GreedyAligner {
    fn align<'a>(
        &self,
        old: &'a Policy,
        new: &'a Policy,
    ) -> AlignResult<Vec<PairingDecision<'a>>> {
        let old_statements = old.statements();
        let new_statements = new.statements();
        let rounds = old_statements.len().max(new_statements.len());

        let mut decisions = Vec::with_capacity(rounds);
        let (mut i, mut j) = (0, 0);

        for _ in 0..rounds {
            match (old_statements.get(i), new_statements.get(j)) {
                (Some(a), Some(b)) => {
                    let old_side = AlignedStatement::new(Side::Old, i, a)?;
                    let new_side = AlignedStatement::new(Side::New, j, b)?;
                    let distance = strsim::levenshtein(&old_side.text, &new_side.text);
                    debug!(
                        "old[{i}] ({}) vs new[{j}] ({}): distance {distance}",
                        old_side.service, new_side.service
                    );

                    if distance < self.max_distance && old_side.service == new_side.service {
                        decisions.push(PairingDecision::Matched {
                            old: old_side,
                            new: new_side,
                            distance,
                        });
                        i += 1;
                        j += 1;
                    } else if i < j {
                        decisions.push(PairingDecision::RemovedOnly(old_side));
                        i += 1;
                    } else {
                        decisions.push(PairingDecision::AddedOnly(new_side));
                        j += 1;
                    }
                }
                (Some(a), None) => {
                    decisions.push(PairingDecision::RemovedOnly(AlignedStatement::new(
                        Side::Old,
                        i,
                        a,
                    )?));
                    i += 1;
                }
                (None, Some(b)) => {
                    decisions.push(PairingDecision::AddedOnly(AlignedStatement::new(
                        Side::New,
                        j,
                        b,
                    )?));
                    j += 1;
                }
                (None, None) => {}
            }
        }

        let leftover = (old_statements.len() - i) + (new_statements.len() - j);
        if leftover > 0 {
            debug!("{leftover} statement(s) left after {rounds} round(s), reporting them one-sided");
        }
        for (index, statement) in old_statements.iter().enumerate().skip(i) {
            decisions.push(PairingDecision::RemovedOnly(AlignedStatement::new(
                Side::Old,
                index,
                statement,
            )?));
        }
        for (index, statement) in new_statements.iter().enumerate().skip(j) {
            decisions.push(PairingDecision::AddedOnly(AlignedStatement::new(
                Side::New,
                index,
                statement,
            )?));
        }

        Ok(decisions)
    }
}

/// Service named by the third colon-delimited segment of the first resource.
///
/// `arn:aws:s3:::bucket/*` yields `s3`. Statements without a `Resource`, or
/// whose first resource has fewer than three segments (such as `*`), are
/// rejected rather than compared on a made-up service.
pub fn resource_service(statement: &Statement, side: Side, index: usize) -> AlignResult<&str> {
    let resource = statement
        .resources()
        .first()
        .ok_or(AlignError::MissingResource { side, index })?;

    resource
        .split(':')
        .nth(2)
        .ok_or_else(|| AlignError::MalformedResourceIdentifier {
            side,
            index,
            resource: resource.clone(),
        })
}
