//! Bulk completion of incomplete records.
//!
//! Each record goes through request → wait-for-decision → commit-or-skip:
//! [`Backfill::next_proposal`] resolves the next record and hands back a
//! [`Proposal`], and nothing else happens until [`Backfill::decide`] accepts
//! or rejects it. Records are resolved one at a time in caller order.

mod worker;

use std::collections::VecDeque;

use thiserror::Error;

use crate::artwork::ThumbnailCache;
use crate::models::{Resolution, ResolvedInfo, TrackRecord};
use crate::resolver::{HttpTransport, ResolutionEngine};
use crate::store::query;

pub use worker::{spawn_worker, WorkerEvent, WorkerHandle};

#[derive(Debug, Error)]
pub enum BackfillError {
    #[error("no proposal is waiting for a decision")]
    NoPendingProposal,

    #[error("the previous proposal has not been decided yet")]
    ProposalPending,

    #[error("record {0} no longer exists")]
    RecordMissing(usize),

    #[error("backfill worker stopped unexpectedly")]
    WorkerStopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject,
}

/// Outcome of resolving one queued record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Review(Proposal),
    NotFound(usize),
    Done,
}

/// Resolved metadata waiting for the user's verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    pub index: usize,
    pub current: TrackRecord,
    pub resolved: ResolvedInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackfillSummary {
    pub updated: usize,
    pub rejected: usize,
    pub not_found: Vec<(String, String)>, // (title, artist)
}

pub struct Backfill<'e, T> {
    engine: &'e ResolutionEngine<T>,
    queue: VecDeque<usize>,
    total: usize,
    pending: Option<Proposal>,
    summary: BackfillSummary,
}

impl<'e, T: HttpTransport> Backfill<'e, T> {
    /// Walk every incomplete record of `records`.
    pub fn new(engine: &'e ResolutionEngine<T>, records: &[TrackRecord]) -> Self {
        Self::with_indices(engine, query::incomplete(records))
    }

    pub fn with_indices(engine: &'e ResolutionEngine<T>, indices: Vec<usize>) -> Self {
        Self {
            engine,
            total: indices.len(),
            queue: indices.into(),
            pending: None,
            summary: BackfillSummary::default(),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// 1-based position of the record most recently taken from the queue.
    pub fn position(&self) -> usize {
        self.total - self.queue.len()
    }

    pub fn pending(&self) -> Option<&Proposal> {
        self.pending.as_ref()
    }

    /// Index of the record the next call to [`Backfill::next_proposal`] will resolve.
    pub fn peek(&self) -> Option<usize> {
        self.queue.front().copied()
    }

    /// Resolve exactly one queued record.
    pub async fn step(&mut self, records: &[TrackRecord]) -> Result<Step, BackfillError> {
        if self.pending.is_some() {
            return Err(BackfillError::ProposalPending);
        }
        let Some(index) = self.queue.pop_front() else {
            return Ok(Step::Done);
        };
        let record = records.get(index).ok_or(BackfillError::RecordMissing(index))?;

        tracing::info!(
            "Backfill {}/{}: '{}' by '{}'",
            self.position(),
            self.total,
            record.title,
            record.artist
        );

        match self.engine.resolve(&record.title, &record.artist).await {
            Resolution::Found(resolved) => {
                let proposal = Proposal {
                    index,
                    current: record.clone(),
                    resolved,
                };
                self.pending = Some(proposal.clone());
                Ok(Step::Review(proposal))
            }
            Resolution::NotFound => {
                self.summary
                    .not_found
                    .push((record.title.clone(), record.artist.clone()));
                Ok(Step::NotFound(index))
            }
        }
    }

    /// Resolve queued records until one yields a proposal.
    ///
    /// Records the catalog cannot resolve are noted in the summary and
    /// skipped. Returns `Ok(None)` once the queue is exhausted.
    pub async fn next_proposal(
        &mut self,
        records: &[TrackRecord],
    ) -> Result<Option<Proposal>, BackfillError> {
        loop {
            match self.step(records).await? {
                Step::Review(proposal) => return Ok(Some(proposal)),
                Step::NotFound(_) => continue,
                Step::Done => return Ok(None),
            }
        }
    }

    /// Commit or skip the pending proposal. Returns true when a record changed.
    ///
    /// On accept the thumbnails for both the old and the new album are
    /// invalidated, since the record's cover may now come from another key.
    pub fn decide(
        &mut self,
        decision: Decision,
        records: &mut [TrackRecord],
        thumbnails: Option<&mut ThumbnailCache>,
    ) -> Result<bool, BackfillError> {
        let proposal = self.pending.take().ok_or(BackfillError::NoPendingProposal)?;

        match decision {
            Decision::Accept => {
                let record = records
                    .get_mut(proposal.index)
                    .ok_or(BackfillError::RecordMissing(proposal.index))?;
                let old_album = record.album.clone();
                record.apply_resolution(&proposal.resolved);

                if let Some(thumbnails) = thumbnails {
                    thumbnails.invalidate(&old_album);
                    thumbnails.invalidate(&record.album);
                }

                self.summary.updated += 1;
                Ok(true)
            }
            Decision::Reject => {
                self.summary.rejected += 1;
                Ok(false)
            }
        }
    }

    pub fn summary(&self) -> &BackfillSummary {
        &self.summary
    }

    /// Close the session. An undecided proposal counts as rejected.
    pub fn finish(mut self) -> BackfillSummary {
        if self.pending.take().is_some() {
            tracing::warn!("Backfill finished with an undecided proposal");
            self.summary.rejected += 1;
        }
        self.summary
    }
}

#[cfg(test)]
mod tests;
