use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::{Backfill, BackfillError, BackfillSummary, Decision, Proposal, Step};
use crate::models::TrackRecord;
use crate::resolver::{HttpTransport, ResolutionEngine};

/// Events emitted by a backfill worker, in order.
#[derive(Debug)]
pub enum WorkerEvent {
    /// About to resolve record `position` of `total`.
    Progress {
        position: usize,
        total: usize,
        title: String,
        artist: String,
    },
    /// A match was found; the worker waits until `reply` is answered.
    /// Dropping `reply` counts as a rejection.
    Review {
        proposal: Proposal,
        reply: oneshot::Sender<Decision>,
    },
    NotFound {
        title: String,
        artist: String,
    },
}

pub struct WorkerHandle {
    pub events: mpsc::Receiver<WorkerEvent>,
    task: JoinHandle<(Vec<TrackRecord>, BackfillSummary)>,
}

impl WorkerHandle {
    /// Wait for the worker and take back the (possibly updated) records.
    pub async fn join(self) -> Result<(Vec<TrackRecord>, BackfillSummary), BackfillError> {
        let WorkerHandle { events, task } = self;
        drop(events);
        task.await.map_err(|_| BackfillError::WorkerStopped)
    }
}

/// Run a backfill over every incomplete record on a separate task, so an
/// interactive surface can keep handling input while the catalog is queried.
///
/// If the event receiver is dropped the worker stops after the current
/// record and returns what it has so far.
pub fn spawn_worker<T>(engine: Arc<ResolutionEngine<T>>, records: Vec<TrackRecord>) -> WorkerHandle
where
    T: HttpTransport + 'static,
{
    let (tx, rx) = mpsc::channel(8);

    let task = tokio::spawn(async move {
        let mut records = records;
        let mut backfill = Backfill::new(&engine, &records);

        while let Some(record) = backfill.peek().and_then(|index| records.get(index)) {
            let progress = WorkerEvent::Progress {
                position: backfill.position() + 1,
                total: backfill.total(),
                title: record.title.clone(),
                artist: record.artist.clone(),
            };
            if tx.send(progress).await.is_err() {
                break;
            }

            let event = match backfill.step(&records).await {
                Ok(Step::Review(proposal)) => {
                    let (reply, decision) = oneshot::channel();
                    if tx.send(WorkerEvent::Review { proposal, reply }).await.is_err() {
                        break;
                    }
                    let decision = decision.await.unwrap_or(Decision::Reject);
                    if let Err(e) = backfill.decide(decision, &mut records, None) {
                        tracing::error!("Backfill decision failed: {}", e);
                        break;
                    }
                    continue;
                }
                Ok(Step::NotFound(index)) => WorkerEvent::NotFound {
                    title: records[index].title.clone(),
                    artist: records[index].artist.clone(),
                },
                Ok(Step::Done) => break,
                Err(e) => {
                    tracing::error!("Backfill aborted: {}", e);
                    break;
                }
            };

            if tx.send(event).await.is_err() {
                break;
            }
        }

        let summary = backfill.finish();
        tracing::info!(
            "Backfill done: {} updated, {} rejected, {} not found",
            summary.updated,
            summary.rejected,
            summary.not_found.len()
        );
        (records, summary)
    });

    WorkerHandle { events: rx, task }
}
