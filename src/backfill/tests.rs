use super::*;
use crate::artwork::{DirectoryStore, PngCodec};
use crate::models::{CandidateMatch, UNKNOWN};
use crate::resolver::CatalogClient;
use crate::test_utils::{sample_playlist, search_body, test_record, MockTransport};
use std::sync::Arc;
use tempfile::TempDir;

fn candidate(title: &str, artist: &str, album: &str, genre: &str, date: &str) -> CandidateMatch {
    CandidateMatch::new(title, artist)
        .with_collection(album)
        .with_genre(genre)
        .with_release_date(date)
}

/// Catalog that knows "So What" and "Around the World" but not "Café".
fn catalog_engine() -> ResolutionEngine<MockTransport> {
    let so_what = search_body(&[candidate(
        "So What",
        "Miles Davis",
        "Kind of Blue",
        "Jazz",
        "1959-08-17T07:00:00Z",
    )]);
    let around = search_body(&[candidate(
        "Around the World",
        "Daft Punk",
        "Homework",
        "Electronic",
        "1997-01-20T08:00:00Z",
    )]);

    let transport = MockTransport::new()
        .route_term("Miles Davis So What", &so_what)
        .route_term("Daft Punk Around the World", &around)
        .respond(&search_body(&[]));

    ResolutionEngine::new(CatalogClient::new(transport))
}

#[tokio::test]
async fn test_step_by_step_protocol() {
    let engine = catalog_engine();
    let mut records = sample_playlist();
    let mut backfill = Backfill::new(&engine, &records);
    assert_eq!(backfill.total(), 3);

    // 1. So What is found and waits for a decision
    let proposal = match backfill.step(&records).await.unwrap() {
        Step::Review(proposal) => proposal,
        other => panic!("expected a proposal, got {:?}", other),
    };
    assert_eq!(proposal.index, 1);
    assert_eq!(proposal.current.album, UNKNOWN);
    assert_eq!(proposal.resolved.album, "Kind of Blue");
    assert!(matches!(
        backfill.step(&records).await,
        Err(BackfillError::ProposalPending)
    ));

    assert!(backfill.decide(Decision::Accept, &mut records, None).unwrap());
    assert_eq!(records[1].album, "Kind of Blue");
    assert_eq!(records[1].genre, "Jazz");
    assert_eq!(records[1].year, "1959");

    // 2. Café is not in the catalog
    assert_eq!(backfill.step(&records).await.unwrap(), Step::NotFound(2));

    // 3. Around the World is found, then rejected
    assert!(matches!(
        backfill.step(&records).await.unwrap(),
        Step::Review(_)
    ));
    assert!(!backfill.decide(Decision::Reject, &mut records, None).unwrap());
    assert_eq!(records[4].genre, UNKNOWN);

    assert_eq!(backfill.step(&records).await.unwrap(), Step::Done);

    let summary = backfill.finish();
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.rejected, 1);
    assert_eq!(
        summary.not_found,
        vec![("Café".to_string(), "Céline Dion".to_string())]
    );
}

#[tokio::test]
async fn test_next_proposal_skips_not_found() {
    let engine = catalog_engine();
    let records = sample_playlist();
    let mut backfill = Backfill::with_indices(&engine, vec![2, 4]);

    let proposal = backfill.next_proposal(&records).await.unwrap().unwrap();

    assert_eq!(proposal.index, 4);
    assert_eq!(backfill.summary().not_found.len(), 1);
    assert_eq!(backfill.remaining(), 0);
}

#[tokio::test]
async fn test_decide_without_proposal_fails() {
    let engine = catalog_engine();
    let mut records = sample_playlist();
    let mut backfill = Backfill::new(&engine, &records);

    assert!(matches!(
        backfill.decide(Decision::Accept, &mut records, None),
        Err(BackfillError::NoPendingProposal)
    ));
}

#[tokio::test]
async fn test_finish_with_pending_counts_as_rejected() {
    let engine = catalog_engine();
    let records = sample_playlist();
    let mut backfill = Backfill::new(&engine, &records);

    backfill.next_proposal(&records).await.unwrap().unwrap();
    let summary = backfill.finish();

    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.updated, 0);
}

#[tokio::test]
async fn test_resolves_in_caller_order() {
    let engine = catalog_engine();
    let records = sample_playlist();
    let mut backfill = Backfill::with_indices(&engine, vec![4, 1]);

    let first = backfill.next_proposal(&records).await.unwrap().unwrap();
    let mut records = records;
    backfill.decide(Decision::Reject, &mut records, None).unwrap();
    let second = backfill.next_proposal(&records).await.unwrap().unwrap();

    assert_eq!((first.index, second.index), (4, 1));
}

#[tokio::test]
async fn test_accept_invalidates_thumbnails() {
    let dir = TempDir::new().unwrap();
    let mut thumbnails = ThumbnailCache::new(
        Arc::new(DirectoryStore::new(dir.path())),
        Arc::new(PngCodec),
    );
    let engine = catalog_engine();
    let mut records = vec![test_record("So What", "Miles Davis", "Unknown", "Jazz", "----")];
    thumbnails.load(&records[0]);
    assert!(thumbnails.contains("Unknown"));

    let mut backfill = Backfill::new(&engine, &records);
    backfill.next_proposal(&records).await.unwrap().unwrap();
    backfill
        .decide(Decision::Accept, &mut records, Some(&mut thumbnails))
        .unwrap();

    assert!(!thumbnails.contains("Unknown"));
    assert_eq!(records[0].album, "Kind of Blue");
}

#[tokio::test]
async fn test_worker_round_trip() {
    let engine = Arc::new(catalog_engine());
    let mut handle = spawn_worker(Arc::clone(&engine), sample_playlist());

    let mut progress = Vec::new();
    let mut not_found = Vec::new();
    while let Some(event) = handle.events.recv().await {
        match event {
            WorkerEvent::Progress { position, total, title, .. } => {
                progress.push((position, total, title))
            }
            WorkerEvent::Review { proposal, reply } => {
                let decision = if proposal.current.title == "So What" {
                    Decision::Accept
                } else {
                    Decision::Reject
                };
                reply.send(decision).unwrap();
            }
            WorkerEvent::NotFound { title, .. } => not_found.push(title),
        }
    }

    let (records, summary) = handle.join().await.unwrap();

    assert_eq!(
        progress,
        vec![
            (1, 3, "So What".to_string()),
            (2, 3, "Café".to_string()),
            (3, 3, "Around the World".to_string()),
        ]
    );
    assert_eq!(not_found, vec!["Café".to_string()]);
    assert_eq!(records[1].album, "Kind of Blue");
    assert_eq!(records[4].genre, UNKNOWN);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.rejected, 1);
}

#[tokio::test]
async fn test_worker_dropped_reply_is_rejection() {
    let engine = Arc::new(catalog_engine());
    let mut handle = spawn_worker(engine, sample_playlist());

    while let Some(event) = handle.events.recv().await {
        if let WorkerEvent::Review { reply, .. } = event {
            drop(reply);
        }
    }

    let (records, summary) = handle.join().await.unwrap();

    assert_eq!(records, sample_playlist());
    assert_eq!(summary.updated, 0);
    assert_eq!(summary.rejected, 2);
}
