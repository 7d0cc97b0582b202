use std::collections::HashSet;

use crate::models::{FieldSelector, TrackRecord, UNKNOWN, UNKNOWN_YEAR};
use crate::resolver::normalize::fold;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStats {
    pub total: usize,
    pub unique_artists: usize,
    pub unique_genres: usize,
}

/// Records whose title contains `term`, case-insensitively.
pub fn search_title<'a>(records: &'a [TrackRecord], term: &str) -> Vec<&'a TrackRecord> {
    let term = term.trim().to_lowercase();
    records
        .iter()
        .filter(|r| r.title.to_lowercase().contains(&term))
        .collect()
}

/// Index of the first record whose title equals `title`, case-insensitively.
pub fn find_by_title(records: &[TrackRecord], title: &str) -> Option<usize> {
    let title = title.trim().to_lowercase();
    records.iter().position(|r| r.title.to_lowercase() == title)
}

/// Free-text filter over title, artist, album and genre.
pub fn filter_text<'a>(records: &'a [TrackRecord], term: &str) -> Vec<&'a TrackRecord> {
    let term = term.trim().to_lowercase();
    records
        .iter()
        .filter(|r| {
            [
                FieldSelector::Title,
                FieldSelector::Artist,
                FieldSelector::Album,
                FieldSelector::Genre,
            ]
            .iter()
            .any(|s| r.field(*s).to_lowercase().contains(&term))
        })
        .collect()
}

/// Records whose `field` contains `value`, ignoring case and accents.
/// A value with nothing left after folding matches no record.
pub fn report<'a>(
    records: &'a [TrackRecord],
    field: FieldSelector,
    value: &str,
) -> Vec<&'a TrackRecord> {
    let needle = fold(value);
    if needle.is_empty() {
        return Vec::new();
    }
    records
        .iter()
        .filter(|r| fold(r.field(field)).contains(&needle))
        .collect()
}

pub fn stats(records: &[TrackRecord]) -> CatalogStats {
    let artists: HashSet<&str> = records.iter().map(|r| r.artist.as_str()).collect();
    let genres: HashSet<&str> = records.iter().map(|r| r.genre.as_str()).collect();

    CatalogStats {
        total: records.len(),
        unique_artists: artists.len(),
        unique_genres: genres.len(),
    }
}

/// A record worth resolving: it has a title and artist but is missing album,
/// genre or year.
pub fn is_incomplete(record: &TrackRecord) -> bool {
    if record.title.trim().is_empty() || record.artist.trim().is_empty() {
        return false;
    }

    let missing = |value: &str, placeholders: &[&str]| {
        let value = value.trim();
        value.is_empty() || placeholders.contains(&value)
    };

    missing(&record.album, &[UNKNOWN, UNKNOWN_YEAR])
        || missing(&record.year, &[UNKNOWN_YEAR])
        || missing(&record.genre, &[UNKNOWN])
}

/// Indices of incomplete records, in catalog order.
pub fn incomplete(records: &[TrackRecord]) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| is_incomplete(r))
        .map(|(i, _)| i)
        .collect()
}
