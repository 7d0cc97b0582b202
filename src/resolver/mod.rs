//! Metadata resolution: turn a (title, artist) pair into a best-guess
//! complete record by querying the catalog with a fixed ladder of query
//! strategies and scoring every candidate.

pub mod catalog;
pub mod normalize;
pub mod scorer;
pub mod transport;

use crate::artwork::ArtworkCache;
use crate::models::{CandidateMatch, Resolution, ResolvedInfo, UNKNOWN, UNKNOWN_YEAR};

pub use catalog::{CatalogClient, CatalogError};
pub use normalize::normalize;
pub use scorer::{MatchScorer, ScoreWeights};
pub use transport::{HttpTransport, ReqwestTransport, TransportError};

/// Thresholds and limits for [`ResolutionEngine`].
///
/// The defaults are empirical; 80 roughly means "title and artist both
/// matched", 30 means "one field plausibly matched".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    pub confident_score: u32,
    pub accept_score: u32,
    pub result_limit: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            confident_score: 80,
            accept_score: 30,
            result_limit: 10,
        }
    }
}

/// One way of turning title/artist into a query string. Tried in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    ArtistTitleNormalized,
    TitleArtistNormalized,
    ArtistTitleRaw,
    TitleArtistRaw,
    TitleNormalized,
    TitleRaw,
}

impl Strategy {
    pub const ORDER: [Strategy; 6] = [
        Strategy::ArtistTitleNormalized,
        Strategy::TitleArtistNormalized,
        Strategy::ArtistTitleRaw,
        Strategy::TitleArtistRaw,
        Strategy::TitleNormalized,
        Strategy::TitleRaw,
    ];

    pub fn query(&self, title: &str, artist: &str) -> String {
        let (title, artist) = match self {
            Strategy::ArtistTitleNormalized
            | Strategy::TitleArtistNormalized
            | Strategy::TitleNormalized => (normalize(title), normalize(artist)),
            _ => (title.trim().to_string(), artist.trim().to_string()),
        };

        let parts = match self {
            Strategy::ArtistTitleNormalized | Strategy::ArtistTitleRaw => [artist, title],
            Strategy::TitleArtistNormalized | Strategy::TitleArtistRaw => [title, artist],
            Strategy::TitleNormalized | Strategy::TitleRaw => [title, String::new()],
        };

        parts
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub struct ResolutionEngine<T> {
    catalog: CatalogClient<T>,
    artwork: Option<ArtworkCache<T>>,
    scorer: MatchScorer,
    config: ResolverConfig,
}

impl<T: HttpTransport> ResolutionEngine<T> {
    pub fn new(catalog: CatalogClient<T>) -> Self {
        Self {
            catalog,
            artwork: None,
            scorer: MatchScorer::default(),
            config: ResolverConfig::default(),
        }
    }

    pub fn with_artwork(mut self, artwork: ArtworkCache<T>) -> Self {
        self.artwork = Some(artwork);
        self
    }

    pub fn with_scorer(mut self, scorer: MatchScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(&self) -> &CatalogClient<T> {
        &self.catalog
    }

    pub fn artwork(&self) -> Option<&ArtworkCache<T>> {
        self.artwork.as_ref()
    }

    /// Resolve a title/artist pair against the catalog.
    ///
    /// Strategies run strictly in order and each issues one search. Scanning
    /// stops early once a candidate reaches the confident score; the best
    /// candidate overall (earliest wins ties) is accepted if it reaches the
    /// accept score.
    pub async fn resolve(&self, title: &str, artist: &str) -> Resolution {
        let mut best: Option<(CandidateMatch, u32)> = None;

        for strategy in Strategy::ORDER {
            let query = strategy.query(title, artist);
            if query.trim().is_empty() {
                continue;
            }

            let candidates = self.catalog.search(&query, self.config.result_limit).await;
            for candidate in candidates {
                let score = self.scorer.score(title, artist, &candidate);
                tracing::debug!(
                    "{:?}: '{}' by '{}' scored {}",
                    strategy,
                    candidate.track_name,
                    candidate.artist_name,
                    score
                );

                let confident = score >= self.config.confident_score;
                if best.as_ref().map_or(true, |(_, best_score)| score > *best_score) {
                    best = Some((candidate, score));
                }
                if confident {
                    break;
                }
            }

            if best
                .as_ref()
                .is_some_and(|(_, score)| *score >= self.config.confident_score)
            {
                break;
            }
        }

        match best {
            Some((candidate, score)) if score >= self.config.accept_score => {
                tracing::info!(
                    "Resolved '{}' by '{}' to '{}' on '{}' (score {})",
                    title,
                    artist,
                    candidate.track_name,
                    candidate.collection_name,
                    score
                );
                Resolution::Found(self.build_info(title, artist, candidate, score).await)
            }
            Some((_, score)) => {
                tracing::info!(
                    "No confident match for '{}' by '{}' (best score {})",
                    title,
                    artist,
                    score
                );
                Resolution::NotFound
            }
            None => {
                tracing::info!("No catalog results for '{}' by '{}'", title, artist);
                Resolution::NotFound
            }
        }
    }

    async fn build_info(
        &self,
        title: &str,
        artist: &str,
        candidate: CandidateMatch,
        score: u32,
    ) -> ResolvedInfo {
        let mut info = ResolvedInfo {
            title: or_fallback(candidate.track_name, title),
            artist: or_fallback(candidate.artist_name, artist),
            album: or_fallback(candidate.collection_name, UNKNOWN),
            genre: or_fallback(candidate.primary_genre_name, UNKNOWN),
            year: release_year(&candidate.release_date),
            artwork_url: candidate.artwork_url,
            preview_url: candidate.preview_url,
            artwork_path: None,
            score,
        };

        if !info.artwork_url.is_empty() {
            if let Some(artwork) = &self.artwork {
                info.artwork_path = artwork.fetch_and_store(&info.artwork_url, &info.album).await;
            }
        }

        info
    }
}

/// Year token from an ISO release date: the first four characters before any
/// `-`, or the unknown-year placeholder.
pub fn release_year(release_date: &str) -> String {
    let head = release_date.trim().split('-').next().unwrap_or_default();
    let year: String = head.chars().take(4).collect();
    if year.is_empty() {
        UNKNOWN_YEAR.to_string()
    } else {
        year
    }
}

fn or_fallback(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        if fallback.trim().is_empty() {
            UNKNOWN.to_string()
        } else {
            fallback.to_string()
        }
    } else {
        value
    }
}
