use std::path::PathBuf;

/// One raw result returned by the catalog for a single query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateMatch {
    pub track_name: String,
    pub artist_name: String,
    pub collection_name: String,
    pub primary_genre_name: String,
    pub release_date: String, // ISO 8601, e.g. "1965-08-06T07:00:00Z"
    pub artwork_url: String,  // already upgraded to 600x600
    pub preview_url: String,
}

impl CandidateMatch {
    pub fn new(track_name: &str, artist_name: &str) -> Self {
        Self {
            track_name: track_name.to_string(),
            artist_name: artist_name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_collection(mut self, collection_name: &str) -> Self {
        self.collection_name = collection_name.to_string();
        self
    }

    pub fn with_genre(mut self, genre: &str) -> Self {
        self.primary_genre_name = genre.to_string();
        self
    }

    pub fn with_release_date(mut self, release_date: &str) -> Self {
        self.release_date = release_date.to_string();
        self
    }

    pub fn with_artwork_url(mut self, artwork_url: &str) -> Self {
        self.artwork_url = artwork_url.to_string();
        self
    }
}

/// Best-guess metadata for a (title, artist) query.
///
/// album, genre and year are never empty: missing values carry the
/// placeholders from [`crate::models::track`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInfo {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub year: String,
    pub artwork_url: String,
    pub preview_url: String,
    pub artwork_path: Option<PathBuf>,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(ResolvedInfo),
    NotFound,
}

impl Resolution {
    pub fn found(&self) -> Option<&ResolvedInfo> {
        match self {
            Resolution::Found(info) => Some(info),
            Resolution::NotFound => None,
        }
    }

    pub fn into_found(self) -> Option<ResolvedInfo> {
        match self {
            Resolution::Found(info) => Some(info),
            Resolution::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }
}
