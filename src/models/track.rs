use super::ResolvedInfo;

/// Placeholder for an unknown album, genre, title or artist.
pub const UNKNOWN: &str = "Unknown";
/// Placeholder for an unknown release year.
pub const UNKNOWN_YEAR: &str = "----";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackRecord {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub year: String,
}

impl TrackRecord {
    /// Build a record from user input. Blank fields are replaced by placeholders.
    pub fn new(title: &str, artist: &str, album: &str, genre: &str, year: &str) -> Self {
        Self {
            title: title.trim().to_string(),
            artist: artist.trim().to_string(),
            album: album.trim().to_string(),
            genre: genre.trim().to_string(),
            year: year.trim().to_string(),
        }
        .with_placeholders()
    }

    pub fn with_placeholders(mut self) -> Self {
        for selector in [
            FieldSelector::Title,
            FieldSelector::Artist,
            FieldSelector::Album,
            FieldSelector::Genre,
        ] {
            let value = self.field_mut(selector);
            if value.trim().is_empty() {
                *value = UNKNOWN.to_string();
            }
        }
        if self.year.trim().is_empty() {
            self.year = UNKNOWN_YEAR.to_string();
        }
        self
    }

    pub fn field(&self, selector: FieldSelector) -> &str {
        match selector {
            FieldSelector::Title => &self.title,
            FieldSelector::Artist => &self.artist,
            FieldSelector::Album => &self.album,
            FieldSelector::Genre => &self.genre,
            FieldSelector::Year => &self.year,
        }
    }

    pub fn field_mut(&mut self, selector: FieldSelector) -> &mut String {
        match selector {
            FieldSelector::Title => &mut self.title,
            FieldSelector::Artist => &mut self.artist,
            FieldSelector::Album => &mut self.album,
            FieldSelector::Genre => &mut self.genre,
            FieldSelector::Year => &mut self.year,
        }
    }

    /// Merge the catalog-derived fields of a resolution into this record.
    ///
    /// Title and artist stay as the user typed them; only album, genre and
    /// year are replaced. Returns true when the album changed, in which case
    /// any thumbnail keyed by the old album is stale.
    pub fn apply_resolution(&mut self, resolved: &ResolvedInfo) -> bool {
        let album_changed = self.album != resolved.album;
        self.album = resolved.album.clone();
        self.genre = resolved.genre.clone();
        self.year = resolved.year.clone();
        album_changed
    }
}

/// Generic address of one of the five record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldSelector {
    Title,
    Artist,
    Album,
    Genre,
    Year,
}

impl FieldSelector {
    pub const ALL: [FieldSelector; 5] = [
        FieldSelector::Title,
        FieldSelector::Artist,
        FieldSelector::Album,
        FieldSelector::Genre,
        FieldSelector::Year,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldSelector::Title => "title",
            FieldSelector::Artist => "artist",
            FieldSelector::Album => "album",
            FieldSelector::Genre => "genre",
            FieldSelector::Year => "year",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|selector| selector.as_str().eq_ignore_ascii_case(name.trim()))
    }
}
