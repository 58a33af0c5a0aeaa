use super::CatalogError;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

pub type SongId = i64;

/// One managed song: a metadata row plus its stored file, addressed by
/// `file_name` directly under the content store root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongEntry {
    pub id: SongId,
    pub file_name: String,
    pub artist: Option<String>,
    pub song_name: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub tags: Vec<String>,
}

impl SongEntry {
    /// Case-sensitive extension suffix match, e.g. format "mp3" matches
    /// "track.mp3" but not "track.MP3" or "track_mp3".
    pub fn has_format(&self, format: &str) -> bool {
        let format = format.trim_start_matches('.');
        if format.is_empty() {
            return false;
        }
        self.file_name.ends_with(&format!(".{}", format))
    }
}

impl fmt::Display for SongEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} - {} ({}) file={} tags=[{}]",
            self.id,
            self.artist.as_deref().unwrap_or("<unknown artist>"),
            self.song_name.as_deref().unwrap_or("<untitled>"),
            self.release_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "unknown date".to_string()),
            self.file_name,
            self.tags.join(", "),
        )
    }
}

/// Metadata for a song about to be inserted; the id is generated by the
/// store on insert.
#[derive(Debug, Clone, Default)]
pub struct NewSong {
    pub file_name: String,
    pub artist: Option<String>,
    pub song_name: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub tags: Vec<String>,
}

/// The fixed enumeration of updatable catalog fields. Caller-supplied field
/// names are resolved against this list and never placed into SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SongField {
    Artist,
    SongName,
    ReleaseDate,
    Tags,
}

impl SongField {
    pub const ALL: &'static [SongField] = &[
        SongField::Artist,
        SongField::SongName,
        SongField::ReleaseDate,
        SongField::Tags,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SongField::Artist => "artist",
            SongField::SongName => "song_name",
            SongField::ReleaseDate => "release_date",
            SongField::Tags => "tags",
        }
    }
}

impl FromStr for SongField {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "artist" => Ok(SongField::Artist),
            "song_name" => Ok(SongField::SongName),
            "release_date" => Ok(SongField::ReleaseDate),
            "tags" => Ok(SongField::Tags),
            other => Err(CatalogError::UnknownField(other.to_string())),
        }
    }
}

/// A validated single-field update: the field resolved against the
/// allow-list and the new value already parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Artist(Option<String>),
    SongName(Option<String>),
    ReleaseDate(Option<NaiveDate>),
    Tags(Vec<String>),
}

impl FieldUpdate {
    /// Parses a raw (field name, value) pair. An empty value clears the
    /// field. Fails without side effects on unknown field names or
    /// malformed dates.
    pub fn parse(field: &str, value: &str) -> Result<Self, CatalogError> {
        let update = match SongField::from_str(field)? {
            SongField::Artist => FieldUpdate::Artist(non_empty(value)),
            SongField::SongName => FieldUpdate::SongName(non_empty(value)),
            SongField::ReleaseDate => FieldUpdate::ReleaseDate(match non_empty(value) {
                Some(raw) => Some(parse_release_date(&raw)?),
                None => None,
            }),
            SongField::Tags => FieldUpdate::Tags(parse_tags(value)),
        };
        Ok(update)
    }

    pub fn field(&self) -> SongField {
        match self {
            FieldUpdate::Artist(_) => SongField::Artist,
            FieldUpdate::SongName(_) => SongField::SongName,
            FieldUpdate::ReleaseDate(_) => SongField::ReleaseDate,
            FieldUpdate::Tags(_) => SongField::Tags,
        }
    }
}

pub fn parse_song_id(raw: &str) -> Result<SongId, CatalogError> {
    raw.trim()
        .parse::<SongId>()
        .map_err(|_| CatalogError::InvalidId(raw.to_string()))
}

pub fn parse_release_date(raw: &str) -> Result<NaiveDate, CatalogError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| CatalogError::InvalidReleaseDate(raw.to_string()))
}

/// Splits a comma separated tag list, keeping duplicates and order.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
