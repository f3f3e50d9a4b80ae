use serde::{Deserialize, Serialize};
use std::fmt;

/// Which list a record comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Anime,
    Manga,
}

impl MediaKind {
    /// Path segment used by the remote list ("anime" / "manga")
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Anime => "anime",
            MediaKind::Manga => "manga",
        }
    }

    /// Tag shown in front of the status badge when both kinds are mixed
    pub fn tag(self) -> &'static str {
        match self {
            MediaKind::Anime => "ANIME",
            MediaKind::Manga => "MANGA",
        }
    }

    /// The in-progress status name the remote list uses for this kind
    pub fn in_progress(self) -> Status {
        match self {
            MediaKind::Anime => Status::Watching,
            MediaKind::Manga => Status::Reading,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// List status of a single entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Reading,
    Watching,
    Completed,
    Paused,
    Dropped,
    Planning,
}

impl Status {
    /// Order used when every status is requested. The in-progress slot is
    /// listed as `Watching` and aliased per media kind before fetching.
    pub const ALL: [Status; 5] = [
        Status::Watching,
        Status::Completed,
        Status::Paused,
        Status::Dropped,
        Status::Planning,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Status::Reading => "READING",
            Status::Watching => "WATCHING",
            Status::Completed => "COMPLETED",
            Status::Paused => "PAUSED",
            Status::Dropped => "DROPPED",
            Status::Planning => "PLANNING",
        }
    }

    pub fn is_in_progress(self) -> bool {
        matches!(self, Status::Reading | Status::Watching)
    }

    /// Translate READING <-> WATCHING to whatever is canonical for `kind`.
    /// Every other status is left alone.
    pub fn for_kind(self, kind: MediaKind) -> Status {
        if self.is_in_progress() {
            kind.in_progress()
        } else {
            self
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One list record, immutable once produced by a [`crate::source::ListSource`]
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: String,
    pub title: String,
    pub cover_url: String,
    pub status: Status,
    pub progress: u32,
    pub media: MediaKind,
}

/// Status filter chosen in the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum StatusFilter {
    #[default]
    #[serde(rename = "READING", alias = "WATCHING")]
    InProgress,
    #[serde(rename = "COMPLETED")]
    Completed,
    #[serde(rename = "PAUSED")]
    Paused,
    #[serde(rename = "DROPPED")]
    Dropped,
    #[serde(rename = "PLANNING")]
    Planning,
    #[serde(rename = "ALL")]
    All,
}

impl StatusFilter {
    /// Concrete status for a single-status filter, `None` for [`StatusFilter::All`]
    pub fn status(self) -> Option<Status> {
        match self {
            StatusFilter::InProgress => Some(Status::Reading),
            StatusFilter::Completed => Some(Status::Completed),
            StatusFilter::Paused => Some(Status::Paused),
            StatusFilter::Dropped => Some(Status::Dropped),
            StatusFilter::Planning => Some(Status::Planning),
            StatusFilter::All => None,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status() {
            Some(status) => f.write_str(status.label()),
            None => f.write_str("ALL"),
        }
    }
}

/// Media kinds chosen in the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaFilter {
    Anime,
    #[default]
    Manga,
    Both,
}

impl MediaFilter {
    /// Kinds to fetch, in the order their results are concatenated
    pub fn kinds(self) -> &'static [MediaKind] {
        match self {
            MediaFilter::Anime => &[MediaKind::Anime],
            MediaFilter::Manga => &[MediaKind::Manga],
            MediaFilter::Both => &[MediaKind::Manga, MediaKind::Anime],
        }
    }
}

impl fmt::Display for MediaFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaFilter::Anime => f.write_str("anime"),
            MediaFilter::Manga => f.write_str("manga"),
            MediaFilter::Both => f.write_str("both"),
        }
    }
}
