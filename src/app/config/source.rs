use serde::{Deserialize, Serialize};

use crate::entry::{MediaFilter, StatusFilter};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SourceConfig {
    /// MyAnimeList username whose public list is shown
    #[serde(default)]
    pub username: String,
    /// READING/WATCHING, COMPLETED, PAUSED, DROPPED, PLANNING or ALL
    #[serde(default)]
    pub status: StatusFilter,
    /// manga, anime or both
    #[serde(default)]
    pub media: MediaFilter,
    /// Seconds between list refreshes (60-3600)
    #[serde(default = "SourceConfig::default_refresh_interval")]
    pub refresh_interval: u64,
}

impl SourceConfig {
    fn default_refresh_interval() -> u64 {
        300
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            status: StatusFilter::default(),
            media: MediaFilter::default(),
            refresh_interval: Self::default_refresh_interval(),
        }
    }
}
