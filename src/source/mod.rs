pub mod mal;

pub use mal::MalListSource;

use crate::entry::{Entry, MediaKind, Status};

/// Errors a list source can hit while producing entries
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} answered {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("no data-items attribute in {0} (is the list public?)")]
    MissingDataItems(String),
    #[error("could not parse list data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Produces one page of list entries for a user, status and media kind.
///
/// Called from the background fetch worker, never from the render thread.
pub trait ListSource: Send + Sync {
    fn fetch(
        &self,
        username: &str,
        status: Status,
        kind: MediaKind,
    ) -> Result<Vec<Entry>, SourceError>;
}
