//! Background list fetching.
//!
//! At most one fetch runs at a time. The worker thread only ever sees the
//! list source and the shared state; graphics handles it invalidates are
//! queued for the render thread instead of being destroyed in place.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::SharedState;
use crate::entry::{Entry, Status};
use crate::settings::FetchQuery;
use crate::source::ListSource;

/// Clears the in-flight flag when the worker ends, panics included
struct FetchingGuard(Arc<AtomicBool>);

impl Drop for FetchingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Run every sub-fetch `query` implies and concatenate the results.
///
/// Failed sub-fetches are logged and contribute nothing, so a partial
/// outage still yields whatever the other requests returned.
pub fn collect_entries(source: &dyn ListSource, query: &FetchQuery) -> Vec<Entry> {
    let statuses: Vec<Status> = match query.status.status() {
        Some(status) => vec![status],
        None => Status::ALL.to_vec(),
    };

    let mut entries = Vec::new();
    for status in statuses {
        for &kind in query.media.kinds() {
            let status = status.for_kind(kind);
            match source.fetch(&query.username, status, kind) {
                Ok(fetched) => entries.extend(fetched.into_iter().map(|mut entry| {
                    entry.status = entry.status.for_kind(entry.media);
                    entry
                })),
                Err(e) => log::error!(
                    "Failed to fetch {} list ({}) for {}: {}",
                    kind,
                    status,
                    query.username,
                    e
                ),
            }
        }
    }
    entries
}

/// Schedules list fetches on a worker thread and swaps finished snapshots in
pub struct RefreshController {
    source: Arc<dyn ListSource>,
    shared: Arc<Mutex<SharedState>>,
    fetching: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl RefreshController {
    pub fn new(source: Arc<dyn ListSource>, shared: Arc<Mutex<SharedState>>) -> Self {
        Self {
            source,
            shared,
            fetching: Arc::new(AtomicBool::new(false)),
            task: None,
        }
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching.load(Ordering::Acquire)
    }

    /// True when no fetch is running and none has finished within `interval`
    pub fn is_due(&self, now: Instant, interval: Duration) -> bool {
        if self.is_fetching() {
            return false;
        }
        match super::lock(&self.shared).last_fetch {
            Some(last) => now.saturating_duration_since(last) > interval,
            None => true,
        }
    }

    /// Start a fetch for `query` unless one is already in flight.
    ///
    /// Returns whether a fetch was started; a request made while another is
    /// running is dropped, not queued.
    pub fn request_refresh(&mut self, query: FetchQuery) -> bool {
        if self.fetching.swap(true, Ordering::AcqRel) {
            log::debug!("Refresh already in flight, ignoring request");
            return false;
        }

        // The previous worker cleared the flag on its way out
        self.join();

        let source = Arc::clone(&self.source);
        let shared = Arc::clone(&self.shared);
        let guard = FetchingGuard(Arc::clone(&self.fetching));

        log::info!(
            "Refreshing list for {} (status: {}, media: {})",
            query.username,
            query.status,
            query.media
        );

        let spawned = thread::Builder::new()
            .name("malscroll-fetch".to_string())
            .spawn(move || {
                let _guard = guard;
                let started = Instant::now();
                let entries = collect_entries(source.as_ref(), &query);
                let count = entries.len();

                super::lock(&shared).install_snapshot(entries, Instant::now());

                log::info!(
                    "Loaded {} entries in {:.2}s",
                    count,
                    started.elapsed().as_secs_f32()
                );
            });

        match spawned {
            Ok(handle) => {
                self.task = Some(handle);
                true
            }
            Err(e) => {
                // The guard moved into the failed closure has already reset the flag
                log::error!("Failed to start fetch worker: {}", e);
                false
            }
        }
    }

    /// Wait for the current fetch, if any, to finish
    pub fn join(&mut self) {
        if let Some(handle) = self.task.take() {
            if handle.join().is_err() {
                log::error!("Fetch worker panicked");
            }
        }
    }
}

impl Drop for RefreshController {
    fn drop(&mut self) {
        self.join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{MediaFilter, MediaKind, StatusFilter};
    use crate::source::SourceError;
    use std::sync::mpsc;

    #[derive(Default)]
    struct FakeSource {
        calls: Mutex<Vec<(Status, MediaKind)>>,
        failing: Vec<(Status, MediaKind)>,
    }

    impl ListSource for FakeSource {
        fn fetch(
            &self,
            _username: &str,
            status: Status,
            kind: MediaKind,
        ) -> Result<Vec<Entry>, SourceError> {
            self.calls.lock().unwrap().push((status, kind));
            if self.failing.contains(&(status, kind)) {
                return Err(SourceError::MissingDataItems("fake".to_string()));
            }
            Ok(vec![Entry {
                id: format!("{}-{}", kind, status),
                title: format!("{} {}", kind, status),
                cover_url: String::new(),
                status,
                progress: 0,
                media: kind,
            }])
        }
    }

    fn query(status: StatusFilter, media: MediaFilter) -> FetchQuery {
        FetchQuery {
            username: "someone".to_string(),
            status,
            media,
        }
    }

    #[test]
    fn test_all_statuses_both_kinds_order() {
        let source = FakeSource::default();
        let entries = collect_entries(&source, &query(StatusFilter::All, MediaFilter::Both));

        let calls = source.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                (Status::Reading, MediaKind::Manga),
                (Status::Watching, MediaKind::Anime),
                (Status::Completed, MediaKind::Manga),
                (Status::Completed, MediaKind::Anime),
                (Status::Paused, MediaKind::Manga),
                (Status::Paused, MediaKind::Anime),
                (Status::Dropped, MediaKind::Manga),
                (Status::Dropped, MediaKind::Anime),
                (Status::Planning, MediaKind::Manga),
                (Status::Planning, MediaKind::Anime),
            ]
        );
        assert_eq!(entries.len(), 10);
    }

    #[test]
    fn test_in_progress_is_aliased_per_kind() {
        let source = FakeSource::default();
        collect_entries(&source, &query(StatusFilter::InProgress, MediaFilter::Anime));
        assert_eq!(
            *source.calls.lock().unwrap(),
            vec![(Status::Watching, MediaKind::Anime)]
        );
    }

    #[test]
    fn test_partial_failure_keeps_other_results() {
        let source = FakeSource {
            failing: vec![(Status::Reading, MediaKind::Manga)],
            ..FakeSource::default()
        };
        let entries =
            collect_entries(&source, &query(StatusFilter::InProgress, MediaFilter::Both));

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].media, MediaKind::Anime);
        assert_eq!(entries[0].status, Status::Watching);
    }

    #[test]
    fn test_refresh_installs_snapshot() {
        let shared = Arc::new(Mutex::new(SharedState::default()));
        let mut controller =
            RefreshController::new(Arc::new(FakeSource::default()), Arc::clone(&shared));
        let now = Instant::now();
        assert!(controller.is_due(now, Duration::from_secs(300)));

        assert!(controller.request_refresh(query(StatusFilter::Completed, MediaFilter::Both)));
        controller.join();

        let state = shared.lock().unwrap();
        assert_eq!(state.entries.len(), 2);
        assert_eq!(state.assets.len(), 2);
        assert!(state.last_fetch.is_some());
        drop(state);
        assert!(!controller.is_fetching());
        assert!(!controller.is_due(Instant::now(), Duration::from_secs(300)));
    }

    struct GatedSource {
        gate: Mutex<mpsc::Receiver<()>>,
    }

    impl ListSource for GatedSource {
        fn fetch(&self, _: &str, _: Status, _: MediaKind) -> Result<Vec<Entry>, SourceError> {
            let _ = self.gate.lock().unwrap().recv();
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_request_while_in_flight_is_dropped() {
        let (open, gate) = mpsc::channel();
        let shared = Arc::new(Mutex::new(SharedState::default()));
        let mut controller = RefreshController::new(
            Arc::new(GatedSource {
                gate: Mutex::new(gate),
            }),
            shared,
        );
        let q = query(StatusFilter::Completed, MediaFilter::Manga);

        assert!(controller.request_refresh(q.clone()));
        assert!(controller.is_fetching());
        assert!(!controller.request_refresh(q.clone()));
        assert!(!controller.is_due(Instant::now(), Duration::ZERO));

        open.send(()).unwrap();
        controller.join();
        assert!(!controller.is_fetching());

        open.send(()).unwrap();
        assert!(controller.request_refresh(q));
        controller.join();
    }

    #[test]
    fn test_failed_fetch_installs_empty_snapshot() {
        let source = FakeSource {
            failing: vec![(Status::Reading, MediaKind::Manga)],
            ..FakeSource::default()
        };
        let shared = Arc::new(Mutex::new(SharedState::default()));
        shared.lock().unwrap().install_snapshot(
            vec![Entry {
                id: "old".to_string(),
                title: "Old".to_string(),
                cover_url: String::new(),
                status: Status::Reading,
                progress: 0,
                media: MediaKind::Manga,
            }],
            Instant::now(),
        );
        let mut controller = RefreshController::new(Arc::new(source), Arc::clone(&shared));

        controller.request_refresh(query(StatusFilter::InProgress, MediaFilter::Manga));
        controller.join();

        let state = shared.lock().unwrap();
        assert!(state.entries.is_empty());
        assert!(state.assets.is_empty());
    }
}
