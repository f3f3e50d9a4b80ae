//! The scrolling strip: list snapshot, per-entry assets, refresh scheduling
//! and the per-frame renderer.

pub mod assets;
pub mod clock;
pub mod refresh;
pub mod renderer;

pub use assets::AssetCache;
pub use clock::ScrollClock;
pub use refresh::RefreshController;
pub use renderer::FrameStats;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::entry::Entry;
use crate::gfx::GraphicsContext;
use crate::settings::Settings;
use crate::source::ListSource;
use crate::text::TextRasterizer;

/// State shared between the render thread and the fetch worker.
/// `entries` and `assets` always have the same length.
#[derive(Debug, Default)]
pub struct SharedState {
    pub entries: Vec<Entry>,
    pub assets: AssetCache,
    pub last_fetch: Option<Instant>,
    /// Bumped on every snapshot swap
    pub generation: u64,
}

impl SharedState {
    /// Replace the list and start a fresh slot table for it
    pub fn install_snapshot(&mut self, entries: Vec<Entry>, fetched_at: Instant) {
        self.assets.reset(entries.len());
        self.entries = entries;
        self.last_fetch = Some(fetched_at);
        self.generation += 1;
    }
}

/// A panicking worker must not take the strip down with it
pub(crate) fn lock(shared: &Mutex<SharedState>) -> MutexGuard<'_, SharedState> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Point-in-time summary for status lines
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollerStatus {
    pub entries: usize,
    pub fetching: bool,
    pub last_fetch: Option<Instant>,
    pub offset: f32,
    /// First and last index on screen as of the last frame
    pub visible: Option<(usize, usize)>,
    pub generation: u64,
}

/// Owns everything the strip needs between frames
pub struct Scroller {
    settings: Settings,
    shared: Arc<Mutex<SharedState>>,
    refresh: RefreshController,
    clock: ScrollClock,
    rasterizer: Box<dyn TextRasterizer>,
    viewport_width: f32,
    warned_missing_username: bool,
}

impl Scroller {
    /// Build the strip and start the first fetch when a username is set
    pub fn new(
        source: Arc<dyn ListSource>,
        rasterizer: Box<dyn TextRasterizer>,
        settings: Settings,
    ) -> Self {
        let shared = Arc::new(Mutex::new(SharedState::default()));
        let mut scroller = Self {
            settings: Settings::default(),
            refresh: RefreshController::new(source, Arc::clone(&shared)),
            shared,
            clock: ScrollClock::default(),
            rasterizer,
            viewport_width: 0.0,
            warned_missing_username: false,
        };
        scroller.update_settings(settings);
        scroller
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Apply new settings.
    ///
    /// Text textures are rebuilt when anything about their look changed;
    /// covers are kept. Every update also asks for a refresh so filter
    /// changes show up without waiting for the next interval.
    pub fn update_settings(&mut self, settings: Settings) {
        let settings = settings.validated();
        if settings.text_style() != self.settings.text_style() {
            log::debug!("Text style changed, re-rasterizing titles and badges");
            lock(&self.shared).assets.invalidate_text();
        }
        self.settings = settings;
        self.request_refresh();
    }

    /// Start a fetch now unless one is running
    pub fn request_refresh(&mut self) -> bool {
        match self.settings.fetch_query() {
            Some(query) => {
                self.warned_missing_username = false;
                self.refresh.request_refresh(query)
            }
            None => {
                if !self.warned_missing_username {
                    log::warn!("No MyAnimeList username configured, nothing to fetch");
                    self.warned_missing_username = true;
                }
                false
            }
        }
    }

    /// Periodic refresh check; call once per frame or timer tick
    pub fn tick(&mut self, now: Instant) {
        if self.settings.fetch_query().is_some()
            && self.refresh.is_due(now, self.settings.refresh_interval)
        {
            self.request_refresh();
        }
    }

    /// Draw one frame. Render thread only.
    pub fn render(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        elapsed: f32,
        viewport_width: f32,
    ) -> FrameStats {
        self.viewport_width = viewport_width;
        let mut state = lock(&self.shared);
        let stats = renderer::render_frame(
            &mut state,
            &mut self.clock,
            &self.settings,
            ctx,
            self.rasterizer.as_ref(),
            elapsed,
            viewport_width,
        );
        if stats.released > 0 || stats.cover_loads > 0 {
            log::debug!(
                "Frame: {} drawn, {} cover loads, {} handles released",
                stats.drawn,
                stats.cover_loads,
                stats.released
            );
        }
        stats
    }

    /// Block until the in-flight fetch, if any, has installed its snapshot
    pub fn wait_for_refresh(&mut self) {
        self.refresh.join();
    }

    pub fn status(&self) -> ScrollerStatus {
        let state = lock(&self.shared);
        // The snapshot may have been swapped since the last frame
        let mut clock = self.clock.clone();
        clock.configure(
            self.settings.scroll_speed,
            self.settings.item_span(),
            state.entries.len(),
        );
        ScrollerStatus {
            entries: state.entries.len(),
            fetching: self.refresh.is_fetching(),
            last_fetch: state.last_fetch,
            offset: clock.offset(),
            visible: clock.visible_window(self.viewport_width),
            generation: state.generation,
        }
    }

    /// Stop the worker and destroy every handle. Render thread only.
    pub fn shutdown(&mut self, ctx: &mut dyn GraphicsContext) {
        self.refresh.join();
        let released = lock(&self.shared).assets.release_all(ctx);
        log::info!("Scroller shut down, released {} graphics handles", released);
    }
}
