//! Headless rendering straight to a PNG file.

use std::path::Path;
use std::time::{Duration, Instant};

use super::{App, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::gfx::{CanvasContext, Rgba};
use crate::scroller::Scroller;

/// Longest wait for the first list before rendering whatever is there
const FETCH_TIMEOUT: Duration = Duration::from_secs(90);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Wait until the in-flight fetch finishes or `timeout` passes.
/// Returns whether the fetch finished.
fn wait_for_fetch(scroller: &Scroller, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while scroller.status().fetching {
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(POLL_INTERVAL);
    }
    true
}

/// Render `frames` frames of simulated time and write the last one to `path`.
///
/// The first frame is drawn at scroll offset zero; every later frame advances
/// by one frame interval. Covers load one per frame, so more frames show more
/// artwork.
pub fn render_snapshot(
    scroller: &mut Scroller,
    canvas: &mut CanvasContext,
    frames: u32,
    frame_interval: Duration,
) -> usize {
    let step = frame_interval.as_secs_f32();
    let viewport_width = canvas.width() as f32;
    let mut drawn = 0;
    for frame in 0..frames.max(1) {
        canvas.clear(Rgba::TRANSPARENT);
        let elapsed = if frame == 0 { 0.0 } else { step };
        drawn = scroller.render(canvas, elapsed, viewport_width).drawn;
    }
    drawn
}

impl App {
    /// Blocking; call under `block_in_place` from async code
    pub fn run_snapshot(mut self, path: &Path, frames: u32) -> color_eyre::Result<()> {
        if !wait_for_fetch(&self.scroller, FETCH_TIMEOUT) {
            log::warn!(
                "List still loading after {}s, rendering without it",
                FETCH_TIMEOUT.as_secs()
            );
        }

        let status = self.scroller.status();
        if status.entries == 0 {
            log::warn!("No entries to show; the snapshot will be empty");
        }

        let mut canvas = CanvasContext::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        let drawn = render_snapshot(
            &mut self.scroller,
            &mut canvas,
            frames,
            self.config.preview.frame_interval(),
        );

        let result = canvas.snapshot().save(path);
        self.scroller.shutdown(&mut canvas);
        result?;

        log::info!(
            "Wrote {} ({} entries, {} drawn in last frame)",
            path.display(),
            status.entries,
            drawn
        );
        println!("Saved snapshot to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{Entry, MediaKind, Status};
    use crate::settings::Settings;
    use crate::source::{ListSource, SourceError};
    use crate::text::BitmapFont;
    use std::sync::Arc;

    struct LocalSource;

    impl ListSource for LocalSource {
        fn fetch(&self, _: &str, status: Status, kind: MediaKind) -> Result<Vec<Entry>, SourceError> {
            Ok(vec![Entry {
                id: "1".to_string(),
                title: "Local".to_string(),
                cover_url: "/nonexistent/malscroll-cover.png".to_string(),
                status,
                progress: 0,
                media: kind,
            }])
        }
    }

    #[test]
    fn test_snapshot_draws_badge_without_cover() {
        let settings = Settings {
            username: "someone".to_string(),
            ..Settings::default()
        };
        let mut scroller = Scroller::new(Arc::new(LocalSource), Box::new(BitmapFont), settings);
        assert!(wait_for_fetch(&scroller, Duration::from_secs(5)));

        let mut canvas = CanvasContext::new(600, 200);
        let drawn = render_snapshot(&mut scroller, &mut canvas, 3, Duration::from_millis(33));

        // One entry, 280 px span: both passes overlap a 600 px canvas
        assert!(drawn >= 1);
        // Badge background sits at the top-left of the first item
        let pixel = canvas.snapshot().get_pixel(3, 3).0;
        assert!(pixel[3] > 0);

        scroller.shutdown(&mut canvas);
        assert_eq!(canvas.live_textures() + canvas.live_images(), 0);
    }
}
