use std::time::{Duration, Instant};

use image::DynamicImage;
use ratatui::DefaultTerminal;
use ratatui_image::picker::Picker;
use tokio::time::MissedTickBehavior;

use super::{App, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::app::event_handlers::EventHandlers;
use crate::gfx::{CanvasContext, Rgba};
use crate::ui::Preview;

/// Trait for main application loop
pub trait AppMainLoop {
    async fn run(self, terminal: DefaultTerminal) -> color_eyre::Result<()>
    where
        Self: Sized;
}

impl AppMainLoop for App {
    /// Run the preview loop until quit or a termination signal.
    ///
    /// Scroller work blocks (cover downloads, thread joins), so it runs under
    /// `block_in_place` on this thread, which also owns the canvas.
    async fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;

        let picker = Picker::from_query_stdio().unwrap_or_else(|e| {
            log::warn!(
                "Terminal graphics query failed ({:?}), falling back to half blocks",
                e
            );
            Picker::from_fontsize((8, 16))
        });
        log::debug!("Preview protocol: {:?}", picker.protocol_type());

        let mut canvas = CanvasContext::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        let mut preview = Preview::default();

        let mut frame_interval = tokio::time::interval(self.config.preview.frame_interval());
        frame_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_frame = Instant::now();

        // Set up signal handlers for graceful shutdown (Unix only)
        #[cfg(unix)]
        let mut sigint =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;
        #[cfg(unix)]
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

        log::info!("Entering preview loop");

        while self.running {
            let status = self.status_line();
            terminal.draw(|frame| crate::ui::render(frame, &mut preview, &status))?;

            if let Some(ref mut img) = preview.image
                && let Some(Err(e)) = img.last_encoding_result()
            {
                log::debug!("Preview encoding failed: {:?}", e);
            }

            tokio::select! {
                _ = frame_interval.tick() => {
                    let now = Instant::now();
                    let elapsed = now.duration_since(last_frame).as_secs_f32();
                    last_frame = now;

                    let frame = tokio::task::block_in_place(|| {
                        self.scroller.tick(now);
                        canvas.clear(Rgba::BLACK);
                        self.scroller.render(&mut canvas, elapsed, CANVAS_WIDTH as f32);
                        DynamicImage::ImageRgba8(canvas.snapshot().clone())
                    });
                    preview.image = Some(picker.new_resize_protocol(frame));
                }

                // Keyboard events (with short timeout for responsive UI)
                _ = tokio::time::sleep(Duration::from_millis(10)) => {
                    if crossterm::event::poll(Duration::from_millis(0))? {
                        tokio::task::block_in_place(|| self.handle_crossterm_events())?;
                    }
                }
            }

            // Check for Unix signals outside of select! to avoid conditional compilation issues
            #[cfg(unix)]
            {
                use std::pin::Pin;
                use std::task::Poll;

                let waker = futures::task::noop_waker();
                let mut cx = std::task::Context::from_waker(&waker);

                if let Poll::Ready(Some(())) = Pin::new(&mut sigint).poll_recv(&mut cx) {
                    log::info!("Received SIGINT, shutting down gracefully");
                    self.quit();
                }

                if let Poll::Ready(Some(())) = Pin::new(&mut sigterm).poll_recv(&mut cx) {
                    log::info!("Received SIGTERM, shutting down gracefully");
                    self.quit();
                }
            }
        }

        log::info!("Exiting preview loop");
        tokio::task::block_in_place(|| self.scroller.shutdown(&mut canvas));

        Ok(())
    }
}
