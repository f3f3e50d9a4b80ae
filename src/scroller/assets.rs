//! Per-entry renderable assets, keyed by position in the current snapshot.
//!
//! Handles leave a slot in exactly one way: they are moved into
//! [`PendingReleases`] and the slot goes back to `Pending`. The queue is only
//! drained on the render thread, so invalidation can happen on any thread
//! that holds the shared lock.

use crate::entry::{Entry, Status};
use crate::gfx::{GpuImage, GpuTexture, GraphicsContext, ImageId, Rgba, TextureId};
use crate::settings::TextStyle;
use crate::text::{TextRasterizer, wrap_title};

/// Title lines kept per entry
pub const TITLE_SLOTS: usize = crate::text::wrap::MAX_LINES;

/// Cover artwork state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoverAsset {
    #[default]
    Pending,
    Ready(GpuImage),
    /// Load failed or there is no URL; not retried for this snapshot
    Failed,
}

/// Rasterized text state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAsset {
    #[default]
    Pending,
    Ready(GpuTexture),
    /// Nothing to draw for the current text and style
    Empty,
}

impl TextAsset {
    pub fn texture(&self) -> Option<&GpuTexture> {
        match self {
            TextAsset::Ready(texture) => Some(texture),
            _ => None,
        }
    }

    fn is_pending(&self) -> bool {
        matches!(self, TextAsset::Pending)
    }
}

/// Renderable state for one list position
#[derive(Debug, Clone, Default)]
pub struct AssetSlot {
    pub cover: CoverAsset,
    pub title_lines: [TextAsset; TITLE_SLOTS],
    pub status_badge: TextAsset,
}

impl AssetSlot {
    pub fn cover_loaded(&self) -> bool {
        matches!(self.cover, CoverAsset::Ready(_))
    }

    pub fn cover_image(&self) -> Option<&GpuImage> {
        match &self.cover {
            CoverAsset::Ready(image) => Some(image),
            _ => None,
        }
    }

    fn release_text(&mut self, pending: &mut PendingReleases) {
        for line in self.title_lines.iter_mut().chain(std::iter::once(&mut self.status_badge)) {
            if let TextAsset::Ready(texture) = std::mem::take(line) {
                pending.push_texture(texture.id);
            }
        }
    }

    fn release_all(&mut self, pending: &mut PendingReleases) {
        self.release_text(pending);
        if let CoverAsset::Ready(image) = std::mem::take(&mut self.cover) {
            pending.push_image(image.id);
        }
    }
}

/// GPU handles waiting to be destroyed on the render thread
#[derive(Debug, Default)]
pub struct PendingReleases {
    images: Vec<ImageId>,
    textures: Vec<TextureId>,
}

impl PendingReleases {
    pub fn push_image(&mut self, image: ImageId) {
        debug_assert!(!self.images.contains(&image), "image queued twice");
        self.images.push(image);
    }

    pub fn push_texture(&mut self, texture: TextureId) {
        debug_assert!(!self.textures.contains(&texture), "texture queued twice");
        self.textures.push(texture);
    }

    pub fn len(&self) -> usize {
        self.images.len() + self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.textures.is_empty()
    }

    pub fn contains_texture(&self, texture: TextureId) -> bool {
        self.textures.contains(&texture)
    }

    pub fn contains_image(&self, image: ImageId) -> bool {
        self.images.contains(&image)
    }

    /// Destroy everything queued. Render thread only.
    pub fn drain(&mut self, ctx: &mut dyn GraphicsContext) -> usize {
        let released = self.len();
        for image in self.images.drain(..) {
            ctx.destroy_image(image);
        }
        for texture in self.textures.drain(..) {
            ctx.destroy_texture(texture);
        }
        released
    }
}

/// Limits on expensive work within a single frame
#[derive(Debug, Clone, Copy)]
pub struct FrameBudget {
    pub covers_left: usize,
}

impl FrameBudget {
    pub fn new(covers: usize) -> Self {
        Self { covers_left: covers }
    }
}

/// Fixed badge palette, keyed by status
pub fn status_color(status: Status) -> Rgba {
    match status {
        Status::Reading | Status::Watching => Rgba::rgb(0x4C, 0xAF, 0x50),
        Status::Completed => Rgba::rgb(0x21, 0x96, 0xF3),
        Status::Paused => Rgba::rgb(0xFF, 0xC1, 0x07),
        Status::Dropped => Rgba::rgb(0xF4, 0x43, 0x36),
        Status::Planning => Rgba::rgb(0x9E, 0x9E, 0x9E),
    }
}

/// Badge text: the status name canonical for the entry's kind, optionally tagged
pub fn status_label(entry: &Entry, style: &TextStyle) -> String {
    let status = entry.status.for_kind(entry.media).label();
    if style.media_tag {
        format!("{} {}", entry.media.tag(), status)
    } else {
        status.to_string()
    }
}

fn rasterize(
    ctx: &mut dyn GraphicsContext,
    rasterizer: &dyn TextRasterizer,
    text: &str,
    color: Rgba,
) -> TextAsset {
    rasterizer
        .render(text, color)
        .filter(|raster| raster.width > 0 && raster.height > 0 && !raster.pixels.is_empty())
        .and_then(|raster| ctx.create_texture(raster.width, raster.height, &raster.pixels))
        .map_or(TextAsset::Empty, TextAsset::Ready)
}

/// Slot table for the current snapshot plus the release queue
#[derive(Debug, Default)]
pub struct AssetCache {
    slots: Vec<AssetSlot>,
    pending: PendingReleases,
    fill: Option<GpuTexture>,
}

impl AssetCache {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: usize) -> Option<&AssetSlot> {
        self.slots.get(index)
    }

    pub fn pending(&self) -> &PendingReleases {
        &self.pending
    }

    /// Queue every live handle and start over with `len` empty slots
    pub fn reset(&mut self, len: usize) {
        for slot in &mut self.slots {
            slot.release_all(&mut self.pending);
        }
        self.slots = vec![AssetSlot::default(); len];
    }

    /// Queue title and badge textures so they are rebuilt with a new style.
    /// Covers stay.
    pub fn invalidate_text(&mut self) {
        for slot in &mut self.slots {
            slot.release_text(&mut self.pending);
        }
    }

    /// Destroy queued handles. Render thread only.
    pub fn drain_pending(&mut self, ctx: &mut dyn GraphicsContext) -> usize {
        self.pending.drain(ctx)
    }

    /// Shared 1x1 white texture used for background quads
    pub fn fill_texture(&mut self, ctx: &mut dyn GraphicsContext) -> Option<GpuTexture> {
        if self.fill.is_none() {
            self.fill = ctx.create_texture(1, 1, &Rgba::WHITE.to_array());
        }
        self.fill
    }

    /// Fill in whatever `index` is missing. Render thread only.
    ///
    /// Returns true when a cover load was attempted.
    pub fn ensure_materialized(
        &mut self,
        index: usize,
        entry: &Entry,
        style: &TextStyle,
        ctx: &mut dyn GraphicsContext,
        rasterizer: &dyn TextRasterizer,
        budget: &mut FrameBudget,
    ) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };

        let mut cover_attempted = false;
        if slot.cover == CoverAsset::Pending {
            if entry.cover_url.is_empty() {
                slot.cover = CoverAsset::Failed;
            } else if budget.covers_left > 0 {
                budget.covers_left -= 1;
                cover_attempted = true;
                slot.cover = match ctx.load_image(&entry.cover_url) {
                    Some(image) => CoverAsset::Ready(image),
                    None => {
                        log::warn!(
                            "Cover for '{}' unavailable, showing badge only: {}",
                            entry.title,
                            entry.cover_url
                        );
                        CoverAsset::Failed
                    }
                };
            }
        }

        if slot.title_lines.iter().any(TextAsset::is_pending) {
            let lines = wrap_title(&entry.title);
            for (line_index, line) in slot.title_lines.iter_mut().enumerate() {
                if !line.is_pending() {
                    continue;
                }
                *line = match lines.get(line_index) {
                    Some(text) => rasterize(ctx, rasterizer, text, style.title_color),
                    None => TextAsset::Empty,
                };
            }
        }

        if slot.status_badge.is_pending() {
            let label = status_label(entry, style);
            let color = if style.use_automatic_status_colors {
                status_color(entry.status)
            } else {
                style.status_color
            };
            slot.status_badge = if label.is_empty() {
                TextAsset::Empty
            } else {
                rasterize(ctx, rasterizer, &label, color)
            };
        }

        cover_attempted
    }

    /// Destroy every handle the cache owns, including the fill texture.
    /// Render thread only; used at shutdown.
    pub fn release_all(&mut self, ctx: &mut dyn GraphicsContext) -> usize {
        self.reset(0);
        let mut released = self.pending.drain(ctx);
        if let Some(fill) = self.fill.take() {
            ctx.destroy_texture(fill.id);
            released += 1;
        }
        released
    }
}
