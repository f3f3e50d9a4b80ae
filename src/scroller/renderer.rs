//! Per-frame drawing of the scrolling strip.
//!
//! Layout is a pure function from an asset slot and an x position to a list
//! of [`DrawOp`]s; only [`render_frame`] touches the graphics context.

use super::SharedState;
use super::assets::{AssetSlot, FrameBudget};
use super::clock::ScrollClock;
use crate::gfx::{GpuImage, GpuTexture, GraphicsContext, Rgba, Transform};
use crate::settings::Settings;
use crate::text::TextRasterizer;

/// Cover downloads allowed per frame
pub const COVER_LOADS_PER_FRAME: usize = 1;

const TEXT_INSET: f32 = 6.0;
const TITLE_TOP_MARGIN: f32 = 8.0;
const LINE_SPACING: f32 = 4.0;
const BADGE_MIN_SCALE: f32 = 1.5;
const MAX_TEXT_SCALE: f32 = 3.0;

/// One primitive of a laid-out entry
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Cover(GpuImage, Transform),
    /// Translucent quad behind a text texture, in pixels
    Background(Transform, Rgba),
    Text(GpuTexture, Transform),
}

/// What a frame did, for the status line and debug logs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub drawn: usize,
    pub cover_loads: usize,
    pub released: usize,
}

fn is_visible(x: f32, item_width: f32, viewport_width: f32) -> bool {
    x + item_width >= 0.0 && x <= viewport_width
}

/// Width available to text inside one item
fn text_room(settings: &Settings) -> f32 {
    let padding = if settings.enable_text_background {
        settings.background_padding * 2.0
    } else {
        0.0
    };
    (settings.item_width - TEXT_INSET * 2.0 - padding).max(1.0)
}

fn push_text(ops: &mut Vec<DrawOp>, texture: GpuTexture, x: f32, y: f32, scale: f32, settings: &Settings) {
    if settings.enable_text_background {
        let pad = settings.background_padding;
        ops.push(DrawOp::Background(
            Transform::rect(
                x - pad,
                y - pad,
                texture.width as f32 * scale + pad * 2.0,
                texture.height as f32 * scale + pad * 2.0,
            ),
            settings
                .background_color
                .with_opacity(settings.background_opacity),
        ));
    }
    ops.push(DrawOp::Text(texture, Transform::uniform(x, y, scale)));
}

/// Draw list for one entry whose left edge sits at `x`
pub fn layout_entry(slot: &AssetSlot, x: f32, settings: &Settings) -> Vec<DrawOp> {
    let mut ops = Vec::new();
    let room = text_room(settings);

    let cover_height = slot.cover_image().map(|cover| {
        let scale = settings.item_width / cover.width.max(1) as f32;
        ops.push(DrawOp::Cover(*cover, Transform::uniform(x, 0.0, scale)));
        cover.height as f32 * scale
    });

    if let Some(badge) = slot.status_badge.texture() {
        let fit = room / badge.width.max(1) as f32;
        let scale = settings
            .text_scale
            .min(fit)
            .min(MAX_TEXT_SCALE)
            .max(BADGE_MIN_SCALE);
        push_text(&mut ops, *badge, x + TEXT_INSET, TEXT_INSET, scale, settings);
    }

    // Titles hang below the cover and start only when the first line exists
    if let Some(cover_height) = cover_height.filter(|_| slot.title_lines[0].texture().is_some()) {
        let mut y = cover_height + TITLE_TOP_MARGIN;
        for line in slot.title_lines.iter().filter_map(|line| line.texture()) {
            let fit = room / line.width.max(1) as f32;
            let scale = settings.text_scale.min(fit).min(MAX_TEXT_SCALE);
            push_text(&mut ops, *line, x + TEXT_INSET, y, scale, settings);
            y += line.height as f32 * scale + LINE_SPACING;
        }
    }

    ops
}

fn emit(ops: &[DrawOp], fill: Option<&GpuTexture>, ctx: &mut dyn GraphicsContext) {
    for op in ops {
        match op {
            DrawOp::Cover(image, transform) => ctx.draw_image(image, *transform),
            DrawOp::Background(rect, color) => {
                if let Some(fill) = fill {
                    ctx.draw_solid(fill, *rect, *color);
                }
            }
            DrawOp::Text(texture, transform) => ctx.draw_texture(texture, *transform),
        }
    }
}

/// Advance the clock and draw every visible entry.
///
/// Render thread only. Releases queued handles first so nothing invalidated
/// since the last frame is ever drawn.
pub fn render_frame(
    state: &mut SharedState,
    clock: &mut ScrollClock,
    settings: &Settings,
    ctx: &mut dyn GraphicsContext,
    rasterizer: &dyn TextRasterizer,
    elapsed: f32,
    viewport_width: f32,
) -> FrameStats {
    let mut stats = FrameStats {
        released: state.assets.drain_pending(ctx),
        ..FrameStats::default()
    };

    let count = state.entries.len();
    if count == 0 {
        return stats;
    }

    let span = settings.item_span();
    clock.configure(settings.scroll_speed, span, count);
    clock.advance(elapsed);

    let fill = if settings.enable_text_background {
        state.assets.fill_texture(ctx)
    } else {
        None
    };
    let style = settings.text_style();
    let mut budget = FrameBudget::new(COVER_LOADS_PER_FRAME);
    let total = clock.total_width();

    // Two passes so the head of the list follows the tail seamlessly
    for pass in 0..2 {
        let base_x = -clock.offset() + pass as f32 * total;
        for (index, entry) in state.entries.iter().enumerate() {
            let x = base_x + index as f32 * span;
            if !is_visible(x, settings.item_width, viewport_width) {
                continue;
            }

            if state
                .assets
                .ensure_materialized(index, entry, &style, ctx, rasterizer, &mut budget)
            {
                stats.cover_loads += 1;
            }
            let Some(slot) = state.assets.slot(index) else {
                continue;
            };
            emit(&layout_entry(slot, x, settings), fill.as_ref(), ctx);
            stats.drawn += 1;
        }
    }

    stats
}
