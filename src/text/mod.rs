pub mod font;
pub mod wrap;

pub use font::BitmapFont;
pub use wrap::wrap_title;

use crate::gfx::Rgba;

/// Pixels produced by a [`TextRasterizer`], tightly packed RGBA8
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterText {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Turns a string into a pixel buffer
pub trait TextRasterizer: Send {
    /// `None` when there is nothing to draw (empty or blank text)
    fn render(&self, text: &str, color: Rgba) -> Option<RasterText>;
}
