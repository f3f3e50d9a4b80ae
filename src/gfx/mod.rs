//! Graphics capabilities the scroller draws through.
//!
//! Every method of [`GraphicsContext`] must run on the render thread. The
//! scroller only ever receives the context as `&mut dyn GraphicsContext` from
//! the render loop, so the background fetch worker has no way to reach it;
//! handles the worker discovers as stale are queued as plain ids instead.

pub mod canvas;
#[cfg(test)]
pub mod testing;

pub use canvas::CanvasContext;

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgba = Rgba::rgb(0x00, 0x00, 0x00);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xFF)
    }

    /// Packed as 0xRRGGBBAA
    pub fn to_u32(self) -> u32 {
        (self.r as u32) << 24 | (self.g as u32) << 16 | (self.b as u32) << 8 | self.a as u32
    }

    pub fn from_u32(packed: u32) -> Self {
        Self::new(
            (packed >> 24) as u8,
            (packed >> 16) as u8,
            (packed >> 8) as u8,
            packed as u8,
        )
    }

    /// Same color with alpha taken from an opacity in `[0, 1]`
    pub fn with_opacity(self, opacity: f32) -> Self {
        let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { a: alpha, ..self }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Handle to a texture created from raw pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Handle to an image-backed texture loaded from a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub u64);

/// A live texture together with its pixel size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpuTexture {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
}

/// A live image together with its native pixel size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpuImage {
    pub id: ImageId,
    pub width: u32,
    pub height: u32,
}

/// Translate followed by a uniform scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub x: f32,
    pub y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl Transform {
    pub fn uniform(x: f32, y: f32, scale: f32) -> Self {
        Self {
            x,
            y,
            scale_x: scale,
            scale_y: scale,
        }
    }

    /// Stretch a 1x1 quad over a rectangle
    pub fn rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            scale_x: width,
            scale_y: height,
        }
    }
}

/// Render-thread graphics operations
pub trait GraphicsContext {
    /// Upload tightly packed RGBA8 pixels. `None` when the backend refuses.
    fn create_texture(&mut self, width: u32, height: u32, pixels: &[u8]) -> Option<GpuTexture>;

    fn destroy_texture(&mut self, texture: TextureId);

    /// Fetch, decode and upload an image. Blocks the calling frame.
    fn load_image(&mut self, url: &str) -> Option<GpuImage>;

    fn destroy_image(&mut self, image: ImageId);

    fn draw_texture(&mut self, texture: &GpuTexture, transform: Transform);

    fn draw_image(&mut self, image: &GpuImage, transform: Transform);

    /// Draw `texture` (normally a 1x1 white fill) as a quad tinted with `color`
    fn draw_solid(&mut self, texture: &GpuTexture, transform: Transform, color: Rgba);
}
