//! CPU implementation of [`GraphicsContext`] that composites into an RGBA canvas.

use std::collections::HashMap;
use std::thread::{self, ThreadId};
use std::time::Duration;

use image::RgbaImage;

use super::{GpuImage, GpuTexture, GraphicsContext, ImageId, Rgba, TextureId, Transform};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const IMAGE_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error)]
enum ImageLoadError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered {0}")]
    Status(reqwest::StatusCode),
    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Software canvas bound to the thread that created it
pub struct CanvasContext {
    canvas: RgbaImage,
    textures: HashMap<TextureId, RgbaImage>,
    images: HashMap<ImageId, RgbaImage>,
    next_id: u64,
    owner: ThreadId,
}

impl CanvasContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: RgbaImage::new(width, height),
            textures: HashMap::new(),
            images: HashMap::new(),
            next_id: 0,
            owner: thread::current().id(),
        }
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    /// Reset every canvas pixel to `color`
    pub fn clear(&mut self, color: Rgba) {
        for pixel in self.canvas.pixels_mut() {
            pixel.0 = color.to_array();
        }
    }

    /// The composited frame
    pub fn snapshot(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    pub fn live_images(&self) -> usize {
        self.images.len()
    }

    fn on_owner_thread(&self, operation: &str) -> bool {
        let current = thread::current().id();
        if current != self.owner {
            log::error!(
                "Graphics operation '{}' called off the render thread ({:?})",
                operation,
                current
            );
            return false;
        }
        true
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn fetch_image(url: &str) -> Result<RgbaImage, ImageLoadError> {
        let bytes = if url.starts_with("http://") || url.starts_with("https://") {
            // One client per cover; nothing outlives the render-thread call
            let client = reqwest::blocking::Client::builder()
                .user_agent(USER_AGENT)
                .timeout(IMAGE_TIMEOUT)
                .build()?;
            let response = client.get(url).send()?;
            if !response.status().is_success() {
                return Err(ImageLoadError::Status(response.status()));
            }
            response.bytes()?.to_vec()
        } else {
            std::fs::read(url)?
        };
        Ok(image::load_from_memory(&bytes)?.to_rgba8())
    }

    /// Nearest-neighbour blit with source-over blending
    fn blit(canvas: &mut RgbaImage, source: &RgbaImage, transform: Transform, tint: Option<Rgba>) {
        let (src_w, src_h) = source.dimensions();
        if src_w == 0 || src_h == 0 || transform.scale_x <= 0.0 || transform.scale_y <= 0.0 {
            return;
        }

        let dest_w = src_w as f32 * transform.scale_x;
        let dest_h = src_h as f32 * transform.scale_y;
        let x0 = transform.x.floor().max(0.0) as i64;
        let y0 = transform.y.floor().max(0.0) as i64;
        let x1 = ((transform.x + dest_w).ceil() as i64).min(canvas.width() as i64);
        let y1 = ((transform.y + dest_h).ceil() as i64).min(canvas.height() as i64);

        for dy in y0..y1 {
            let sy = ((dy as f32 + 0.5 - transform.y) / transform.scale_y).floor();
            if sy < 0.0 || sy >= src_h as f32 {
                continue;
            }
            for dx in x0..x1 {
                let sx = ((dx as f32 + 0.5 - transform.x) / transform.scale_x).floor();
                if sx < 0.0 || sx >= src_w as f32 {
                    continue;
                }

                let mut src = source.get_pixel(sx as u32, sy as u32).0;
                if let Some(tint) = tint {
                    src = [
                        mul_channel(src[0], tint.r),
                        mul_channel(src[1], tint.g),
                        mul_channel(src[2], tint.b),
                        mul_channel(src[3], tint.a),
                    ];
                }
                let dst = canvas.get_pixel_mut(dx as u32, dy as u32);
                dst.0 = blend_over(src, dst.0);
            }
        }
    }
}

fn mul_channel(a: u8, b: u8) -> u8 {
    ((a as u32 * b as u32 + 127) / 255) as u8
}

fn blend_over(src: [u8; 4], dst: [u8; 4]) -> [u8; 4] {
    let src_a = src[3] as u32;
    if src_a == 255 {
        return src;
    }
    if src_a == 0 {
        return dst;
    }
    let inv = 255 - src_a;
    let mut out = [0u8; 4];
    for channel in 0..3 {
        out[channel] = ((src[channel] as u32 * src_a + dst[channel] as u32 * inv + 127) / 255) as u8;
    }
    out[3] = (src_a + (dst[3] as u32 * inv + 127) / 255).min(255) as u8;
    out
}

impl GraphicsContext for CanvasContext {
    fn create_texture(&mut self, width: u32, height: u32, pixels: &[u8]) -> Option<GpuTexture> {
        if !self.on_owner_thread("create_texture") {
            return None;
        }
        let image = RgbaImage::from_raw(width, height, pixels.to_vec())?;
        let id = TextureId(self.allocate_id());
        self.textures.insert(id, image);
        Some(GpuTexture { id, width, height })
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        if self.on_owner_thread("destroy_texture") && self.textures.remove(&texture).is_none() {
            log::warn!("Destroying unknown texture {:?}", texture);
        }
    }

    fn load_image(&mut self, url: &str) -> Option<GpuImage> {
        if !self.on_owner_thread("load_image") {
            return None;
        }
        match Self::fetch_image(url) {
            Ok(image) => {
                let (width, height) = image.dimensions();
                let id = ImageId(self.allocate_id());
                self.images.insert(id, image);
                log::debug!("Loaded image {} ({}x{})", url, width, height);
                Some(GpuImage { id, width, height })
            }
            Err(e) => {
                log::warn!("Failed to load image {}: {}", url, e);
                None
            }
        }
    }

    fn destroy_image(&mut self, image: ImageId) {
        if self.on_owner_thread("destroy_image") && self.images.remove(&image).is_none() {
            log::warn!("Destroying unknown image {:?}", image);
        }
    }

    fn draw_texture(&mut self, texture: &GpuTexture, transform: Transform) {
        if !self.on_owner_thread("draw_texture") {
            return;
        }
        if let Some(source) = self.textures.get(&texture.id) {
            Self::blit(&mut self.canvas, source, transform, None);
        }
    }

    fn draw_image(&mut self, image: &GpuImage, transform: Transform) {
        if !self.on_owner_thread("draw_image") {
            return;
        }
        if let Some(source) = self.images.get(&image.id) {
            Self::blit(&mut self.canvas, source, transform, None);
        }
    }

    fn draw_solid(&mut self, texture: &GpuTexture, transform: Transform, color: Rgba) {
        if !self.on_owner_thread("draw_solid") {
            return;
        }
        if let Some(source) = self.textures.get(&texture.id) {
            Self::blit(&mut self.canvas, source, transform, Some(color));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white_pixel(ctx: &mut CanvasContext) -> GpuTexture {
        ctx.create_texture(1, 1, &[0xFF; 4]).unwrap()
    }

    #[test]
    fn test_solid_quad_covers_rect() {
        let mut ctx = CanvasContext::new(20, 10);
        let fill = white_pixel(&mut ctx);

        ctx.draw_solid(&fill, Transform::rect(2.0, 1.0, 4.0, 3.0), Rgba::rgb(255, 0, 0));

        assert_eq!(ctx.snapshot().get_pixel(2, 1).0, [255, 0, 0, 255]);
        assert_eq!(ctx.snapshot().get_pixel(5, 3).0, [255, 0, 0, 255]);
        assert_eq!(ctx.snapshot().get_pixel(6, 3).0, [0, 0, 0, 0]);
        assert_eq!(ctx.snapshot().get_pixel(2, 4).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_half_transparent_blend() {
        let mut ctx = CanvasContext::new(4, 4);
        ctx.clear(Rgba::WHITE);
        let fill = white_pixel(&mut ctx);

        ctx.draw_solid(&fill, Transform::rect(0.0, 0.0, 4.0, 4.0), Rgba::BLACK.with_opacity(0.5));

        let pixel = ctx.snapshot().get_pixel(1, 1).0;
        assert!((126..=129).contains(&pixel[0]));
        assert_eq!(pixel[3], 255);
    }

    #[test]
    fn test_scaled_texture_and_offscreen_clip() {
        let mut ctx = CanvasContext::new(10, 10);
        let texture = ctx
            .create_texture(2, 1, &[0, 255, 0, 255, 0, 0, 255, 255])
            .unwrap();

        // Partially left of the canvas: only the blue half is visible
        ctx.draw_texture(&texture, Transform::uniform(-3.0, 0.0, 3.0));

        assert_eq!(ctx.snapshot().get_pixel(0, 0).0, [0, 0, 255, 255]);
        assert_eq!(ctx.snapshot().get_pixel(2, 2).0, [0, 0, 255, 255]);
        assert_eq!(ctx.snapshot().get_pixel(3, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_destroy_releases_texture() {
        let mut ctx = CanvasContext::new(4, 4);
        let texture = white_pixel(&mut ctx);
        assert_eq!(ctx.live_textures(), 1);
        ctx.destroy_texture(texture.id);
        assert_eq!(ctx.live_textures(), 0);
    }

    #[test]
    fn test_mismatched_pixel_buffer_is_rejected() {
        let mut ctx = CanvasContext::new(4, 4);
        assert!(ctx.create_texture(2, 2, &[0; 4]).is_none());
    }

    #[test]
    fn test_missing_local_image_fails() {
        let mut ctx = CanvasContext::new(4, 4);
        assert!(ctx.load_image("/nonexistent/cover.png").is_none());
        assert_eq!(ctx.live_images(), 0);
    }

    #[test]
    fn test_calls_from_other_thread_are_refused() {
        let mut ctx = CanvasContext::new(4, 4);
        let created = std::thread::scope(|scope| {
            scope
                .spawn(|| ctx.create_texture(1, 1, &[0xFF; 4]).is_some())
                .join()
                .unwrap()
        });
        assert!(!created);
        assert_eq!(ctx.live_textures(), 0);
    }
}
