use std::collections::HashSet;

use super::{GpuImage, GpuTexture, GraphicsContext, ImageId, Rgba, TextureId, Transform};

/// A draw call captured by [`RecordingContext`]
#[derive(Debug, Clone, PartialEq)]
pub enum Draw {
    Texture(TextureId, Transform),
    Image(ImageId, Transform),
    Solid(Transform, Rgba),
}

/// In-memory context that tracks live handles and records draws
#[derive(Debug, Default)]
pub struct RecordingContext {
    next_id: u64,
    pub live_textures: HashSet<TextureId>,
    pub live_images: HashSet<ImageId>,
    pub destroyed_textures: Vec<TextureId>,
    pub destroyed_images: Vec<ImageId>,
    pub image_loads: Vec<String>,
    pub draws: Vec<Draw>,
    /// URLs that fail to load
    pub broken_urls: HashSet<String>,
    /// Native size reported for every loaded image
    pub image_size: (u32, u32),
}

impl RecordingContext {
    pub fn new() -> Self {
        Self {
            image_size: (225, 350),
            ..Self::default()
        }
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn live_handles(&self) -> usize {
        self.live_textures.len() + self.live_images.len()
    }
}

impl GraphicsContext for RecordingContext {
    fn create_texture(&mut self, width: u32, height: u32, pixels: &[u8]) -> Option<GpuTexture> {
        assert_eq!(pixels.len(), (width * height * 4) as usize);
        let id = TextureId(self.next());
        self.live_textures.insert(id);
        Some(GpuTexture { id, width, height })
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        assert!(
            self.live_textures.remove(&texture),
            "texture {texture:?} destroyed twice or never created"
        );
        self.destroyed_textures.push(texture);
    }

    fn load_image(&mut self, url: &str) -> Option<GpuImage> {
        self.image_loads.push(url.to_string());
        if self.broken_urls.contains(url) {
            return None;
        }
        let id = ImageId(self.next());
        self.live_images.insert(id);
        Some(GpuImage {
            id,
            width: self.image_size.0,
            height: self.image_size.1,
        })
    }

    fn destroy_image(&mut self, image: ImageId) {
        assert!(
            self.live_images.remove(&image),
            "image {image:?} destroyed twice or never created"
        );
        self.destroyed_images.push(image);
    }

    fn draw_texture(&mut self, texture: &GpuTexture, transform: Transform) {
        assert!(self.live_textures.contains(&texture.id));
        self.draws.push(Draw::Texture(texture.id, transform));
    }

    fn draw_image(&mut self, image: &GpuImage, transform: Transform) {
        assert!(self.live_images.contains(&image.id));
        self.draws.push(Draw::Image(image.id, transform));
    }

    fn draw_solid(&mut self, texture: &GpuTexture, transform: Transform, color: Rgba) {
        assert!(self.live_textures.contains(&texture.id));
        self.draws.push(Draw::Solid(transform, color));
    }
}
