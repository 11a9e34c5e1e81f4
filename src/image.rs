//! Image loading and sheet indexing.
//!
//! Actual decoding, texture upload and blitting are delegated to SDL2_image
//! and the renderer. The engine keeps loaded images in an [`ImageStore`]
//! owned by the frame loop, and hands the application cheap [`Image`]
//! handles; textures are released with the store when the loop unwinds.
//! [`Sprite`] and [`BitmapFont`] are pure indexing layers over a handle.

use std::path::Path;

use sdl2::image::LoadSurface;
use sdl2::pixels::Color;
use sdl2::render::{Texture, TextureCreator};
use sdl2::surface::Surface;
use sdl2::video::WindowContext;

use crate::error::DrawError;
use crate::gfx::{Gfx, Transform};

/// Handle to an image held by the loop's [`ImageStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Image {
    pub(crate) id: usize,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl Image {
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }
}

struct Entry<'c> {
    texture: Texture<'c>,
    surface: Surface<'static>,
}

/// Loaded images, owned by the running loop. The surface copy stays around
/// for pixel reads and color-key rebuilds.
pub struct ImageStore<'c> {
    creator: &'c TextureCreator<WindowContext>,
    entries: Vec<Entry<'c>>,
}

impl<'c> ImageStore<'c> {
    pub(crate) fn new(creator: &'c TextureCreator<WindowContext>) -> Self {
        Self {
            creator,
            entries: Vec::new(),
        }
    }

    /// Load an image file (PNG/JPG via SDL2_image).
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<Image, String> {
        let path = path.as_ref();
        let surface = Surface::from_file(path)
            .map_err(|e| format!("could not load image {}: {e}", path.display()))?;
        self.insert(surface)
    }

    /// Adopt an already-built surface.
    pub fn from_surface(&mut self, surface: Surface<'static>) -> Result<Image, String> {
        self.insert(surface)
    }

    fn insert(&mut self, surface: Surface<'static>) -> Result<Image, String> {
        let texture = self
            .creator
            .create_texture_from_surface(&surface)
            .map_err(|e| e.to_string())?;
        let (width, height) = surface.size();
        self.entries.push(Entry { texture, surface });
        Ok(Image {
            id: self.entries.len() - 1,
            width,
            height,
        })
    }

    pub(crate) fn texture(&self, image: Image) -> Option<&Texture<'c>> {
        self.entries.get(image.id).map(|e| &e.texture)
    }

    pub(crate) fn creator(&self) -> &'c TextureCreator<WindowContext> {
        self.creator
    }

    /// Read a pixel back from the image's surface. RGB surfaces report an
    /// alpha of 255. Out-of-range coordinates or unsupported surface layouts
    /// return None.
    pub fn pixel(&self, image: Image, x: i32, y: i32) -> Option<(u8, u8, u8, u8)> {
        let entry = self.entries.get(image.id)?;
        if x < 0 || y < 0 || x as u32 >= image.width || y as u32 >= image.height {
            return None;
        }
        let bpp = entry.surface.pixel_format_enum().byte_size_per_pixel();
        if bpp != 3 && bpp != 4 {
            return None;
        }
        let pitch = entry.surface.pitch() as usize;
        let data = entry.surface.without_lock()?;
        let pos = y as usize * pitch + x as usize * bpp;
        let a = if bpp == 4 { data[pos + 3] } else { 255 };
        Some((data[pos], data[pos + 1], data[pos + 2], a))
    }

    /// Tint every draw of this image (multiplicative color mod).
    pub fn colourise(&mut self, image: Image, r: u8, g: u8, b: u8) {
        if let Some(entry) = self.entries.get_mut(image.id) {
            entry.texture.set_color_mod(r, g, b);
        }
    }

    /// Mark one color as transparent (or clear the key) and rebuild the
    /// texture from the keyed surface.
    pub fn set_color_key(
        &mut self,
        image: Image,
        enable: bool,
        r: u8,
        g: u8,
        b: u8,
    ) -> Result<(), String> {
        let entry = self
            .entries
            .get_mut(image.id)
            .ok_or("unknown image handle")?;
        entry.surface.set_color_key(enable, Color::RGB(r, g, b))?;
        entry.texture = self
            .creator
            .create_texture_from_surface(&entry.surface)
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}

// ============================================================================
// Sprite sheets
// ============================================================================

/// Frame indexing over an image laid out as a uniform grid.
#[derive(Debug, Clone, Copy)]
pub struct Sprite {
    image: Image,
    frame_width: u32,
    frame_height: u32,
    columns: u32,
    total_frames: u32,
    current: f32,
}

impl Sprite {
    /// Slice `image` into `columns` x `rows` equal frames.
    pub fn new(image: Image, columns: u32, rows: u32) -> Self {
        let frame_width = image.width / columns;
        let frame_height = image.height / rows;
        Self {
            image,
            frame_width,
            frame_height,
            columns: image.width / frame_width,
            total_frames: columns * rows,
            current: 0.0,
        }
    }

    #[inline]
    pub fn frame_width(&self) -> u32 {
        self.frame_width
    }

    #[inline]
    pub fn frame_height(&self) -> u32 {
        self.frame_height
    }

    #[inline]
    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    /// The frame the fractional cursor currently sits on.
    #[inline]
    pub fn current_frame(&self) -> u32 {
        self.current as u32
    }

    /// Advance the fractional frame cursor, wrapping past the last frame.
    pub fn advance(&mut self, increment: f32) {
        self.current += increment;
        if self.current >= self.total_frames as f32 {
            self.current = 0.0;
        }
    }

    /// Top-left corner of `frame` within the sheet.
    pub fn frame_origin(&self, frame: u32) -> (i32, i32) {
        let sx = self.frame_width * (frame % self.columns);
        let sy = self.frame_height * (frame / self.columns);
        (sx as i32, sy as i32)
    }

    /// Draw one frame; `None` draws the current frame.
    pub fn draw(
        &self,
        gfx: &mut Gfx,
        frame: Option<u32>,
        x: i32,
        y: i32,
        transform: &Transform,
    ) -> Result<(), DrawError> {
        let frame = frame.unwrap_or_else(|| self.current_frame());
        let (sx, sy) = self.frame_origin(frame);
        gfx.draw_image_ex(
            self.image,
            x,
            y,
            sx,
            sy,
            self.frame_width,
            self.frame_height,
            transform,
        )
    }

    /// Read a pixel from within a frame.
    pub fn pixel(
        &self,
        images: &ImageStore,
        frame: u32,
        x: i32,
        y: i32,
    ) -> Option<(u8, u8, u8, u8)> {
        let (sx, sy) = self.frame_origin(frame);
        images.pixel(self.image, sx + x, sy + y)
    }
}

// ============================================================================
// Bitmap fonts
// ============================================================================

/// Fixed-cell glyph sheet indexed by byte value.
#[derive(Debug, Clone, Copy)]
pub struct BitmapFont {
    image: Image,
    char_width: u32,
    char_height: u32,
    chars_per_line: u32,
}

impl BitmapFont {
    /// Build a font over `image` with `char_width` x `char_height` cells,
    /// keying out the background color.
    pub fn new(
        images: &mut ImageStore,
        image: Image,
        char_width: u32,
        char_height: u32,
        key: (u8, u8, u8),
    ) -> Result<Self, String> {
        images.set_color_key(image, true, key.0, key.1, key.2)?;
        Ok(Self::from_layout(image, char_width, char_height))
    }

    /// Build a font without touching the image (no color key).
    pub fn from_layout(image: Image, char_width: u32, char_height: u32) -> Self {
        Self {
            image,
            char_width,
            char_height,
            chars_per_line: image.width / char_width,
        }
    }

    #[inline]
    pub fn char_width(&self) -> u32 {
        self.char_width
    }

    #[inline]
    pub fn char_height(&self) -> u32 {
        self.char_height
    }

    /// Sheet origin of a glyph.
    pub fn glyph_origin(&self, glyph: u8) -> (i32, i32) {
        let fx = self.char_width * (u32::from(glyph) % self.chars_per_line);
        let fy = self.char_height * (u32::from(glyph) / self.chars_per_line);
        (fx as i32, fy as i32)
    }

    /// Tint subsequent glyph draws.
    pub fn colourise(&self, images: &mut ImageStore, r: u8, g: u8, b: u8) {
        images.colourise(self.image, r, g, b);
    }

    pub fn draw_char(
        &self,
        gfx: &mut Gfx,
        glyph: u8,
        x: i32,
        y: i32,
        scale: f32,
    ) -> Result<(), DrawError> {
        let (fx, fy) = self.glyph_origin(glyph);
        let transform = Transform {
            scale,
            ..Transform::default()
        };
        gfx.draw_image_ex(
            self.image,
            x,
            y,
            fx,
            fy,
            self.char_width,
            self.char_height,
            &transform,
        )
    }

    /// Draw a string. '\n' returns to the left margin one cell down, '\r'
    /// returns to the margin, '\t' advances four cells.
    pub fn draw_string(
        &self,
        gfx: &mut Gfx,
        s: &str,
        x: i32,
        y: i32,
        scale: f32,
    ) -> Result<(), DrawError> {
        let step_x = (self.char_width as f32 * scale) as i32;
        let step_y = (self.char_height as f32 * scale) as i32;
        let mut x_now = x;
        let mut y_now = y;
        for byte in s.bytes() {
            match byte {
                b'\n' => {
                    x_now = x;
                    y_now += step_y;
                }
                b'\r' => {
                    x_now = x;
                }
                b'\t' => {
                    x_now += 4 * step_x;
                }
                _ => {
                    self.draw_char(gfx, byte, x_now, y_now, scale)?;
                    x_now += step_x;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_image(width: u32, height: u32) -> Image {
        Image {
            id: 0,
            width,
            height,
        }
    }

    #[test]
    fn test_sprite_frame_origins() {
        // 4x2 grid of 16x16 frames on a 64x32 sheet.
        let sprite = Sprite::new(fake_image(64, 32), 4, 2);
        assert_eq!(sprite.total_frames(), 8);
        assert_eq!(sprite.frame_origin(0), (0, 0));
        assert_eq!(sprite.frame_origin(3), (48, 0));
        assert_eq!(sprite.frame_origin(4), (0, 16));
        assert_eq!(sprite.frame_origin(7), (48, 16));
    }

    #[test]
    fn test_sprite_advance_wraps() {
        let mut sprite = Sprite::new(fake_image(64, 32), 4, 2);
        for _ in 0..7 {
            sprite.advance(1.0);
        }
        assert_eq!(sprite.current_frame(), 7);
        sprite.advance(1.0);
        assert_eq!(sprite.current_frame(), 0);
    }

    #[test]
    fn test_sprite_fractional_advance() {
        let mut sprite = Sprite::new(fake_image(64, 32), 4, 2);
        sprite.advance(0.6);
        assert_eq!(sprite.current_frame(), 0);
        sprite.advance(0.6);
        assert_eq!(sprite.current_frame(), 1);
    }

    #[test]
    fn test_font_glyph_origins() {
        // 16 glyphs per line, 8x12 cells.
        let font = BitmapFont::from_layout(fake_image(128, 192), 8, 12);
        assert_eq!(font.glyph_origin(0), (0, 0));
        assert_eq!(font.glyph_origin(15), (120, 0));
        assert_eq!(font.glyph_origin(16), (0, 12));
        assert_eq!(font.glyph_origin(b'A'), ((65 % 16) * 8, (65 / 16) * 12));
    }
}
