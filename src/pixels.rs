//! CPU-side pixel rectangles.
//!
//! A [`PixelBlock`] is a byte-order-RGBA buffer the application can read back
//! from the render target, edit pixel by pixel, and blit again. The render
//! target and every block use the same byte layout, so readback and upload
//! are straight copies.

use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;
use sdl2::render::BlendMode;
use sdl2::surface::Surface;

use crate::error::DrawError;
use crate::gfx::Gfx;

/// 32-bit RGBA in memory byte order (R first), whatever the host endianness.
#[cfg(target_endian = "little")]
pub(crate) const RGBA32_FORMAT: PixelFormatEnum = PixelFormatEnum::ABGR8888;
#[cfg(target_endian = "big")]
pub(crate) const RGBA32_FORMAT: PixelFormatEnum = PixelFormatEnum::RGBA8888;

/// An editable rectangle of RGBA pixels.
pub struct PixelBlock {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    blend: bool,
}

impl PixelBlock {
    /// A transparent-black block of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
            blend: false,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether uploads alpha-blend over the target (default: overwrite).
    pub fn set_blend(&mut self, blend: bool) {
        self.blend = blend;
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<(u8, u8, u8, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let pos = ((y * self.width + x) * 4) as usize;
        Some((
            self.pixels[pos],
            self.pixels[pos + 1],
            self.pixels[pos + 2],
            self.pixels[pos + 3],
        ))
    }

    /// Out-of-range coordinates are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8, a: u8) {
        if x >= self.width || y >= self.height {
            return;
        }
        let pos = ((y * self.width + x) * 4) as usize;
        self.pixels[pos] = r;
        self.pixels[pos + 1] = g;
        self.pixels[pos + 2] = b;
        self.pixels[pos + 3] = a;
    }

    /// Raw RGBA bytes, row-major.
    pub fn bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Copy a block-sized rectangle of the render target, top-left at (x, y),
    /// into this block.
    pub fn read_from(&mut self, gfx: &mut Gfx, x: i32, y: i32) -> Result<(), DrawError> {
        let rect = Rect::new(x, y, self.width, self.height);
        let data = gfx
            .canvas()
            .read_pixels(rect, RGBA32_FORMAT)
            .map_err(DrawError::backend)?;
        if data.len() != self.pixels.len() {
            return Err(DrawError::backend("pixel readback size mismatch"));
        }
        self.pixels.copy_from_slice(&data);
        Ok(())
    }

    /// Blit this block onto the render target with its top-left at (x, y),
    /// scaled by `scale`.
    pub fn write_to(&mut self, gfx: &mut Gfx, x: i32, y: i32, scale: f32) -> Result<(), DrawError> {
        let (width, height, blend) = (self.width, self.height, self.blend);
        let surface = Surface::from_data(
            &mut self.pixels,
            width,
            height,
            width * 4,
            RGBA32_FORMAT,
        )
        .map_err(DrawError::backend)?;
        let mut texture = gfx
            .creator()
            .create_texture_from_surface(&surface)
            .map_err(|e| DrawError::backend(e.to_string()))?;
        texture.set_blend_mode(if blend {
            BlendMode::Blend
        } else {
            BlendMode::None
        });
        let dst = Rect::new(
            x,
            y,
            (width as f32 * scale) as u32,
            (height as f32 * scale) as u32,
        );
        gfx.canvas()
            .copy(&texture, None, dst)
            .map_err(DrawError::backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_pixel() {
        let mut block = PixelBlock::new(4, 3);
        block.set_pixel(2, 1, 10, 20, 30, 40);
        assert_eq!(block.pixel(2, 1), Some((10, 20, 30, 40)));
        assert_eq!(block.pixel(0, 0), Some((0, 0, 0, 0)));
    }

    #[test]
    fn test_out_of_range_access() {
        let mut block = PixelBlock::new(4, 3);
        block.set_pixel(4, 0, 255, 255, 255, 255);
        block.set_pixel(0, 3, 255, 255, 255, 255);
        assert_eq!(block.pixel(4, 0), None);
        assert_eq!(block.pixel(0, 3), None);
        assert!(block.bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_byte_layout_is_rgba() {
        let mut block = PixelBlock::new(2, 1);
        block.set_pixel(1, 0, 1, 2, 3, 4);
        assert_eq!(&block.bytes()[4..8], &[1, 2, 3, 4]);
    }
}
