//! Per-frame drawing surface.
//!
//! A [`Gfx`] is constructed by the frame loop for each `on_draw` call and
//! borrows the offscreen render target, the image store and the shape
//! builder. Geometry primitives route through the scanline code in
//! [`crate::raster`]; rectangles, lines and image blits use the renderer
//! directly.

use sdl2::pixels::Color;
use sdl2::rect::{Point, Rect};
use sdl2::render::{BlendMode, Canvas, TextureCreator};
use sdl2::video::{Window, WindowContext};

use crate::error::DrawError;
use crate::image::{Image, ImageStore};
use crate::raster::{self, RasterTarget};
use crate::shape::ShapeBuilder;

impl RasterTarget for Canvas<Window> {
    fn set_color(&mut self, r: u8, g: u8, b: u8, a: u8) -> Result<(), DrawError> {
        // Opaque colors skip the blend stage.
        self.set_blend_mode(if a == 255 {
            BlendMode::None
        } else {
            BlendMode::Blend
        });
        self.set_draw_color(Color::RGBA(r, g, b, a));
        Ok(())
    }

    fn pixel(&mut self, x: i32, y: i32) -> Result<(), DrawError> {
        self.draw_point(Point::new(x, y)).map_err(DrawError::backend)
    }

    fn hline(&mut self, x1: i32, x2: i32, y: i32) -> Result<(), DrawError> {
        self.draw_line(Point::new(x1, y), Point::new(x2, y))
            .map_err(DrawError::backend)
    }

    fn vline(&mut self, x: i32, y1: i32, y2: i32) -> Result<(), DrawError> {
        self.draw_line(Point::new(x, y1), Point::new(x, y2))
            .map_err(DrawError::backend)
    }
}

/// Placement options for image and sprite draws.
///
/// Rotation is in degrees, clockwise, about `pivot` (relative to the
/// destination's top-left corner). `scale` multiplies the source size.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    pub angle: f64,
    pub pivot_x: i32,
    pub pivot_y: i32,
    pub scale: f32,
    pub h_flip: bool,
    pub v_flip: bool,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            angle: 0.0,
            pivot_x: 0,
            pivot_y: 0,
            scale: 1.0,
            h_flip: false,
            v_flip: false,
        }
    }
}

/// Drawing handle passed to `Application::on_draw`.
pub struct Gfx<'a, 'c> {
    canvas: &'a mut Canvas<Window>,
    images: &'a ImageStore<'c>,
    shape: &'a mut ShapeBuilder,
    scratch: &'a mut Vec<i32>,
    width: u32,
    height: u32,
}

impl<'a, 'c> Gfx<'a, 'c> {
    pub(crate) fn new(
        canvas: &'a mut Canvas<Window>,
        images: &'a ImageStore<'c>,
        shape: &'a mut ShapeBuilder,
        scratch: &'a mut Vec<i32>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            canvas,
            images,
            shape,
            scratch,
            width,
            height,
        }
    }

    /// Logical width of the drawing surface.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Logical height of the drawing surface.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fill the whole surface with one color.
    pub fn clear(&mut self, r: u8, g: u8, b: u8, a: u8) -> Result<(), DrawError> {
        self.canvas.set_color(r, g, b, a)?;
        self.canvas.clear();
        Ok(())
    }

    pub fn draw_pixel(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8, a: u8) -> Result<(), DrawError> {
        self.canvas.set_color(r, g, b, a)?;
        self.canvas.pixel(x, y)
    }

    pub fn draw_line(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        r: u8,
        g: u8,
        b: u8,
        a: u8,
    ) -> Result<(), DrawError> {
        self.canvas.set_color(r, g, b, a)?;
        self.canvas
            .draw_line(Point::new(x1, y1), Point::new(x2, y2))
            .map_err(DrawError::backend)
    }

    pub fn draw_hline(
        &mut self,
        x1: i32,
        x2: i32,
        y: i32,
        r: u8,
        g: u8,
        b: u8,
        a: u8,
    ) -> Result<(), DrawError> {
        self.canvas.set_color(r, g, b, a)?;
        self.canvas.hline(x1, x2, y)
    }

    pub fn draw_vline(
        &mut self,
        x: i32,
        y1: i32,
        y2: i32,
        r: u8,
        g: u8,
        b: u8,
        a: u8,
    ) -> Result<(), DrawError> {
        self.canvas.set_color(r, g, b, a)?;
        self.canvas.vline(x, y1, y2)
    }

    pub fn draw_rect(
        &mut self,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        r: u8,
        g: u8,
        b: u8,
        a: u8,
        fill: bool,
    ) -> Result<(), DrawError> {
        self.canvas.set_color(r, g, b, a)?;
        let rect = Rect::new(x, y, w, h);
        if fill {
            self.canvas.fill_rect(rect).map_err(DrawError::backend)
        } else {
            self.canvas.draw_rect(rect).map_err(DrawError::backend)
        }
    }

    pub fn draw_triangle(
        &mut self,
        x1: i16,
        y1: i16,
        x2: i16,
        y2: i16,
        x3: i16,
        y3: i16,
        r: u8,
        g: u8,
        b: u8,
        a: u8,
        fill: bool,
    ) -> Result<(), DrawError> {
        if fill {
            return raster::fill_triangle(self.canvas, x1, y1, x2, y2, x3, y3, r, g, b, a, self.scratch);
        }
        self.canvas.set_color(r, g, b, a)?;
        let p1 = Point::new(i32::from(x1), i32::from(y1));
        let p2 = Point::new(i32::from(x2), i32::from(y2));
        let p3 = Point::new(i32::from(x3), i32::from(y3));
        self.canvas.draw_line(p1, p2).map_err(DrawError::backend)?;
        self.canvas.draw_line(p2, p3).map_err(DrawError::backend)?;
        self.canvas.draw_line(p3, p1).map_err(DrawError::backend)
    }

    pub fn draw_circle(
        &mut self,
        x: i32,
        y: i32,
        radius: i32,
        r: u8,
        g: u8,
        b: u8,
        a: u8,
        fill: bool,
    ) -> Result<(), DrawError> {
        self.draw_ellipse(x, y, radius, radius, r, g, b, a, fill)
    }

    pub fn draw_ellipse(
        &mut self,
        x: i32,
        y: i32,
        rx: i32,
        ry: i32,
        r: u8,
        g: u8,
        b: u8,
        a: u8,
        fill: bool,
    ) -> Result<(), DrawError> {
        if fill {
            raster::filled_ellipse(self.canvas, x, y, rx, ry, r, g, b, a)
        } else {
            raster::ellipse(self.canvas, x, y, rx, ry, r, g, b, a)
        }
    }

    /// Open a polygon anchored at (x, y). See [`ShapeBuilder::begin`].
    pub fn polygon_begin(
        &mut self,
        x: i32,
        y: i32,
        r: u8,
        g: u8,
        b: u8,
        a: u8,
        fill: bool,
    ) -> Result<(), DrawError> {
        self.shape.begin(x, y, r, g, b, a, fill)
    }

    /// Append a vertex relative to the open polygon's anchor.
    pub fn polygon_vertex(&mut self, dx: i32, dy: i32) -> Result<(), DrawError> {
        self.shape.vertex(dx, dy)
    }

    /// Close and draw the open polygon.
    pub fn polygon_end(&mut self) -> Result<(), DrawError> {
        self.shape.end(self.canvas, self.scratch)
    }

    /// Blit a whole image at (x, y).
    pub fn draw_image(&mut self, image: Image, x: i32, y: i32) -> Result<(), DrawError> {
        self.draw_image_ex(image, x, y, 0, 0, 0, 0, &Transform::default())
    }

    /// Blit a sub-rectangle of an image with rotation, scaling and flips.
    /// A zero `src_w` or `src_h` extends the source to the image edge.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_image_ex(
        &mut self,
        image: Image,
        x: i32,
        y: i32,
        src_x: i32,
        src_y: i32,
        src_w: u32,
        src_h: u32,
        transform: &Transform,
    ) -> Result<(), DrawError> {
        let texture = self
            .images
            .texture(image)
            .ok_or_else(|| DrawError::backend("unknown image handle"))?;
        let sw = if src_w == 0 {
            image.width().saturating_sub(src_x.max(0) as u32)
        } else {
            src_w
        };
        let sh = if src_h == 0 {
            image.height().saturating_sub(src_y.max(0) as u32)
        } else {
            src_h
        };
        let src = Rect::new(src_x, src_y, sw, sh);
        let dst = Rect::new(
            x,
            y,
            (sw as f32 * transform.scale) as u32,
            (sh as f32 * transform.scale) as u32,
        );
        self.canvas
            .copy_ex(
                texture,
                src,
                dst,
                transform.angle,
                Point::new(transform.pivot_x, transform.pivot_y),
                transform.h_flip,
                transform.v_flip,
            )
            .map_err(DrawError::backend)
    }

    pub(crate) fn canvas(&mut self) -> &mut Canvas<Window> {
        self.canvas
    }

    pub(crate) fn creator(&self) -> &'c TextureCreator<WindowContext> {
        self.images.creator()
    }
}
