//! Immediate-mode polygon builder.
//!
//! A begin/vertex/end protocol that accumulates absolute vertices relative to
//! an origin, then hands the finished outline to the polygon filler (filled)
//! or draws a closed loop of line segments (unfilled). At most one shape may
//! be open at a time; the builder lives in the loop context, so "one open
//! shape" means one per running engine, not a process-wide global.

use log::warn;

use crate::error::DrawError;
use crate::raster::{self, RasterTarget};

/// Polygon accumulator. FREE until `begin`, OPEN until `end`.
#[derive(Debug, Default)]
pub struct ShapeBuilder {
    open: bool,
    origin_x: i32,
    origin_y: i32,
    color: (u8, u8, u8, u8),
    fill: bool,
    xs: Vec<i16>,
    ys: Vec<i16>,
}

impl ShapeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a shape is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open a shape anchored at (x, y). A `begin` while another shape is
    /// open is a protocol violation: the open shape is left untouched.
    pub fn begin(
        &mut self,
        x: i32,
        y: i32,
        r: u8,
        g: u8,
        b: u8,
        a: u8,
        fill: bool,
    ) -> Result<(), DrawError> {
        if self.open {
            warn!("polygon_begin called before the open shape was ended");
            return Err(DrawError::ShapeAlreadyOpen);
        }
        self.origin_x = x;
        self.origin_y = y;
        self.color = (r, g, b, a);
        self.fill = fill;
        self.xs.clear();
        self.ys.clear();
        self.open = true;
        Ok(())
    }

    /// Append a vertex at origin + (dx, dy).
    pub fn vertex(&mut self, dx: i32, dy: i32) -> Result<(), DrawError> {
        if !self.open {
            warn!("polygon_vertex called with no open shape");
            return Err(DrawError::ShapeNotOpen);
        }
        self.xs.push((self.origin_x + dx) as i16);
        self.ys.push((self.origin_y + dy) as i16);
        Ok(())
    }

    /// Close the shape and draw it. Filled shapes go through the scanline
    /// filler; unfilled ones become a closed loop of line segments. The
    /// builder returns to FREE either way, even when drawing fails.
    pub fn end<T: RasterTarget + ?Sized>(
        &mut self,
        t: &mut T,
        scratch: &mut Vec<i32>,
    ) -> Result<(), DrawError> {
        if !self.open {
            warn!("polygon_end called with no open shape");
            return Err(DrawError::ShapeNotOpen);
        }
        self.open = false;

        let (r, g, b, a) = self.color;
        let result = if self.fill {
            raster::fill_polygon(t, &self.xs, &self.ys, r, g, b, a, scratch)
        } else {
            self.outline(t, r, g, b, a)
        };

        self.xs.clear();
        self.ys.clear();
        result
    }

    fn outline<T: RasterTarget + ?Sized>(
        &self,
        t: &mut T,
        r: u8,
        g: u8,
        b: u8,
        a: u8,
    ) -> Result<(), DrawError> {
        let n = self.xs.len();
        if n < 2 {
            return Err(DrawError::TooFewVertices(n));
        }
        t.set_color(r, g, b, a)?;
        for i in 0..n {
            let j = (i + 1) % n;
            line_segment(
                t,
                i32::from(self.xs[i]),
                i32::from(self.ys[i]),
                i32::from(self.xs[j]),
                i32::from(self.ys[j]),
            )?;
        }
        Ok(())
    }
}

/// Bresenham segment expressed through the raster target. Axis-aligned
/// segments collapse to the run primitives.
fn line_segment<T: RasterTarget + ?Sized>(
    t: &mut T,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
) -> Result<(), DrawError> {
    if y0 == y1 {
        return t.hline(x0, x1, y0);
    }
    if x0 == x1 {
        return t.vline(x0, y0, y1);
    }

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let mut x = x0;
    let mut y = y0;

    loop {
        t.pixel(x, y)?;
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::tests::Recorder;

    #[test]
    fn test_round_trip_matches_direct_fill() {
        // begin(x0,y0) + relative vertices must fill exactly like the
        // polygon filler called with the absolute coordinates.
        let mut shape = ShapeBuilder::new();
        let mut rec = Recorder::default();
        let mut scratch = Vec::new();
        shape.begin(40, 30, 9, 8, 7, 255, true).unwrap();
        shape.vertex(10, 0).unwrap();
        shape.vertex(0, 10).unwrap();
        shape.vertex(-10, 0).unwrap();
        shape.end(&mut rec, &mut scratch).unwrap();

        let mut direct = Recorder::default();
        crate::raster::fill_polygon(
            &mut direct,
            &[50, 40, 30],
            &[30, 40, 30],
            9,
            8,
            7,
            255,
            &mut scratch,
        )
        .unwrap();

        assert_eq!(rec.hspans, direct.hspans);
        assert_eq!(rec.color, direct.color);
    }

    #[test]
    fn test_double_begin_is_rejected_and_state_kept() {
        let mut shape = ShapeBuilder::new();
        shape.begin(0, 0, 1, 1, 1, 255, true).unwrap();
        shape.vertex(5, 0).unwrap();

        let err = shape.begin(100, 100, 2, 2, 2, 255, false).unwrap_err();
        assert_eq!(err, DrawError::ShapeAlreadyOpen);

        // The first shape keeps its origin, color and vertices.
        shape.vertex(0, 5).unwrap();
        shape.vertex(-5, 0).unwrap();
        let mut rec = Recorder::default();
        let mut scratch = Vec::new();
        shape.end(&mut rec, &mut scratch).unwrap();
        assert_eq!(rec.color, (1, 1, 1, 255));
        assert!(!rec.hspans.is_empty());
    }

    #[test]
    fn test_vertex_without_begin() {
        let mut shape = ShapeBuilder::new();
        assert_eq!(shape.vertex(1, 1).unwrap_err(), DrawError::ShapeNotOpen);
    }

    #[test]
    fn test_end_without_begin() {
        let mut shape = ShapeBuilder::new();
        let mut rec = Recorder::default();
        let mut scratch = Vec::new();
        assert_eq!(
            shape.end(&mut rec, &mut scratch).unwrap_err(),
            DrawError::ShapeNotOpen
        );
    }

    #[test]
    fn test_unfilled_shape_closes_the_loop() {
        let mut shape = ShapeBuilder::new();
        let mut rec = Recorder::default();
        let mut scratch = Vec::new();
        shape.begin(0, 0, 5, 5, 5, 255, false).unwrap();
        shape.vertex(0, 0).unwrap();
        shape.vertex(10, 0).unwrap();
        shape.vertex(10, 10).unwrap();
        shape.end(&mut rec, &mut scratch).unwrap();

        // Three segments: two axis-aligned runs and one diagonal back to the
        // first vertex.
        assert_eq!(rec.hspans.len(), 1);
        assert_eq!(rec.vspans.len(), 1);
        let pixels = rec.pixels();
        assert!(pixels.contains(&(0, 0)));
        assert!(pixels.contains(&(10, 10)));
        assert!(pixels.contains(&(5, 5)), "closing diagonal missing");
    }

    #[test]
    fn test_reusable_after_end() {
        let mut shape = ShapeBuilder::new();
        let mut rec = Recorder::default();
        let mut scratch = Vec::new();
        shape.begin(0, 0, 1, 2, 3, 255, true).unwrap();
        shape.vertex(0, 0).unwrap();
        shape.vertex(4, 0).unwrap();
        shape.vertex(0, 4).unwrap();
        shape.end(&mut rec, &mut scratch).unwrap();
        assert!(!shape.is_open());
        assert!(shape.begin(1, 1, 0, 0, 0, 255, false).is_ok());
    }
}
