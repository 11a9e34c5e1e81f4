//! Scanline raster primitives.
//!
//! Everything here draws through the [`RasterTarget`] trait, which is the
//! whole surface the rasterizers need from a backend: set a color, plot a
//! pixel, draw a horizontal or vertical run. The SDL canvas implements it in
//! `gfx`; tests implement it with recorders.
//!
//! The ellipse tracer is an integer midpoint walk with 1/64-subpixel
//! accumulators, the polygon fill is an active-edge scanline pass with 16.16
//! fixed-point x-intercepts and the even-odd rule.

use crate::error::DrawError;

/// Minimal drawing surface consumed by the rasterizers.
///
/// `set_color` is called once per shape before any geometry is emitted.
/// Implementations decide how alpha maps to blending (the SDL backend enables
/// blending whenever `a != 255`).
pub trait RasterTarget {
    fn set_color(&mut self, r: u8, g: u8, b: u8, a: u8) -> Result<(), DrawError>;
    fn pixel(&mut self, x: i32, y: i32) -> Result<(), DrawError>;
    fn hline(&mut self, x1: i32, x2: i32, y: i32) -> Result<(), DrawError>;
    fn vline(&mut self, x: i32, y1: i32, y2: i32) -> Result<(), DrawError>;
}

/// Trace an unfilled ellipse centered at (x, y) with radii (rx, ry).
///
/// Degenerate radii collapse to straight runs: rx=0 draws the vertical run
/// `[y-ry, y+ry]`, ry=0 the horizontal run `[x-rx, x+rx]`. Negative radii are
/// rejected and nothing is drawn.
pub fn ellipse<T: RasterTarget + ?Sized>(
    t: &mut T,
    x: i32,
    y: i32,
    rx: i32,
    ry: i32,
    r: u8,
    g: u8,
    b: u8,
    a: u8,
) -> Result<(), DrawError> {
    if rx < 0 || ry < 0 {
        return Err(DrawError::NegativeRadius { rx, ry });
    }
    if rx == 0 {
        t.set_color(r, g, b, a)?;
        return t.vline(x, y - ry, y + ry);
    }
    if ry == 0 {
        t.set_color(r, g, b, a)?;
        return t.hline(x - rx, x + rx, y);
    }

    t.set_color(r, g, b, a)?;

    // Last-emitted trackers, primed to a value no step can produce.
    let mut oh = 0xFFFF;
    let mut oi = 0xFFFF;
    let mut oj = 0xFFFF;
    let mut ok = 0xFFFF;

    if rx > ry {
        // Step along the major (x) axis. ix/iy accumulate in 64ths of a
        // pixel; h/i are the rounded x-extents, j/k the scaled y-extents.
        let mut ix = 0;
        let mut iy = rx * 64;

        loop {
            let h = (ix + 32) >> 6;
            let i = (iy + 32) >> 6;
            let j = (h * ry) / rx;
            let k = (i * ry) / rx;

            if ((ok != k) && (oj != k)) || ((oj != j) && (ok != j)) || (k != j) {
                let xph = x + h;
                let xmh = x - h;
                if k > 0 {
                    let ypk = y + k;
                    let ymk = y - k;
                    t.pixel(xmh, ypk)?;
                    t.pixel(xph, ypk)?;
                    t.pixel(xmh, ymk)?;
                    t.pixel(xph, ymk)?;
                } else {
                    t.pixel(xmh, y)?;
                    t.pixel(xph, y)?;
                }
                ok = k;
                let xpi = x + i;
                let xmi = x - i;
                if j > 0 {
                    let ypj = y + j;
                    let ymj = y - j;
                    t.pixel(xmi, ypj)?;
                    t.pixel(xpi, ypj)?;
                    t.pixel(xmi, ymj)?;
                    t.pixel(xpi, ymj)?;
                } else {
                    t.pixel(xmi, y)?;
                    t.pixel(xpi, y)?;
                }
                oj = j;
            }

            ix += iy / rx;
            iy -= ix / rx;

            if i <= h {
                break;
            }
        }
    } else {
        // Step along the major (y) axis.
        let mut ix = 0;
        let mut iy = ry * 64;

        loop {
            let h = (ix + 32) >> 6;
            let i = (iy + 32) >> 6;
            let j = (h * rx) / ry;
            let k = (i * rx) / ry;

            if ((oi != i) && (oh != i)) || ((oh != h) && (oi != h) && (i != h)) {
                let xmj = x - j;
                let xpj = x + j;
                if i > 0 {
                    let ypi = y + i;
                    let ymi = y - i;
                    t.pixel(xmj, ypi)?;
                    t.pixel(xpj, ypi)?;
                    t.pixel(xmj, ymi)?;
                    t.pixel(xpj, ymi)?;
                } else {
                    t.pixel(xmj, y)?;
                    t.pixel(xpj, y)?;
                }
                oi = i;
                let xmk = x - k;
                let xpk = x + k;
                if h > 0 {
                    let yph = y + h;
                    let ymh = y - h;
                    t.pixel(xmk, yph)?;
                    t.pixel(xpk, yph)?;
                    t.pixel(xmk, ymh)?;
                    t.pixel(xpk, ymh)?;
                } else {
                    t.pixel(xmk, y)?;
                    t.pixel(xpk, y)?;
                }
                oh = h;
            }

            ix += iy / ry;
            iy -= ix / ry;

            if i <= h {
                break;
            }
        }
    }

    Ok(())
}

/// Fill an ellipse with paired horizontal runs at each symmetric y-level.
///
/// Same stepping and degenerate handling as [`ellipse`]; the oh/oi/oj/ok
/// trackers suppress re-drawing a y-level the previous step already covered.
pub fn filled_ellipse<T: RasterTarget + ?Sized>(
    t: &mut T,
    x: i32,
    y: i32,
    rx: i32,
    ry: i32,
    r: u8,
    g: u8,
    b: u8,
    a: u8,
) -> Result<(), DrawError> {
    if rx < 0 || ry < 0 {
        return Err(DrawError::NegativeRadius { rx, ry });
    }
    if rx == 0 {
        t.set_color(r, g, b, a)?;
        return t.vline(x, y - ry, y + ry);
    }
    if ry == 0 {
        t.set_color(r, g, b, a)?;
        return t.hline(x - rx, x + rx, y);
    }

    t.set_color(r, g, b, a)?;

    let mut oh = 0xFFFF;
    let mut oi = 0xFFFF;
    let mut oj = 0xFFFF;
    let mut ok = 0xFFFF;

    if rx > ry {
        let mut ix = 0;
        let mut iy = rx * 64;

        loop {
            let h = (ix + 32) >> 6;
            let i = (iy + 32) >> 6;
            let j = (h * ry) / rx;
            let k = (i * ry) / rx;

            if (ok != k) && (oj != k) {
                let xph = x + h;
                let xmh = x - h;
                if k > 0 {
                    t.hline(xmh, xph, y + k)?;
                    t.hline(xmh, xph, y - k)?;
                } else {
                    t.hline(xmh, xph, y)?;
                }
                ok = k;
            }
            if (oj != j) && (ok != j) && (k != j) {
                let xmi = x - i;
                let xpi = x + i;
                if j > 0 {
                    t.hline(xmi, xpi, y + j)?;
                    t.hline(xmi, xpi, y - j)?;
                } else {
                    t.hline(xmi, xpi, y)?;
                }
                oj = j;
            }

            ix += iy / rx;
            iy -= ix / rx;

            if i <= h {
                break;
            }
        }
    } else {
        let mut ix = 0;
        let mut iy = ry * 64;

        loop {
            let h = (ix + 32) >> 6;
            let i = (iy + 32) >> 6;
            let j = (h * rx) / ry;
            let k = (i * rx) / ry;

            if (oi != i) && (oh != i) {
                let xmj = x - j;
                let xpj = x + j;
                if i > 0 {
                    t.hline(xmj, xpj, y + i)?;
                    t.hline(xmj, xpj, y - i)?;
                } else {
                    t.hline(xmj, xpj, y)?;
                }
                oi = i;
            }
            if (oh != h) && (oi != h) && (i != h) {
                let xmk = x - k;
                let xpk = x + k;
                if h > 0 {
                    t.hline(xmk, xpk, y + h)?;
                    t.hline(xmk, xpk, y - h)?;
                } else {
                    t.hline(xmk, xpk, y)?;
                }
                oh = h;
            }

            ix += iy / ry;
            iy -= ix / ry;

            if i <= h {
                break;
            }
        }
    }

    Ok(())
}

/// Fill a polygon given as parallel x/y vertex arrays using an active-edge
/// scanline pass with the even-odd rule.
///
/// An edge is active at scanline y when `min(y1,y2) <= y < max(y1,y2)`; the
/// bottom extent is special-cased so its scanline is not skipped. Intercepts
/// are computed in 16.16 fixed point, sorted, and consumed pairwise.
///
/// `scratch` holds the per-scanline intercepts. It is grown as needed and
/// never shrunk, so a caller reusing one buffer across frames pays for the
/// allocation once.
pub fn fill_polygon<T: RasterTarget + ?Sized>(
    t: &mut T,
    vx: &[i16],
    vy: &[i16],
    r: u8,
    g: u8,
    b: u8,
    a: u8,
    scratch: &mut Vec<i32>,
) -> Result<(), DrawError> {
    let n = vx.len();
    if vy.len() != n {
        return Err(DrawError::VertexMismatch {
            xs: n,
            ys: vy.len(),
        });
    }
    if n < 3 {
        return Err(DrawError::TooFewVertices(n));
    }

    if scratch.len() < n {
        scratch.resize(n, 0);
    }

    let mut miny = i32::from(vy[0]);
    let mut maxy = i32::from(vy[0]);
    for &v in &vy[1..] {
        let v = i32::from(v);
        if v < miny {
            miny = v;
        } else if v > maxy {
            maxy = v;
        }
    }

    t.set_color(r, g, b, a)?;

    for y in miny..=maxy {
        let mut ints = 0usize;
        for i in 0..n {
            let (ind1, ind2) = if i == 0 { (n - 1, 0) } else { (i - 1, i) };
            let mut y1 = i32::from(vy[ind1]);
            let mut y2 = i32::from(vy[ind2]);
            let (x1, x2);
            if y1 < y2 {
                x1 = i32::from(vx[ind1]);
                x2 = i32::from(vx[ind2]);
            } else if y1 > y2 {
                y2 = i32::from(vy[ind1]);
                y1 = i32::from(vy[ind2]);
                x2 = i32::from(vx[ind1]);
                x1 = i32::from(vx[ind2]);
            } else {
                // Horizontal edge, never crosses a scanline.
                continue;
            }
            if (y >= y1 && y < y2) || (y == maxy && y > y1 && y <= y2) {
                scratch[ints] = ((65536 * (y - y1)) / (y2 - y1)) * (x2 - x1) + (65536 * x1);
                ints += 1;
            }
        }

        scratch[..ints].sort_unstable();

        for pair in scratch[..ints].chunks_exact(2) {
            let xa = pair[0] + 1;
            let xa = (xa >> 16) + ((xa & 32768) >> 15);
            let xb = pair[1] - 1;
            let xb = (xb >> 16) + ((xb & 32768) >> 15);
            t.hline(xa, xb, y)?;
        }
    }

    Ok(())
}

/// Fill a triangle. This is [`fill_polygon`] specialized to three vertices.
pub fn fill_triangle<T: RasterTarget + ?Sized>(
    t: &mut T,
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
    scratch: &mut Vec<i32>,
) -> Result<(), DrawError> {
    fill_polygon(t, &[x1, x2, x3], &[y1, y2, y3], r, g, b, a, scratch)
}
