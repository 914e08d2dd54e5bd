//! # Drawing Surface
//!
//! An RGBA raster with canvas-style source-over compositing. Every drawing
//! operation takes a straight-alpha source and blends it over whatever is
//! already there, clipped to the surface bounds.

use image::{Rgba, RgbaImage};

use crate::color::Color;
use crate::font::GlyphRun;

#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    image: RgbaImage,
}

impl Surface {
    /// A fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    /// Reset to fully transparent, keeping the dimensions.
    pub fn clear(&mut self) {
        for p in self.image.pixels_mut() {
            *p = Rgba([0, 0, 0, 0]);
        }
    }

    /// Reallocate at new dimensions if they differ, then clear.
    pub fn reset(&mut self, width: u32, height: u32) {
        if self.width() != width || self.height() != height {
            self.image = RgbaImage::new(width, height);
        } else {
            self.clear();
        }
    }

    /// Blend `color` over the whole surface.
    pub fn fill(&mut self, color: Color) {
        let src = [color.r, color.g, color.b];
        for p in self.image.pixels_mut() {
            blend_over(p, src, color.a);
        }
    }

    /// Blend `color` over a rectangle; coordinates may lie partly outside.
    pub fn fill_rect(&mut self, x: i64, y: i64, w: u32, h: u32, color: Color) {
        let src = [color.r, color.g, color.b];
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w as i64).min(self.width() as i64);
        let y1 = (y + h as i64).min(self.height() as i64);

        for py in y0..y1 {
            for px in x0..x1 {
                blend_over(self.image.get_pixel_mut(px as u32, py as u32), src, color.a);
            }
        }
    }

    /// Vertical linear gradient, `top` at y=0 to `bottom` at y=height.
    pub fn vertical_gradient(&mut self, top: Color, bottom: Color) {
        let height = self.height().max(1) as f32;
        for y in 0..self.height() {
            let t = (y as f32 + 0.5) / height;
            let row = lerp_color(top, bottom, t);
            let src = [row.r, row.g, row.b];
            for x in 0..self.width() {
                blend_over(self.image.get_pixel_mut(x, y), src, row.a);
            }
        }
    }

    /// Draw `img` with its top-left corner at `(dx, dy)`, multiplying each
    /// source pixel's alpha by `global_alpha`.
    pub fn draw_image(&mut self, img: &RgbaImage, dx: i64, dy: i64, global_alpha: f32) {
        let global_alpha = global_alpha.clamp(0.0, 1.0);
        if global_alpha <= 0.0 {
            return;
        }

        for (sx, sy, p) in img.enumerate_pixels() {
            let tx = dx + sx as i64;
            let ty = dy + sy as i64;
            if tx < 0 || ty < 0 || tx >= self.width() as i64 || ty >= self.height() as i64 {
                continue;
            }
            let alpha = p[3] as f32 / 255.0 * global_alpha;
            blend_over(self.image.get_pixel_mut(tx as u32, ty as u32), [p[0], p[1], p[2]], alpha);
        }
    }

    /// Ink a glyph run in `color` with its buffer's top-left at `(left, top)`.
    pub fn draw_glyphs(&mut self, run: &GlyphRun, left: f32, top: f32, color: Color) {
        let ox = left.round() as i64;
        let oy = top.round() as i64;
        let src = [color.r, color.g, color.b];

        for gy in 0..run.height {
            let ty = oy + gy as i64;
            if ty < 0 || ty >= self.height() as i64 {
                continue;
            }
            for gx in 0..run.width {
                let tx = ox + gx as i64;
                if tx < 0 || tx >= self.width() as i64 {
                    continue;
                }
                let c = run.coverage[gy * run.width + gx];
                if c > 0.0 {
                    blend_over(self.image.get_pixel_mut(tx as u32, ty as u32), src, c * color.a);
                }
            }
        }
    }
}

/// Straight-alpha source-over.
#[inline]
fn blend_over(dst: &mut Rgba<u8>, src: [u8; 3], src_alpha: f32) {
    let sa = src_alpha.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    if sa >= 1.0 {
        *dst = Rgba([src[0], src[1], src[2], 255]);
        return;
    }

    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }

    let mut out = [0u8; 4];
    for c in 0..3 {
        let v = (src[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round() as u8;
    *dst = Rgba(out);
}

fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round().clamp(0.0, 255.0) as u8;
    Color {
        r: mix(a.r, b.r),
        g: mix(a.g, b.g),
        b: mix(a.b, b.b),
        a: a.a + (b.a - a.a) * t,
    }
}
