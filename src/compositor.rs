// The display pass: one software sweep over the whole window buffer that
// turns the trail field plus the two source images into the frame you see.
//
// Per pixel: sample the trail field for a blend weight, sample both images
// through cover mapping (fill the window, crop the overflow, never
// stretch), then mix the two samples in linear light.
//
// Visual: where the trail is cold you see the top picture; where the
// pointer recently passed, the bottom picture shows through with soft,
// halo-free edges.

use crate::gamma::SrgbLut;
use crate::loader::SourceImage;
use crate::trail::TrailField;
use crate::types::FrameBuffer;

pub struct Compositor {
    width: usize,
    height: usize,
    lut: SrgbLut,
}

impl Compositor {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            lut: SrgbLut::new(),
        }
    }

    /// Re-derive pass dimensions after a window resize. The trail field is
    /// deliberately not told about this; its resolution is fixed.
    pub fn set_surface_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    /// Render one frame into `fb` (which must match the surface size).
    pub fn render(
        &self,
        fb: &mut FrameBuffer,
        field: &TrailField,
        top: &SourceImage,
        bottom: &SourceImage,
    ) {
        debug_assert_eq!(fb.width, self.width);
        debug_assert_eq!(fb.height, self.height);

        let surface_aspect = self.width as f32 / self.height as f32;
        let top_aspect = top.aspect();
        let bottom_aspect = bottom.aspect();

        for y in 0..self.height {
            // Screen rows run top-down; the field uses bottom-left origin.
            let v_down = (y as f32 + 0.5) / self.height as f32;
            let v_up = 1.0 - v_down;
            let row = y * self.width;

            for x in 0..self.width {
                let u = (x as f32 + 0.5) / self.width as f32;

                let trail = field.sample(u, v_up);
                let weight = smoothstep(trail);

                let (tu, tv) = cover_uv(u, v_down, top_aspect, surface_aspect);
                let (bu, bv) = cover_uv(u, v_down, bottom_aspect, surface_aspect);
                let a = sample_bilinear(&top.pixels, tu, tv);
                let b = sample_bilinear(&bottom.pixels, bu, bv);

                fb.pixels[row + x] = self.mix_linear(a, b, weight);
            }
        }
    }

    /// Blend two packed sRGB pixels in linear light; t=0 gives `a`.
    fn mix_linear(&self, a: (u8, u8, u8), b: (u8, u8, u8), t: f32) -> u32 {
        let inv = 1.0 - t;
        let r = self.lut.decode(a.0) * inv + self.lut.decode(b.0) * t;
        let g = self.lut.decode(a.1) * inv + self.lut.decode(b.1) * t;
        let bl = self.lut.decode(a.2) * inv + self.lut.decode(b.2) * t;
        ((self.lut.encode(r) as u32) << 16)
            | ((self.lut.encode(g) as u32) << 8)
            | (self.lut.encode(bl) as u32)
    }
}

/// Map a surface coordinate to an image coordinate under cover mapping:
/// the image fills the surface completely, overflow is center-cropped,
/// aspect is never distorted.
///
/// An image wider than the surface fits to height and crops width; an
/// image taller than the surface fits to width and crops height.
pub fn cover_uv(u: f32, v: f32, image_aspect: f32, surface_aspect: f32) -> (f32, f32) {
    if image_aspect > surface_aspect {
        let scale = surface_aspect / image_aspect;
        (0.5 + (u - 0.5) * scale, v)
    } else {
        let scale = image_aspect / surface_aspect;
        (u, 0.5 + (v - 0.5) * scale)
    }
}

/// Hermite smoothstep of t clamped to [0,1].
fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Bilinear sample of a packed 0x00RRGGBB buffer at (u,v), edge-clamped.
fn sample_bilinear(img: &FrameBuffer, u: f32, v: f32) -> (u8, u8, u8) {
    let max_x = (img.width - 1) as f32;
    let max_y = (img.height - 1) as f32;
    let x = (u * img.width as f32 - 0.5).clamp(0.0, max_x);
    let y = (v * img.height as f32 - 0.5).clamp(0.0, max_y);
    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(img.width - 1);
    let y1 = (y0 + 1).min(img.height - 1);
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let lerp2 = |c00: u8, c10: u8, c01: u8, c11: u8| -> u8 {
        let top = c00 as f32 + (c10 as f32 - c00 as f32) * fx;
        let bot = c01 as f32 + (c11 as f32 - c01 as f32) * fx;
        (top + (bot - top) * fy).round().clamp(0.0, 255.0) as u8
    };

    let p00 = channels(img.pixels[y0 * img.width + x0]);
    let p10 = channels(img.pixels[y0 * img.width + x1]);
    let p01 = channels(img.pixels[y1 * img.width + x0]);
    let p11 = channels(img.pixels[y1 * img.width + x1]);

    (
        lerp2(p00.0, p10.0, p01.0, p11.0),
        lerp2(p00.1, p10.1, p01.1, p11.1),
        lerp2(p00.2, p10.2, p01.2, p11.2),
    )
}

#[inline]
fn channels(px: u32) -> (u8, u8, u8) {
    (
        ((px >> 16) & 0xFF) as u8,
        ((px >> 8) & 0xFF) as u8,
        (px & 0xFF) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PLACEHOLDER_BOTTOM, PLACEHOLDER_TOP};
    use crate::loader::{ImageLoader, Role};

    #[test]
    fn cover_crops_wide_image_to_centered_half_width() {
        // aspect 2.0 image on a square surface: full height, u in [0.25, 0.75].
        let (u0, v0) = cover_uv(0.0, 0.3, 2.0, 1.0);
        let (u1, v1) = cover_uv(1.0, 0.7, 2.0, 1.0);
        assert!((u0 - 0.25).abs() < 1e-6);
        assert!((u1 - 0.75).abs() < 1e-6);
        assert_eq!(v0, 0.3);
        assert_eq!(v1, 0.7);
    }

    #[test]
    fn cover_crops_tall_image_to_centered_half_height() {
        // aspect 1.0 image on a 2:1 surface: full width, v in [0.25, 0.75].
        let (u0, v0) = cover_uv(0.4, 0.0, 1.0, 2.0);
        let (u1, v1) = cover_uv(0.6, 1.0, 1.0, 2.0);
        assert_eq!(u0, 0.4);
        assert_eq!(u1, 0.6);
        assert!((v0 - 0.25).abs() < 1e-6);
        assert!((v1 - 0.75).abs() < 1e-6);
    }

    #[test]
    fn matching_aspects_sample_the_whole_image() {
        let (u, v) = cover_uv(0.0, 1.0, 1.5, 1.5);
        assert_eq!((u, v), (0.0, 1.0));
    }

    #[test]
    fn cold_field_shows_only_the_top_image() {
        let loader = ImageLoader::new();
        let field = crate::trail::TrailField::with_size(8, 0.9);
        let compositor = Compositor::new(16, 16);
        let mut fb = FrameBuffer::new(16, 16);

        compositor.render(
            &mut fb,
            &field,
            loader.get(Role::Top),
            loader.get(Role::Bottom),
        );
        assert!(fb.pixels.iter().all(|&px| px == PLACEHOLDER_TOP));
    }

    #[test]
    fn saturated_field_shows_only_the_bottom_image() {
        let loader = ImageLoader::new();
        let mut field = crate::trail::TrailField::with_size(8, 0.9);
        field.fill(1.0);
        let compositor = Compositor::new(16, 16);
        let mut fb = FrameBuffer::new(16, 16);

        compositor.render(
            &mut fb,
            &field,
            loader.get(Role::Top),
            loader.get(Role::Bottom),
        );
        assert!(fb.pixels.iter().all(|&px| px == PLACEHOLDER_BOTTOM));
    }

    #[test]
    fn resize_updates_pass_dimensions() {
        let loader = ImageLoader::new();
        let field = crate::trail::TrailField::with_size(8, 0.9);
        let mut compositor = Compositor::new(16, 16);
        compositor.set_surface_size(10, 20);
        let mut fb = FrameBuffer::new(10, 20);

        compositor.render(
            &mut fb,
            &field,
            loader.get(Role::Top),
            loader.get(Role::Bottom),
        );
        assert!(fb.pixels.iter().all(|&px| px == PLACEHOLDER_TOP));
    }
}
