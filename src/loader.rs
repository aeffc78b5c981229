// Asynchronous source-image loading.
//
// Decodes run on short-lived background threads; results come home over a
// channel that the frame driver drains once per tick. Rendering never
// waits: flat placeholder images are installed synchronously at startup,
// and a failed load just leaves whatever the slot already holds. Loads
// are not retried.

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

use image::imageops::FilterType;

use crate::config::{MAX_TEXTURE_EDGE, PLACEHOLDER_BOTTOM, PLACEHOLDER_TOP};
use crate::error::Error;
use crate::types::FrameBuffer;

/// Which of the two blend slots an image occupies.
/// Visual: the trail wipes the Bottom image through the Top one.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Role {
    Top,
    Bottom,
}

impl Role {
    fn index(self) -> usize {
        match self {
            Role::Top => 0,
            Role::Bottom => 1,
        }
    }
}

/// One decoded source picture, ready for sampling.
pub struct SourceImage {
    pub role: Role,
    /// Stored buffer; the longer edge is bounded to MAX_TEXTURE_EDGE.
    pub pixels: FrameBuffer,
    /// Size before any bounding resize. Aspect math must use this, not the
    /// stored buffer's size, or clamped images would render distorted.
    pub native_size: (u32, u32),
}

impl SourceImage {
    /// Flat single-color fill, shown until the real image arrives.
    fn placeholder(role: Role, color: u32) -> Self {
        let side = 64;
        Self {
            role,
            pixels: FrameBuffer {
                width: side,
                height: side,
                pixels: vec![color; side * side],
            },
            native_size: (side as u32, side as u32),
        }
    }

    /// Native width over native height.
    pub fn aspect(&self) -> f32 {
        self.native_size.0 as f32 / self.native_size.1 as f32
    }

    /// Pack a decoded image, downscaling proportionally if either edge
    /// exceeds `max_edge`, and keeping the pre-resize size on the side.
    fn from_decoded(role: Role, img: image::DynamicImage, max_edge: u32) -> Self {
        let native = (img.width(), img.height());
        let (w, h) = bounded_dimensions(native.0, native.1, max_edge);
        let img = if (w, h) != native {
            log::info!(
                "{role:?} image {}x{} exceeds max edge {max_edge}, storing {w}x{h}",
                native.0,
                native.1
            );
            img.resize_exact(w, h, FilterType::Triangle)
        } else {
            img
        };

        let rgb = img.to_rgb8();
        let mut pixels = Vec::with_capacity((w as usize) * (h as usize));
        for p in rgb.pixels() {
            // Pack as 0x00RRGGBB for the compositor.
            pixels.push(((p[0] as u32) << 16) | ((p[1] as u32) << 8) | (p[2] as u32));
        }

        Self {
            role,
            pixels: FrameBuffer {
                width: w as usize,
                height: h as usize,
                pixels,
            },
            native_size: native,
        }
    }
}

/// Proportional downscale so the longer edge equals `max_edge`; a no-op
/// when the image is already within bounds. Aspect ratio is preserved,
/// except that the short edge never drops below one pixel: a 8000x1
/// banner must not round down to a zero-height buffer the sampler would
/// choke on.
pub fn bounded_dimensions(w: u32, h: u32, max_edge: u32) -> (u32, u32) {
    if w <= max_edge && h <= max_edge {
        return (w, h);
    }
    if w > h {
        (max_edge, ((h as u64 * max_edge as u64 / w as u64) as u32).max(1))
    } else {
        (((w as u64 * max_edge as u64 / h as u64) as u32).max(1), max_edge)
    }
}

struct LoadResult {
    role: Role,
    outcome: Result<SourceImage, Error>,
}

/// Owns the two image slots and the channel the decode threads report on.
pub struct ImageLoader {
    slots: [SourceImage; 2],
    loaded: [bool; 2],
    tx: Sender<LoadResult>,
    rx: Receiver<LoadResult>,
}

impl ImageLoader {
    /// Installs the placeholders synchronously: the compositor has a valid
    /// sample source for both roles before any load even starts.
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            slots: [
                SourceImage::placeholder(Role::Top, PLACEHOLDER_TOP),
                SourceImage::placeholder(Role::Bottom, PLACEHOLDER_BOTTOM),
            ],
            loaded: [false; 2],
            tx,
            rx,
        }
    }

    /// Kick off a decode on a background thread; returns immediately.
    pub fn spawn_load(&self, path: impl Into<PathBuf>, role: Role) {
        let path = path.into();
        let tx = self.tx.clone();
        thread::spawn(move || {
            let outcome = image::open(&path)
                .map(|img| SourceImage::from_decoded(role, img, MAX_TEXTURE_EDGE))
                .map_err(|source| Error::ImageLoad { path, source });
            // The receiver is gone if the loader was torn down while we
            // decoded; completing after teardown must be a no-op.
            let _ = tx.send(LoadResult { role, outcome });
        });
    }

    /// Drain finished loads; called once per frame tick. A success replaces
    /// the slot wholesale (a single struct move), so a sampler holding the
    /// old image for the rest of the frame never observes a half-updated
    /// one. A failure keeps the slot as-is.
    pub fn poll(&mut self) {
        while let Ok(done) = self.rx.try_recv() {
            match done.outcome {
                Ok(img) => {
                    log::info!(
                        "{:?} image ready: {}x{} native, {}x{} stored",
                        img.role,
                        img.native_size.0,
                        img.native_size.1,
                        img.pixels.width,
                        img.pixels.height
                    );
                    let slot = img.role.index();
                    self.slots[slot] = img;
                    self.loaded[slot] = true;
                }
                Err(e) => {
                    log::warn!("{e}; keeping current {:?} image", done.role);
                }
            }
        }
    }

    pub fn get(&self, role: Role) -> &SourceImage {
        &self.slots[role.index()]
    }

    /// True once at least one real image has replaced its placeholder.
    pub fn any_loaded(&self) -> bool {
        self.loaded.iter().any(|&l| l)
    }
}
