// Shared pixel-buffer type used by the compositor and the window.

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // frame width in pixels
    pub height: usize,     // frame height in pixels
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// Allocate a black buffer of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }
}
