// Window wrapper so the frame loop stays clean.

use minifb::{Key, MouseMode, Window, WindowOptions};

use crate::error::Error;
use crate::types::FrameBuffer;

pub struct Screen {
    window: Window, // the on-screen window you see
}

impl Screen {
    /// Open a resizable window.
    /// Visual: pops up black until the first composite lands.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let opts = WindowOptions {
            resize: true,
            ..WindowOptions::default()
        };
        let window = Window::new(title, width, height, opts)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window })
    }

    /// Hand the finished composite to the window. The buffer's dimensions
    /// ride along because the window is resizable and the backing size
    /// can differ from the size it opened at.
    pub fn present(&mut self, fb: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&fb.pixels, fb.width, fb.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }

    /// False once the window has been closed; the frame loop's exit signal.
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// The other exit signal: ESC held down.
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Raw pointer position in window pixel coordinates, unclamped:
    /// positions outside the client area pass through as-is and get
    /// rejected by the tracker's bounds check, not here.
    pub fn pointer_pos(&self) -> Option<(f32, f32)> {
        self.window.get_mouse_pos(MouseMode::Pass)
    }

    /// Current client size in physical pixels (the window is resizable,
    /// so this can change between frames).
    pub fn size(&self) -> (usize, usize) {
        self.window.get_size()
    }
}
