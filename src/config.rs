// Build-time tuning constants. One place to turn knobs.

use std::time::Duration;

/// Side length of the square trail field, in cells.
/// Visual: higher = crisper trails; cost per step is independent of window size.
pub const TRAIL_FIELD_SIZE: usize = 500;

/// Per-step multiplicative fade of the trail field, in (0,1).
/// Visual: 0.97 keeps trails alive ~1–2 seconds; closer to 1.0 = longer-lived.
pub const DECAY_FACTOR: f32 = 0.97;

/// Longest edge we will keep after decoding a source image.
/// Protects the sampler from absurd buffers; aspect math still uses native size.
pub const MAX_TEXTURE_EDGE: u32 = 4096;

/// Pointer counts as stopped after this long without a move event.
pub const IDLE_TIMEOUT: Duration = Duration::from_millis(50);

/// Window size at startup (the window itself is resizable).
pub const WINDOW_WIDTH: usize = 960;
pub const WINDOW_HEIGHT: usize = 540;

/// Flat placeholder colors shown until the real images arrive (0x00RRGGBB).
/// Visual: a blue screen that the pointer wipes into red, until loads finish.
pub const PLACEHOLDER_TOP: u32 = 0x00_00_00_FF;
pub const PLACEHOLDER_BOTTOM: u32 = 0x00_FF_00_00;

/// Default asset paths when no CLI arguments are given.
pub const DEFAULT_TOP_IMAGE: &str = "assets/portrait_top.jpg";
pub const DEFAULT_BOTTOM_IMAGE: &str = "assets/portrait_bottom.jpg";
