// Trail wipe: pointer motion smears a decaying trail that reveals the
// bottom picture through the top one.
//
// What you SEE:
// • The window opens immediately on flat placeholders (blue over red);
//   dragging the pointer wipes red streaks through the blue.
// • As each photograph finishes loading in the background it swaps in,
//   and the same wipe runs on the real pictures. ESC quits.
//
// The loop never waits on the loads: interactivity must not stall on I/O.

mod compositor;
mod config;
mod error;
mod gamma;
mod loader;
mod pointer;
mod trail;
mod types;
mod window;

use std::time::{Duration, Instant};

use compositor::Compositor;
use config::{DEFAULT_BOTTOM_IMAGE, DEFAULT_TOP_IMAGE, WINDOW_HEIGHT, WINDOW_WIDTH};
use error::Error;
use loader::{ImageLoader, Role};
use pointer::PointerState;
use trail::TrailField;
use types::FrameBuffer;
use window::Screen;

fn main() -> Result<(), Error> {
    env_logger::init();

    /* --- Source image paths: first two CLI args, or the stock portraits --- */
    let mut args = std::env::args().skip(1);
    let top_path = args.next().unwrap_or_else(|| DEFAULT_TOP_IMAGE.to_string());
    let bottom_path = args
        .next()
        .unwrap_or_else(|| DEFAULT_BOTTOM_IMAGE.to_string());

    /* --- Window + screen buffer ---
       Visual: the window appears right away, before any image is ready. */
    let mut screen = Screen::new("Trail Wipe", WINDOW_WIDTH, WINDOW_HEIGHT)?;
    let mut fb = FrameBuffer::new(WINDOW_WIDTH, WINDOW_HEIGHT);
    log::info!("window {WINDOW_WIDTH}x{WINDOW_HEIGHT}");

    /* --- Components ---
       The loader installs flat placeholders synchronously, then the real
       decodes run on background threads. Nothing below blocks on them. */
    let mut loader = ImageLoader::new();
    loader.spawn_load(top_path, Role::Top);
    loader.spawn_load(bottom_path, Role::Bottom);

    let mut pointer = PointerState::new(Instant::now());
    let mut field = TrailField::new();
    let mut compositor = Compositor::new(WINDOW_WIDTH, WINDOW_HEIGHT);
    log::info!("trail field {n}x{n}", n = field.size());

    // minifb reports a position every frame, so we only treat a *changed*
    // position as a move event; otherwise the idle timeout would never fire.
    let mut last_raw: Option<(f32, f32)> = None;

    let mut running_logged = false; // placeholders -> real images, logged once

    /* --- FPS bookkeeping (debug log once per second) --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;

    /* ------------------------------ Main loop ------------------------------ */
    while screen.is_open() && !screen.esc_pressed() {
        let now = Instant::now();

        /* 1) Drain the asset channel: finished loads swap in wholesale,
           failures keep whatever the slot already shows. */
        loader.poll();
        if !running_logged && loader.any_loaded() {
            log::info!("first real image arrived");
            running_logged = true;
        }

        /* 2) Follow window resizes: new buffer + compositor dimensions.
           The trail field keeps its fixed simulation resolution. */
        let (w, h) = screen.size();
        if (w, h) != (fb.width, fb.height) && w > 0 && h > 0 {
            fb = FrameBuffer::new(w, h);
            compositor.set_surface_size(w, h);
            log::debug!("resized to {w}x{h}");
        }

        /* 3) Pointer sample for this tick, then the idle-timeout check. */
        if let Some(raw) = screen.pointer_pos() {
            if last_raw != Some(raw) {
                pointer.pointer_event(raw.0, raw.1, (fb.width, fb.height), now);
                last_raw = Some(raw);
            }
        }
        pointer.check_idle(now);

        /* 4) One simulation step, then one composite pass over the buffer.
           Step N always completes before the pass for frame N reads it. */
        field.step(&pointer);
        compositor.render(
            &mut fb,
            &field,
            loader.get(Role::Top),
            loader.get(Role::Bottom),
        );

        /* 5) Present to the window. */
        screen.present(&fb)?;

        /* 6) FPS counter */
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            log::debug!("FPS: {:.1}", frames_this_second as f32 / secs);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}
