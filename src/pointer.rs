// Pointer tracking: raw window coordinates in, unit-square coordinates out.
//
// The simulation uses texture convention (origin bottom-left), so the
// vertical axis is flipped here, once, at this boundary. Only a single
// pointer is tracked; whatever input source feeds this (mouse today,
// a first touch point tomorrow) goes through the same state.

use std::time::Instant;

use crate::config::IDLE_TIMEOUT;

pub struct PointerState {
    /// Current position, (u,v) in [0,1]^2 with origin bottom-left.
    pub position: (f32, f32),
    /// Position at the previous accepted sample; the field step derives
    /// injection strength from the displacement between the two.
    pub previous_position: (f32, f32),
    /// True while the pointer is actively moving over the surface.
    /// Visual: injection only happens while this is set.
    pub is_moving: bool,
    last_move: Instant,
}

impl PointerState {
    pub fn new(now: Instant) -> Self {
        Self {
            position: (0.5, 0.5),
            previous_position: (0.5, 0.5),
            is_moving: false,
            last_move: now,
        }
    }

    /// Feed one raw pointer sample in window pixel coordinates.
    ///
    /// Samples outside the surface (or non-finite ones) stop injection but
    /// keep the last position, so the trail fades in place instead of
    /// jumping when the pointer leaves the window.
    pub fn pointer_event(
        &mut self,
        raw_x: f32,
        raw_y: f32,
        surface: (usize, usize),
        now: Instant,
    ) {
        let (w, h) = (surface.0 as f32, surface.1 as f32);
        // NaN fails every comparison, so malformed samples land here too.
        let in_bounds =
            w > 0.0 && h > 0.0 && raw_x >= 0.0 && raw_x <= w && raw_y >= 0.0 && raw_y <= h;
        if !in_bounds {
            self.is_moving = false;
            return;
        }

        // Capture the old position *before* overwriting it.
        self.previous_position = self.position;
        self.position = (raw_x / w, 1.0 - raw_y / h); // flip to bottom-left origin
        self.is_moving = true;
        self.last_move = now;
    }

    /// Called once per frame by the driver: a pointer that has produced no
    /// event for IDLE_TIMEOUT stops injecting, even though no "stop" event
    /// will ever arrive.
    pub fn check_idle(&mut self, now: Instant) {
        if self.is_moving && now.duration_since(self.last_move) > IDLE_TIMEOUT {
            self.is_moving = false;
        }
    }

    /// Displacement since the previous accepted sample, in unit coordinates.
    pub fn displacement(&self) -> (f32, f32) {
        (
            self.position.0 - self.previous_position.0,
            self.position.1 - self.previous_position.1,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const SURFACE: (usize, usize) = (200, 100);

    #[test]
    fn accepted_update_captures_previous_position() {
        let t0 = Instant::now();
        let mut p = PointerState::new(t0);

        p.pointer_event(50.0, 25.0, SURFACE, t0);
        let before = p.position;

        p.pointer_event(150.0, 75.0, SURFACE, t0);
        assert_eq!(p.previous_position, before);
        assert!(p.is_moving);
    }

    #[test]
    fn vertical_axis_is_flipped() {
        let t0 = Instant::now();
        let mut p = PointerState::new(t0);

        // Top edge of the window maps to v = 1.0, bottom edge to v = 0.0.
        p.pointer_event(100.0, 0.0, SURFACE, t0);
        assert_eq!(p.position, (0.5, 1.0));
        p.pointer_event(100.0, 100.0, SURFACE, t0);
        assert_eq!(p.position, (0.5, 0.0));
    }

    #[test]
    fn out_of_bounds_drops_update_and_clears_moving() {
        let t0 = Instant::now();
        let mut p = PointerState::new(t0);
        p.pointer_event(50.0, 25.0, SURFACE, t0);
        let held = p.position;

        p.pointer_event(-1.0, 25.0, SURFACE, t0);
        assert!(!p.is_moving);
        assert_eq!(p.position, held);

        p.pointer_event(50.0, 101.0, SURFACE, t0);
        assert!(!p.is_moving);
        assert_eq!(p.position, held);
    }

    #[test]
    fn malformed_samples_are_silently_ignored() {
        let t0 = Instant::now();
        let mut p = PointerState::new(t0);
        p.pointer_event(50.0, 25.0, SURFACE, t0);
        let held = p.position;

        p.pointer_event(f32::NAN, 25.0, SURFACE, t0);
        assert!(!p.is_moving);
        assert_eq!(p.position, held);
    }

    #[test]
    fn idle_timeout_boundary_is_50ms() {
        let t0 = Instant::now();
        let mut p = PointerState::new(t0);
        p.pointer_event(50.0, 25.0, SURFACE, t0);

        p.check_idle(t0 + Duration::from_millis(49));
        assert!(p.is_moving, "still moving just before the timeout");

        p.check_idle(t0 + Duration::from_millis(51));
        assert!(!p.is_moving, "idle just after the timeout");
    }
}
