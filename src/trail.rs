// The trail field: a decaying record of recent pointer motion, stepped
// with ping-pong buffers.
//
// Each step is a whole-field transform that reads the previous surface,
// so two surfaces are mandatory: writing in place would mix this step's
// output into its own input. `current` always indexes the surface that
// was written last; the roles swap on every step, never skipping.
//
// Visual: dragging the pointer leaves a soft bright streak that fades
// out over a second or two; faster drags leave wider, stronger streaks.

use crate::config::{DECAY_FACTOR, TRAIL_FIELD_SIZE};
use crate::pointer::PointerState;

/// Splat strength per unit of pointer speed (unit coords per frame).
const INJECTION_GAIN: f32 = 12.0;
/// Splat radius when the pointer barely moves, in unit coordinates.
const INJECTION_BASE_RADIUS: f32 = 0.02;
/// Extra radius per unit of pointer speed.
const INJECTION_SPREAD: f32 = 0.3;

pub struct TrailField {
    size: usize,
    surfaces: [Vec<f32>; 2],
    current: usize,
    decay: f32,
}

impl TrailField {
    /// Field at the stock simulation resolution. The resolution is fixed
    /// for the life of the field and independent of the window size.
    pub fn new() -> Self {
        Self::with_size(TRAIL_FIELD_SIZE, DECAY_FACTOR)
    }

    pub fn with_size(size: usize, decay: f32) -> Self {
        let cells = size * size;
        Self {
            size,
            surfaces: [vec![0.0; cells], vec![0.0; cells]],
            current: 0,
            decay,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Which surface was written last (alternates 0,1,0,1,... per step).
    #[cfg(test)]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Read-only view of the last written surface, row 0 at the bottom.
    #[cfg(test)]
    pub fn current_values(&self) -> &[f32] {
        &self.surfaces[self.current]
    }

    /// Advance the field by one frame: decay everywhere, then splat the
    /// pointer's motion in if it is moving.
    pub fn step(&mut self, pointer: &PointerState) {
        // Strict alternation: read what we wrote last step, write the other.
        let previous = self.current;
        self.current = 1 - previous;

        let (head, tail) = self.surfaces.split_at_mut(1);
        let (prev, target) = if previous == 0 {
            (&head[0], &mut tail[0])
        } else {
            (&tail[0], &mut head[0])
        };

        // Pure decay first. With no injection this is the whole step and
        // the field converges toward zero.
        for (dst, src) in target.iter_mut().zip(prev.iter()) {
            *dst = src * self.decay;
        }

        if !pointer.is_moving {
            return;
        }
        let (dx, dy) = pointer.displacement();
        let speed = (dx * dx + dy * dy).sqrt();
        if speed <= 0.0 {
            return;
        }

        // Faster motion injects a stronger, wider splat along the segment
        // the pointer covered this frame.
        let strength = (speed * INJECTION_GAIN).min(1.0);
        let sigma = INJECTION_BASE_RADIUS + speed * INJECTION_SPREAD;
        splat_segment(
            target,
            self.size,
            pointer.previous_position,
            pointer.position,
            strength,
            sigma,
        );
    }

    /// Bilinear sample at (u,v) in unit coordinates, origin bottom-left.
    /// Coordinates clamp to the field edge: trails never wrap around.
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        let field = &self.surfaces[self.current];
        let n = self.size;
        let max = (n - 1) as f32;

        let x = (u * n as f32 - 0.5).clamp(0.0, max);
        let y = (v * n as f32 - 0.5).clamp(0.0, max);
        let x0 = x.floor() as usize;
        let y0 = y.floor() as usize;
        let x1 = (x0 + 1).min(n - 1);
        let y1 = (y0 + 1).min(n - 1);
        let fx = x - x0 as f32;
        let fy = y - y0 as f32;

        let v00 = field[y0 * n + x0];
        let v10 = field[y0 * n + x1];
        let v01 = field[y1 * n + x0];
        let v11 = field[y1 * n + x1];

        let top = v00 + (v10 - v00) * fx;
        let bot = v01 + (v11 - v01) * fx;
        top + (bot - top) * fy
    }

    /// Overwrite every cell of the current surface (test scaffolding).
    #[cfg(test)]
    pub fn fill(&mut self, value: f32) {
        for cell in &mut self.surfaces[self.current] {
            *cell = value;
        }
    }
}

/// Add a Gaussian splat along the segment p0 -> p1 into `field`, clamping
/// the result to 1.0. Only the cells inside the splat's padded bounding
/// box are touched.
fn splat_segment(
    field: &mut [f32],
    size: usize,
    p0: (f32, f32),
    p1: (f32, f32),
    strength: f32,
    sigma: f32,
) {
    let n = size as f32;
    let pad = sigma * 3.0;
    let min_x = (((p0.0.min(p1.0) - pad) * n).floor().max(0.0)) as usize;
    let min_y = (((p0.1.min(p1.1) - pad) * n).floor().max(0.0)) as usize;
    let max_x = ((((p0.0.max(p1.0) + pad) * n).ceil()) as usize).min(size - 1);
    let max_y = ((((p0.1.max(p1.1) + pad) * n).ceil()) as usize).min(size - 1);

    let denom = 2.0 * sigma * sigma;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let u = (x as f32 + 0.5) / n;
            let v = (y as f32 + 0.5) / n;
            let d = distance_to_segment((u, v), p0, p1);
            let w = (-(d * d) / denom).exp() * strength;
            let cell = &mut field[y * size + x];
            *cell = (*cell + w).min(1.0);
        }
    }
}

/// Distance from point p to the segment a -> b, all in unit coordinates.
fn distance_to_segment(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let (abx, aby) = (b.0 - a.0, b.1 - a.1);
    let (apx, apy) = (p.0 - a.0, p.1 - a.1);
    let len2 = abx * abx + aby * aby;
    let t = if len2 > 0.0 {
        ((apx * abx + apy * aby) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a.0 + abx * t, a.1 + aby * t);
    let (dx, dy) = (p.0 - cx, p.1 - cy);
    (dx * dx + dy * dy).sqrt()
}
