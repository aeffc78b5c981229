// sRGB <-> linear-light lookup tables.
//
// The compositor mixes the two pictures in linear light so trail edges
// blend without halos; tables replace powf in the per-pixel loop.
// Visual: identical to a powf implementation, just much faster.

const LINEAR_STEPS: usize = 4096;

pub struct SrgbLut {
    // sRGB(0..255) -> linear (0..1)
    to_linear: [f32; 256],
    // linear(0..1) -> sRGB(0..255), quantized to LINEAR_STEPS entries
    to_srgb: [u8; LINEAR_STEPS],
}

impl SrgbLut {
    /// Build both tables once at startup.
    pub fn new() -> Self {
        let mut to_linear = [0.0f32; 256];
        for (v, slot) in to_linear.iter_mut().enumerate() {
            let c = v as f32 / 255.0;
            *slot = if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            };
        }

        let mut to_srgb = [0u8; LINEAR_STEPS];
        for (i, slot) in to_srgb.iter_mut().enumerate() {
            let l = i as f32 / (LINEAR_STEPS - 1) as f32;
            let s = if l <= 0.003_130_8 {
                12.92 * l
            } else {
                1.055 * l.powf(1.0 / 2.4) - 0.055
            };
            *slot = (s * 255.0).round().clamp(0.0, 255.0) as u8;
        }

        Self { to_linear, to_srgb }
    }

    #[inline]
    pub fn decode(&self, v: u8) -> f32 {
        self.to_linear[v as usize]
    }

    #[inline]
    pub fn encode(&self, l: f32) -> u8 {
        let idx = (l.clamp(0.0, 1.0) * (LINEAR_STEPS - 1) as f32).round() as usize;
        self.to_srgb[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        let lut = SrgbLut::new();
        assert_eq!(lut.decode(0), 0.0);
        assert_eq!(lut.encode(0.0), 0);
        assert!((lut.decode(255) - 1.0).abs() < 1e-6);
        assert_eq!(lut.encode(1.0), 255);
    }

    #[test]
    fn round_trip_within_quantization() {
        let lut = SrgbLut::new();
        for v in 0..=255u8 {
            let back = lut.encode(lut.decode(v));
            assert!(
                (back as i32 - v as i32).abs() <= 1,
                "round trip of {v} gave {back}"
            );
        }
    }
}
