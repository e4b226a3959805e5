use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::shared::float_frame::{FloatFrame, CHANNELS};
use crate::shared::mask::Mask;

/// Extra damping on mask-scaled grain so noise never dominates the retouch.
const MASK_DAMPING: f32 = 0.6;

/// Adds zero-mean synthetic grain confined to skin regions, masking any
/// residual over-smoothed look.
///
/// Noise is drawn per channel from a normal distribution whose sigma comes
/// from the grain parameter (normalized to channel range), then scaled by
/// the skin mask and a fixed damping factor before being added and clamped.
/// The generator is seeded per session, so a session is reproducible.
pub struct GrainSynthesizer {
    sigma: f32,
    rng: StdRng,
}

impl GrainSynthesizer {
    pub fn new(grain: u32, seed: u64) -> Self {
        Self {
            sigma: grain as f32 / 255.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    pub fn sprinkle(&mut self, frame: &FloatFrame, skin: &Mask) -> FloatFrame {
        if self.sigma == 0.0 {
            return frame.clone();
        }
        debug_assert_eq!(frame.width(), skin.width());
        debug_assert_eq!(frame.height(), skin.height());

        let normal = Normal::new(0.0f32, self.sigma).expect("sigma is finite and positive");
        let mut out = frame.clone();
        for (i, &strength) in skin.data().iter().enumerate() {
            if strength == 0.0 {
                continue;
            }
            let base = i * CHANNELS;
            for c in 0..CHANNELS {
                let noise = normal.sample(&mut self.rng);
                let v = out.data()[base + c] + noise * strength * MASK_DAMPING;
                out.data_mut()[base + c] = v.clamp(0.0, 1.0);
            }
        }
        out
    }
}
