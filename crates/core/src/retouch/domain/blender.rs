use crate::shared::float_frame::{FloatFrame, CHANNELS};
use crate::shared::mask::Mask;

/// Fraction of the local amount that full protection removes. Deliberately
/// below 1: protection attenuates the effect but never zeroes it, so eyes
/// and lips keep a trace of the retouch instead of a visible seam.
pub const PROTECT_SUPPRESSION: f32 = 0.8;

/// Computes the per-pixel blend weight field and composites the processed
/// frame over the original.
///
/// `weight = skin * amount * (1 - k * protection * protect_param)` with
/// `k = 0.8`. Outside the skin mask the weight is zero and the original
/// passes through bit for bit; this is where "never replace the whole
/// frame" is enforced structurally.
pub struct Blender {
    amount: f32,
    protect: f32,
}

impl Blender {
    pub fn new(amount: u32, eye_lip_protect: u32) -> Self {
        Self {
            amount: amount as f32 / 100.0,
            protect: eye_lip_protect as f32 / 100.0,
        }
    }

    /// Derives the ephemeral blend weight field for one frame.
    pub fn weight_field(&self, skin: &Mask, protection: &Mask) -> Mask {
        debug_assert_eq!(skin.width(), protection.width());
        debug_assert_eq!(skin.height(), protection.height());

        let data = skin
            .data()
            .iter()
            .zip(protection.data())
            .map(|(&s, &p)| {
                let protect_strength = p * self.protect;
                let local_amount = self.amount * (1.0 - PROTECT_SUPPRESSION * protect_strength);
                (s * local_amount).clamp(0.0, 1.0)
            })
            .collect();

        Mask::new(data, skin.width(), skin.height())
    }

    /// Per-pixel linear interpolation between original and processed.
    pub fn composite(
        &self,
        original: &FloatFrame,
        processed: &FloatFrame,
        weights: &Mask,
    ) -> FloatFrame {
        debug_assert_eq!(original.width(), weights.width());
        debug_assert_eq!(original.height(), weights.height());

        let mut out = original.clone();
        for (i, w) in weights.data().iter().enumerate() {
            if *w == 0.0 {
                continue;
            }
            let base = i * CHANNELS;
            for c in 0..CHANNELS {
                let orig = original.data()[base + c];
                let proc = processed.data()[base + c];
                out.data_mut()[base + c] = (orig * (1.0 - w) + proc * w).clamp(0.0, 1.0);
            }
        }
        out
    }
}
