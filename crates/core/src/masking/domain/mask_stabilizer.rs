use crate::shared::mask::Mask;

/// Weight on history in the stabilizer EMA.
pub const DEFAULT_TEMPORAL_ALPHA: f32 = 0.6;

/// Temporal EMA over the raw skin mask.
///
/// Formula: `stabilized = alpha * previous + (1 - alpha) * raw`, with alpha
/// weighting history. The first frame of a session passes through unchanged.
/// Suppresses boundary flicker from detector jitter at the cost of one frame
/// of lag on fast motion.
///
/// This is the only cross-frame state in the pipeline. One instance per
/// session; concurrent sessions each own their own.
pub struct MaskStabilizer {
    alpha: f32,
    previous: Option<Mask>,
}

impl MaskStabilizer {
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
            previous: None,
        }
    }

    /// Folds the current raw mask into the carried state and returns the
    /// stabilized mask.
    pub fn stabilize(&mut self, raw: &Mask) -> Mask {
        let stabilized = match &self.previous {
            None => raw.clone(),
            Some(prev) => {
                debug_assert_eq!(prev.width(), raw.width());
                debug_assert_eq!(prev.height(), raw.height());
                let data = prev
                    .data()
                    .iter()
                    .zip(raw.data())
                    .map(|(&p, &r)| self.alpha * p + (1.0 - self.alpha) * r)
                    .collect();
                let mut mask = Mask::new(data, raw.width(), raw.height());
                mask.clamp();
                mask
            }
        };
        self.previous = Some(stabilized.clone());
        stabilized
    }

    /// Drops the carried state, as at the start of a new video session.
    pub fn reset(&mut self) {
        self.previous = None;
    }
}

impl Default for MaskStabilizer {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPORAL_ALPHA)
    }
}
