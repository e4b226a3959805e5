use crate::shared::filters;
use crate::shared::float_frame::{FloatFrame, CHANNELS};

/// Radius of the box window used for the local mean (15x15).
const LOCAL_MEAN_RADIUS: usize = 7;

/// Pulls each pixel partway toward its neighborhood mean to tame blotchy
/// tone, without flattening local contrast.
///
/// `output = input - lambda * (input - local_mean)`. Lambda grows
/// monotonically with the tone-evenness parameter and stays far below 1
/// across the valid range, so the effect is deliberately subtle.
pub struct ToneEvener {
    lambda: f32,
}

impl ToneEvener {
    pub fn new(tone_evenness: u32) -> Self {
        Self {
            lambda: 0.05 + 0.0015 * tone_evenness as f32,
        }
    }

    pub fn lambda(&self) -> f32 {
        self.lambda
    }

    pub fn even(&self, frame: &FloatFrame) -> FloatFrame {
        let mut local_mean = frame.clone();
        filters::box_blur(
            local_mean.data_mut(),
            frame.width() as usize,
            frame.height() as usize,
            CHANNELS,
            LOCAL_MEAN_RADIUS,
        );

        let data = frame
            .data()
            .iter()
            .zip(local_mean.data())
            .map(|(&v, &mean)| (v - self.lambda * (v - mean)).clamp(0.0, 1.0))
            .collect();

        FloatFrame::new(data, frame.width(), frame.height())
    }
}
