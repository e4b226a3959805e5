use crate::shared::filters;
use crate::shared::float_frame::{FloatFrame, CHANNELS};

/// Radius of the fixed low-pass used to extract the high-pass signal.
/// Independent of the main smoothing radius so texture and blemish removal
/// tune separately.
const HIGH_PASS_RADIUS: usize = 3;

/// Adds back the fine texture the smoother removed.
///
/// High-pass = original minus a small fixed-radius low-pass of the original;
/// the result is added onto the smoothed frame scaled by a gain that grows
/// monotonically with the texture-preserve parameter.
pub struct DetailRecoverer {
    gain: f32,
    kernel: Vec<f32>,
}

impl DetailRecoverer {
    pub fn new(texture_preserve: u32) -> Self {
        Self {
            gain: 0.2 + 0.006 * texture_preserve as f32,
            kernel: filters::gaussian_kernel_1d(2 * HIGH_PASS_RADIUS + 1),
        }
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn recover(&self, original: &FloatFrame, smoothed: &FloatFrame) -> FloatFrame {
        debug_assert_eq!(original.width(), smoothed.width());
        debug_assert_eq!(original.height(), smoothed.height());

        let mut low_pass = original.clone();
        filters::separable_blur(
            low_pass.data_mut(),
            original.width() as usize,
            original.height() as usize,
            CHANNELS,
            &self.kernel,
        );

        let data = original
            .data()
            .iter()
            .zip(low_pass.data())
            .zip(smoothed.data())
            .map(|((&orig, &low), &smooth)| (smooth + (orig - low) * self.gain).clamp(0.0, 1.0))
            .collect();

        FloatFrame::new(data, original.width(), original.height())
    }
}
