use crate::retouch::domain::frame_smoother::FrameSmoother;
use crate::shared::filters;
use crate::shared::float_frame::{FloatFrame, CHANNELS};

/// Hard ceiling on the bilateral window, in pixels at the filtered
/// resolution. The smoothness parameter can never push past this.
pub const MAX_DIAMETER: usize = 9;

/// Integer factor for the reduced-resolution pass.
const DOWNSCALE: usize = 2;

/// Range sigma in normalized channel units (OpenCV's 75 on a 0-255 scale).
const SIGMA_COLOR: f32 = 75.0 / 255.0;

/// CPU bilateral filter, run at half resolution and upsampled bilinearly.
///
/// Spatial weights fall off with distance, range weights with color
/// difference, so smoothing stops at strong edges while flattening
/// pore-level noise. The half-resolution pass bounds cost independently of
/// the configured radius; the diameter cap bounds it structurally.
pub struct CpuBilateralSmoother {
    diameter: usize,
    spatial: Vec<f32>,
    inv_two_sigma_color_sq: f32,
}

impl CpuBilateralSmoother {
    pub fn new(smoothness_radius: u32) -> Self {
        // Window grows slowly with the radius parameter and is forced odd.
        let raw = ((smoothness_radius as usize) / 8).max(3) | 1;
        let diameter = raw.min(MAX_DIAMETER);
        let sigma_space = diameter as f32 / 2.0;

        let half = (diameter / 2) as i32;
        let mut spatial = Vec::with_capacity(diameter * diameter);
        for dy in -half..=half {
            for dx in -half..=half {
                let dist_sq = (dx * dx + dy * dy) as f32;
                spatial.push((-dist_sq / (2.0 * sigma_space * sigma_space)).exp());
            }
        }

        Self {
            diameter,
            spatial,
            inv_two_sigma_color_sq: 1.0 / (2.0 * SIGMA_COLOR * SIGMA_COLOR),
        }
    }

    pub fn diameter(&self) -> usize {
        self.diameter
    }

    fn bilateral(&self, data: &[f32], width: usize, height: usize) -> Vec<f32> {
        let half = (self.diameter / 2) as isize;
        let mut out = vec![0.0f32; data.len()];

        for y in 0..height as isize {
            for x in 0..width as isize {
                let center = ((y * width as isize + x) as usize) * CHANNELS;
                let mut acc = [0.0f32; CHANNELS];
                let mut weight_sum = 0.0f32;

                let mut k = 0;
                for dy in -half..=half {
                    for dx in -half..=half {
                        let sy = (y + dy).clamp(0, height as isize - 1) as usize;
                        let sx = (x + dx).clamp(0, width as isize - 1) as usize;
                        let sample = (sy * width + sx) * CHANNELS;

                        let mut color_dist_sq = 0.0f32;
                        for c in 0..CHANNELS {
                            let d = data[sample + c] - data[center + c];
                            color_dist_sq += d * d;
                        }

                        let w = self.spatial[k]
                            * (-color_dist_sq * self.inv_two_sigma_color_sq).exp();
                        for c in 0..CHANNELS {
                            acc[c] += data[sample + c] * w;
                        }
                        weight_sum += w;
                        k += 1;
                    }
                }

                let out_base = (y as usize * width + x as usize) * CHANNELS;
                for c in 0..CHANNELS {
                    out[out_base + c] = (acc[c] / weight_sum).clamp(0.0, 1.0);
                }
            }
        }

        out
    }
}

impl FrameSmoother for CpuBilateralSmoother {
    fn smooth(&self, frame: &FloatFrame) -> FloatFrame {
        let width = frame.width() as usize;
        let height = frame.height() as usize;

        // Frames too small to halve are filtered at native resolution.
        if width < DOWNSCALE * 2 || height < DOWNSCALE * 2 {
            let filtered = self.bilateral(frame.data(), width, height);
            return FloatFrame::new(filtered, frame.width(), frame.height());
        }

        let (small, sw, sh) = filters::downscale(frame.data(), width, height, CHANNELS, DOWNSCALE);
        let filtered = self.bilateral(&small, sw, sh);
        let restored = filters::upscale(&filtered, sw, sh, CHANNELS, width, height);
        let mut out = FloatFrame::new(restored, frame.width(), frame.height());
        out.clamp();
        out
    }
}
