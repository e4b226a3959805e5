//! Separable filter primitives shared by the mask builder and retouch stages.
//!
//! Everything here works on raw `f32` slices so the same code serves
//! single-channel masks and 3-channel frames. Borders are edge-clamped.

/// Precompute a 1-D Gaussian kernel of the given size.
///
/// `kernel_size` must be odd and >= 1. Sigma is derived as
/// `kernel_size / 6.0` (matching OpenCV's sigma=0 convention).
pub fn gaussian_kernel_1d(kernel_size: usize) -> Vec<f32> {
    debug_assert!(kernel_size >= 1 && kernel_size % 2 == 1);
    let sigma = kernel_size as f64 / 6.0;
    let half = (kernel_size / 2) as f64;
    let mut kernel: Vec<f64> = (0..kernel_size)
        .map(|i| {
            let x = i as f64 - half;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }
    kernel.iter().map(|&v| v as f32).collect()
}

/// Separable convolution with a symmetric 1-D kernel (horizontal then
/// vertical). Values stay in floating point throughout.
pub fn separable_blur(
    data: &mut [f32],
    width: usize,
    height: usize,
    channels: usize,
    kernel: &[f32],
) {
    let kernel_size = kernel.len();
    if kernel_size <= 1 || width == 0 || height == 0 {
        return;
    }
    let half = kernel_size / 2;
    let mut temp = vec![0.0f32; width * height * channels];

    // Horizontal pass: data -> temp
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for (k, &w) in kernel.iter().enumerate() {
                    let sx = (x as isize + k as isize - half as isize)
                        .max(0)
                        .min((width - 1) as isize) as usize;
                    sum += data[(y * width + sx) * channels + c] * w;
                }
                temp[(y * width + x) * channels + c] = sum;
            }
        }
    }

    // Vertical pass: temp -> data
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for (k, &w) in kernel.iter().enumerate() {
                    let sy = (y as isize + k as isize - half as isize)
                        .max(0)
                        .min((height - 1) as isize) as usize;
                    sum += temp[(sy * width + x) * channels + c] * w;
                }
                data[(y * width + x) * channels + c] = sum;
            }
        }
    }
}

/// Box blur with a square window of side `2 * radius + 1`.
pub fn box_blur(data: &mut [f32], width: usize, height: usize, channels: usize, radius: usize) {
    if radius == 0 {
        return;
    }
    let size = 2 * radius + 1;
    let kernel = vec![1.0 / size as f32; size];
    separable_blur(data, width, height, channels, &kernel);
}

/// Morphological dilation of a single-channel field with a square
/// structuring element of side `2 * radius + 1`: each sample becomes the
/// window maximum. Applied separably, which is exact for a square element.
pub fn dilate(data: &mut [f32], width: usize, height: usize, radius: usize) {
    if radius == 0 || width == 0 || height == 0 {
        return;
    }
    let mut temp = vec![0.0f32; width * height];

    for y in 0..height {
        for x in 0..width {
            let lo = x.saturating_sub(radius);
            let hi = (x + radius).min(width - 1);
            let mut max = f32::MIN;
            for sx in lo..=hi {
                max = max.max(data[y * width + sx]);
            }
            temp[y * width + x] = max;
        }
    }

    for y in 0..height {
        for x in 0..width {
            let lo = y.saturating_sub(radius);
            let hi = (y + radius).min(height - 1);
            let mut max = f32::MIN;
            for sy in lo..=hi {
                max = max.max(temp[sy * width + x]);
            }
            data[y * width + x] = max;
        }
    }
}

/// Downscale by an integer factor using area averaging.
pub fn downscale(
    data: &[f32],
    width: usize,
    height: usize,
    channels: usize,
    scale: usize,
) -> (Vec<f32>, usize, usize) {
    let new_w = width / scale;
    let new_h = height / scale;
    let mut out = vec![0.0f32; new_w * new_h * channels];

    for y in 0..new_h {
        for x in 0..new_w {
            for c in 0..channels {
                let mut sum = 0.0f32;
                let mut count = 0u32;
                for dy in 0..scale {
                    for dx in 0..scale {
                        let sy = y * scale + dy;
                        let sx = x * scale + dx;
                        if sy < height && sx < width {
                            sum += data[(sy * width + sx) * channels + c];
                            count += 1;
                        }
                    }
                }
                out[(y * new_w + x) * channels + c] = sum / count as f32;
            }
        }
    }

    (out, new_w, new_h)
}

/// Upscale to target dimensions using bilinear interpolation.
pub fn upscale(
    data: &[f32],
    width: usize,
    height: usize,
    channels: usize,
    target_w: usize,
    target_h: usize,
) -> Vec<f32> {
    let mut out = vec![0.0f32; target_w * target_h * channels];

    for y in 0..target_h {
        for x in 0..target_w {
            let src_x = x as f32 * (width as f32 - 1.0) / (target_w as f32 - 1.0).max(1.0);
            let src_y = y as f32 * (height as f32 - 1.0) / (target_h as f32 - 1.0).max(1.0);

            let x0 = (src_x.floor() as usize).min(width - 1);
            let x1 = (x0 + 1).min(width - 1);
            let y0 = (src_y.floor() as usize).min(height - 1);
            let y1 = (y0 + 1).min(height - 1);

            let fx = src_x - x0 as f32;
            let fy = src_y - y0 as f32;

            for c in 0..channels {
                let v00 = data[(y0 * width + x0) * channels + c];
                let v10 = data[(y0 * width + x1) * channels + c];
                let v01 = data[(y1 * width + x0) * channels + c];
                let v11 = data[(y1 * width + x1) * channels + c];

                out[(y * target_w + x) * channels + c] = v00 * (1.0 - fx) * (1.0 - fy)
                    + v10 * fx * (1.0 - fy)
                    + v01 * (1.0 - fx) * fy
                    + v11 * fx * fy;
            }
        }
    }

    out
}
