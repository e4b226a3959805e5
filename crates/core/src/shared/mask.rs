use ndarray::ArrayView2;

/// Single-channel strength field with the same dimensions as its frame.
///
/// Values live in [0.0, 1.0] and read as "how strongly the effect applies at
/// this pixel". Both the skin mask and the protection mask use this type, as
/// does the per-pixel blend weight field derived from them.
#[derive(Clone, Debug, PartialEq)]
pub struct Mask {
    data: Vec<f32>,
    width: u32,
    height: u32,
}

impl Mask {
    pub fn new(data: Vec<f32>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize),
            "data length must equal width * height"
        );
        Self {
            data,
            width,
            height,
        }
    }

    pub fn zeros(width: u32, height: u32) -> Self {
        Self::new(vec![0.0; (width as usize) * (height as usize)], width, height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width as usize + x]
    }

    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        self.data[y * self.width as usize + x] = value;
    }

    /// Merges another mask into this one by per-pixel maximum.
    ///
    /// This is how overlapping faces combine: max, never sum or average, so
    /// a pixel covered by two faces is no stronger than its strongest cover.
    pub fn merge_max(&mut self, other: &Mask) {
        debug_assert_eq!(self.width, other.width);
        debug_assert_eq!(self.height, other.height);
        for (dst, &src) in self.data.iter_mut().zip(other.data.iter()) {
            if src > *dst {
                *dst = src;
            }
        }
    }

    /// Clamps every sample to [0.0, 1.0].
    pub fn clamp(&mut self) {
        for v in &mut self.data {
            *v = v.clamp(0.0, 1.0);
        }
    }

    pub fn mean(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f32>() / self.data.len() as f32
    }

    pub fn max_value(&self) -> f32 {
        self.data.iter().copied().fold(0.0, f32::max)
    }

    pub fn as_ndarray(&self) -> ArrayView2<'_, f32> {
        ArrayView2::from_shape((self.height as usize, self.width as usize), &self.data)
            .expect("Mask data length must match dimensions")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zeros() {
        let m = Mask::zeros(4, 3);
        assert_eq!(m.width(), 4);
        assert_eq!(m.height(), 3);
        assert_eq!(m.max_value(), 0.0);
    }

    #[test]
    fn test_get_set() {
        let mut m = Mask::zeros(3, 3);
        m.set(2, 1, 0.7);
        assert_relative_eq!(m.get(2, 1), 0.7);
        assert_relative_eq!(m.get(1, 2), 0.0);
    }

    #[test]
    fn test_merge_max_takes_maximum_not_sum() {
        let mut a = Mask::new(vec![0.2, 0.8, 0.5, 0.0], 2, 2);
        let b = Mask::new(vec![0.6, 0.3, 0.5, 0.0], 2, 2);
        a.merge_max(&b);
        assert_eq!(a.data(), &[0.6, 0.8, 0.5, 0.0]);
    }

    #[test]
    fn test_merge_max_is_idempotent() {
        let mut a = Mask::new(vec![0.1, 0.9], 2, 1);
        let copy = a.clone();
        a.merge_max(&copy);
        assert_eq!(a, copy);
    }

    #[test]
    fn test_clamp() {
        let mut m = Mask::new(vec![-0.2, 0.4, 1.3], 3, 1);
        m.clamp();
        assert_eq!(m.data(), &[0.0, 0.4, 1.0]);
    }

    #[test]
    fn test_mean() {
        let m = Mask::new(vec![0.0, 0.5, 1.0, 0.5], 2, 2);
        assert_relative_eq!(m.mean(), 0.5);
    }

    #[test]
    fn test_as_ndarray_shape() {
        let m = Mask::zeros(5, 2);
        assert_eq!(m.as_ndarray().shape(), &[2, 5]);
    }
}
