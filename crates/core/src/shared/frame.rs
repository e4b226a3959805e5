use ndarray::{ArrayView3, ArrayViewMut3};

/// One video frame at the I/O boundary: contiguous 8-bit RGB, row-major.
///
/// This is the only fixed-point representation in the crate. The retouch
/// stages work on [`FloatFrame`](crate::shared::float_frame::FloatFrame)
/// and convert back exactly once per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    /// A uniformly filled RGB frame. Handy for tests and synthetic inputs.
    pub fn filled(value: u8, width: u32, height: u32, index: usize) -> Self {
        Self::new(
            vec![value; (width as usize) * (height as usize) * 3],
            width,
            height,
            3,
            index,
        )
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Position of this frame in its source sequence.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let frame = Frame::new(vec![7u8; 24], 4, 2, 3, 9);
        assert_eq!(frame.width(), 4);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.channels(), 3);
        assert_eq!(frame.index(), 9);
        assert!(frame.data().iter().all(|&v| v == 7));
    }

    #[test]
    fn test_filled_matches_new() {
        let filled = Frame::filled(128, 3, 3, 0);
        let built = Frame::new(vec![128u8; 27], 3, 3, 3, 0);
        assert_eq!(filled, built);
    }

    #[test]
    fn test_clone_is_independent() {
        let frame = Frame::filled(100, 2, 2, 0);
        let mut cloned = frame.clone();
        cloned.data_mut()[0] = 0;
        assert_eq!(frame.data()[0], 100);
        assert_eq!(cloned.data()[0], 0);
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * channels")]
    fn test_mismatched_data_length_panics_in_debug() {
        Frame::new(vec![0u8; 10], 2, 2, 3, 0);
    }

    #[test]
    fn test_as_ndarray_is_height_width_channels() {
        let mut data = vec![0u8; 12]; // 2x2 RGB
        data[6] = 255; // row 1, col 0, R
        let frame = Frame::new(data, 2, 2, 3, 0);
        let arr = frame.as_ndarray();
        assert_eq!(arr.shape(), &[2, 2, 3]);
        assert_eq!(arr[[1, 0, 0]], 255);
        assert_eq!(arr[[1, 0, 1]], 0);
    }

    #[test]
    fn test_as_ndarray_mut_writes_through() {
        let mut frame = Frame::filled(0, 2, 2, 0);
        {
            let mut arr = frame.as_ndarray_mut();
            arr[[0, 1, 2]] = 64;
        }
        assert_eq!(frame.as_ndarray()[[0, 1, 2]], 64);
    }
}
