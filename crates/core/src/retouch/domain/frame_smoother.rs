use crate::shared::float_frame::FloatFrame;

/// Domain interface for edge-aware smoothing of a whole frame.
///
/// Implementations must attenuate smoothing across strong intensity
/// gradients; a plain box or Gaussian blur is not an acceptable
/// implementation because it produces the out-of-focus look the pipeline
/// exists to avoid.
pub trait FrameSmoother: Send {
    fn smooth(&self, frame: &FloatFrame) -> FloatFrame;
}
