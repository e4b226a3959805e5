use crate::shared::landmarks::LandmarkSet;

/// Port for the external face-landmark detector.
///
/// The pipeline never detects faces itself; it consumes whatever sets the
/// detector produced for a frame. An empty result means "no face this
/// frame" and the frame passes through untouched.
pub trait LandmarkSource: Send {
    fn landmarks_for(
        &mut self,
        frame_index: usize,
    ) -> Result<Vec<LandmarkSet>, Box<dyn std::error::Error>>;
}
