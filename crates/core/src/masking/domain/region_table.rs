use crate::shared::error::RetouchError;

/// Landmark-index groups naming the maskable regions of a face.
///
/// Which index means what is a property of the landmark detector, so the
/// table is configuration data rather than hardcoded constants: swapping
/// detectors means supplying a different table. Indices are checked against
/// the detector's point count when the session is built, never per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionTable {
    /// Points the detector guarantees per face.
    pub landmark_count: usize,
    /// Broad outline approximating the skin area: forehead, cheeks, jaw,
    /// nose. Deliberately approximate; the feathered mask absorbs the slack.
    pub skin_outline: Vec<usize>,
    pub left_eye: Vec<usize>,
    pub right_eye: Vec<usize>,
    pub lips: Vec<usize>,
}

impl RegionTable {
    /// Table for a 468-point face-mesh detector.
    pub fn face_mesh_468() -> Self {
        Self {
            landmark_count: 468,
            skin_outline: (10..135).collect(),
            left_eye: vec![33, 7, 163, 144, 145, 153],
            right_eye: vec![362, 382, 381, 380, 374, 373],
            lips: vec![61, 146, 91, 181, 84, 17, 314, 405, 321, 375],
        }
    }

    /// Rejects any index the detector never produces.
    pub fn validate(&self) -> Result<(), RetouchError> {
        for (region, indices) in [
            ("skin_outline", &self.skin_outline),
            ("left_eye", &self.left_eye),
            ("right_eye", &self.right_eye),
            ("lips", &self.lips),
        ] {
            if let Some(&index) = indices.iter().find(|&&i| i >= self.landmark_count) {
                return Err(RetouchError::RegionIndexOutOfBounds {
                    region,
                    index,
                    available: self.landmark_count,
                });
            }
        }
        Ok(())
    }
}

impl Default for RegionTable {
    fn default() -> Self {
        Self::face_mesh_468()
    }
}
