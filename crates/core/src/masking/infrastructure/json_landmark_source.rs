use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::masking::domain::landmark_source::LandmarkSource;
use crate::shared::landmarks::LandmarkSet;

/// Landmark sets precomputed by an external detector, loaded from JSON.
///
/// Expected layout: a top-level array indexed by frame; each entry an array
/// of faces; each face an array of `[x, y]` pairs in [0,1] face space.
/// Frames past the end of the file report no faces, so a short landmark
/// file simply leaves the tail of the video untouched.
pub struct JsonLandmarkSource {
    frames: Vec<Vec<LandmarkSet>>,
}

impl JsonLandmarkSource {
    pub fn from_path(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let file = File::open(path)?;
        let raw: Vec<Vec<Vec<[f64; 2]>>> = serde_json::from_reader(BufReader::new(file))?;
        Ok(Self::from_raw(raw))
    }

    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let raw: Vec<Vec<Vec<[f64; 2]>>> = serde_json::from_str(json)?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: Vec<Vec<Vec<[f64; 2]>>>) -> Self {
        let frames = raw
            .into_iter()
            .map(|faces| {
                faces
                    .into_iter()
                    .map(|points| {
                        LandmarkSet::new(points.into_iter().map(|[x, y]| (x, y)).collect())
                    })
                    .collect()
            })
            .collect();
        Self { frames }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

impl LandmarkSource for JsonLandmarkSource {
    fn landmarks_for(
        &mut self,
        frame_index: usize,
    ) -> Result<Vec<LandmarkSet>, Box<dyn std::error::Error>> {
        Ok(self.frames.get(frame_index).cloned().unwrap_or_default())
    }
}
