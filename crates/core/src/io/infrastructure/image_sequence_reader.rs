use std::path::{Path, PathBuf};

use crate::io::domain::frame_source::FrameSource;
use crate::shared::frame::Frame;
use crate::shared::stream_info::StreamInfo;

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

/// Reads a directory of numbered still images as a frame sequence.
///
/// Files are ordered lexicographically, so frame names should be
/// zero-padded (`frame_000001.png`). Dimensions come from the first frame;
/// later frames that disagree are rejected downstream by the session, never
/// silently resampled here.
pub struct ImageSequenceReader {
    paths: Vec<PathBuf>,
    opened: bool,
}

impl ImageSequenceReader {
    pub fn new() -> Self {
        Self {
            paths: Vec::new(),
            opened: false,
        }
    }
}

impl Default for ImageSequenceReader {
    fn default() -> Self {
        Self::new()
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
}

fn load_frame(path: &Path, index: usize) -> Result<Frame, Box<dyn std::error::Error>> {
    let rgb = image::open(path)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(Frame::new(rgb.into_raw(), width, height, 3, index))
}

impl FrameSource for ImageSequenceReader {
    fn open(&mut self, path: &Path) -> Result<StreamInfo, Box<dyn std::error::Error>> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| is_image(p))
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(format!("no image frames found in {}", path.display()).into());
        }

        let first = load_frame(&paths[0], 0)?;
        let info = StreamInfo {
            width: first.width(),
            height: first.height(),
            total_frames: paths.len(),
            source_path: Some(path.to_path_buf()),
        };

        self.paths = paths;
        self.opened = true;
        Ok(info)
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        if !self.opened {
            return Box::new(std::iter::once(Err(
                "ImageSequenceReader: not opened".into()
            )));
        }
        let paths = std::mem::take(&mut self.paths);
        Box::new(
            paths
                .into_iter()
                .enumerate()
                .map(|(index, path)| load_frame(&path, index)),
        )
    }

    fn close(&mut self) {
        self.paths.clear();
        self.opened = false;
    }
}
