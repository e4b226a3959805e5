use std::path::{Path, PathBuf};

use crate::io::domain::frame_sink::FrameSink;
use crate::shared::frame::Frame;
use crate::shared::stream_info::StreamInfo;

/// Writes frames as zero-padded PNGs into a directory.
pub struct ImageSequenceWriter {
    dir: Option<PathBuf>,
}

impl ImageSequenceWriter {
    pub fn new() -> Self {
        Self { dir: None }
    }
}

impl Default for ImageSequenceWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSink for ImageSequenceWriter {
    fn open(&mut self, path: &Path, _info: &StreamInfo) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::create_dir_all(path)?;
        self.dir = Some(path.to_path_buf());
        Ok(())
    }

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let dir = self
            .dir
            .as_ref()
            .ok_or("ImageSequenceWriter: not opened")?;
        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("frame buffer does not match its dimensions")?;
        img.save(dir.join(format!("frame_{:06}.png", frame.index())))?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.dir = None;
        Ok(())
    }
}
