use std::path::Path;

use crate::io::domain::frame_sink::FrameSink;
use crate::io::domain::frame_source::FrameSource;
use crate::masking::domain::landmark_source::LandmarkSource;
use crate::pipeline::retouch_session::RetouchSession;
use crate::shared::frame::Frame;
use crate::shared::mask::Mask;
use crate::shared::stream_info::StreamInfo;

/// Writes one mask-visualization frame per input frame, for debugging mask
/// alignment: the stabilized skin mask renders as gray-to-white, protection
/// zones tint red on top of it.
///
/// A misaligned skin mask or a protection mask that misses an eye is obvious
/// at a glance here long before it is obvious in retouched output.
pub struct PreviewMasksUseCase {
    source: Box<dyn FrameSource>,
    landmarks: Box<dyn LandmarkSource>,
    session: RetouchSession,
    sink: Box<dyn FrameSink>,
    on_progress: Option<Box<dyn Fn(usize, usize) -> bool + Send>>,
}

impl PreviewMasksUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        landmarks: Box<dyn LandmarkSource>,
        session: RetouchSession,
        sink: Box<dyn FrameSink>,
        on_progress: Option<Box<dyn Fn(usize, usize) -> bool + Send>>,
    ) -> Self {
        Self {
            source,
            landmarks,
            session,
            sink,
            on_progress,
        }
    }

    /// Renders every frame's masks. Returns the number of frames written.
    pub fn execute(
        &mut self,
        info: &StreamInfo,
        output_path: &Path,
    ) -> Result<usize, Box<dyn std::error::Error>> {
        self.sink.open(output_path, info)?;

        let total = info.total_frames;
        let mut written = 0usize;

        // Collect first to avoid borrowing self.source across the loop body.
        let frames: Vec<Frame> = self.source.frames().collect::<Result<Vec<_>, _>>()?;
        for frame in &frames {
            let faces = self.landmarks.landmarks_for(frame.index())?;
            let (skin, protection) = self.session.masks(frame, &faces)?;
            self.sink
                .write(&render_overlay(&skin, &protection, frame.index()))?;
            written += 1;

            if let Some(ref callback) = self.on_progress {
                if !callback(written, total) {
                    return Err("Cancelled".into());
                }
            }
        }

        self.source.close();
        self.sink.close()?;
        Ok(written)
    }
}

/// Skin mask as grayscale, protection pushed into the red channel.
fn render_overlay(skin: &Mask, protection: &Mask, index: usize) -> Frame {
    let width = skin.width();
    let height = skin.height();
    let mut data = Vec::with_capacity((width * height * 3) as usize);

    for (&s, &p) in skin.data().iter().zip(protection.data()) {
        let red = s.max(p).clamp(0.0, 1.0);
        let rest = (s * (1.0 - p)).clamp(0.0, 1.0);
        data.push((red * 255.0).round() as u8);
        data.push((rest * 255.0).round() as u8);
        data.push((rest * 255.0).round() as u8);
    }

    Frame::new(data, width, height, 3, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::domain::frame_sink::FrameSink;
    use crate::masking::domain::region_table::RegionTable;
    use crate::pipeline::retouch_session::SessionOptions;
    use crate::shared::config::RetouchConfig;
    use crate::shared::landmarks::LandmarkSet;
    use std::sync::{Arc, Mutex};

    struct StubSource {
        frames: Vec<Frame>,
    }

    impl FrameSource for StubSource {
        fn open(&mut self, _path: &Path) -> Result<StreamInfo, Box<dyn std::error::Error>> {
            unreachable!("preview tests pass StreamInfo directly")
        }

        fn frames(
            &mut self,
        ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
            Box::new(self.frames.drain(..).map(Ok))
        }

        fn close(&mut self) {}
    }

    struct StubSink {
        written: Arc<Mutex<Vec<Frame>>>,
    }

    impl FrameSink for StubSink {
        fn open(
            &mut self,
            _path: &Path,
            _info: &StreamInfo,
        ) -> Result<(), Box<dyn std::error::Error>> {
            Ok(())
        }

        fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            self.written.lock().unwrap().push(frame.clone());
            Ok(())
        }

        fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            Ok(())
        }
    }

    struct OneFace;

    impl LandmarkSource for OneFace {
        fn landmarks_for(
            &mut self,
            _frame_index: usize,
        ) -> Result<Vec<LandmarkSet>, Box<dyn std::error::Error>> {
            Ok(vec![LandmarkSet::new(vec![
                (0.2, 0.1),
                (0.8, 0.1),
                (0.9, 0.5),
                (0.8, 0.9),
                (0.2, 0.9),
                (0.1, 0.5),
                (0.35, 0.35),
                (0.45, 0.35),
                (0.40, 0.45),
                (0.60, 0.35),
                (0.70, 0.35),
                (0.65, 0.45),
            ])])
        }
    }

    fn test_session() -> RetouchSession {
        let options = SessionOptions {
            region_table: RegionTable {
                landmark_count: 12,
                skin_outline: vec![0, 1, 2, 3, 4, 5],
                left_eye: vec![6, 7, 8],
                right_eye: vec![8, 9, 6],
                lips: vec![9, 10, 11],
            },
            ..SessionOptions::default()
        };
        RetouchSession::with_options(&RetouchConfig::default(), options).unwrap()
    }

    fn stream(total: usize) -> StreamInfo {
        StreamInfo {
            width: 48,
            height: 48,
            total_frames: total,
            source_path: None,
        }
    }

    #[test]
    fn test_writes_one_visualization_per_frame() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let mut uc = PreviewMasksUseCase::new(
            Box::new(StubSource {
                frames: (0..3).map(|i| Frame::filled(0, 48, 48, i)).collect(),
            }),
            Box::new(OneFace),
            test_session(),
            Box::new(StubSink {
                written: written.clone(),
            }),
            None,
        );

        let count = uc.execute(&stream(3), Path::new("/tmp/preview")).unwrap();
        assert_eq!(count, 3);

        let frames = written.lock().unwrap();
        assert_eq!(frames.len(), 3);
        // Skin center renders bright, far corner dark.
        let center = frames[0].as_ndarray()[[24, 24, 1]];
        let corner = frames[0].as_ndarray()[[0, 0, 1]];
        assert!(center > 100);
        assert!(corner < 10);
    }

    #[test]
    fn test_protection_tints_red() {
        let skin = Mask::new(vec![1.0], 1, 1);
        let protection = Mask::new(vec![1.0], 1, 1);
        let frame = render_overlay(&skin, &protection, 0);
        assert_eq!(frame.data()[0], 255); // red stays strong
        assert_eq!(frame.data()[1], 0); // green suppressed
        assert_eq!(frame.data()[2], 0);
    }

    #[test]
    fn test_cancel_via_progress() {
        let mut uc = PreviewMasksUseCase::new(
            Box::new(StubSource {
                frames: (0..5).map(|i| Frame::filled(0, 48, 48, i)).collect(),
            }),
            Box::new(OneFace),
            test_session(),
            Box::new(StubSink {
                written: Arc::new(Mutex::new(Vec::new())),
            }),
            Some(Box::new(|current, _| current < 2)),
        );
        assert!(uc.execute(&stream(5), Path::new("/tmp/preview")).is_err());
    }
}
