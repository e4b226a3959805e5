use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::io::domain::frame_sink::FrameSink;
use crate::io::domain::frame_source::FrameSource;
use crate::masking::domain::landmark_source::LandmarkSource;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::retouch_session::RetouchSession;
use crate::shared::stream_info::StreamInfo;

/// Run-level controls for an execution.
pub struct ExecutorConfig {
    /// Called once per finished frame; returning `false` cancels the run.
    pub on_progress: Option<Box<dyn Fn(usize, usize) -> bool + Send>>,
    pub cancelled: Arc<AtomicBool>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            on_progress: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }
}

/// Abstracts how the read → retouch → write loop runs.
///
/// Frames are always retouched strictly in order on a single thread, since
/// the stabilizer state demands it. Implementations are free to overlap
/// decode and encode I/O around that ordered core.
pub trait SessionExecutor: Send {
    #[allow(clippy::too_many_arguments)]
    fn execute(
        &self,
        source: Box<dyn FrameSource>,
        sink: Box<dyn FrameSink>,
        landmarks: Box<dyn LandmarkSource>,
        session: RetouchSession,
        logger: &mut dyn PipelineLogger,
        info: &StreamInfo,
        output_path: &Path,
        config: ExecutorConfig,
    ) -> Result<(), Box<dyn std::error::Error>>;
}
