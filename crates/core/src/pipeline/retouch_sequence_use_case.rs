use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::io::domain::frame_sink::FrameSink;
use crate::io::domain::frame_source::FrameSource;
use crate::masking::domain::landmark_source::LandmarkSource;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::retouch_session::RetouchSession;
use crate::pipeline::session_executor::{ExecutorConfig, SessionExecutor};
use crate::shared::stream_info::StreamInfo;

/// Orchestrates a full retouch run over one frame sequence.
///
/// Wires the ports together and hands execution to a [`SessionExecutor`].
/// Single-use: `execute` consumes the owned components, so a second call
/// fails rather than reusing stale session state.
pub struct RetouchSequenceUseCase {
    source: Option<Box<dyn FrameSource>>,
    sink: Option<Box<dyn FrameSink>>,
    landmarks: Option<Box<dyn LandmarkSource>>,
    session: Option<RetouchSession>,
    executor: Box<dyn SessionExecutor>,
    on_progress: Option<Box<dyn Fn(usize, usize) -> bool + Send>>,
    cancelled: Arc<AtomicBool>,
}

impl RetouchSequenceUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: Box<dyn FrameSource>,
        sink: Box<dyn FrameSink>,
        landmarks: Box<dyn LandmarkSource>,
        session: RetouchSession,
        executor: Box<dyn SessionExecutor>,
        on_progress: Option<Box<dyn Fn(usize, usize) -> bool + Send>>,
        cancelled: Option<Arc<AtomicBool>>,
    ) -> Self {
        Self {
            source: Some(source),
            sink: Some(sink),
            landmarks: Some(landmarks),
            session: Some(session),
            executor,
            on_progress,
            cancelled: cancelled.unwrap_or_else(|| Arc::new(AtomicBool::new(false))),
        }
    }

    pub fn execute(
        &mut self,
        info: &StreamInfo,
        output_path: &Path,
        logger: &mut dyn PipelineLogger,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let config = ExecutorConfig {
            on_progress: self.on_progress.take(),
            cancelled: self.cancelled.clone(),
        };

        self.executor.execute(
            self.source.take().ok_or("Pipeline already executed")?,
            self.sink.take().ok_or("Pipeline already executed")?,
            self.landmarks.take().ok_or("Pipeline already executed")?,
            self.session.take().ok_or("Pipeline already executed")?,
            logger,
            info,
            output_path,
            config,
        )
    }
}
