use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::Instant;

use crate::io::domain::frame_sink::FrameSink;
use crate::io::domain::frame_source::FrameSource;
use crate::masking::domain::landmark_source::LandmarkSource;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::retouch_session::RetouchSession;
use crate::pipeline::session_executor::{ExecutorConfig, SessionExecutor};
use crate::shared::frame::Frame;
use crate::shared::stream_info::StreamInfo;

const DEFAULT_CHANNEL_CAPACITY: usize = 8;

type SendError = Box<dyn std::error::Error + Send + Sync>;

/// Runs the pipeline with dedicated threads for decode and encode I/O.
///
/// Layout: `reader → main [landmarks + retouch, in order] → writer`.
/// The retouch itself stays on the main thread because the stabilizer state
/// makes frame order part of the contract; I/O overlaps around it.
pub struct ThreadedSessionExecutor {
    channel_capacity: usize,
}

impl ThreadedSessionExecutor {
    pub fn new() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl Default for ThreadedSessionExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionExecutor for ThreadedSessionExecutor {
    #[allow(clippy::too_many_arguments)]
    fn execute(
        &self,
        source: Box<dyn FrameSource>,
        mut sink: Box<dyn FrameSink>,
        mut landmarks: Box<dyn LandmarkSource>,
        mut session: RetouchSession,
        logger: &mut dyn PipelineLogger,
        info: &StreamInfo,
        output_path: &Path,
        config: ExecutorConfig,
    ) -> Result<(), Box<dyn std::error::Error>> {
        sink.open(output_path, info)?;

        let (frame_tx, frame_rx) =
            crossbeam_channel::bounded::<Result<Frame, SendError>>(self.channel_capacity);
        let (write_tx, write_rx) = crossbeam_channel::bounded::<Frame>(self.channel_capacity);

        let reader_handle = spawn_reader(source, frame_tx, config.cancelled.clone());
        let writer_handle = spawn_writer(sink, write_rx);

        let total = info.total_frames;
        let mut processed: usize = 0;
        let mut main_error: Option<Box<dyn std::error::Error>> = None;

        for frame_result in frame_rx {
            if config.cancelled.load(Ordering::Relaxed) {
                break;
            }

            let frame = match frame_result {
                Ok(frame) => frame,
                Err(e) => {
                    main_error = Some(e.to_string().into());
                    break;
                }
            };

            let started = Instant::now();
            let result = landmarks
                .landmarks_for(frame.index())
                .and_then(|faces| session.process(&frame, &faces).map_err(Into::into));
            let retouched = match result {
                Ok(frame) => frame,
                Err(e) => {
                    main_error = Some(e.to_string().into());
                    break;
                }
            };
            logger.timing("retouch", started.elapsed().as_secs_f64() * 1000.0);

            let stats = session.last_stats();
            logger.metric("faces", stats.face_count as f64);
            logger.metric("mask_coverage", f64::from(stats.mask_coverage));
            logger.metric("blend_weight", f64::from(stats.mean_blend_weight));

            if write_tx.send(retouched).is_err() {
                main_error = Some("Writer channel closed unexpectedly".into());
                break;
            }

            processed += 1;
            logger.progress(processed, total);
            if let Some(ref callback) = config.on_progress {
                if !callback(processed, total) {
                    main_error = Some("Cancelled".into());
                    break;
                }
            }
        }

        drop(write_tx);
        join_threads(reader_handle, writer_handle, main_error)
    }
}

fn spawn_reader(
    mut source: Box<dyn FrameSource>,
    frame_tx: crossbeam_channel::Sender<Result<Frame, SendError>>,
    cancelled: std::sync::Arc<std::sync::atomic::AtomicBool>,
) -> std::thread::JoinHandle<Box<dyn FrameSource>> {
    std::thread::spawn(move || {
        for frame_result in source.frames() {
            if cancelled.load(Ordering::Relaxed) {
                break;
            }
            let mapped = frame_result.map_err(|e| -> SendError { e.to_string().into() });
            if frame_tx.send(mapped).is_err() {
                break;
            }
        }
        source.close();
        source
    })
}

fn spawn_writer(
    mut sink: Box<dyn FrameSink>,
    write_rx: crossbeam_channel::Receiver<Frame>,
) -> std::thread::JoinHandle<Result<Box<dyn FrameSink>, SendError>> {
    std::thread::spawn(move || {
        for frame in write_rx {
            sink.write(&frame)
                .map_err(|e| -> SendError { e.to_string().into() })?;
        }
        Ok(sink)
    })
}

/// Joins the I/O threads and reports the first error encountered.
fn join_threads(
    reader_handle: std::thread::JoinHandle<Box<dyn FrameSource>>,
    writer_handle: std::thread::JoinHandle<Result<Box<dyn FrameSink>, SendError>>,
    mut first_error: Option<Box<dyn std::error::Error>>,
) -> Result<(), Box<dyn std::error::Error>> {
    fn set_if_none(slot: &mut Option<Box<dyn std::error::Error>>, err: Box<dyn std::error::Error>) {
        if slot.is_none() {
            *slot = Some(err);
        }
    }

    match reader_handle.join() {
        Ok(mut source) => source.close(),
        Err(_) => set_if_none(&mut first_error, "Reader thread panicked".into()),
    }

    match writer_handle.join() {
        Ok(Ok(mut sink)) => {
            if let Err(e) = sink.close() {
                set_if_none(&mut first_error, e);
            }
        }
        Ok(Err(e)) => set_if_none(&mut first_error, e.to_string().into()),
        Err(_) => set_if_none(&mut first_error, "Writer thread panicked".into()),
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
