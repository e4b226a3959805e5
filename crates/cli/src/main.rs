use std::collections::HashSet;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use skinveil_core::io::infrastructure::image_sequence_reader::ImageSequenceReader;
use skinveil_core::io::infrastructure::image_sequence_writer::ImageSequenceWriter;
use skinveil_core::masking::infrastructure::json_landmark_source::JsonLandmarkSource;
use skinveil_core::pipeline::infrastructure::threaded_session_executor::ThreadedSessionExecutor;
use skinveil_core::pipeline::pipeline_logger::{PipelineLogger, StdoutPipelineLogger};
use skinveil_core::pipeline::preview_masks_use_case::PreviewMasksUseCase;
use skinveil_core::pipeline::retouch_sequence_use_case::RetouchSequenceUseCase;
use skinveil_core::pipeline::retouch_session::{FaceSelection, RetouchSession, SessionOptions};
use skinveil_core::shared::config::RetouchConfig;
use skinveil_core::io::domain::frame_source::FrameSource;

/// Facial skin retouching over numbered frame sequences.
#[derive(Parser)]
#[command(name = "skinveil")]
struct Cli {
    /// Directory of input frames (png/jpg), named so lexicographic order is
    /// frame order.
    input: PathBuf,

    /// Output directory for retouched frames (required unless
    /// --preview-masks is used).
    output: Option<PathBuf>,

    /// JSON file of per-frame landmark sets from the external detector:
    /// an array indexed by frame, each entry an array of faces, each face
    /// an array of [x, y] pairs in [0,1] face space.
    #[arg(long)]
    landmarks: PathBuf,

    /// JSON file with retouch parameters; individual flags override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Edge-aware smoothing strength (20-40).
    #[arg(long)]
    smoothness_radius: Option<u32>,

    /// High-pass detail gain (40-70).
    #[arg(long)]
    texture_preserve: Option<u32>,

    /// Specular highlight compression (15-35).
    #[arg(long)]
    shine_reduction: Option<u32>,

    /// Local tonal-variance pull (10-25).
    #[arg(long)]
    tone_evenness: Option<u32>,

    /// Eye/lip protection strength (70-95).
    #[arg(long)]
    eye_lip_protect: Option<u32>,

    /// Global blend toward the processed result (45-75).
    #[arg(long)]
    amount: Option<u32>,

    /// Grain strength in skin regions (6-16, 0 disables).
    #[arg(long)]
    grain: Option<u32>,

    /// Only retouch these face indices (comma-separated).
    #[arg(long, value_delimiter = ',')]
    faces: Option<Vec<usize>>,

    /// Retouch all faces except these indices (comma-separated).
    #[arg(long, value_delimiter = ',')]
    exclude_faces: Option<Vec<usize>>,

    /// Seed for the grain generator; fixed seed makes runs reproducible.
    #[arg(long, default_value = "0")]
    grain_seed: u64,

    /// Write mask visualizations to this directory instead of retouching.
    #[arg(long)]
    preview_masks: Option<PathBuf>,

    /// Progress log interval in frames.
    #[arg(long, default_value = "30")]
    progress_interval: usize,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let config = build_config(&cli)?;
    let options = SessionOptions {
        selection: build_selection(&cli),
        grain_seed: cli.grain_seed,
        ..SessionOptions::default()
    };
    let session = RetouchSession::with_options(&config, options)?;

    let mut source = ImageSequenceReader::new();
    let info = source.open(&cli.input)?;
    let landmarks = JsonLandmarkSource::from_path(&cli.landmarks)?;

    log::info!(
        "{} frames at {}x{}, {} landmark frame(s)",
        info.total_frames,
        info.width,
        info.height,
        landmarks.frame_count()
    );

    if let Some(preview_dir) = cli.preview_masks {
        let mut uc = PreviewMasksUseCase::new(
            Box::new(source),
            Box::new(landmarks),
            session,
            Box::new(ImageSequenceWriter::new()),
            None,
        );
        let written = uc.execute(&info, &preview_dir)?;
        log::info!("Wrote {written} mask previews to {}", preview_dir.display());
    } else {
        let mut logger = StdoutPipelineLogger::new(cli.progress_interval);
        let mut uc = RetouchSequenceUseCase::new(
            Box::new(source),
            Box::new(ImageSequenceWriter::new()),
            Box::new(landmarks),
            session,
            Box::new(ThreadedSessionExecutor::new()),
            None,
            None,
        );
        uc.execute(&info, cli.output.as_ref().unwrap(), &mut logger)?;
        logger.summary();
    }

    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.preview_masks.is_none() && cli.output.is_none() {
        return Err("an output directory is required unless --preview-masks is used".into());
    }
    Ok(())
}

/// Config file first, then per-flag overrides; range validation happens in
/// the session constructor.
fn build_config(cli: &Cli) -> Result<RetouchConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => serde_json::from_reader(std::fs::File::open(path)?)?,
        None => RetouchConfig::default(),
    };

    if let Some(v) = cli.smoothness_radius {
        config.smoothness_radius = v;
    }
    if let Some(v) = cli.texture_preserve {
        config.texture_preserve = v;
    }
    if let Some(v) = cli.shine_reduction {
        config.shine_reduction = v;
    }
    if let Some(v) = cli.tone_evenness {
        config.tone_evenness = v;
    }
    if let Some(v) = cli.eye_lip_protect {
        config.eye_lip_protect = v;
    }
    if let Some(v) = cli.amount {
        config.amount = v;
    }
    if let Some(v) = cli.grain {
        config.grain = v;
    }

    Ok(config)
}

fn build_selection(cli: &Cli) -> FaceSelection {
    FaceSelection {
        include: cli.faces.as_ref().map(|v| v.iter().copied().collect::<HashSet<_>>()),
        exclude: cli
            .exclude_faces
            .as_ref()
            .map(|v| v.iter().copied().collect::<HashSet<_>>()),
    }
}
