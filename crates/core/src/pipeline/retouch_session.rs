use std::collections::HashSet;

use crate::masking::domain::mask_builder::{MaskBuilder, MaskGeometry};
use crate::masking::domain::mask_stabilizer::MaskStabilizer;
use crate::masking::domain::region_table::RegionTable;
use crate::retouch::domain::blender::Blender;
use crate::retouch::domain::frame_smoother::FrameSmoother;
use crate::retouch::infrastructure::bilateral_smoother::CpuBilateralSmoother;
use crate::retouch::infrastructure::detail_recoverer::DetailRecoverer;
use crate::retouch::infrastructure::grain_synthesizer::GrainSynthesizer;
use crate::retouch::infrastructure::highlight_compressor::HighlightCompressor;
use crate::retouch::infrastructure::tone_evener::ToneEvener;
use crate::shared::config::RetouchConfig;
use crate::shared::error::RetouchError;
use crate::shared::float_frame::FloatFrame;
use crate::shared::frame::Frame;
use crate::shared::landmarks::LandmarkSet;
use crate::shared::mask::Mask;

/// Which detected faces participate, by position in the frame's landmark
/// list. `include` takes precedence when both are set.
#[derive(Clone, Debug, Default)]
pub struct FaceSelection {
    pub include: Option<HashSet<usize>>,
    pub exclude: Option<HashSet<usize>>,
}

impl FaceSelection {
    fn selected(&self, faces: &[LandmarkSet]) -> Vec<LandmarkSet> {
        if let Some(include) = &self.include {
            faces
                .iter()
                .enumerate()
                .filter(|(i, _)| include.contains(i))
                .map(|(_, f)| f.clone())
                .collect()
        } else if let Some(exclude) = &self.exclude {
            faces
                .iter()
                .enumerate()
                .filter(|(i, _)| !exclude.contains(i))
                .map(|(_, f)| f.clone())
                .collect()
        } else {
            faces.to_vec()
        }
    }
}

/// Session knobs beyond the numeric config.
pub struct SessionOptions {
    /// Landmark-index groups for the integrated detector.
    pub region_table: RegionTable,
    pub geometry: MaskGeometry,
    pub selection: FaceSelection,
    /// Seed for the grain generator; a fixed seed makes a session
    /// reproducible end to end.
    pub grain_seed: u64,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            region_table: RegionTable::default(),
            geometry: MaskGeometry::default(),
            selection: FaceSelection::default(),
            grain_seed: 0,
        }
    }
}

/// Diagnostics from the most recent frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub face_count: usize,
    /// Mean of the stabilized skin mask.
    pub mask_coverage: f32,
    /// Mean of the blend weight field; zero on pass-through frames.
    pub mean_blend_weight: f32,
}

/// One retouch session: the full per-frame pipeline plus the single piece
/// of carried state (the stabilized skin mask).
///
/// Frames must be submitted one at a time, in order. The session is
/// caller-owned, so concurrent sessions are just separate instances and
/// tests need no teardown ritual. Abandoning a session at any frame
/// boundary is safe; all carried state lives in the stabilizer.
pub struct RetouchSession {
    mask_builder: MaskBuilder,
    stabilizer: MaskStabilizer,
    smoother: Box<dyn FrameSmoother>,
    detail: DetailRecoverer,
    highlight: HighlightCompressor,
    tone: ToneEvener,
    blender: Blender,
    grain: GrainSynthesizer,
    selection: FaceSelection,
    dimensions: Option<(u32, u32)>,
    last_stats: FrameStats,
}

impl RetouchSession {
    pub fn new(config: &RetouchConfig) -> Result<Self, RetouchError> {
        Self::with_options(config, SessionOptions::default())
    }

    /// Validates the config and region table once, up front; per-frame code
    /// never revisits either.
    pub fn with_options(
        config: &RetouchConfig,
        options: SessionOptions,
    ) -> Result<Self, RetouchError> {
        config.validate()?;
        let mask_builder = MaskBuilder::new(options.region_table, options.geometry)?;
        Ok(Self {
            mask_builder,
            stabilizer: MaskStabilizer::default(),
            smoother: Box::new(CpuBilateralSmoother::new(config.smoothness_radius)),
            detail: DetailRecoverer::new(config.texture_preserve),
            highlight: HighlightCompressor::new(config.shine_reduction),
            tone: ToneEvener::new(config.tone_evenness),
            blender: Blender::new(config.amount, config.eye_lip_protect),
            grain: GrainSynthesizer::new(config.grain, options.grain_seed),
            selection: options.selection,
            dimensions: None,
            last_stats: FrameStats::default(),
        })
    }

    /// Runs the full retouch pipeline on one frame.
    ///
    /// No faces (or a skin mask that has decayed to zero) passes the frame
    /// through untouched. A frame whose dimensions disagree with the
    /// session's established size is rejected, never resampled.
    pub fn process(&mut self, frame: &Frame, faces: &[LandmarkSet]) -> Result<Frame, RetouchError> {
        let (skin, protection) = self.masks(frame, faces)?;

        if skin.max_value() == 0.0 {
            return Ok(frame.clone());
        }

        let original = FloatFrame::from_frame(frame);
        let smoothed = self.smoother.smooth(&original);
        let detailed = self.detail.recover(&original, &smoothed);
        let compressed = self.highlight.compress(&detailed);
        let evened = self.tone.even(&compressed);

        let weights = self.blender.weight_field(&skin, &protection);
        self.last_stats.mean_blend_weight = weights.mean();

        let blended = self.blender.composite(&original, &evened, &weights);
        let finished = self.grain.sprinkle(&blended, &skin);

        Ok(finished.to_frame(frame.index()))
    }

    /// Builds the stabilized skin mask and the protection mask for one
    /// frame without retouching it. Advances the stabilizer exactly as
    /// [`RetouchSession::process`] would; used by the mask preview.
    pub fn masks(
        &mut self,
        frame: &Frame,
        faces: &[LandmarkSet],
    ) -> Result<(Mask, Mask), RetouchError> {
        self.check_dimensions(frame)?;

        let selected = self.selection.selected(faces);
        let (raw_skin, protection) = self
            .mask_builder
            .build(&selected, frame.width(), frame.height());
        let skin = self.stabilizer.stabilize(&raw_skin);

        self.last_stats = FrameStats {
            face_count: selected.len(),
            mask_coverage: skin.mean(),
            mean_blend_weight: 0.0,
        };

        Ok((skin, protection))
    }

    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    /// Clears all carried state so the instance can start a new video
    /// session, possibly at a different resolution.
    pub fn reset(&mut self) {
        self.stabilizer.reset();
        self.dimensions = None;
        self.last_stats = FrameStats::default();
    }

    fn check_dimensions(&mut self, frame: &Frame) -> Result<(), RetouchError> {
        match self.dimensions {
            None => {
                self.dimensions = Some((frame.width(), frame.height()));
                Ok(())
            }
            Some((w, h)) if w == frame.width() && h == frame.height() => Ok(()),
            Some((w, h)) => Err(RetouchError::DimensionMismatch {
                want_width: w,
                want_height: h,
                got_width: frame.width(),
                got_height: frame.height(),
            }),
        }
    }
}
