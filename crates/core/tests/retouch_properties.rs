//! End-to-end properties of the retouch pipeline against the public API,
//! using a synthetic 468-point face mesh.

use std::f64::consts::TAU;

use approx::assert_relative_eq;
use rstest::rstest;

use skinveil_core::masking::domain::mask_builder::{MaskBuilder, MaskGeometry};
use skinveil_core::masking::domain::region_table::RegionTable;
use skinveil_core::retouch::domain::blender::Blender;
use skinveil_core::retouch::domain::frame_smoother::FrameSmoother;
use skinveil_core::retouch::infrastructure::bilateral_smoother::CpuBilateralSmoother;
use skinveil_core::retouch::infrastructure::detail_recoverer::DetailRecoverer;
use skinveil_core::retouch::infrastructure::grain_synthesizer::GrainSynthesizer;
use skinveil_core::retouch::infrastructure::highlight_compressor::HighlightCompressor;
use skinveil_core::retouch::infrastructure::tone_evener::ToneEvener;
use skinveil_core::pipeline::retouch_session::RetouchSession;
use skinveil_core::shared::config::RetouchConfig;
use skinveil_core::shared::float_frame::FloatFrame;
use skinveil_core::shared::frame::Frame;
use skinveil_core::shared::landmarks::LandmarkSet;
use skinveil_core::shared::mask::Mask;

const SIZE: u32 = 96;

/// Places a ring of points at the given indices.
fn ring(points: &mut [(f64, f64)], indices: &[usize], cx: f64, cy: f64, r: f64) {
    for (k, &i) in indices.iter().enumerate() {
        let angle = k as f64 / indices.len() as f64 * TAU;
        points[i] = (cx + r * angle.cos(), cy + r * angle.sin());
    }
}

/// A synthetic 468-point face: elliptical skin outline, round eyes, round
/// lips, centered at (cx, cy) in normalized coordinates.
fn mesh_face(cx: f64, cy: f64) -> LandmarkSet {
    let table = RegionTable::face_mesh_468();
    let mut points = vec![(cx, cy); 468];

    // Skin outline as an ellipse.
    for (k, &i) in table.skin_outline.iter().enumerate() {
        let angle = k as f64 / table.skin_outline.len() as f64 * TAU;
        points[i] = (cx + 0.35 * angle.cos(), cy + 0.40 * angle.sin());
    }

    ring(&mut points, &table.left_eye, cx - 0.12, cy - 0.08, 0.04);
    ring(&mut points, &table.right_eye, cx + 0.12, cy - 0.08, 0.04);
    ring(&mut points, &table.lips, cx, cy + 0.18, 0.06);

    LandmarkSet::new(points)
}

fn builder() -> MaskBuilder {
    MaskBuilder::new(RegionTable::face_mesh_468(), MaskGeometry::default()).unwrap()
}

/// Sawtooth gradient with enough high-frequency content to exercise every
/// stage.
fn textured_frame(index: usize) -> Frame {
    let mut data = Vec::with_capacity((SIZE * SIZE * 3) as usize);
    for y in 0..SIZE {
        for x in 0..SIZE {
            let v = ((x * 11 + y * 3) % 256) as u8;
            data.extend_from_slice(&[v, 128u8.saturating_add(v / 4), 255 - v]);
        }
    }
    Frame::new(data, SIZE, SIZE, 3, index)
}

fn in_unit_range(data: &[f32]) -> bool {
    data.iter().all(|&v| (0.0..=1.0).contains(&v))
}

// ── Blend weight field, default config, single face ─────────────────────

#[test]
fn weight_zero_outside_feathered_skin_polygon() {
    let (skin, protection) = builder().build(&[mesh_face(0.5, 0.5)], SIZE, SIZE);
    let weights = Blender::new(60, 85).weight_field(&skin, &protection);

    assert_eq!(weights.get(1, 1), 0.0);
    assert_eq!(weights.get(94, 94), 0.0);
}

#[test]
fn weight_attenuated_but_positive_in_protected_zones() {
    let (skin, protection) = builder().build(&[mesh_face(0.5, 0.5)], SIZE, SIZE);
    let weights = Blender::new(60, 85).weight_field(&skin, &protection);

    // Center of the left eye: (0.38, 0.42) of 96.
    let (ex, ey) = (36, 40);
    assert!(protection.get(ex, ey) > 0.5, "eye must be protected");
    let protected_weight = weights.get(ex, ey);
    assert!(protected_weight > 0.0, "protection attenuates, never zeroes");
    assert!(
        protected_weight < 0.6 * skin.get(ex, ey),
        "protected weight must fall below amount * mask"
    );
}

#[test]
fn weight_equals_amount_scaled_mask_in_clear_skin() {
    let (skin, protection) = builder().build(&[mesh_face(0.5, 0.5)], SIZE, SIZE);
    let weights = Blender::new(60, 85).weight_field(&skin, &protection);

    // Forehead pixel: inside skin, far from every protection polygon.
    let (fx, fy) = (48, 18);
    assert!(skin.get(fx, fy) > 0.5);
    assert_eq!(protection.get(fx, fy), 0.0);
    assert_relative_eq!(weights.get(fx, fy), 0.6 * skin.get(fx, fy), epsilon = 1e-6);
}

#[rstest]
#[case::protect_low(70)]
#[case::protect_mid(85)]
#[case::protect_high(95)]
fn raising_protection_never_raises_protected_weight(#[case] protect: u32) {
    let (skin, protection) = builder().build(&[mesh_face(0.5, 0.5)], SIZE, SIZE);
    let baseline = Blender::new(60, 70).weight_field(&skin, &protection);
    let current = Blender::new(60, protect).weight_field(&skin, &protection);

    for (b, c) in baseline.data().iter().zip(current.data()) {
        assert!(c <= b);
    }
}

#[test]
fn raising_amount_never_lowers_any_weight() {
    let (skin, protection) = builder().build(&[mesh_face(0.5, 0.5)], SIZE, SIZE);
    let low = Blender::new(45, 85).weight_field(&skin, &protection);
    let high = Blender::new(75, 85).weight_field(&skin, &protection);

    for (l, h) in low.data().iter().zip(high.data()) {
        assert!(h >= l);
    }
}

// ── Multi-face merging ──────────────────────────────────────────────────

#[test]
fn two_overlapping_faces_merge_by_maximum() {
    let b = builder();
    let left = mesh_face(0.42, 0.5);
    let right = mesh_face(0.58, 0.5);

    let (merged, _) = b.build(&[left.clone(), right.clone()], SIZE, SIZE);
    let (solo_left, _) = b.build(&[left], SIZE, SIZE);
    let (solo_right, _) = b.build(&[right], SIZE, SIZE);

    for i in 0..merged.data().len() {
        let want = solo_left.data()[i].max(solo_right.data()[i]);
        assert_relative_eq!(merged.data()[i], want, epsilon = 1e-6);
    }
}

// ── Full-session properties ─────────────────────────────────────────────

#[test]
fn empty_landmarks_pass_every_frame_through_exactly() {
    let mut session = RetouchSession::new(&RetouchConfig::default()).unwrap();
    for index in 0..5 {
        let frame = textured_frame(index);
        let out = session.process(&frame, &[]).unwrap();
        assert_eq!(out, frame);
    }
}

#[test]
fn face_retouches_skin_but_not_background() {
    let mut session = RetouchSession::new(&RetouchConfig::default()).unwrap();
    let frame = textured_frame(0);
    let out = session.process(&frame, &[mesh_face(0.5, 0.5)]).unwrap();

    assert_ne!(out, frame);
    // Top-left background pixel survives byte for byte.
    assert_eq!(&out.data()[..3], &frame.data()[..3]);
}

#[test]
fn grain_zero_makes_sessions_fully_deterministic() {
    let config = RetouchConfig {
        grain: 0,
        ..Default::default()
    };
    let frame = textured_frame(0);
    let faces = [mesh_face(0.5, 0.5)];

    let a = RetouchSession::new(&config)
        .unwrap()
        .process(&frame, &faces)
        .unwrap();
    let b = RetouchSession::new(&config)
        .unwrap()
        .process(&frame, &faces)
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn grain_zero_leaves_blend_output_untouched() {
    // With grain disabled, the synthesizer stage is an exact identity:
    // process output equals what the blender produced.
    let frame = textured_frame(0);
    let skin = Mask::new(vec![1.0; (SIZE * SIZE) as usize], SIZE, SIZE);
    let mut grain = GrainSynthesizer::new(0, 123);
    let blended = FloatFrame::from_frame(&frame);
    let out = grain.sprinkle(&blended, &skin);
    assert_eq!(out.data(), blended.data());
}

#[test]
fn out_of_range_config_rejected_before_first_frame() {
    let config = RetouchConfig {
        smoothness_radius: 99,
        ..Default::default()
    };
    assert!(RetouchSession::new(&config).is_err());
}

// ── Stage range invariants across the config space ──────────────────────

#[rstest]
#[case::minimums(RetouchConfig {
    smoothness_radius: 20, texture_preserve: 40, shine_reduction: 15,
    tone_evenness: 10, eye_lip_protect: 70, amount: 45, grain: 6,
})]
#[case::defaults(RetouchConfig::default())]
#[case::maximums(RetouchConfig {
    smoothness_radius: 40, texture_preserve: 70, shine_reduction: 35,
    tone_evenness: 25, eye_lip_protect: 95, amount: 75, grain: 16,
})]
fn every_stage_emits_unit_range_values(#[case] config: RetouchConfig) {
    let original = FloatFrame::from_frame(&textured_frame(0));
    let (skin, protection) = builder().build(&[mesh_face(0.5, 0.5)], SIZE, SIZE);

    let smoothed = CpuBilateralSmoother::new(config.smoothness_radius).smooth(&original);
    assert!(in_unit_range(smoothed.data()), "smoother out of range");

    let detailed = DetailRecoverer::new(config.texture_preserve).recover(&original, &smoothed);
    assert!(in_unit_range(detailed.data()), "detail recovery out of range");

    let compressed = HighlightCompressor::new(config.shine_reduction).compress(&detailed);
    assert!(in_unit_range(compressed.data()), "highlight out of range");

    let evened = ToneEvener::new(config.tone_evenness).even(&compressed);
    assert!(in_unit_range(evened.data()), "tone evener out of range");

    let blender = Blender::new(config.amount, config.eye_lip_protect);
    let weights = blender.weight_field(&skin, &protection);
    assert!(in_unit_range(weights.data()), "weights out of range");

    let blended = blender.composite(&original, &evened, &weights);
    assert!(in_unit_range(blended.data()), "composite out of range");

    let grained = GrainSynthesizer::new(config.grain, 42).sprinkle(&blended, &skin);
    assert!(in_unit_range(grained.data()), "grain out of range");
}

// ── Temporal behavior ───────────────────────────────────────────────────

#[test]
fn stabilized_mask_converges_under_constant_landmarks() {
    let mut session = RetouchSession::new(&RetouchConfig::default()).unwrap();
    let faces = [mesh_face(0.5, 0.5)];

    let mut previous: Option<Vec<f32>> = None;
    let mut last_delta = f32::MAX;
    for index in 0..8 {
        let frame = textured_frame(index);
        let (skin, _) = session.masks(&frame, &faces).unwrap();
        if let Some(prev) = previous {
            let delta: f32 = prev
                .iter()
                .zip(skin.data())
                .map(|(a, b)| (a - b).abs())
                .sum();
            assert!(delta <= last_delta + 1e-3, "convergence must be monotone");
            last_delta = delta;
        }
        previous = Some(skin.data().to_vec());
    }
    assert!(last_delta < 1e-2, "mask must settle under constant input");
}

#[test]
fn mask_decays_after_face_disappears() {
    let mut session = RetouchSession::new(&RetouchConfig::default()).unwrap();
    let faces = [mesh_face(0.5, 0.5)];

    session.process(&textured_frame(0), &faces).unwrap();
    let coverage_with_face = session.last_stats().mask_coverage;

    session.process(&textured_frame(1), &[]).unwrap();
    let coverage_after = session.last_stats().mask_coverage;

    assert!(coverage_after > 0.0, "one frame of lag is expected");
    assert!(coverage_after < coverage_with_face);
    assert_relative_eq!(coverage_after, coverage_with_face * 0.6, epsilon = 1e-4);
}
