//! End-to-end tests for turning-pose extraction.
//!
//! These tests drive the full pipeline on synthetic limb trajectories whose
//! turning poses can be derived by hand.

use approx::assert_relative_eq;
use std::f64::consts::TAU;
use turning_poses::math::{closest_point_of_approach, covariance, reduce, variance};
use turning_poses::{
    BodyModel, BodyPart, ExtractionConfig, FrameRange, LimbComponents, PoseError, SegmentPair,
    Side, TurningPoseExtractor,
};

// =============================================================================
// TRAJECTORY GENERATORS
// =============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Sinusoid along the x axis, `period` frames per cycle.
fn generate_sinusoid(n: usize, period: f64) -> Vec<[f64; 3]> {
    (0..n)
        .map(|i| [(TAU * i as f64 / period).sin(), 0.0, 0.0])
        .collect()
}

/// Circle in the xy plane.
fn generate_circle(n: usize, radius: f64, period: f64) -> Vec<[f64; 3]> {
    (0..n)
        .map(|i| {
            let angle = TAU * i as f64 / period;
            [radius * angle.cos(), radius * angle.sin(), 0.0]
        })
        .collect()
}

/// Static point repeated for `n` frames.
fn generate_still(n: usize, point: [f64; 3]) -> Vec<[f64; 3]> {
    vec![point; n]
}

/// Forearm whose left wrist follows the sinusoid; everything else is still.
fn sinusoid_forearms(n: usize) -> LimbComponents {
    let left = SegmentPair::new(
        "lelb",
        generate_still(n, [0.5, 0.5, 0.5]),
        "lwra",
        generate_sinusoid(n, 20.0),
    );
    let right = SegmentPair::new(
        "relb",
        generate_still(n, [-0.5, 0.5, 0.5]),
        "rwra",
        generate_still(n, [-0.5, 0.0, 0.5]),
    );
    LimbComponents::new(BodyPart::ForeArms, left, right)
}

/// Two skew segments: the left one along x at the origin, the right one
/// along y at height `2 + sin`. Their CPA vector is `[0, 0, -(2 + sin)]`.
fn skew_forearms(n: usize) -> LimbComponents {
    let left = SegmentPair::new(
        "lelb",
        generate_still(n, [0.0, 0.0, 0.0]),
        "lwra",
        generate_still(n, [1.0, 0.0, 0.0]),
    );
    let heights: Vec<f64> = generate_sinusoid(n, 20.0)
        .iter()
        .map(|p| 2.0 + p[0])
        .collect();
    let right = SegmentPair::new(
        "relb",
        heights.iter().map(|&h| [0.0, 0.0, h]).collect(),
        "rwra",
        heights.iter().map(|&h| [0.0, 1.0, h]).collect(),
    );
    LimbComponents::new(BodyPart::ForeArms, left, right)
}

fn short_windows(config: ExtractionConfig) -> ExtractionConfig {
    config
        .with_velocity_window(2)
        .with_energy_window(2)
        .with_mass(1.0)
}

// =============================================================================
// END-TO-END
// =============================================================================

#[test]
fn test_sinusoid_turning_poses_raw() {
    init_tracing();
    let n = 100;
    let center = generate_still(n, [0.0, 0.0, 0.0]);
    let limbs = vec![sinusoid_forearms(n)];

    let extractor =
        TurningPoseExtractor::new(short_windows(ExtractionConfig::raw(Side::Left))).unwrap();
    let extraction = extractor.extract(&limbs, &center).unwrap();

    assert_eq!(extraction.velocity.len(), 98);
    assert_eq!(extraction.energy.len(), 98);
    assert_eq!(extraction.weight.len(), 98);
    assert_eq!(
        extraction.turning_poses,
        (10..=90).step_by(10).collect::<Vec<_>>()
    );
}

#[test]
fn test_sinusoid_turning_poses_cpa() {
    init_tracing();
    let n = 100;
    let center = generate_still(n, [0.0, 0.0, 0.0]);
    let limbs = vec![skew_forearms(n)];

    let extractor = TurningPoseExtractor::new(short_windows(ExtractionConfig::dance())).unwrap();
    let extraction = extractor.extract(&limbs, &center).unwrap();

    // Only one principal axis carries variance.
    assert!(extraction.eigenvalues[0] > 0.1);
    assert_relative_eq!(extraction.eigenvalues[1], 0.0, epsilon = 1e-9);
    assert_eq!(
        extraction.turning_poses,
        (10..=90).step_by(10).collect::<Vec<_>>()
    );
}

#[test]
fn test_frame_range_shifts_poses() {
    init_tracing();
    let n = 140;
    let center = generate_still(n, [0.0, 0.0, 0.0]);
    let limbs = vec![sinusoid_forearms(n)];

    // A 20-frame shift keeps the phase of a 20-frame period.
    let config =
        short_windows(ExtractionConfig::raw(Side::Left)).with_frame_range(FrameRange::new(20, 120));
    let extraction = TurningPoseExtractor::new(config)
        .unwrap()
        .extract(&limbs, &center)
        .unwrap();

    assert_eq!(extraction.trajectory.len(), 100);
    assert_eq!(
        extraction.turning_poses,
        (30..=110).step_by(10).collect::<Vec<_>>()
    );
}

#[test]
fn test_frame_range_out_of_bounds() {
    let n = 50;
    let center = generate_still(n, [0.0, 0.0, 0.0]);
    let limbs = vec![sinusoid_forearms(n)];

    let config = ExtractionConfig::raw(Side::Left).with_frame_range(FrameRange::new(10, 80));
    let err = TurningPoseExtractor::new(config)
        .unwrap()
        .extract(&limbs, &center)
        .unwrap_err();
    assert!(matches!(err, PoseError::Segment { .. }));
}

#[test]
fn test_deterministic() {
    let n = 150;
    let circle = generate_circle(n, 0.4, 37.0);
    let center = generate_still(n, [0.0, 0.0, 0.0]);
    let left = SegmentPair::new("lelb", generate_still(n, [0.2, 0.0, 0.0]), "lwra", circle.clone());
    let lifted: Vec<[f64; 3]> = circle.iter().map(|p| [p[0], p[1], 0.3]).collect();
    let right = SegmentPair::new("relb", generate_still(n, [-0.2, 0.0, 0.0]), "rwra", lifted);
    let limbs = vec![LimbComponents::new(BodyPart::Hands, left, right)];

    let extractor = TurningPoseExtractor::new(ExtractionConfig::dance()).unwrap();
    let first = extractor.extract(&limbs, &center).unwrap();
    let second = extractor.extract(&limbs, &center).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_smoothed_preset_runs() {
    let n = 120;
    let center = generate_still(n, [0.0, 0.0, 0.0]);
    let limbs = vec![skew_forearms(n)];

    let extraction = TurningPoseExtractor::new(ExtractionConfig::smoothed())
        .unwrap()
        .extract(&limbs, &center)
        .unwrap();
    assert_eq!(extraction.trajectory.len(), n);
    assert!(extraction.trajectory.iter().flatten().all(|v| v.is_finite()));
}

#[test]
fn test_curvature_fusion_end_to_end() {
    init_tracing();
    let n = 100;
    let center = generate_still(n, [0.0, 0.0, 0.0]);
    let limbs = vec![sinusoid_forearms(n)];
    let curvature: Vec<f64> = (0..n).map(|i| (0.3 * i as f64).sin().abs()).collect();

    let extractor =
        TurningPoseExtractor::new(short_windows(ExtractionConfig::raw(Side::Left))).unwrap();
    let extraction = extractor
        .extract_with_curvature(&limbs, &center, &curvature)
        .unwrap();

    assert_eq!(extraction.fused_strength.len(), 98);
    assert!(!extraction.curvature_candidates.is_empty());
    assert!(extraction.fused_strength.iter().all(|s| s.is_finite() && *s >= 0.0));
    assert_eq!(
        extraction.turning_poses,
        (10..=90).step_by(10).collect::<Vec<_>>()
    );

    let err = extractor
        .extract_with_curvature(&limbs, &center, &curvature[..n - 1])
        .unwrap_err();
    assert!(matches!(err, PoseError::Segment { .. }));
}

// =============================================================================
// BODY MODEL AND ERRORS
// =============================================================================

#[test]
fn test_body_model_drops_parts() {
    init_tracing();
    let n = 100;
    let center = generate_still(n, [0.0, 0.0, 0.0]);
    let mut upper = sinusoid_forearms(n);
    upper.part = BodyPart::UpperArms;
    let limbs = vec![upper, skew_forearms(n)];

    // The four-segment model keeps the upper arms and ignores the forearms.
    let config = short_windows(ExtractionConfig::raw(Side::Left)).with_model(BodyModel::Four);
    let extraction = TurningPoseExtractor::new(config)
        .unwrap()
        .extract(&limbs, &center)
        .unwrap();
    assert_eq!(
        extraction.turning_poses,
        (10..=90).step_by(10).collect::<Vec<_>>()
    );
}

#[test]
fn test_mismatched_landmark_reports_name() {
    let n = 60;
    let center = generate_still(n, [0.0, 0.0, 0.0]);
    let mut limb = skew_forearms(n);
    limb.left.distal.truncate(n - 3);

    let err = TurningPoseExtractor::new(ExtractionConfig::dance())
        .unwrap()
        .extract(&[limb], &center)
        .unwrap_err();
    match err {
        PoseError::Segment { name, source } => {
            assert_eq!(name, "lwra");
            assert!(matches!(*source, PoseError::LengthMismatch { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_too_short_for_windows() {
    let n = 15;
    let center = generate_still(n, [0.0, 0.0, 0.0]);
    let limbs = vec![skew_forearms(n)];

    let err = TurningPoseExtractor::new(ExtractionConfig::dance())
        .unwrap()
        .extract(&limbs, &center)
        .unwrap_err();
    assert!(matches!(err, PoseError::SeriesTooShort { .. }));
}

// =============================================================================
// BUILDING BLOCKS
// =============================================================================

#[test]
fn test_linear_relation_covariance_and_pca() {
    let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
    let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();

    assert_relative_eq!(variance(&x).unwrap(), 2.5, epsilon = 1e-12);
    assert_relative_eq!(covariance(&x, &y).unwrap(), 5.0, epsilon = 1e-12);

    let pca = reduce(&[x, y], 1).unwrap();
    assert_relative_eq!(pca.eigenvalues[0], 12.5, epsilon = 1e-9);
    assert_relative_eq!(pca.eigenvalues[1], 0.0, epsilon = 1e-9);

    let axis = pca.axis(0);
    let sign = axis[0].signum();
    assert_relative_eq!(sign * axis[0], 1.0 / 5f64.sqrt(), epsilon = 1e-9);
    assert_relative_eq!(sign * axis[1], 2.0 / 5f64.sqrt(), epsilon = 1e-9);
}

#[test]
fn test_cpa_of_skew_segments() {
    let n = 40;
    let limb = skew_forearms(n);
    let cpa = closest_point_of_approach(
        &limb.left.proximal,
        &limb.left.distal,
        &limb.right.proximal,
        &limb.right.distal,
    )
    .unwrap();

    for (point, right) in cpa.iter().zip(limb.right.proximal.iter()) {
        assert_relative_eq!(point[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(point[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(point[2], -right[2], epsilon = 1e-12);
    }
}

#[test]
fn test_cpa_parallel_segments_stay_finite() {
    let n = 5;
    let a0 = generate_still(n, [0.0, 0.0, 0.0]);
    let a1 = generate_still(n, [1.0, 0.0, 0.0]);
    let b0 = generate_still(n, [0.0, 1.0, 0.0]);
    let b1 = generate_still(n, [1.0, 1.0, 0.0]);

    let cpa = closest_point_of_approach(&a0, &a1, &b0, &b1).unwrap();
    for point in &cpa {
        assert!(point.iter().all(|v| v.is_finite()));
        assert_relative_eq!(point[1], -1.0, epsilon = 1e-12);
    }
}
