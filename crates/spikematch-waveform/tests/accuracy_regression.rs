//! Accuracy regression tests for spikematch-waveform.
//!
//! These tests pin the shape/scale distance to hand-checked reference values
//! and to the algebraic properties of the formula, so that refactors of the
//! per-channel reductions cannot silently change results.

use std::f64::consts::LN_2;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use spikematch_waveform::{
    DistanceError, DistanceMode, Waveform, WaveformDistance, compute_waveform_distance,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const TOL: f64 = 1e-12;

fn rows<const C: usize>(values: &[[f64; C]]) -> Waveform {
    Waveform::from_rows(values).expect("valid test waveform")
}

fn random_waveform(rng: &mut ChaCha8Rng, n_samples: usize, n_channels: usize) -> Waveform {
    let values: Vec<f64> = (0..n_samples * n_channels)
        .map(|_| rng.gen_range(-50.0..50.0))
        .collect();
    Waveform::from_row_major(n_samples, n_channels, &values).expect("valid random waveform")
}

fn assert_close(got: f64, expected: f64, what: &str) {
    assert!(
        (got - expected).abs() < TOL,
        "{what}: got {got:.17}, expected {expected:.17}"
    );
}

// ---------------------------------------------------------------------------
// a) reference values
// ---------------------------------------------------------------------------

/// Two- and three-channel pairs with reference values computed independently.
#[test]
fn distances_match_known_values() {
    // ch0: alpha = 0.8, term = 0.6; ch1: alpha = 1, term = 1/sqrt(2)
    let x = rows(&[[1.0, 1.0], [2.0, 0.0]]);
    let y = rows(&[[2.0, 1.0], [1.0, 1.0]]);
    let report = WaveformDistance::literal().report(&x, &y).unwrap();
    assert_close(report.alphas[0], 0.8, "alpha0");
    assert_close(report.alphas[1], 1.0, "alpha1");
    assert_close(report.distance.shape(), 1.3071067811865476, "d1");
    assert_close(report.scale_deviation, 0.2231435513142097, "d2a");
    assert_close(report.scale_spread, 0.2231435513142097, "d2b");
    assert_close(report.distance.scale(), 0.4462871026284194, "d2");

    let x = rows(&[
        [1.0, 2.0, -1.0],
        [3.0, 1.0, 0.5],
        [-1.0, 0.5, 2.0],
        [0.5, -1.0, 1.0],
    ]);
    let y = rows(&[
        [1.2, 1.5, -0.4],
        [2.5, 0.8, 0.3],
        [-0.9, 0.2, 1.1],
        [0.3, -0.6, 0.7],
    ]);
    let report = WaveformDistance::literal().report(&x, &y).unwrap();
    assert_close(report.alphas[0], 0.8666666666666667, "alpha0");
    assert_close(report.alphas[1], 0.72, "alpha1");
    assert_close(report.alphas[2], 0.552, "alpha2");
    assert_close(report.distance.shape(), 0.4038624117044437, "d1");
    assert_close(report.scale_deviation, 0.5942072327050416, "d2a");
    assert_close(report.scale_spread, 0.4511063890643683, "d2b");
    assert_close(report.distance.scale(), 1.04531362176941, "d2");
}

// ---------------------------------------------------------------------------
// b) identity and pure scaling
// ---------------------------------------------------------------------------

/// `x == y` gives exactly `[0, 0]` for single and multi-channel input.
#[test]
fn identical_waveforms_have_zero_distance() {
    let single = rows(&[[1.0], [2.0], [3.0]]);
    let d = compute_waveform_distance(&single, &single).unwrap();
    assert_eq!(d.to_array(), [0.0, 0.0]);

    let multi = rows(&[[1.0, -3.0, 0.2], [2.0, 4.0, -0.1], [3.0, 0.5, 0.7]]);
    let d = compute_waveform_distance(&multi, &multi).unwrap();
    assert_eq!(d.to_array(), [0.0, 0.0]);
}

/// `y = 2x` on one channel: `alpha = 2`, `d1 = 0`, `d2 = ln 2`.
#[test]
fn pure_scaling_gives_log_factor() {
    let x = rows(&[[1.0], [2.0], [3.0]]);
    let y = rows(&[[2.0], [4.0], [6.0]]);
    let report = WaveformDistance::literal().report(&x, &y).unwrap();
    assert_eq!(report.alphas.as_slice(), &[2.0]);
    assert_eq!(report.distance.shape(), 0.0);
    assert_eq!(report.scale_spread, 0.0);
    assert_close(report.distance.scale(), LN_2, "d2");
}

// ---------------------------------------------------------------------------
// c) scale inconsistency across channels
// ---------------------------------------------------------------------------

/// Channels scaled by 2 and 0.5: `d2a = ln 2`, `d2b = 2 ln 2`, `d2 = d2a + d2b`.
#[test]
fn inconsistent_channel_scaling_raises_spread() {
    let x = rows(&[[1.0, 1.0], [2.0, 1.0], [3.0, 1.0]]);
    let y = rows(&[[2.0, 0.5], [4.0, 0.5], [6.0, 0.5]]);
    let report = WaveformDistance::literal().report(&x, &y).unwrap();
    assert_eq!(report.n_channels(), 2);
    assert_eq!(report.alphas.as_slice(), &[2.0, 0.5]);
    assert_eq!(report.distance.shape(), 0.0);
    assert_close(report.scale_deviation, LN_2, "d2a");
    assert_close(report.scale_spread, 2.0 * LN_2, "d2b");
    assert_eq!(
        report.distance.scale(),
        report.scale_deviation + report.scale_spread
    );
}

// ---------------------------------------------------------------------------
// d) degenerate inputs
// ---------------------------------------------------------------------------

/// An all-zero channel of `x` yields NaN in both components, not an error.
#[test]
fn zero_channel_propagates_nan() {
    let x = rows(&[[0.0, 1.0], [0.0, 2.0]]);
    let y = rows(&[[1.0, 1.0], [2.0, 2.0]]);
    let report = WaveformDistance::literal().report(&x, &y).unwrap();
    assert!(report.alphas[0].is_nan());
    assert!(report.distance.shape().is_nan());
    assert!(report.distance.scale().is_nan());
}

/// An all-zero channel of `y` divides by a zero norm in `d1`. With `x`
/// nonzero there, `alpha = 0` and the residual term is `0 / 0`.
#[test]
fn zero_reference_channel_propagates_nan() {
    let x = rows(&[[1.0, 1.0], [2.0, 2.0]]);
    let y = rows(&[[1.0, 0.0], [2.0, 0.0]]);
    let report = WaveformDistance::literal().report(&x, &y).unwrap();
    assert_eq!(report.alphas.as_slice(), &[1.0, 0.0]);
    assert_eq!(report.channel_shape_terms[0], 0.0);
    assert!(report.channel_shape_terms[1].is_nan());

    let d = compute_waveform_distance(&x, &y).unwrap();
    assert!(d.shape().is_nan());
    assert!(d.scale().is_nan());
}

/// A zero scaling factor with a nonzero reference gives a finite `d1` and a
/// NaN `d2`. The `-inf - -inf` self-pair of `d2b` is NaN, and the maximum
/// keeps it rather than skipping it and reporting `inf`.
#[test]
fn zero_scaling_factor_gives_nan_scale() {
    let x = rows(&[[1.0, 1.0], [2.0, 0.0]]);
    let y = rows(&[[1.0, 0.0], [2.0, 1.0]]);
    let report = WaveformDistance::literal().report(&x, &y).unwrap();
    assert_eq!(report.alphas.as_slice(), &[1.0, 0.0]);
    assert_eq!(report.distance.shape(), 1.0);
    assert_eq!(report.scale_deviation, f64::INFINITY);
    assert!(report.scale_spread.is_nan());
    assert!(report.distance.scale().is_nan());
}

/// Strict mode turns each degenerate case into an error and agrees otherwise.
#[test]
fn strict_mode_rejects_what_literal_mode_propagates() {
    let x = rows(&[[0.0, 1.0], [0.0, 2.0]]);
    let y = rows(&[[1.0, 1.0], [2.0, 2.0]]);
    let strict = WaveformDistance::literal().with_mode(DistanceMode::Strict);
    assert_eq!(
        strict.distance(&x, &y),
        Err(DistanceError::ZeroEnergyChannel { channel: 0 })
    );

    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let a = random_waveform(&mut rng, 32, 4);
    let b = rows(
        &a.to_rows()
            .iter()
            .map(|r| [r[0] * 1.5 + 0.1, r[1] * 0.9, r[2] * 2.0 - 0.3, r[3] * 1.1])
            .collect::<Vec<_>>(),
    );
    assert_eq!(
        strict.distance(&a, &b).unwrap(),
        compute_waveform_distance(&a, &b).unwrap()
    );
}

// ---------------------------------------------------------------------------
// e) input forms and shapes
// ---------------------------------------------------------------------------

/// A 1-D waveform of length N is the same as the equivalent (N, 1) waveform.
#[test]
fn one_dimensional_input_matches_single_column() {
    let x1 = Waveform::from_samples(vec![0.3, -1.2, 2.5, 0.8]).unwrap();
    let y1 = Waveform::from_samples(vec![0.1, -0.9, 2.9, 0.5]).unwrap();
    let x2 = rows(&[[0.3], [-1.2], [2.5], [0.8]]);
    let y2 = rows(&[[0.1], [-0.9], [2.9], [0.5]]);
    assert_eq!(
        compute_waveform_distance(&x1, &y1).unwrap(),
        compute_waveform_distance(&x2, &y2).unwrap()
    );
}

/// Differing channel or sample counts are rejected before any arithmetic.
#[test]
fn shape_mismatch_is_detected() {
    let x = rows(&[[1.0, 2.0], [3.0, 4.0]]);
    let fewer_channels = rows(&[[1.0], [3.0]]);
    let more_samples = rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);

    assert_eq!(
        compute_waveform_distance(&x, &fewer_channels),
        Err(DistanceError::ShapeMismatch {
            left: (2, 2),
            right: (2, 1)
        })
    );
    assert_eq!(
        compute_waveform_distance(&x, &more_samples),
        Err(DistanceError::ShapeMismatch {
            left: (2, 2),
            right: (3, 2)
        })
    );
}

// ---------------------------------------------------------------------------
// f) randomized properties
// ---------------------------------------------------------------------------

/// Matching shapes never raise in literal mode, across many random shapes.
#[test]
fn matching_shapes_never_error() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for _ in 0..50 {
        let n_samples = rng.gen_range(1..40);
        let n_channels = rng.gen_range(1..8);
        let x = random_waveform(&mut rng, n_samples, n_channels);
        let y = random_waveform(&mut rng, n_samples, n_channels);
        let d = compute_waveform_distance(&x, &y).expect("shapes match");
        assert_eq!(d.to_array().len(), 2);
    }
}

/// Rescaling `x` by a positive constant leaves `d1` and `d2b` unchanged.
#[test]
fn shape_distance_is_amplitude_invariant() {
    let mut rng = ChaCha8Rng::seed_from_u64(1234);
    let metric = WaveformDistance::literal();
    for _ in 0..20 {
        let x = random_waveform(&mut rng, 24, 4);
        let y = random_waveform(&mut rng, 24, 4);
        let k = rng.gen_range(0.1..10.0);
        let scaled = Waveform::from_channels(
            x.channels()
                .map(|c| c.iter().map(|v| v * k).collect())
                .collect(),
        )
        .unwrap();

        let base = metric.report(&x, &y).unwrap();
        let rescaled = metric.report(&scaled, &y).unwrap();
        if !base.distance.scale().is_finite() {
            // some alpha <= 0; both sides are NaN
            assert!(rescaled.distance.scale().is_nan());
            continue;
        }
        assert!((base.distance.shape() - rescaled.distance.shape()).abs() < 1e-9);
        assert!((base.scale_spread - rescaled.scale_spread).abs() < 1e-9);
    }
}

/// Pairwise entries equal the single-pair computation, diagonal is zero.
#[test]
fn pairwise_agrees_with_single_pairs() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let waveforms: Vec<Waveform> = (0..6).map(|_| random_waveform(&mut rng, 16, 3)).collect();
    let metric = WaveformDistance::literal();
    let matrix = metric.pairwise(&waveforms).unwrap();

    assert_eq!(matrix.len(), 6);
    for (i, j, d) in matrix.iter() {
        assert_eq!(d, metric.distance(&waveforms[i], &waveforms[j]).unwrap());
        if i == j {
            assert_eq!(d.to_array(), [0.0, 0.0]);
        }
    }
}
