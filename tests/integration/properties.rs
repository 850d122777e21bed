//! Properties that must hold for any input curve, checked on random
//! multi-peak curves.

use crate::test_helpers::multi_peak_curve;
use clregion_rs::interval::{ClIntervalEngine, ClIntervalSet, IntervalConfig, Solution};
use clregion_rs::SampledCurve;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const TOL: f64 = 1e-9;

fn random_curve(rng: &mut ChaCha8Rng) -> SampledCurve {
    let n_peaks = rng.gen_range(1..=3);
    let peaks: Vec<(f64, f64)> = (0..n_peaks)
        .map(|_| (rng.gen_range(1.0..9.0), rng.gen_range(0.3..1.0)))
        .collect();
    multi_peak_curve(&peaks, 0.0, 10.0, 200)
}

fn engine() -> ClIntervalEngine {
    let config = IntervalConfig {
        confidence_levels: vec![0.6827, 0.9545],
        seed_from_maxima: true,
        ..IntervalConfig::default()
    };
    ClIntervalEngine::new(config).unwrap()
}

/// Peaks as narrow as a fraction of a bin on coarse to fine binnings, with
/// the peak positions as solutions, best first.
fn random_narrow_peaks(rng: &mut ChaCha8Rng) -> (SampledCurve, Vec<Solution>) {
    let n_peaks = rng.gen_range(1..=3);
    let peaks: Vec<(f64, f64)> = (0..n_peaks)
        .map(|_| (rng.gen_range(1.0..9.0), rng.gen_range(0.05..1.0)))
        .collect();
    let nbins = rng.gen_range(26..200);
    let solutions = peaks
        .iter()
        .enumerate()
        .map(|(k, &(mu, _))| match k {
            0 => Solution::best_fit(mu),
            _ => Solution::new(mu, "local"),
        })
        .collect();
    (multi_peak_curve(&peaks, 0.0, 10.0, nbins), solutions)
}

fn assert_nested(inner: &ClIntervalSet, outer: &ClIntervalSet) {
    for cli in inner {
        let nested = outer
            .iter()
            .any(|o| o.min <= cli.min + TOL && cli.max <= o.max + TOL);
        assert!(
            nested,
            "interval [{}, {}] not inside any interval at {} CL",
            cli.min,
            cli.max,
            outer.confidence_level()
        );
    }
}

#[test]
fn test_higher_level_intervals_contain_lower_level_ones() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let engine = engine();
    for _ in 0..25 {
        let curve = random_curve(&mut rng);
        let result = engine.compute(&curve, &[]).unwrap();
        assert!(!result.sets[0].is_empty());
        assert_nested(&result.sets[0], &result.sets[1]);
    }
}

#[test]
fn test_central_value_lies_inside_closed_intervals() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let engine = engine();
    for _ in 0..25 {
        let curve = random_curve(&mut rng);
        let result = engine.compute(&curve, &[]).unwrap();
        for cli in result.sets.iter().flatten().filter(|c| c.is_closed()) {
            assert!(cli.min <= cli.central && cli.central <= cli.max, "{}", cli);
            assert!(cli.min >= curve.xmin() && cli.max <= curve.xmax());
        }
    }
}

#[test]
fn test_narrow_peaks_with_solutions() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let engine = ClIntervalEngine::new(IntervalConfig {
        confidence_levels: vec![0.6827, 0.9545],
        ..IntervalConfig::default()
    })
    .unwrap();
    for _ in 0..50 {
        let (curve, solutions) = random_narrow_peaks(&mut rng);
        let result = engine.compute(&curve, &solutions).unwrap();
        for cli in result.sets.iter().flatten() {
            if cli.min_closed {
                assert!(cli.min <= cli.central, "{} on {} bins", cli, curve.len());
            }
            if cli.max_closed {
                assert!(cli.central <= cli.max, "{} on {} bins", cli, curve.len());
            }
        }
        assert_nested(&result.sets[0], &result.sets[1]);
    }
}
