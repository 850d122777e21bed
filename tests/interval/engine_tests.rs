//! Tests for the confidence interval engine

use crate::test_helpers::{gaussian_curve, gaussian_pvalue, multi_peak_curve};
use approx::assert_abs_diff_eq;
use clregion_rs::interval::{
    BoundMethod, CentralMethod, ClIntervalEngine, IntervalConfig, Solution,
};
use clregion_rs::sampled::SampledCurve;
use clregion_rs::ClRegionError;

#[test]
fn test_default_levels_nest() {
    let curve = gaussian_curve(5.0, 1.0, 0.0, 10.0, 200);
    let engine = ClIntervalEngine::new(IntervalConfig::default()).unwrap();
    let result = engine.compute(&curve, &[Solution::best_fit(5.0)]).unwrap();
    assert_eq!(result.sets.len(), 3);

    let expected_half_widths = [1.0, 2.0, 3.0];
    for (set, half) in result.sets.iter().zip(expected_half_widths) {
        assert_eq!(set.len(), 1);
        let cli = set.get(0).unwrap();
        assert!(cli.is_closed());
        assert_abs_diff_eq!(cli.neg_error(), half, epsilon = 2e-3);
        assert_abs_diff_eq!(cli.pos_error(), half, epsilon = 2e-3);
    }
    assert_eq!(result.stats.quadratic, 6);
    assert_eq!(result.stats.linear_fallback, 0);
}

#[test]
fn test_empty_level_list_uses_defaults() {
    let config = IntervalConfig {
        confidence_levels: vec![],
        ..IntervalConfig::default()
    };
    let curve = gaussian_curve(5.0, 1.0, 0.0, 10.0, 100);
    let result = ClIntervalEngine::new(config)
        .unwrap()
        .compute(&curve, &[])
        .unwrap();
    assert_eq!(result.sets.len(), 3);
    assert_abs_diff_eq!(result.sets[2].confidence_level(), 0.9973, epsilon = 1e-12);
}

#[test]
fn test_level_outside_unit_interval_is_fatal() {
    let config = IntervalConfig {
        confidence_levels: vec![0.68, 1.2],
        ..IntervalConfig::default()
    };
    assert!(matches!(
        ClIntervalEngine::new(config),
        Err(ClRegionError::InvalidConfidenceLevel(l)) if l == 1.2
    ));
}

#[test]
fn test_two_solutions_two_intervals() {
    let curve = multi_peak_curve(&[(2.0, 0.5), (7.0, 0.5)], 0.0, 10.0, 200);
    let engine = ClIntervalEngine::new(IntervalConfig::with_level(0.6827)).unwrap();
    let solutions = [Solution::best_fit(2.0), Solution::new(7.0, "second minimum")];
    let result = engine.compute(&curve, &solutions).unwrap();
    let set = &result.sets[0];
    assert_eq!(set.len(), 2);

    let first = set.get(0).unwrap();
    assert_eq!(first.central, 2.0);
    assert_abs_diff_eq!(first.min, 1.5, epsilon = 2e-3);
    assert_abs_diff_eq!(first.max, 2.5, epsilon = 2e-3);
    let second = set.get(1).unwrap();
    assert_eq!(second.central_method.to_string(), "second minimum");
    assert_abs_diff_eq!(second.width(), 1.0, epsilon = 4e-3);
}

#[test]
fn test_unseeded_region_gets_raw_interval() {
    let curve = multi_peak_curve(&[(2.0, 0.5), (7.0, 0.5)], 0.0, 10.0, 200);
    let engine = ClIntervalEngine::new(IntervalConfig::with_level(0.6827)).unwrap();
    let result = engine.compute(&curve, &[Solution::best_fit(2.0)]).unwrap();
    let set = &result.sets[0];
    assert_eq!(set.len(), 2);
    let raw = set.get(1).unwrap();
    assert_eq!(raw.central_method, CentralMethod::RawMid);
    assert_abs_diff_eq!(raw.central, 7.0, epsilon = 2e-3);
    assert!(raw.min <= raw.central && raw.central <= raw.max);
}

#[test]
fn test_largest_mode() {
    // 1 sigma intervals [1, 2] and [4, 5]
    let curve = multi_peak_curve(&[(1.5, 0.5), (4.5, 0.5)], 0.0, 6.0, 300);
    let config = IntervalConfig {
        largest: true,
        ..IntervalConfig::with_level(0.6827)
    };
    let engine = ClIntervalEngine::new(config).unwrap();
    let solutions = [Solution::best_fit(1.5), Solution::new(4.5, "other")];
    let result = engine.compute(&curve, &solutions).unwrap();
    let set = &result.sets[0];
    assert_eq!(set.len(), 4);

    let envelopes: Vec<_> = set
        .iter()
        .filter(|c| c.min_method == BoundMethod::Largest)
        .collect();
    assert_eq!(envelopes.len(), 2);
    for e in &envelopes {
        assert_abs_diff_eq!(e.min, 1.0, epsilon = 2e-3);
        assert_abs_diff_eq!(e.max, 5.0, epsilon = 2e-3);
    }
    assert_eq!(envelopes[0].central, 1.5);
    assert_eq!(envelopes[1].central, 4.5);
}

#[test]
fn test_largest_mode_skips_solutions_sharing_an_interval() {
    // the local optimum at 5.2 falls inside the interval seeded by 5.0
    let curve = gaussian_curve(5.0, 1.0, 0.0, 10.0, 100);
    let config = IntervalConfig {
        largest: true,
        ..IntervalConfig::with_level(0.6827)
    };
    let solutions = [Solution::best_fit(5.0), Solution::new(5.2, "local")];
    let result = ClIntervalEngine::new(config)
        .unwrap()
        .compute(&curve, &solutions)
        .unwrap();
    let set = &result.sets[0];
    assert_eq!(set.len(), 2);
    let envelope = set.get(1).unwrap();
    assert_eq!(envelope.min_method, BoundMethod::Largest);
    assert_eq!(envelope.central, 5.0);
    assert!(result.uncontained_solutions.is_empty());
}

#[test]
fn test_largest_mode_without_solutions() {
    let curve = multi_peak_curve(&[(1.5, 0.5), (4.5, 0.5)], 0.0, 6.0, 300);
    let config = IntervalConfig {
        largest: true,
        ..IntervalConfig::with_level(0.6827)
    };
    let result = ClIntervalEngine::new(config)
        .unwrap()
        .compute(&curve, &[])
        .unwrap();
    // the boundary scan already merges both regions
    let set = &result.sets[0];
    assert_eq!(set.len(), 2);
    assert_abs_diff_eq!(set.get(0).unwrap().min, 1.0, epsilon = 2e-3);
    assert_abs_diff_eq!(set.get(0).unwrap().max, 5.0, epsilon = 2e-3);
    assert_eq!(set.get(1).unwrap().max_method, BoundMethod::Largest);
}

#[test]
fn test_solution_walk_reaching_boundary_is_discarded() {
    // best fit at 9.5, curve still above 1 - CL at the upper edge
    let curve = gaussian_curve(9.5, 1.0, 0.0, 10.0, 100);
    let engine = ClIntervalEngine::new(IntervalConfig::with_level(0.6827)).unwrap();
    let result = engine.compute(&curve, &[Solution::best_fit(9.5)]).unwrap();
    assert_eq!(result.stats.bad_intervals, 1);

    // the region is still reported, open at the upper side
    let set = &result.sets[0];
    assert_eq!(set.len(), 1);
    let cli = set.get(0).unwrap();
    assert!(cli.min_closed);
    assert!(!cli.max_closed);
    assert_eq!(cli.max, 10.0);
    assert_abs_diff_eq!(cli.min, 8.5, epsilon = 1e-3);
    assert_eq!(cli.central, 9.5);
    assert!(result.uncontained_solutions.is_empty());
}

#[test]
fn test_maxima_seeding() {
    // second peak off the bin edges so that it has a single maximum bin
    let curve = multi_peak_curve(&[(2.0, 0.5), (7.01, 0.5)], 0.0, 10.0, 200);
    let config = IntervalConfig {
        seed_from_maxima: true,
        ..IntervalConfig::with_level(0.6827)
    };
    let result = ClIntervalEngine::new(config)
        .unwrap()
        .compute(&curve, &[Solution::best_fit(2.0)])
        .unwrap();
    let set = &result.sets[0];
    assert_eq!(set.len(), 2);
    assert_eq!(set.get(0).unwrap().central_method.to_string(), "max PLH");
    let second = set.get(1).unwrap();
    assert_eq!(second.central_method.to_string(), "max bin");
    assert_abs_diff_eq!(second.central, 7.01, epsilon = curve.bin_width());
}

#[test]
fn test_cls_mode_normalizes_to_first_bin() {
    let raw = SampledCurve::from_fn(0.0, 10.0, 100, |x| 0.5 * gaussian_pvalue(x, 0.0, 3.0)).unwrap();
    let config = IntervalConfig {
        cls: true,
        ..IntervalConfig::with_level(0.95)
    };
    let result = ClIntervalEngine::new(config)
        .unwrap()
        .compute(&raw, &[])
        .unwrap();
    let cli = result.sets[0].get(0).unwrap();
    assert!(!cli.min_closed);

    let normalized = raw.normalized_to_first().unwrap();
    let expected = ClIntervalEngine::new(IntervalConfig::with_level(0.95))
        .unwrap()
        .compute(&normalized, &[])
        .unwrap();
    assert_eq!(cli.max, expected.sets[0].get(0).unwrap().max);

    // without normalization the limit is tighter
    let plain = ClIntervalEngine::new(IntervalConfig::with_level(0.95))
        .unwrap()
        .compute(&raw, &[])
        .unwrap();
    assert!(plain.sets[0].get(0).unwrap().max < cli.max);
}

#[test]
fn test_central_interval_of_empty_set() {
    let curve = SampledCurve::from_fn(0.0, 4.0, 40, |_| 0.001).unwrap();
    let engine = ClIntervalEngine::new(IntervalConfig::with_level(0.6827)).unwrap();
    let result = engine.compute(&curve, &[]).unwrap();
    let set = &result.sets[0];
    assert!(set.is_empty());
    let full = set.central_interval(curve.xmin(), curve.xmax());
    assert_eq!(full.pvalue, 0.0);
    assert_eq!((full.min, full.max), (0.0, 4.0));
}

#[test]
fn test_narrow_peak_bounds_nest_across_levels() {
    // one bin above 1 sigma, seeded off-center
    let curve = gaussian_curve(5.03, 0.08, 0.0, 10.0, 50);
    let config = IntervalConfig {
        confidence_levels: vec![0.6827, 0.9545],
        ..IntervalConfig::default()
    };
    let result = ClIntervalEngine::new(config)
        .unwrap()
        .compute(&curve, &[Solution::best_fit(5.01)])
        .unwrap();
    let one = result.sets[0].get(0).unwrap();
    let two = result.sets[1].get(0).unwrap();
    for cli in [one, two] {
        assert!(cli.is_closed());
        assert!(cli.min <= cli.central && cli.central <= cli.max, "{}", cli);
    }
    assert!(two.min <= one.min && one.max <= two.max);
}
