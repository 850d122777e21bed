//! Tests for the confidence contour pipeline

use crate::test_helpers::{circle, RadialTracer};
use approx::assert_abs_diff_eq;
use clregion_rs::contour::{
    ChiSquareConvention, ConfidenceContours, ContourConfig, ContourSet, HistogramType, Polyline,
};
use clregion_rs::sampled::{SampledSurface, UniformAxis};
use clregion_rs::{ClRegionError, Result};
use std::cell::RefCell;
use std::f64::consts::PI;

/// `x^2 + y^2` on a 50 x 50 grid over [-5, 5]^2.
fn chi2_bowl() -> SampledSurface {
    let axis = UniformAxis::new(-5.0, 5.0, 50).unwrap();
    SampledSurface::from_fn(axis, axis, |x, y| x * x + y * y)
}

fn tracer_at(cx: f64) -> RadialTracer {
    RadialTracer {
        cx,
        cy: 0.0,
        offset: 100.0,
        npoints: 400,
    }
}

#[test]
fn test_chi2_bowl_three_levels() {
    let engine = ConfidenceContours::new(ContourConfig::with_sigma_levels(3)).unwrap();
    let set = engine
        .compute_contours(&chi2_bowl(), HistogramType::Chi2, &tracer_at(0.0))
        .unwrap();
    assert_eq!(set.n_empty, 0);

    let nominal: Vec<Option<usize>> = set.contours.iter().map(|c| c.nominal_sigma).collect();
    assert_eq!(nominal, vec![Some(3), Some(2), Some(1)]);
    for contour in &set.contours {
        let n = contour.sigma as f64;
        assert_eq!(contour.lines.len(), 1);
        assert_eq!(contour.filled.len(), 1);
        assert_abs_diff_eq!(contour.filled_area(), PI * n * n, epsilon = 1e-2);
    }
}

#[test]
fn test_two_dimensional_convention_widens_contours() {
    let config = ContourConfig {
        n_sigma: 1,
        convention: ChiSquareConvention::TwoDimensional,
        ..ContourConfig::default()
    };
    let set = ConfidenceContours::new(config)
        .unwrap()
        .compute_contours(&chi2_bowl(), HistogramType::Chi2, &tracer_at(0.0))
        .unwrap();
    let one = set.for_sigma(1).unwrap();
    // delta chi2 of 68.27% content with two degrees of freedom
    assert_abs_diff_eq!(one.threshold.unwrap(), 100.0 - 2.2958, epsilon = 1e-3);
    assert_abs_diff_eq!(one.filled_area(), PI * 2.2958, epsilon = 1e-2);
}

#[test]
fn test_levels_leaving_the_plot_fill_the_plot_area() {
    // radii 2 and 3 around x = 4 cross the padded border
    let engine = ConfidenceContours::new(ContourConfig::with_sigma_levels(3)).unwrap();
    let set = engine
        .compute_contours(&chi2_bowl(), HistogramType::Chi2, &tracer_at(4.0))
        .unwrap();
    assert_eq!(set.n_empty, 2);
    assert_eq!(set.contours.len(), 2);

    let one = &set.contours[0];
    assert_eq!(one.nominal_sigma, Some(1));
    assert_eq!(one.sigma, 1);
    assert_abs_diff_eq!(one.filled_area(), PI, epsilon = 1e-2);

    let filler = &set.contours[1];
    assert!(filler.is_plot_area());
    assert_abs_diff_eq!(filler.filled_area(), 100.0, epsilon = 1e-9);
}

#[test]
fn test_plot_area_can_be_disabled() {
    let config = ContourConfig {
        n_sigma: 3,
        fill_empty_levels: false,
        ..ContourConfig::default()
    };
    let set = ConfidenceContours::new(config)
        .unwrap()
        .compute_contours(&chi2_bowl(), HistogramType::Chi2, &tracer_at(4.0))
        .unwrap();
    assert_eq!(set.n_empty, 2);
    assert_eq!(set.contours.len(), 1);
    assert!(!set.contours[0].is_plot_area());
}

#[test]
fn test_annulus_gets_a_hole() {
    let tracer = |_: &SampledSurface, _: f64| -> Result<Vec<Polyline>> {
        Ok(vec![circle(0.0, 0.0, 1.0, 400), circle(0.0, 0.0, 2.0, 400)])
    };
    let axis = UniformAxis::new(-3.0, 3.0, 30).unwrap();
    let surface = SampledSurface::from_fn(axis, axis, |x, y| {
        let r = (x * x + y * y).sqrt();
        (-(r - 1.5).powi(2)).exp()
    });
    let set = ConfidenceContours::new(ContourConfig::with_sigma_levels(1))
        .unwrap()
        .compute_contours(&surface, HistogramType::PValue, &tracer)
        .unwrap();
    let ring = &set.contours[0];
    assert_eq!(ring.lines.len(), 2);
    assert_eq!(ring.filled.len(), 1);
    assert_abs_diff_eq!(ring.filled_area(), 3.0 * PI, epsilon = 1e-2);
}

#[test]
fn test_pvalue_surface_is_padded_only() {
    let axis = UniformAxis::new(0.0, 1.0, 10).unwrap();
    let surface = SampledSurface::from_fn(axis, axis, |x, y| 0.5 + 0.1 * x * y);
    let thresholds = RefCell::new(Vec::new());
    let tracer = |s: &SampledSurface, thr: f64| -> Result<Vec<Polyline>> {
        assert_eq!(s.values().dim(), (12, 12));
        assert_abs_diff_eq!(s.max_value(), surface.max_value(), epsilon = 1e-12);
        thresholds.borrow_mut().push(thr);
        Ok(vec![circle(0.5, 0.5, 0.1, 50)])
    };
    ConfidenceContours::default()
        .compute_contours(&surface, HistogramType::PValue, &tracer)
        .unwrap();
    let thresholds = thresholds.into_inner();
    assert_eq!(thresholds.len(), 2);
    assert_abs_diff_eq!(thresholds[0], (-2.0f64).exp(), epsilon = 1e-12);
    assert_abs_diff_eq!(thresholds[1], (-0.5f64).exp(), epsilon = 1e-12);
}

#[test]
fn test_tracer_error_is_returned() {
    let tracer = |_: &SampledSurface, _: f64| -> Result<Vec<Polyline>> {
        Err(ClRegionError::ContourTracing("no grid".to_string()))
    };
    let result = ConfidenceContours::default().compute_contours(&chi2_bowl(), HistogramType::Chi2, &tracer);
    assert!(matches!(result, Err(ClRegionError::ContourTracing(_))));
}

#[test]
fn test_config_validation() {
    assert!(matches!(
        ConfidenceContours::new(ContourConfig::with_sigma_levels(6)),
        Err(ClRegionError::InvalidSigmaLevels { requested: 6, max: 5 })
    ));
    let config = ContourConfig::from_json_str(r#"{"n_sigma": 3, "convention": "two_dimensional"}"#).unwrap();
    assert_eq!(config.n_sigma, 3);
    assert_eq!(config.convention, ChiSquareConvention::TwoDimensional);
    assert_eq!(config.magnetic_range, 0.75);
}

#[test]
fn test_contour_set_json_round_trip() {
    let set = ConfidenceContours::default()
        .compute_contours(&chi2_bowl(), HistogramType::Chi2, &tracer_at(0.0))
        .unwrap();
    let json = set.to_json().unwrap();
    assert!(json.contains("\"nominal_sigma\": 2"));
    let parsed: ContourSet = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.contours.len(), set.contours.len());
    assert_eq!(parsed.for_sigma(1).unwrap().lines[0].len(), 401);
    assert_abs_diff_eq!(parsed.for_sigma(2).unwrap().filled_area(), 4.0 * PI, epsilon = 1e-2);
}
