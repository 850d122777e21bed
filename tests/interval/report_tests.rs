//! Tests for the interval reports

use crate::test_helpers::gaussian_curve;
use clregion_rs::interval::report::{json_report, key_value_report, records_by_level, text_report};
use clregion_rs::interval::{ClIntervalEngine, IntervalConfig, ReportConfig, Solution};

fn gaussian_result() -> Vec<clregion_rs::ClIntervalSet> {
    let curve = gaussian_curve(5.0, 1.0, 0.0, 10.0, 100);
    let config = IntervalConfig {
        confidence_levels: vec![0.6827, 0.9545],
        ..IntervalConfig::default()
    };
    ClIntervalEngine::new(config)
        .unwrap()
        .compute(&curve, &[Solution::best_fit(5.0)])
        .unwrap()
        .sets
}

#[test]
fn test_text_report_lines() {
    let sets = gaussian_result();
    let mut config = ReportConfig::new("mu");
    config.unit = "GeV".to_string();
    let text = text_report(&sets, &config);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        "mu = [    4.0,     6.0] (    5.0 -    1.0 +    1.0) @0.68CL, [GeV], Prob"
    );
    assert!(lines[1].contains("@0.95CL"));
    assert!(lines[1].starts_with("mu = [    3.0,     7.0]"));
}

#[test]
fn test_verbose_report_shows_methods() {
    let sets = gaussian_result();
    let config = ReportConfig {
        verbose: true,
        ..ReportConfig::new("mu")
    };
    let text = text_report(&sets[..1], &config);
    assert!(text.contains("central: max PLH"));
    assert!(text.contains("interval: [pol2, pol2]"));
}

#[test]
fn test_key_value_report_structure() {
    let sets = gaussian_result();
    let out = key_value_report(&sets, &ReportConfig::new("mu"));
    assert!(out.starts_with("# Confidence Intervals\nintervals = {\n  '0.68' : [\n"));
    assert!(out.contains("  ],\n  '0.95' : [\n"));
    assert!(out.contains("'min':'3.0', 'max':'7.0', 'central':'5.0', 'neg':'2.0', 'pos':'2.0', 'cl':'0.95'"));
    assert!(out.ends_with("  ]\n}\n"));
}

#[test]
fn test_fixed_digits() {
    let sets = gaussian_result();
    let config = ReportConfig {
        digits: Some(3),
        ..ReportConfig::new("mu")
    };
    let records = records_by_level(&sets, &config);
    let one_sigma = &records["0.68"][0];
    assert_eq!(one_sigma.digits, 3);
    assert!((one_sigma.min - 4.0).abs() < 2e-3);
    let json = json_report(&sets, &config).unwrap();
    assert!(json.contains("\"0.95\""));
}
