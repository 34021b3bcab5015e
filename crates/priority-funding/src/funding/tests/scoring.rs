use super::common::*;
use crate::funding::domain::Indicator;
use crate::funding::scoring::{
    explain, score, score_regions, ScoringError, LUMINOSITY_EPSILON,
};
use crate::funding::weights::WeightVector;

#[test]
fn algiers_scores_with_default_weights() {
    let weights = WeightVector::default();
    let value = score(&algiers(), &weights);

    let expected = 0.4 * 0.7 + 0.25 * 0.7 + 0.2 * 0.5 + 0.15 / 0.2001;
    assert_close(value, expected, 1e-12);
    assert_close(value, 1.3046, 1e-4);
}

#[test]
fn zero_luminosity_uses_epsilon_guard() {
    let dark = region("dark", [0.0, 1.0, 1.0, 0.0]);
    let weights = WeightVector::new(0.0, 0.0, 0.0, 0.15);

    let value = score(&dark, &weights);
    assert!(value.is_finite());
    assert_close(value, 0.15 / LUMINOSITY_EPSILON, 1e-9);
    assert_close(value, 0.15 * 10_000.0, 1e-9);
}

#[test]
fn luminosity_term_is_a_division_not_a_subtraction() {
    let weights = WeightVector::new(0.0, 0.0, 0.0, 1.0);
    let dim = score(&region("dim", [0.0, 1.0, 1.0, 0.01]), &weights);
    let bright = score(&region("bright", [0.0, 1.0, 1.0, 1.0]), &weights);

    assert_close(dim, 1.0 / 0.0101, 1e-9);
    assert_close(bright, 1.0 / 1.0001, 1e-12);
    assert!(dim > 90.0 * bright);
}

#[test]
fn score_is_bit_identical_across_calls() {
    let weights = WeightVector::new(0.33, 0.27, 0.11, 0.07);
    let region = region("r", [0.123, 0.456, 0.789, 0.0101]);

    let first = score(&region, &weights);
    let second = score(&region, &weights);
    assert_eq!(first.to_bits(), second.to_bits());
}

#[test]
fn raising_land_degradation_weight_never_lowers_score() {
    let regions = [
        region("a", [0.7, 0.3, 0.5, 0.2]),
        region("b", [0.01, 0.9, 0.1, 0.0]),
        region("c", [1.0, 0.0, 1.0, 1.0]),
    ];

    for region in &regions {
        let mut previous = f64::NEG_INFINITY;
        for step in 0..=20 {
            let weights =
                WeightVector::default().with(Indicator::LandDegradation, step as f64 * 0.05);
            let value = score(region, &weights);
            assert!(
                value >= previous,
                "score dropped for {} at step {step}",
                region.id()
            );
            previous = value;
        }
    }
}

#[test]
fn scores_are_not_clamped() {
    let weights = WeightVector::new(2.0, 0.0, 0.0, 0.0);
    let value = score(&region("hot", [1.5, 0.0, 0.0, 1.0]), &weights);
    assert_close(value, 3.0, 1e-12);

    let negative = WeightVector::new(-1.0, 0.0, 0.0, 0.0);
    assert!(score(&region("neg", [0.5, 1.0, 1.0, 1.0]), &negative) < 0.0);
}

#[test]
fn explain_breaks_score_into_components() {
    let weights = WeightVector::default();
    let breakdown = explain(&algiers(), &weights);

    assert_eq!(breakdown.components.len(), 4);
    assert_eq!(breakdown.total.to_bits(), score(&algiers(), &weights).to_bits());

    let wealth = breakdown
        .components
        .iter()
        .find(|component| component.indicator == Indicator::Wealth)
        .expect("wealth component present");
    assert_close(wealth.contribution, 0.175, 1e-12);
    assert_eq!(wealth.raw_value, 0.3);

    let summed: f64 = breakdown
        .components
        .iter()
        .map(|component| component.contribution)
        .sum();
    assert_close(summed, breakdown.total, 1e-12);
}

#[test]
fn score_regions_preserves_order_and_rejects_empty_sets() {
    let regions = vec![region("x", [0.1, 0.1, 0.1, 0.1]), algiers()];
    let scored = score_regions(&regions, &WeightVector::default()).expect("scores");
    assert_eq!(scored[0].region.id().as_str(), "x");
    assert_eq!(scored[1].region.name(), "Algiers");

    assert_eq!(
        score_regions(&[], &WeightVector::default()),
        Err(ScoringError::EmptyRegionSet)
    );
}
