use super::*;
use crate::core::config::IsthmusConfig;
use approx::assert_relative_eq;

fn published_registry() -> PriorRegistry {
    PriorRegistry::new(IsthmusConfig::published_priors(), &FeatureSchema::default()).unwrap()
}

fn observed_fixture() -> FeatureVector {
    let mut observed = FeatureVector::zeros();
    observed
        .set(FeatureName::SegmentLengthMean, 5.06)
        .set(FeatureName::FinalEntropy, 4.33)
        .set(FeatureName::BigramEntropy, 8.57);
    observed
}

#[test]
fn test_prior_variance() {
    let prior = PriorSpec::new(2.0, 0.5);
    assert_eq!(prior.variance(), 0.25);
}

#[test]
fn test_gaussian_log_evidence_at_mean() {
    // Observed exactly at the mean: only the normalising term remains
    let prior = PriorSpec::new(3.0, 1.0);
    let log_l = gaussian_log_evidence(3.0, &prior, 0.0);
    assert_relative_eq!(log_l, -0.5 * (2.0 * PI).ln(), epsilon = 1e-12);
}

#[test]
fn test_gaussian_log_evidence_adds_observation_variance() {
    let prior = PriorSpec::new(0.0, 1.0);
    let log_l = gaussian_log_evidence(2.0, &prior, 3.0);
    // combined variance 4.0
    let expected = -0.5 * (2.0 * PI * 4.0).ln() - 4.0 / 8.0;
    assert_relative_eq!(log_l, expected, epsilon = 1e-12);
}

#[test]
fn test_log_evidence_decreases_with_distance() {
    let prior = PriorSpec::new(5.0, 1.5);
    let near = gaussian_log_evidence(5.1, &prior, 0.1);
    let far = gaussian_log_evidence(9.0, &prior, 0.1);
    assert!(near > far);
}

#[test]
fn test_registry_requires_every_schema_feature() {
    let err = PriorRegistry::new(IsthmusConfig::published_priors(), &FeatureSchema::full())
        .unwrap_err();

    if let IsthmusError::Config {
        family, feature, ..
    } = err
    {
        assert_eq!(family.as_deref(), Some("MZ"));
        assert_eq!(feature.as_deref(), Some("segment_length_std"));
    } else {
        panic!("Expected Config error");
    }
}

#[test]
fn test_registry_rejects_non_positive_stdev() {
    let mut priors = IsthmusConfig::published_priors();
    priors["Huastecan"].insert(FeatureName::FinalEntropy, PriorSpec::new(1.8, 0.0));

    let err = PriorRegistry::new(priors, &FeatureSchema::default()).unwrap_err();
    if let IsthmusError::Config {
        family, feature, ..
    } = err
    {
        assert_eq!(family.as_deref(), Some("Huastecan"));
        assert_eq!(feature.as_deref(), Some("final_entropy"));
    } else {
        panic!("Expected Config error");
    }
}

#[test]
fn test_registry_rejects_empty_table() {
    let err = PriorRegistry::new(PriorTable::new(), &FeatureSchema::default()).unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_registry_lookup() {
    let registry = published_registry();
    assert_eq!(registry.len(), 2);
    assert_eq!(
        registry.get("MZ", FeatureName::BigramEntropy),
        Some(&PriorSpec::new(4.5, 1.0))
    );
    assert_eq!(registry.get("Olmec", FeatureName::BigramEntropy), None);
}

#[test]
fn test_engine_rejects_negative_observation_variance() {
    let observation = ObservationVariance::uniform(-0.1);
    let err = EvidenceEngine::new(published_registry(), observation, EvidenceModel::Independent)
        .unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_total_is_sum_of_contributions() {
    let engine = EvidenceEngine::new(
        published_registry(),
        ObservationVariance::uniform(0.1),
        EvidenceModel::Independent,
    )
    .unwrap();

    let results = engine.evaluate(&observed_fixture()).unwrap();
    assert_eq!(results.len(), 2);

    for evidence in &results {
        assert_eq!(evidence.contributions.len(), 3);
        let sum: f64 = evidence.contributions.values().sum();
        assert_relative_eq!(evidence.total_log_evidence, sum, epsilon = 1e-12);
    }
}

#[test]
fn test_contributions_match_closed_form() {
    let engine = EvidenceEngine::new(
        published_registry(),
        ObservationVariance::uniform(0.1),
        EvidenceModel::Independent,
    )
    .unwrap();

    let mz = engine.evaluate_family("MZ", &observed_fixture()).unwrap();
    let final_contribution = mz.contributions[&FeatureName::FinalEntropy];

    let combined = 0.25 + 0.1;
    let expected = -0.5 * (2.0 * PI * combined).ln() - (4.33_f64 - 2.0).powi(2) / (2.0 * combined);
    assert_relative_eq!(final_contribution, expected, epsilon = 1e-12);
}

#[test]
fn test_features_outside_schema_are_not_scored() {
    let engine = EvidenceEngine::new(
        published_registry(),
        ObservationVariance::uniform(0.1),
        EvidenceModel::Independent,
    )
    .unwrap();

    let mut observed = observed_fixture();
    let baseline = engine.evaluate(&observed).unwrap();
    observed.set(FeatureName::FrequencyConcentration, 0.9);
    let changed = engine.evaluate(&observed).unwrap();

    assert_eq!(baseline, changed);
}

#[test]
fn test_non_finite_observation_rejected() {
    let engine = EvidenceEngine::new(
        published_registry(),
        ObservationVariance::default(),
        EvidenceModel::Independent,
    )
    .unwrap();

    let mut observed = observed_fixture();
    observed.set(FeatureName::FinalEntropy, f64::NAN);
    assert!(engine.evaluate(&observed).is_err());
}

#[test]
fn test_parallel_and_sequential_agree() {
    let sequential = EvidenceEngine::new(
        published_registry(),
        ObservationVariance::uniform(0.1),
        EvidenceModel::Independent,
    )
    .unwrap();
    let parallel = sequential.clone().with_parallel(true);
    assert!(!sequential.is_parallel());
    assert_eq!(parallel.is_parallel(), crate::features::has_parallel());

    let observed = observed_fixture();
    assert_eq!(
        sequential.evaluate(&observed).unwrap(),
        parallel.evaluate(&observed).unwrap()
    );
}

#[test]
fn test_weakest_feature() {
    let mut contributions = IndexMap::new();
    contributions.insert(FeatureName::SegmentLengthMean, -1.3);
    contributions.insert(FeatureName::FinalEntropy, -8.1);
    contributions.insert(FeatureName::BigramEntropy, -8.5);

    let evidence = FamilyEvidence::from_contributions("MZ", contributions);
    assert_eq!(
        evidence.weakest_feature(),
        Some((FeatureName::BigramEntropy, -8.5))
    );
    assert_relative_eq!(evidence.total_log_evidence, -17.9, epsilon = 1e-9);
}
