use super::*;
use approx::assert_relative_eq;

fn segment(symbols: &[&str]) -> Segment {
    Segment {
        text_id: "T1".to_string(),
        column: "A".to_string(),
        symbols: symbols.iter().map(|s| s.to_string()).collect(),
        start_position: 0,
        end_position: symbols.len().saturating_sub(1) as u32,
    }
}

#[test]
fn test_entropy_of_single_category_is_zero() {
    assert_eq!(shannon_entropy([7]), 0.0);
    assert_eq!(shannon_entropy(Vec::<usize>::new()), 0.0);
    assert_eq!(shannon_entropy([0, 5, 0]), 0.0);
}

#[test]
fn test_entropy_is_log2_k_for_uniform_counts() {
    assert_relative_eq!(shannon_entropy([3, 3]), 1.0, epsilon = 1e-12);
    assert_relative_eq!(shannon_entropy([2, 2, 2, 2]), 2.0, epsilon = 1e-12);
    assert_relative_eq!(shannon_entropy([1; 8]), 3.0, epsilon = 1e-12);
}

#[test]
fn test_entropy_ignores_count_order() {
    assert_relative_eq!(
        shannon_entropy([1, 2, 5]),
        shannon_entropy([5, 1, 2]),
        epsilon = 1e-12
    );
}

#[test]
fn test_feature_schema_rejects_duplicates_and_empty() {
    assert!(FeatureSchema::new(vec![]).unwrap_err().is_config());
    assert!(FeatureSchema::new(vec![FeatureName::FinalEntropy, FeatureName::FinalEntropy])
        .unwrap_err()
        .is_config());
    assert_eq!(FeatureSchema::full().len(), 6);
    assert_eq!(FeatureSchema::default().len(), 3);
}

#[test]
fn test_feature_name_round_trips_through_str() {
    for name in FeatureName::ALL {
        assert_eq!(name.as_str().parse::<FeatureName>().unwrap(), name);
    }
    assert!("vowel_harmony".parse::<FeatureName>().is_err());
}

#[test]
fn test_feature_name_serializes_snake_case() {
    let json = serde_json::to_string(&FeatureName::BigramEntropy).unwrap();
    assert_eq!(json, "\"bigram_entropy\"");
}

#[test]
fn test_extract_from_zero_segments_fails() {
    let err = FeatureExtractor::new().extract(&[]).unwrap_err();
    assert!(err.is_insufficient_data());
}

#[test]
fn test_extract_rejects_hand_built_empty_segment() {
    let segments = vec![segment(&["a", "b"]), segment(&[])];
    let err = FeatureExtractor::new().extract(&segments).unwrap_err();
    assert!(err.is_insufficient_data());
}

#[test]
fn test_extract_single_segment() {
    let vector = FeatureExtractor::new()
        .extract(&[segment(&["a", "b", "a"])])
        .unwrap();

    assert_eq!(vector.segment_length_mean, 3.0);
    assert_eq!(vector.segment_length_std, 0.0);
    assert_eq!(vector.initial_entropy, 0.0);
    assert_eq!(vector.final_entropy, 0.0);
    // (a,b) and (b,a): two equally likely pairs
    assert_relative_eq!(vector.bigram_entropy, 1.0, epsilon = 1e-12);
    assert_relative_eq!(vector.frequency_concentration, 2.0 / 3.0, epsilon = 1e-12);
}

#[test]
fn test_extract_length_statistics_use_population_std() {
    let segments = vec![segment(&["a"]), segment(&["b", "c", "d"])];
    let vector = FeatureExtractor::new().extract(&segments).unwrap();

    assert_eq!(vector.segment_length_mean, 2.0);
    assert_relative_eq!(vector.segment_length_std, 1.0, epsilon = 1e-12);
}

#[test]
fn test_single_sign_segment_counts_as_initial_and_final() {
    let segments = vec![segment(&["x"]), segment(&["y", "z"])];
    let vector = FeatureExtractor::new().extract(&segments).unwrap();

    // initials {x, y}, finals {x, z}
    assert_relative_eq!(vector.initial_entropy, 1.0, epsilon = 1e-12);
    assert_relative_eq!(vector.final_entropy, 1.0, epsilon = 1e-12);
}

#[test]
fn test_bigrams_do_not_cross_segments() {
    let segments = vec![segment(&["a", "b"]), segment(&["c", "d"])];
    let vector = FeatureExtractor::new().extract(&segments).unwrap();

    // Only (a,b) and (c,d); a cross-segment (b,c) would give log2(3)
    assert_relative_eq!(vector.bigram_entropy, 1.0, epsilon = 1e-12);
}

#[test]
fn test_no_bigrams_gives_zero_entropy() {
    let segments = vec![segment(&["a"]), segment(&["b"])];
    let vector = FeatureExtractor::new().extract(&segments).unwrap();
    assert_eq!(vector.bigram_entropy, 0.0);
    assert_relative_eq!(vector.frequency_concentration, 0.5, epsilon = 1e-12);
}

#[test]
fn test_extraction_is_deterministic() {
    let segments = vec![
        segment(&["ka", "ba", "ku"]),
        segment(&["ba", "ka"]),
        segment(&["tsi", "ka", "ba", "ba"]),
    ];
    let first = FeatureExtractor::new().extract(&segments).unwrap();
    let second = FeatureExtractor::new().extract(&segments).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_feature_vector_get_set() {
    let mut vector = FeatureVector::zeros();
    vector
        .set(FeatureName::FinalEntropy, 4.33)
        .set(FeatureName::BigramEntropy, 8.57);

    assert_eq!(vector.get(FeatureName::FinalEntropy), 4.33);
    assert_eq!(vector.get(FeatureName::BigramEntropy), 8.57);
    assert_eq!(vector.iter().count(), 6);
}
