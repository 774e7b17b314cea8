//! End-to-end comparison tests against the published Mesoamerican priors.

use approx::assert_abs_diff_eq;

use isthmus_rs::core::config::{IsthmusConfig, PriorTable};
use isthmus_rs::{
    AnalysisPipeline, BayesFactorTier, EvidenceEngine, EvidenceModel, FeatureName, FeatureSchema,
    FeatureVector, IsthmusError, ObservationVariance, PriorRegistry, PriorSpec, Ranker,
    SymbolStream, SymbolToken,
};

fn observed_fixture() -> FeatureVector {
    let mut observed = FeatureVector::zeros();
    observed
        .set(FeatureName::SegmentLengthMean, 5.06)
        .set(FeatureName::FinalEntropy, 4.33)
        .set(FeatureName::BigramEntropy, 8.57);
    observed
}

fn published_engine() -> EvidenceEngine {
    let registry =
        PriorRegistry::new(IsthmusConfig::published_priors(), &FeatureSchema::default()).unwrap();
    EvidenceEngine::new(
        registry,
        ObservationVariance::uniform(0.1),
        EvidenceModel::Independent,
    )
    .unwrap()
}

fn column(text: &str, column: &str, codes: &str) -> Vec<SymbolToken> {
    codes
        .split_whitespace()
        .enumerate()
        .map(|(i, code)| {
            let token = SymbolToken::new(text, column, i as u32, code.trim_start_matches('?'));
            match code {
                "|" => token.boundary(),
                c if c.starts_with('?') => token.uncertain(),
                _ => token,
            }
        })
        .collect()
}

fn sample_corpus() -> SymbolStream {
    let mut tokens = column("T1", "A", "ka ba | ku ka ba | tsi ka | ba ma ka ku |");
    tokens.extend(column("T1", "B", "ma ka | ba ba ku tsi | ka"));
    tokens.extend(column("T2", "A", "ku ?ma ka | tsi ba ka ma | ka ba"));
    SymbolStream::new(tokens).unwrap()
}

#[test]
fn published_fixture_prefers_mixe_zoquean() {
    let evidence = published_engine().evaluate(&observed_fixture()).unwrap();
    let ranking = Ranker::new().rank(evidence);

    let mz = ranking.family("MZ").unwrap();
    let huastecan = ranking.family("Huastecan").unwrap();

    assert_abs_diff_eq!(mz.evidence.total_log_evidence, -17.99, epsilon = 0.01);
    assert_abs_diff_eq!(huastecan.evidence.total_log_evidence, -24.75, epsilon = 0.01);

    assert_eq!(ranking.winner().unwrap().evidence.family, "MZ");
    let comparison = ranking.comparison("MZ", "Huastecan").unwrap();
    assert_abs_diff_eq!(comparison.log_bayes_factor, 6.754, epsilon = 0.01);
    assert_eq!(comparison.tier, BayesFactorTier::DecisiveFor);
}

#[test]
fn per_feature_contributions_are_reported() {
    let evidence = published_engine().evaluate(&observed_fixture()).unwrap();
    let mz = evidence.iter().find(|e| e.family == "MZ").unwrap();

    let keys: Vec<_> = mz.contributions.keys().copied().collect();
    assert_eq!(
        keys,
        vec![
            FeatureName::SegmentLengthMean,
            FeatureName::FinalEntropy,
            FeatureName::BigramEntropy
        ]
    );
    assert_abs_diff_eq!(
        mz.contributions[&FeatureName::SegmentLengthMean],
        -1.347,
        epsilon = 0.001
    );
    assert_abs_diff_eq!(mz.contributions[&FeatureName::FinalEntropy], -8.150, epsilon = 0.001);
    assert_abs_diff_eq!(mz.contributions[&FeatureName::BigramEntropy], -8.496, epsilon = 0.001);
}

#[test]
fn pipeline_report_is_internally_consistent() {
    let pipeline = AnalysisPipeline::new(IsthmusConfig::default()).unwrap();
    let report = pipeline.analyze(&sample_corpus()).unwrap();

    assert_eq!(report.segmentation.total_tokens, 35);
    assert_eq!(report.segmentation.excluded_uncertain, 1);
    assert_eq!(report.segmentation.groups, 3);
    assert_eq!(
        report.segmentation.segmented_tokens
            + report.segmentation.boundary_tokens
            + report.segmentation.excluded_uncertain,
        report.segmentation.total_tokens
    );

    for ranked in &report.ranking.families {
        let sum: f64 = ranked.evidence.contributions.values().sum();
        assert_abs_diff_eq!(ranked.evidence.total_log_evidence, sum, epsilon = 1e-9);
    }

    let totals: Vec<f64> = report
        .ranking
        .families
        .iter()
        .map(|f| f.evidence.total_log_evidence)
        .collect();
    assert!(totals.windows(2).all(|w| w[0] >= w[1]));

    for comparison in &report.ranking.comparisons {
        let preferred = report.ranking.family(&comparison.preferred).unwrap();
        let alternative = report.ranking.family(&comparison.alternative).unwrap();
        let reverse = (alternative.evidence.total_log_evidence
            - preferred.evidence.total_log_evidence)
            .exp();
        assert_abs_diff_eq!(comparison.bayes_factor * reverse, 1.0, epsilon = 1e-9);
    }
}

#[test]
fn including_uncertain_tokens_changes_the_segmentation() {
    let mut config = IsthmusConfig::default();
    config.segmentation.exclude_uncertain = false;
    let pipeline = AnalysisPipeline::new(config).unwrap();

    let report = pipeline.analyze(&sample_corpus()).unwrap();
    assert_eq!(report.segmentation.excluded_uncertain, 0);
    assert_eq!(report.segmentation.segmented_tokens, 27);
}

#[test]
fn configured_boundary_symbol_cuts_segments() {
    let stream = SymbolStream::new(column("T1", "A", "ka ba / ku ka")).unwrap();

    let mut config = IsthmusConfig::default();
    config.segmentation.boundary_symbol = Some("/".to_string());
    let pipeline = AnalysisPipeline::new(config).unwrap();

    let segmentation = pipeline.segment(&stream).unwrap();
    assert_eq!(segmentation.segments.len(), 2);
    assert_eq!(segmentation.stats.boundary_tokens, 1);
}

#[test]
fn corpus_of_only_boundaries_is_insufficient_data() {
    let stream = SymbolStream::new(column("T1", "A", "| | |")).unwrap();
    let pipeline = AnalysisPipeline::new(IsthmusConfig::default()).unwrap();

    let err = pipeline.analyze(&stream).unwrap_err();
    assert!(err.is_insufficient_data());
}

#[test]
fn family_missing_a_prior_is_reported_by_name() {
    let mut priors: PriorTable = IsthmusConfig::published_priors();
    priors.insert(
        "Totonacan".to_string(),
        [
            (FeatureName::SegmentLengthMean, PriorSpec::new(4.0, 1.0)),
            (FeatureName::FinalEntropy, PriorSpec::new(2.2, 0.5)),
        ]
        .into_iter()
        .collect(),
    );

    let mut config = IsthmusConfig::default();
    config.priors = priors;

    match AnalysisPipeline::new(config).unwrap_err() {
        IsthmusError::Config {
            family, feature, ..
        } => {
            assert_eq!(family.as_deref(), Some("Totonacan"));
            assert_eq!(feature.as_deref(), Some("bigram_entropy"));
        }
        other => panic!("Expected Config error, got {other:?}"),
    }
}

#[test]
fn duplicate_token_positions_are_rejected() {
    let tokens = vec![
        SymbolToken::new("T1", "A", 0, "ka"),
        SymbolToken::new("T1", "A", 0, "ba"),
    ];
    let err = SymbolStream::new(tokens).unwrap_err();
    assert!(matches!(err, IsthmusError::Validation { .. }));
}

#[test]
fn sequential_and_parallel_pipelines_agree() {
    let mut sequential = IsthmusConfig::default();
    sequential.performance.parallel = false;
    let mut parallel = IsthmusConfig::default();
    parallel.performance.parallel = true;
    parallel.performance.max_threads = Some(2);

    let corpus = sample_corpus();
    let a = AnalysisPipeline::new(sequential).unwrap().analyze(&corpus).unwrap();
    let b = AnalysisPipeline::new(parallel).unwrap().analyze(&corpus).unwrap();
    assert_eq!(a, b);
}
