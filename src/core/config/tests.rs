use super::*;
use crate::core::errors::PatchsplitError;
use tempfile::tempdir;

fn expect_validation_error<T: std::fmt::Debug>(result: Result<T>) -> PatchsplitError {
    result.expect_err("expected validation failure")
}

#[test]
fn default_configs_validate_successfully() {
    PatchsplitConfig::default()
        .validate()
        .expect("patchsplit default");
    DatasetConfig::default().validate().expect("dataset default");
    ExtractionConfig::default()
        .validate()
        .expect("extraction default");
    SignatureSplitConfig::default()
        .validate()
        .expect("signature default");
    ProjectSplitConfig::default()
        .validate()
        .expect("projects default");
}

#[test]
fn train_ratio_must_be_inside_unit_interval() {
    let mut config = SignatureSplitConfig::default();
    config.train_ratio = 1.0;
    let err = expect_validation_error(config.validate());
    assert!(matches!(err, PatchsplitError::Validation { .. }));
    assert!(format!("{err}").contains("signature.train_ratio"));
}

#[test]
fn zero_cap_is_rejected() {
    let mut config = SignatureSplitConfig::default();
    config.max_per_signature = Some(0);
    expect_validation_error(config.validate());

    config.max_per_signature = Some(5);
    config.validate().expect("positive cap");
}

#[test]
fn manual_strategy_needs_projects() {
    let mut config = ProjectSplitConfig::default();
    config.strategy = ProjectStrategyKind::Manual;
    let err = expect_validation_error(config.validate());
    assert!(matches!(err, PatchsplitError::Config { .. }));

    config.test_projects = vec!["Chart".to_string()];
    config.validate().expect("manual with projects");
    assert!(matches!(config.strategy(), ProjectStrategy::Manual(ref p) if p.contains("Chart")));
}

#[test]
fn output_paths_derive_from_input_stem() {
    let mut config = DatasetConfig::default();
    config.input_path = PathBuf::from("data/labeled_pairs.csv");

    assert_eq!(
        config.train_output_path(),
        PathBuf::from("data/labeled_pairs_train.csv")
    );
    assert_eq!(
        config.test_output_path(),
        PathBuf::from("data/labeled_pairs_test.csv")
    );

    config.test_output = Some(PathBuf::from("elsewhere.csv"));
    assert_eq!(config.test_output_path(), PathBuf::from("elsewhere.csv"));
}

#[test]
fn identical_outputs_are_rejected() {
    let mut config = DatasetConfig::default();
    config.train_output = Some(PathBuf::from("same.csv"));
    config.test_output = Some(PathBuf::from("same.csv"));
    expect_validation_error(config.validate());
}

#[test]
fn partial_yaml_falls_back_to_defaults() {
    let yaml = "signature:\n  granularity: method\n  train_ratio: 0.7\n";
    let config: PatchsplitConfig = serde_yaml::from_str(yaml).expect("parse partial yaml");

    assert_eq!(config.signature.granularity, Granularity::Method);
    assert_eq!(config.signature.train_ratio, 0.7);
    assert_eq!(config.signature.seed, 42);
    assert_eq!(config.extraction.source_extension, ".java");
    assert_eq!(config.projects.strategy, ProjectStrategyKind::LargestToTest);
}

#[test]
fn yaml_round_trip_through_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("patchsplit.yml");

    let mut config = PatchsplitConfig::default();
    config.signature.max_per_signature = Some(10);
    config.projects.strategy = ProjectStrategyKind::SmallestToTest;
    config.to_yaml_file(&path).expect("write config");

    let loaded = PatchsplitConfig::from_yaml_file(&path).expect("read config");
    assert_eq!(loaded.signature.max_per_signature, Some(10));
    assert_eq!(loaded.projects.strategy, ProjectStrategyKind::SmallestToTest);
}

#[test]
fn missing_config_file_is_io_error() {
    let err = PatchsplitConfig::from_yaml_file("/definitely/not/here.yml").unwrap_err();
    assert!(matches!(err, PatchsplitError::Io { .. }));
}
