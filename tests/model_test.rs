use rand::rngs::StdRng;
use rand::SeedableRng;

use attendance_risk::data;
use attendance_risk::model::{self, TrainedModel};
use attendance_risk::{Analyzer, AttendanceInput, RiskClassifier, RiskLabel};

fn trained() -> TrainedModel {
    let rows = data::generate_rows(&mut StdRng::seed_from_u64(2024), data::DEFAULT_ROWS);
    let (features, targets) = data::to_training_set(&rows);
    model::train_model(features, targets, 100).unwrap()
}

#[test]
fn trained_classifier_separates_extremes() {
    let model = trained();
    assert_eq!(model.info().training_rows, 500);
    assert_eq!(model.info().classes, RiskLabel::ALL.to_vec());
    assert!(model.info().accuracy > 0.6, "accuracy {}", model.info().accuracy);

    assert_eq!(model.classify(95.0).unwrap(), RiskLabel::Safe);
    assert_eq!(model.classify(40.0).unwrap(), RiskLabel::Critical);
}

#[test]
fn artifact_reloads_with_identical_verdicts() {
    let model = trained();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("attendance_model.json");
    model.save(&path).unwrap();

    let reloaded = TrainedModel::load(&path).unwrap();
    assert_eq!(reloaded.info().training_rows, model.info().training_rows);
    for percentage in [42.0, 58.5, 61.0, 70.0, 74.9, 75.0, 83.3, 99.0] {
        assert_eq!(
            reloaded.classify(percentage).unwrap(),
            model.classify(percentage).unwrap()
        );
    }
}

#[test]
fn missing_artifact_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = TrainedModel::load(dir.path().join("absent.json"));
    assert!(matches!(result, Err(attendance_risk::ClassifierError::Io(_))));
}

#[test]
fn wrong_width_matrix_is_rejected() {
    let model = trained();
    let features = ndarray::Array2::zeros((2, 2));
    assert!(model.predict(&features).is_err());
}

#[test]
fn analyzer_runs_against_real_model() {
    let model = trained();
    let report = Analyzer::new(&model)
        .analyze(&AttendanceInput::default())
        .unwrap();
    assert_eq!(report.scenarios.len(), 7);
    assert!(report.after_needed_days.is_none());
}
