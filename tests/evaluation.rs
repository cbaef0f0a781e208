mod common;

use common::{FixedClassifier, write_sample};
use inception_check::{CpuBackend, EvaluationSummary, data::labels::LabelError, evaluate};

fn run(model: &FixedClassifier, dir: &std::path::Path) -> color_eyre::Result<EvaluationSummary> {
    evaluate::<CpuBackend, _>(model, dir, &Default::default())
}

#[test]
fn single_matching_sample() {
    let dir = tempfile::tempdir().unwrap();
    write_sample(dir.path(), "3_sample.jpg");
    let model = FixedClassifier {
        class: 2,
        num_classes: 4,
    };

    let summary = run(&model, dir.path()).unwrap();

    assert_eq!(summary, EvaluationSummary { correct: 1, total: 1 });
}

#[test]
fn one_of_two_correct() {
    let dir = tempfile::tempdir().unwrap();
    write_sample(dir.path(), "1_a.jpg");
    write_sample(dir.path(), "2_b.jpg");
    let model = FixedClassifier {
        class: 0,
        num_classes: 4,
    };

    let summary = run(&model, dir.path()).unwrap();

    assert_eq!(summary, EvaluationSummary { correct: 1, total: 2 });
    assert!(summary.correct <= summary.total);
    assert!(!summary.passes(0.6));
}

#[test]
fn empty_directory_scores_nothing_and_fails() {
    let dir = tempfile::tempdir().unwrap();
    let model = FixedClassifier {
        class: 0,
        num_classes: 4,
    };

    let summary = run(&model, dir.path()).unwrap();

    assert_eq!(summary, EvaluationSummary { correct: 0, total: 0 });
    assert!(!summary.passes(0.6));
}

#[test]
fn malformed_file_name_aborts() {
    let dir = tempfile::tempdir().unwrap();
    write_sample(dir.path(), "1_a.jpg");
    write_sample(dir.path(), "abc_x.jpg");
    let model = FixedClassifier {
        class: 0,
        num_classes: 4,
    };

    let err = run(&model, dir.path()).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<LabelError>(),
        Some(LabelError::Malformed { file_name }) if file_name == "abc_x.jpg"
    ));
}

#[test]
fn nested_directories_are_not_counted() {
    let dir = tempfile::tempdir().unwrap();
    write_sample(dir.path(), "4_top.jpg");
    let nested = dir.path().join("more");
    std::fs::create_dir(&nested).unwrap();
    write_sample(&nested, "4_inner.jpg");
    write_sample(&nested, "1_inner.jpg");
    let model = FixedClassifier {
        class: 3,
        num_classes: 4,
    };

    let summary = run(&model, dir.path()).unwrap();

    assert_eq!(summary, EvaluationSummary { correct: 1, total: 1 });
}

#[test]
fn corrupt_image_aborts() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("2_broken.jpg"), b"not a jpeg").unwrap();
    let model = FixedClassifier {
        class: 1,
        num_classes: 4,
    };

    assert!(run(&model, dir.path()).is_err());
}

#[test]
fn all_correct_passes_threshold() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["2_a.jpg", "2_b.png", "2_c.jpg"] {
        write_sample(dir.path(), name);
    }
    let model = FixedClassifier {
        class: 1,
        num_classes: 4,
    };

    let summary = run(&model, dir.path()).unwrap();

    assert_eq!(summary.total, 3);
    assert!(summary.passes(0.6));
}
