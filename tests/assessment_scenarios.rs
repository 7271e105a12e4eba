use pretty_assertions::assert_eq;
use sahrisk::{assess, assess_with, write_csv, AssessError, FieldProblem, FormInput};
use sahrisk_model::{evaluate, Applicability, RiskModel, Term};
use sahrisk_type::{PatientData, PatientRecord, Sex};
use tests::form_with_grade;

fn init_test_logger() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

#[test]
fn grade_three_patient_gets_only_general_models() {
    init_test_logger();
    let assessment = assess(&form_with_grade(3)).unwrap();
    let applicable: Vec<_> = assessment
        .results
        .iter()
        .map(|r| (r.model_id, r.applicable))
        .collect();
    assert_eq!(
        applicable,
        vec![
            ("early_general", true),
            ("late_general", true),
            ("early_severe", false),
            ("late_severe", false),
        ]
    );
    for gated in &assessment.results[2..] {
        assert_eq!(gated.probability, None);
        assert_eq!(gated.linear_predictor, None);
    }
}

#[test]
fn severe_patients_get_all_four_models() {
    init_test_logger();
    for grade in [4, 5] {
        let assessment = assess(&form_with_grade(grade)).unwrap();
        assert!(assessment.severe_subgroup());
        assert_eq!(assessment.applicable().count(), 4, "grade {grade}");
    }
}

#[test]
fn grade_seven_is_rejected_without_results() {
    init_test_logger();
    match assess(&form_with_grade(7)) {
        Err(AssessError::InvalidInput(err)) => {
            assert_eq!(err.fields().collect::<Vec<_>>(), vec!["wfns"]);
            assert!(matches!(
                err.problem_for("wfns"),
                Some(FieldProblem::OutOfRange { actual, .. }) if *actual == 7.0
            ));
        }
        other => panic!("expected invalid input, got {other:?}"),
    }
}

#[test]
fn single_unit_coefficient_at_zero_gives_one_half() {
    init_test_logger();
    const UNIT: RiskModel = RiskModel {
        id: "unit",
        name: "Unit coefficient",
        applicability: Applicability::AllPatients,
        intercept: 0.0,
        intercept_published: true,
        terms: &[Term::new("ld", 1.0)],
        auc: None,
    };
    // form_with_grade has no lumbar drain
    let assessment = assess_with(&form_with_grade(2), &[UNIT]).unwrap();
    assert_eq!(assessment.results[0].probability, Some(0.5));
}

#[test]
fn defective_model_definitions_halt_evaluation() {
    init_test_logger();
    const GOOD: RiskModel = RiskModel {
        id: "good",
        name: "Good",
        applicability: Applicability::AllPatients,
        intercept: -1.0,
        intercept_published: true,
        terms: &[Term::new("wfns", 0.5)],
        auc: None,
    };
    const BAD: RiskModel = RiskModel {
        id: "bad",
        name: "Bad",
        terms: &[Term::new("aneurysm_location", 0.5)],
        ..GOOD
    };
    let record = PatientRecord::new(PatientData {
        age: 48,
        sex: Sex::Male,
        wfns_grade: 1,
        modified_fisher_grade: 1,
        crp_mg_per_l: 3.0,
        lumbar_drain: false,
        surgical_clipping: false,
        early_seizure: false,
        eeg_abnormal: false,
        chronic_hydrocephalus: false,
        intracerebral_hemorrhage: false,
    })
    .unwrap();
    assert!(evaluate(&record, &[GOOD, BAD]).is_err());
    assert_eq!(evaluate(&record, &[GOOD]).unwrap().len(), 1);

    let err = assess_with(&form_with_grade(2), &[GOOD, BAD]).unwrap_err();
    assert!(matches!(err, AssessError::ModelConfiguration(_)));
}

#[test]
fn json_submission_round_trip_through_renderer_and_csv() {
    init_test_logger();
    let form = FormInput::from_json_str(
        r#"{"age": "66", "sex": "M", "wfns": "4", "mfisher": "3", "crp": "88.5",
            "ld": "no", "clipping": "yes", "early_seizure": "yes",
            "eeg_abnormal": "no", "hcp": "yes", "ich": "no", "comment": "ICU bed 4"}"#,
    )
    .unwrap();
    let assessment = assess(&form).unwrap();

    let text = sahrisk::render_text(&assessment, 2);
    assert!(text.contains("Late seizure (WFNS 4-5)"));
    assert!(!text.contains("not applicable"));

    let json: serde_json::Value =
        serde_json::from_str(&sahrisk::render_json(&assessment).unwrap()).unwrap();
    assert_eq!(json["patient"]["sex"], "male");
    assert_eq!(json["results"][3]["applicable"], true);

    let mut buf = Vec::new();
    write_csv(&mut buf, &[assessment], 2).unwrap();
    let csv = String::from_utf8(buf).unwrap();
    let row: Vec<&str> = csv.lines().nth(1).unwrap().split(',').collect();
    assert_eq!(&row[..5], &["66", "male", "4", "3", "88.5"]);
    assert!(!row.contains(&"N/A"));
}

#[test]
fn export_writes_into_configured_directory() {
    init_test_logger();
    let dir = tempfile::tempdir().unwrap();
    let assessment = assess(&form_with_grade(1)).unwrap();
    let path = sahrisk::export_to_dir(&assessment, dir.path(), 3).unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "aSAH_risk_results_WFNS_1.csv"
    );
}
