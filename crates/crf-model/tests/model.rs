//! Tests for crf-model serialization.

use chrono::NaiveDate;
use crf_model::{CleanedData, Condition, FieldValue, GroupStatus, PatientGroup, VisitContext};

#[test]
fn cleaned_data_deserializes_untagged_values() {
    let json = r#"{
        "status": "COMPLETE",
        "sys_blood_pressure_one": 120,
        "weight": 60.5,
        "last_appt_date": "2024-01-31",
        "report_datetime": "2024-02-01T09:30:00Z",
        "hoh_insurance": ["NONE", "OTHER"],
        "comments": null,
        "bypass_group_size_min": true
    }"#;
    let data: CleanedData = serde_json::from_str(json).expect("deserialize cleaned data");

    assert_eq!(data.text("status"), Some("COMPLETE"));
    assert_eq!(data.int("sys_blood_pressure_one"), Some(120));
    assert_eq!(data.number("weight"), Some(60.5));
    assert_eq!(
        data.date("last_appt_date"),
        NaiveDate::from_ymd_opt(2024, 1, 31)
    );
    assert!(data.datetime("report_datetime").is_some());
    assert_eq!(data.choices("hoh_insurance"), vec!["NONE", "OTHER"]);
    assert_eq!(data.get("comments"), Some(&FieldValue::Null));
    assert_eq!(data.boolean("bypass_group_size_min"), Some(true));
}

#[test]
fn patient_group_deserializes_with_defaults() {
    let json = r#"{
        "name": "PARKSIDE",
        "patients": [
            {"name": "NAME-0", "stable": true, "conditions": ["DM", "HIV"]},
            {"name": "NAME-1"}
        ]
    }"#;
    let group: PatientGroup = serde_json::from_str(json).expect("deserialize group");

    assert_eq!(group.status, GroupStatus::New);
    assert!(!group.randomized);
    assert!(!group.is_saved());
    assert_eq!(group.patients.len(), 2);
    assert!(group.patients[0].has_condition(Condition::Diabetes));
    assert!(group.patients[0].has_hiv());
    assert!(!group.patients[1].stable);
    assert!(group.patients[1].conditions.is_empty());
}

#[test]
fn visit_context_assumes_clinical_review_unless_told_otherwise() {
    let visit: VisitContext = serde_json::from_str(r#"{"baseline": true}"#).unwrap();
    assert!(visit.baseline);
    assert!(visit.clinical_review_exists);
    assert_eq!(VisitContext::default(), VisitContext::follow_up());
}
