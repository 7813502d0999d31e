use std::fs;
use std::path::PathBuf;

use tabnorm_model::{FieldKind, TargetSchema};
use tabnorm_validate::{Issue, ValidateOptions, validate};
use tempfile::TempDir;

fn churn_schema() -> TargetSchema {
    TargetSchema::from_pairs([
        ("customer_id", "Unique customer identifier (string)"),
        ("event_date", "Date of the activity in YYYY-MM-DD format"),
        ("amount", "Purchase amount (numeric, non-negative)"),
    ])
    .expect("schema")
}

fn write(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("out.csv");
    fs::write(&path, contents).expect("write output");
    path
}

#[test]
fn conforming_output_has_no_issues() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "customer_id,event_date,amount\nC1,2024-01-05,10.5\nC2,2024-01-06,0\n",
    );

    let report = validate(&path, &churn_schema(), &ValidateOptions::default());

    assert!(report.is_ok(), "{:?}", report.messages());
}

#[test]
fn missing_file_is_reported_alone() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("never-written.csv");

    let report = validate(&path, &churn_schema(), &ValidateOptions::default());

    assert_eq!(report.len(), 1);
    assert!(matches!(report.issues[0], Issue::FileMissing { .. }));
}

#[test]
fn empty_file_is_unreadable() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "");

    let report = validate(&path, &churn_schema(), &ValidateOptions::default());

    assert_eq!(report.len(), 1);
    assert!(report.issues[0].is_fatal());
}

#[test]
fn every_violation_is_reported_in_one_pass() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "customer_id,event_date,amount\nC1,2024-01-05,10\n,not a date,-3\nC3,,abc\n",
    );

    let report = validate(&path, &churn_schema(), &ValidateOptions::default());

    assert_eq!(
        report.issues,
        vec![
            Issue::MissingValues {
                column: "customer_id".to_string(),
                kind: FieldKind::Identifier,
                missing_count: 1,
            },
            Issue::MissingValues {
                column: "event_date".to_string(),
                kind: FieldKind::Date,
                missing_count: 1,
            },
            Issue::InvalidDate {
                column: "event_date".to_string(),
                invalid_count: 1,
                samples: vec!["not a date".to_string()],
            },
            Issue::NonNumeric {
                column: "amount".to_string(),
                invalid_count: 1,
                samples: vec!["abc".to_string()],
            },
            Issue::NegativeValue {
                column: "amount".to_string(),
                negative_count: 1,
                samples: vec!["-3".to_string()],
            },
        ]
    );
}

#[test]
fn missing_columns_point_at_close_names() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "cust_id,event_date,amount\nC1,2024-01-05,1\n");

    let report = validate(&path, &churn_schema(), &ValidateOptions::default());

    assert_eq!(
        report.messages(),
        vec!["Missing required column 'customer_id' (closest produced column: 'cust_id')".to_string()]
    );
}

#[test]
fn column_names_must_match_exactly() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "Customer_ID,event_date,amount\nC1,2024-01-05,1\n");

    let report = validate(&path, &churn_schema(), &ValidateOptions::default());

    assert_eq!(
        report.issues,
        vec![Issue::MissingColumn {
            column: "customer_id".to_string(),
            closest: Some("Customer_ID".to_string()),
        }]
    );
    assert_eq!(
        report.messages(),
        vec!["Missing required column 'customer_id' (closest produced column: 'Customer_ID')"]
    );
}

#[test]
fn strict_mode_flags_columns_differing_only_in_case() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "customer_id,EVENT_DATE,amount\nC1,2024-01-05,1\n");

    let report = validate(
        &path,
        &churn_schema(),
        &ValidateOptions {
            strict_columns: true,
            ..ValidateOptions::default()
        },
    );

    assert!(report.issues.contains(&Issue::UnexpectedColumn {
        column: "EVENT_DATE".to_string(),
    }));
    assert!(report.issues.iter().any(
        |issue| matches!(issue, Issue::MissingColumn { column, .. } if column == "event_date")
    ));
}

#[test]
fn strict_mode_rejects_extra_columns() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "customer_id,event_date,amount,notes\nC1,2024-01-05,1,hello\n",
    );
    let lenient = validate(&path, &churn_schema(), &ValidateOptions::default());
    let strict = validate(
        &path,
        &churn_schema(),
        &ValidateOptions {
            strict_columns: true,
            ..ValidateOptions::default()
        },
    );

    assert!(lenient.is_ok());
    assert_eq!(
        strict.issues,
        vec![Issue::UnexpectedColumn {
            column: "notes".to_string()
        }]
    );
}

#[test]
fn header_only_output_has_no_rows() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "customer_id,event_date,amount\n");

    let report = validate(&path, &churn_schema(), &ValidateOptions::default());

    assert_eq!(report.issues, vec![Issue::NoRows]);
    assert_eq!(report.messages(), vec!["Output CSV has no rows".to_string()]);
}

#[test]
fn duplicate_header_names_are_reported() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "customer_id,event_date,amount,amount\nC1,2024-01-05,1,2\n",
    );

    let report = validate(&path, &churn_schema(), &ValidateOptions::default());

    assert!(report.issues.contains(&Issue::DuplicateColumn {
        column: "amount".to_string(),
        occurrences: 2,
    }));
}

#[test]
fn validation_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "customer_id,amount\nC1,-1\n");

    let first = validate(&path, &churn_schema(), &ValidateOptions::default());
    let second = validate(&path, &churn_schema(), &ValidateOptions::default());

    assert_eq!(first, second);
    assert!(!first.is_ok());
}

#[test]
fn late_off_type_values_are_reported_with_every_other_issue() {
    let dir = TempDir::new().unwrap();
    let mut contents = String::from("customer_id,event_date,amount\n");
    for i in 0..150 {
        contents.push_str(&format!("C{i},2024-01-05,{i}\n"));
    }
    contents.push_str(",notadate,abc\n");
    let path = write(&dir, &contents);

    let report = validate(&path, &churn_schema(), &ValidateOptions::default());

    assert!(
        !report.issues.iter().any(Issue::is_fatal),
        "{:?}",
        report.messages()
    );
    assert_eq!(
        report.issues,
        vec![
            Issue::MissingValues {
                column: "customer_id".to_string(),
                kind: FieldKind::Identifier,
                missing_count: 1,
            },
            Issue::InvalidDate {
                column: "event_date".to_string(),
                invalid_count: 1,
                samples: vec!["notadate".to_string()],
            },
            Issue::NonNumeric {
                column: "amount".to_string(),
                invalid_count: 1,
                samples: vec!["abc".to_string()],
            },
        ]
    );
}
