use tabnorm_model::{
    AttemptFailure, AttemptResult, FieldKind, GeneratedProgram, NormalizationOutcome,
    SchemaError, TargetSchema,
};

#[test]
fn schema_deserializes_from_wire_shape() {
    let json = r#"[
        {"column_name": "customer_id", "description": "Unique customer identifier (string)"},
        {"column_name": "purchase_date", "description": "Date of purchase in YYYY-MM-DD format"},
        {"column_name": "total_amount", "description": "Total purchase amount (numeric, non-negative)"}
    ]"#;
    let schema: TargetSchema = serde_json::from_str(json).expect("parse schema");
    let names: Vec<&str> = schema.column_names().collect();
    assert_eq!(names, vec!["customer_id", "purchase_date", "total_amount"]);

    let kinds: Vec<FieldKind> = schema.fields().iter().map(|f| f.kind()).collect();
    assert_eq!(
        kinds,
        vec![FieldKind::Identifier, FieldKind::Date, FieldKind::Numeric]
    );
}

#[test]
fn schema_rejects_duplicates_case_insensitively() {
    let result = TargetSchema::from_pairs([("Amount", "a"), ("amount ", "b")]);
    assert_eq!(
        result,
        Err(SchemaError::DuplicateColumn {
            name: "amount".to_string()
        })
    );
}

#[test]
fn schema_rejects_empty_and_blank_names() {
    assert_eq!(
        TargetSchema::new(Vec::new()),
        Err(SchemaError::Empty)
    );
    assert_eq!(
        TargetSchema::from_pairs([("id", "x"), ("  ", "y")]),
        Err(SchemaError::EmptyColumnName { position: 1 })
    );
    let json = "[]";
    assert!(serde_json::from_str::<TargetSchema>(json).is_err());
}

#[test]
fn outcome_serializes_with_status_tag() {
    let outcome = NormalizationOutcome::Failure {
        attempts_used: 3,
        last_diagnostics: vec!["Missing required columns: [\"customer_id\"]".to_string()],
        last_program: Some(GeneratedProgram::new("pass")),
    };
    let value = serde_json::to_value(&outcome).expect("serialize outcome");
    assert_eq!(value["status"], "failure");
    assert_eq!(value["attempts_used"], 3);
    assert_eq!(outcome.attempts_used(), 3);
    assert!(!outcome.is_success());
}

#[test]
fn attempt_diagnostics_are_empty_on_success() {
    let ok = AttemptResult::succeeded(1, GeneratedProgram::new("x"), String::new());
    assert!(ok.diagnostics().is_empty());

    let failed = AttemptResult::failed(
        2,
        None,
        AttemptFailure::Generation(vec!["timed out".to_string()]),
        String::new(),
    );
    assert_eq!(failed.diagnostics(), ["timed out".to_string()]);
    assert!(!failed.success);
}
