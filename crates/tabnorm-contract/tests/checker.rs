use proptest::prelude::*;
use tabnorm_contract::{ContractChecker, ContractPolicy, ContractViolation, DenyCategory};
use tabnorm_model::ScriptDialect;

const PYTHON_OK: &str = r#"import sys

import pandas as pd


def transform(input_path: str, output_path: str) -> None:
    df = pd.read_csv(input_path)
    out = pd.DataFrame({"customer_id": df["id"].astype(str)})
    out.to_csv(output_path, index=False)


if __name__ == "__main__":
    if len(sys.argv) != 3:
        raise SystemExit("Usage: python script.py <input_csv> <output_csv>")
    transform(sys.argv[1], sys.argv[2])
"#;

const SHELL_OK: &str = r#"#!/bin/sh
set -eu

transform() {
    awk -F, 'BEGIN { OFS = "," } NR == 1 { print "customer_id"; next } { print $1 }' "$1" > "$2"
}

if [ "$#" -ne 2 ]; then
    echo "usage: sh script.sh <input_csv> <output_csv>" >&2
    exit 64
fi
transform "$1" "$2"
"#;

fn python() -> ContractChecker {
    ContractChecker::for_dialect(ScriptDialect::Python)
}

#[test]
fn well_formed_python_program_passes() {
    assert_eq!(python().check(PYTHON_OK), Vec::new());
}

#[test]
fn well_formed_shell_program_passes() {
    let checker = ContractChecker::for_dialect(ScriptDialect::Shell);
    assert_eq!(checker.check(SHELL_OK), Vec::new());
}

#[test]
fn empty_program_is_a_single_violation() {
    assert_eq!(python().check("  \n\t"), vec![ContractViolation::EmptyProgram]);
}

#[test]
fn missing_guard_is_reported() {
    let program = "def transform(a, b):\n    pass\n";
    assert_eq!(python().check(program), vec![ContractViolation::MissingGuard]);
}

#[test]
fn guard_without_invocation_is_reported() {
    let program = "def transform(a, b):\n    pass\n\nif __name__ == '__main__':\n    print('hi')\n";
    let violations = python().check(program);
    assert_eq!(violations.len(), 1);
    assert!(matches!(
        violations[0],
        ContractViolation::MissingGuardInvocation { .. }
    ));
}

#[test]
fn invocation_before_guard_does_not_count() {
    let program = "import sys\ndef transform(a, b):\n    pass\ntransform(sys.argv[1], sys.argv[2])\nif __name__ == '__main__':\n    pass\n";
    let violations = python().check(program);
    assert!(matches!(
        violations.as_slice(),
        [ContractViolation::MissingGuardInvocation { .. }]
    ));
}

#[test]
fn wrong_arity_is_reported() {
    let program = PYTHON_OK.replace(
        "def transform(input_path: str, output_path: str)",
        "def transform(input_path: str)",
    );
    assert_eq!(
        python().check(&program),
        vec![ContractViolation::EntryArity { found: 1 }]
    );
}

#[test]
fn all_rules_are_reported_together() {
    let program = format!("import subprocess\nimport requests\n{}", "x = 1\n".repeat(10));
    let checker = ContractChecker::new(
        ScriptDialect::Python,
        ContractPolicy::for_dialect(ScriptDialect::Python).with_max_bytes(16),
    );
    let rules: Vec<&str> = checker.check(&program).iter().map(|v| v.rule()).collect();
    assert_eq!(
        rules,
        vec![
            "too_large",
            "missing_entry_routine",
            "missing_guard",
            "forbidden_token",
            "forbidden_token",
        ]
    );
}

#[test]
fn forbidden_tokens_carry_their_category() {
    let program = format!("import shutil\n{PYTHON_OK}\nshutil.rmtree('/tmp/x')\n");
    let violations = python().check(&program);
    assert_eq!(
        violations,
        vec![ContractViolation::ForbiddenToken {
            token: "shutil.rmtree".to_string(),
            category: DenyCategory::DestructiveFs,
        }]
    );
    assert_eq!(
        violations[0].to_string(),
        "Forbidden pattern `shutil.rmtree` (destructive filesystem operation)."
    );
}

#[test]
fn configured_tokens_are_enforced() {
    let checker = ContractChecker::new(
        ScriptDialect::Python,
        ContractPolicy::for_dialect(ScriptDialect::Python).with_extra_tokens(["boto3"]),
    );
    let program = format!("import boto3\n{PYTHON_OK}");
    let messages = checker.check_messages(&program);
    assert_eq!(messages, vec!["Forbidden pattern `boto3` (site policy).".to_string()]);
}

#[test]
fn regex_and_dataframe_methods_are_allowed() {
    let program = PYTHON_OK
        .replace("import sys\n", "import re\nimport sys\n")
        .replace(
            "    df = pd.read_csv(input_path)\n",
            "    df = pd.read_csv(input_path)\n    digits = re.compile(r\"\\d+\")\n    df = df[df[\"id\"].astype(str).str.match(digits)]\n    df = df.eval(\"amt = amt * 1\")\n",
        );
    assert!(program.contains("re.compile("));

    assert_eq!(python().check(&program), Vec::new());
}

#[test]
fn bare_compile_is_still_forbidden() {
    let program = format!("{PYTHON_OK}\ncode = compile('1', 'x', 'eval')\n");
    assert_eq!(
        python().check(&program),
        vec![ContractViolation::ForbiddenToken {
            token: "compile(".to_string(),
            category: DenyCategory::DynamicEval,
        }]
    );
}

#[test]
fn shell_network_access_is_rejected() {
    let checker = ContractChecker::for_dialect(ScriptDialect::Shell);
    let program = SHELL_OK.replace("set -eu", "set -eu\ncurl -s https://example.invalid > /dev/null");
    assert!(!checker.is_acceptable(&program));
}

proptest! {
    #[test]
    fn check_never_panics(program in any::<String>()) {
        let _ = python().check(&program);
        let _ = ContractChecker::for_dialect(ScriptDialect::Shell).check(&program);
    }

    #[test]
    fn oversized_programs_are_always_flagged(padding in 0usize..2_000) {
        let checker = ContractChecker::new(
            ScriptDialect::Python,
            ContractPolicy::for_dialect(ScriptDialect::Python).with_max_bytes(PYTHON_OK.len()),
        );
        let program = format!("{PYTHON_OK}{}#", " ".repeat(padding));
        let too_large = checker
            .check(&program)
            .iter()
            .any(|v| matches!(v, ContractViolation::TooLarge { .. }));
        prop_assert!(too_large);
    }
}
