//! Prompt construction for first attempts and repairs.
//!
//! The system text depends only on the dialect and the contract policy, so
//! it is identical for every attempt of a request. The user text carries the
//! table profile and target schema and, on repair, the previous program with
//! its diagnostics.

use std::fmt::Write;

use tabnorm_contract::{ContractChecker, ContractPolicy};
use tabnorm_model::{AttemptFailure, ScriptDialect, TabularProfile, TargetSchema};

/// Bullet emitted when a failed attempt carried no diagnostic messages.
pub const NO_DETAILS_PLACEHOLDER: &str =
    "- The attempt failed, but no specific error details were captured.";

/// System and user text for one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// The previous attempt, fed back on repair.
#[derive(Debug, Clone, Copy)]
pub struct RepairContext<'a> {
    /// Full text of the previous program.
    pub program: &'a str,
    pub failure: &'a AttemptFailure,
}

/// Builds deterministic prompts for one dialect and contract policy.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    dialect: ScriptDialect,
    policy: ContractPolicy,
    strict_columns: bool,
}

impl PromptBuilder {
    pub fn new(dialect: ScriptDialect, policy: ContractPolicy) -> Self {
        Self {
            dialect,
            policy,
            strict_columns: false,
        }
    }

    /// Builder describing exactly the contract `checker` enforces.
    pub fn for_checker(checker: &ContractChecker) -> Self {
        Self::new(checker.dialect(), checker.policy().clone())
    }

    /// Ask for no columns beyond the schema.
    #[must_use]
    pub fn with_strict_columns(mut self, strict: bool) -> Self {
        self.strict_columns = strict;
        self
    }

    pub fn build(
        &self,
        profile: &TabularProfile,
        schema: &TargetSchema,
        previous: Option<&RepairContext<'_>>,
    ) -> Prompt {
        Prompt {
            system: self.system_text(),
            user: self.user_text(profile, schema, previous),
        }
    }

    pub fn system_text(&self) -> String {
        let dialect = self.dialect;
        let mut out = String::new();

        let _ = writeln!(
            out,
            "You are a data engineer writing {} programs that normalize a raw CSV file into a target schema.",
            dialect.language_name()
        );
        out.push_str(
            "Each request gives you a profile of the raw table and the target schema. \
             When an earlier attempt failed, it also gives you that program and the errors to fix.\n",
        );

        out.push_str("\nPROGRAM CONTRACT:\n");
        out.push_str("1. Define the entry routine:\n");
        let _ = writeln!(out, "   {}", dialect.entry_signature());
        out.push_str(
            "   It reads the CSV at input_path, maps raw columns to the target schema using column names, \
             descriptions and sample values, cleans the values (missing values, types, dates) and writes \
             a CSV with a header row to output_path.\n",
        );
        if self.strict_columns {
            out.push_str("   The output must contain exactly the target schema columns and no others.\n");
        } else {
            out.push_str("   The output must contain every target schema column.\n");
        }
        out.push_str("2. End the program with this direct-execution guard:\n");
        for line in dialect.guard_example().lines() {
            let _ = writeln!(out, "   {line}");
        }
        let _ = writeln!(out, "3. Allowed libraries and tools: {}.", dialect.allowed_libraries());
        out.push_str("4. Forbidden:\n");
        for (category, tokens) in self.policy.tokens_by_category() {
            let listed: Vec<&str> = tokens.iter().map(|token| token.trim()).collect();
            let _ = writeln!(out, "   - {category}: {}", listed.join(", "));
        }
        out.push_str("   - reading or writing any file other than input_path and output_path\n");
        let _ = writeln!(
            out,
            "5. Keep the program under {} bytes.",
            self.policy.max_bytes
        );
        out.push_str("6. Reply with the program only: no prose, no markdown fences, no comments.\n");

        out.push_str("\nREPAIR PROTOCOL:\n");
        out.push_str(
            "When the request contains PREVIOUS_PROGRAM and ERRORS_TO_FIX, reply with a complete corrected \
             program that still follows the contract. Never reply with a diff or a fragment.",
        );
        out
    }

    pub fn user_text(
        &self,
        profile: &TabularProfile,
        schema: &TargetSchema,
        previous: Option<&RepairContext<'_>>,
    ) -> String {
        let mut out = String::new();
        out.push_str("RAW_TABLE_PROFILE:\n");
        out.push_str(&profile.render());
        out.push_str("\n\nTARGET_SCHEMA (column_name: description):\n");
        for field in schema.fields() {
            let _ = writeln!(out, "- {}: {}", field.column_name, field.description);
        }
        out.push_str("\nGOAL:\n");
        out.push_str("Write a program that turns the raw table into a CSV that matches TARGET_SCHEMA.");

        if let Some(previous) = previous {
            out.push_str("\n\nPREVIOUS_PROGRAM:\n");
            out.push_str(previous.program.trim_end());
            let _ = write!(
                out,
                "\n\nFAILURE_STAGE: {}\n{}\n\nERRORS_TO_FIX:\n",
                previous.failure.stage(),
                previous.failure.summary()
            );
            let messages = previous.failure.messages();
            if messages.is_empty() {
                out.push_str(NO_DETAILS_PLACEHOLDER);
                out.push('\n');
            }
            for message in messages {
                push_bullet(&mut out, message);
            }
            out.push_str("\nReturn the complete corrected program. Do not return a diff.");
        }
        out
    }
}

/// Append `message` as a bullet, indenting continuation lines.
fn push_bullet(out: &mut String, message: &str) {
    let mut lines = message.trim_end().lines();
    let first = lines.next().unwrap_or_default();
    let _ = writeln!(out, "- {first}");
    for line in lines {
        let _ = writeln!(out, "  {}", line.trim_end());
    }
}
