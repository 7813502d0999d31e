//! Human-readable rendering of runs, violations and validation issues.

use std::fmt::Write;
use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};
use tabnorm_core::NormalizationRun;
use tabnorm_model::{AttemptResult, NormalizationOutcome};

/// Longest diagnostic excerpt shown in a table cell.
const MAX_CELL_CHARS: usize = 160;

pub fn print_run(run: &NormalizationRun) {
    println!("{}", attempt_table(&run.attempts));
    match &run.outcome {
        NormalizationOutcome::Success {
            attempts_used,
            output_path,
            ..
        } => {
            println!(
                "Normalized in {attempts_used} attempt(s): {}",
                output_path.display()
            );
        }
        NormalizationOutcome::Failure {
            attempts_used,
            last_diagnostics,
            ..
        } => {
            eprintln!("Normalization failed after {attempts_used} attempt(s).");
            eprint!("{}", render_messages("Last diagnostics", last_diagnostics));
        }
    }
}

/// One row per attempt: number, program fingerprint, failing stage and the
/// first diagnostic.
pub fn attempt_table(attempts: &[AttemptResult]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Attempt"),
        header_cell("Program"),
        header_cell("Bytes"),
        header_cell("Result"),
        header_cell("Stage"),
        header_cell("Diagnostics"),
    ]);
    apply_attempt_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for attempt in attempts {
        let (program_cell, bytes_cell) = match &attempt.program {
            Some(program) => (Cell::new(program.short_id()), Cell::new(program.byte_len())),
            None => (dim_cell("-"), dim_cell("-")),
        };
        let (stage_cell, diagnostic_cell) = match &attempt.failure {
            Some(failure) => (
                Cell::new(failure.stage().label()),
                Cell::new(first_diagnostic(failure.messages())),
            ),
            None => (dim_cell("-"), dim_cell("-")),
        };
        table.add_row(vec![
            Cell::new(attempt.attempt_number),
            program_cell,
            bytes_cell,
            result_cell(attempt.success),
            stage_cell,
            diagnostic_cell,
        ]);
    }
    table
}

/// Titled bullet list; empty when there is nothing to report.
pub fn render_messages(title: &str, messages: &[String]) -> String {
    if messages.is_empty() {
        return String::new();
    }
    let mut out = format!("{title}:\n");
    for message in messages {
        let mut lines = message.lines();
        if let Some(first) = lines.next() {
            let _ = writeln!(out, "- {first}");
        }
        for line in lines {
            let _ = writeln!(out, "  {line}");
        }
    }
    out
}

/// Report for `check` and `validate`: an OK line or the message list.
pub fn render_findings(subject: &Path, title: &str, messages: &[String]) -> String {
    if messages.is_empty() {
        format!("{}: OK\n", subject.display())
    } else {
        format!(
            "{}: {} problem(s)\n{}",
            subject.display(),
            messages.len(),
            render_messages(title, messages)
        )
    }
}

fn first_diagnostic(messages: &[String]) -> String {
    let Some(first) = messages.first() else {
        return "-".to_string();
    };
    let line = first.lines().next().unwrap_or_default();
    let mut excerpt: String = line.chars().take(MAX_CELL_CHARS).collect();
    if line.chars().count() > MAX_CELL_CHARS {
        excerpt.push_str("...");
    }
    if messages.len() > 1 {
        let _ = write!(excerpt, " (+{} more)", messages.len() - 1);
    }
    excerpt
}

fn apply_attempt_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
    table.set_constraints(vec![
        ColumnConstraint::LowerBoundary(Width::Fixed(7)),
        ColumnConstraint::LowerBoundary(Width::Fixed(12)),
        ColumnConstraint::LowerBoundary(Width::Fixed(5)),
        ColumnConstraint::LowerBoundary(Width::Fixed(6)),
        ColumnConstraint::UpperBoundary(Width::Fixed(18)),
        ColumnConstraint::UpperBoundary(Width::Percentage(60)),
    ]);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn result_cell(success: bool) -> Cell {
    if success {
        Cell::new("ok").fg(Color::Green).add_attribute(Attribute::Bold)
    } else {
        Cell::new("failed").fg(Color::Red)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_diagnostic_counts_the_rest() {
        let messages = vec!["Missing required column 'id'".to_string(), "other".to_string()];
        assert_eq!(
            first_diagnostic(&messages),
            "Missing required column 'id' (+1 more)"
        );
        assert_eq!(first_diagnostic(&[]), "-");
    }

    #[test]
    fn first_diagnostic_keeps_only_the_first_line() {
        let messages = vec!["Runtime error: process exited with code 1.\nSTDERR:\nboom".to_string()];
        assert_eq!(
            first_diagnostic(&messages),
            "Runtime error: process exited with code 1."
        );
    }

    #[test]
    fn long_diagnostics_are_cut() {
        let messages = vec!["x".repeat(MAX_CELL_CHARS + 10)];
        let excerpt = first_diagnostic(&messages);
        assert_eq!(excerpt.chars().count(), MAX_CELL_CHARS + 3);
        assert!(excerpt.ends_with("..."));
    }
}
