//! Terminal rendering of check outcomes and group reviews.

use anyhow::Result;
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crf_cli::outcome::{CheckOutcome, GroupReport};

pub fn print_check_outcome(outcome: &CheckOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }
    println!("Form: {} ({})", outcome.form.label(), outcome.form);
    let Some(error) = &outcome.error else {
        println!("Accepted.");
        return Ok(());
    };
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Key"),
        header_cell("Code"),
        header_cell("Message"),
    ]);
    apply_outcome_table_style(&mut table);
    table.add_row(vec![
        Cell::new(&error.key).add_attribute(Attribute::Bold),
        Cell::new(error.code).fg(Color::Red),
        Cell::new(&error.message),
    ]);
    println!("{table}");
    Ok(())
}

pub fn print_group_report(report: &GroupReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    println!(
        "Patients: {}  NCD: {}  HIV: {}  Ratio: {:.1}",
        report.patients, report.ratio.ncd, report.ratio.hiv, report.ratio.ratio
    );
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rule"),
        header_cell("Result"),
        header_cell("Message"),
    ]);
    apply_outcome_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for rule in &report.rules {
        let result = if rule.passed {
            Cell::new("PASS").fg(Color::Green)
        } else {
            Cell::new("FAIL").fg(Color::Red).add_attribute(Attribute::Bold)
        };
        table.add_row(vec![
            Cell::new(rule.rule),
            result,
            match &rule.message {
                Some(message) => Cell::new(message),
                None => dim_cell("-"),
            },
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_outcome_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).add_attribute(Attribute::Dim)
}
