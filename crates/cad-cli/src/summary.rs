//! Table output.

use cad_core::{LoadOutcome, PropagationReport};
use cad_model::{Container, OverrideSet};
use cad_store::SaveSummary;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

/// Builds the drawing/layer table.
pub fn hierarchy_table(containers: &[Container]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Name"),
        header_cell("Visible"),
        header_cell("Halftone"),
        header_cell("Color"),
        header_cell("Pattern"),
        header_cell("Weight"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=2 {
        align_column(&mut table, index, CellAlignment::Center);
    }
    align_column(&mut table, 5, CellAlignment::Right);

    for container in containers {
        let mut row = vec![
            Cell::new(&container.name).add_attribute(Attribute::Bold),
            flag_cell(container.visible),
            flag_cell(container.halftone),
        ];
        row.extend(override_cells(&container.overrides));
        table.add_row(row);
        for sub_item in &container.sub_items {
            let mut row = vec![
                Cell::new(format!("  {}", sub_item.name)),
                flag_cell(sub_item.visible),
                dim_cell(""),
            ];
            row.extend(override_cells(&sub_item.overrides));
            table.add_row(row);
        }
    }
    table
}

pub fn print_hierarchy(containers: &[Container]) {
    if containers.is_empty() {
        println!("No drawings match.");
        return;
    }
    println!("{}", hierarchy_table(containers));
}

pub fn print_save_summary(summary: &SaveSummary) {
    println!(
        "Saved {} drawing(s) to {}",
        summary.files_written,
        summary.folder.display()
    );
}

pub fn print_load_outcome(outcome: &LoadOutcome) {
    println!(
        "Loaded {} drawing(s) from {}",
        outcome.store.containers_loaded,
        outcome.store.folder.display()
    );
    if outcome.store.containers_skipped > 0 {
        println!(
            "{} drawing(s) had no saved settings and were left unchanged",
            outcome.store.containers_skipped
        );
    }
    if !outcome.apply.skipped.is_empty() {
        println!("{} locked item(s) were skipped", outcome.apply.skipped.len());
    }
    for pattern in &outcome.apply.unresolved_patterns {
        println!("Line pattern '{pattern}' does not exist; no pattern was applied");
    }
}

pub fn print_propagation(report: &PropagationReport) {
    print!("{report}");
}

fn override_cells(overrides: &OverrideSet) -> Vec<Cell> {
    let color = match overrides.color {
        Some(rgb) => Cell::new(rgb.to_hex()).fg(Color::Rgb {
            r: rgb.red,
            g: rgb.green,
            b: rgb.blue,
        }),
        None => dim_cell("-"),
    };
    let pattern = match &overrides.line_pattern {
        Some(name) => Cell::new(name),
        None => dim_cell("-"),
    };
    let weight = match overrides.line_weight {
        Some(weight) => Cell::new(weight.get()),
        None => dim_cell("-"),
    };
    vec![color, pattern, weight]
}

fn flag_cell(value: bool) -> Cell {
    if value {
        Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold)
    } else {
        dim_cell("✗")
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

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
