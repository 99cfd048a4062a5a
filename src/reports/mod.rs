use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use scriabin::condition::{Bound, Window};
use scriabin::index::CompiledLayout;
use scriabin::layout::{LintIssue, RuleId};
use scriabin::stats::Diagnostics;
use tracing::debug;

fn fmt_window(w: &Window) -> String {
    match w.max {
        Bound::Bounded(max) => format!("[{}, {})", w.min, max),
        Bound::Unbounded => format!("[{}, ∞)", w.min),
    }
}

fn fmt_ids(ids: &[RuleId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn print_rule_table(title: &str, layout: &CompiledLayout) {
    println!("\nLayout: {}", title);
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Rule").add_attribute(Attribute::Bold),
        Cell::new("Notes"),
        Cell::new("Keys").fg(Color::Cyan),
        Cell::new("Velocity"),
        Cell::new("Sustain"),
    ]);

    for rule in layout.rules() {
        let notes = rule
            .notes
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let keys = rule
            .tokens
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(" + ");

        let id_cell = Cell::new(rule.id.to_string()).add_attribute(Attribute::Bold);
        let id_cell = if rule.is_inert() || rule.velocity.is_empty() || rule.sustain.is_empty() {
            id_cell.fg(Color::Red)
        } else {
            id_cell
        };

        table.add_row(vec![
            id_cell,
            Cell::new(notes),
            Cell::new(keys).fg(Color::Cyan),
            Cell::new(fmt_window(&rule.velocity)).set_alignment(CellAlignment::Right),
            Cell::new(fmt_window(&rule.sustain)).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{}", table);
}

pub fn print_note_index(layout: &CompiledLayout) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.add_row(vec![
        Cell::new("Note").add_attribute(Attribute::Bold),
        Cell::new("Name"),
        Cell::new("Rules"),
    ]);
    for (note, ids) in layout.note_index().iter() {
        table.add_row(vec![
            Cell::new(note).set_alignment(CellAlignment::Right),
            Cell::new(note_name(note)),
            Cell::new(fmt_ids(ids)),
        ]);
    }
    println!("\n{}", table);
}

pub fn print_char_index(layout: &CompiledLayout) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.add_row(vec![
        Cell::new("Key").add_attribute(Attribute::Bold),
        Cell::new("Rules"),
    ]);
    for token in layout.char_index().tokens() {
        table.add_row(vec![
            Cell::new(token.to_string()),
            Cell::new(fmt_ids(layout.char_index().get(&token))),
        ]);
    }
    println!("\n{}", table);
}

pub fn print_lint(issues: &[LintIssue]) {
    if issues.is_empty() {
        println!("\n✅ No layout issues.");
        return;
    }
    println!("\n⚠️  {} layout issues:", issues.len());
    for issue in issues {
        println!("   - {}", issue);
    }
}

pub fn print_diagnostics(stats: &Diagnostics) {
    if let Ok(json) = serde_json::to_string(stats) {
        debug!("Diagnostics: {}", json);
    }
    if *stats == Diagnostics::default() {
        return;
    }
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.add_row(vec![Cell::new("Skipped").add_attribute(Attribute::Bold), Cell::new("Count")]);
    let rows = [
        ("unmapped notes", stats.unmapped_notes),
        ("unmapped chars", stats.unmapped_chars),
        ("inactive rules", stats.rejected_rules),
        ("unplayable notes", stats.dropped_pairs),
        ("ignored messages", stats.ignored_messages),
    ];
    for (label, count) in rows {
        if count > 0 {
            table.add_row(vec![
                Cell::new(label),
                Cell::new(count).set_alignment(CellAlignment::Right),
            ]);
        }
    }
    eprintln!("{}", table);
}

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Scientific pitch name, middle C (60) = C4.
pub fn note_name(note: u8) -> String {
    let octave = i32::from(note / 12) - 1;
    format!("{}{}", NOTE_NAMES[(note % 12) as usize], octave)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_names() {
        assert_eq!(note_name(60), "C4");
        assert_eq!(note_name(0), "C-1");
        assert_eq!(note_name(61), "C#4");
        assert_eq!(note_name(127), "G9");
    }
}
