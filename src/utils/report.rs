// src/utils/report.rs

use crate::convert::ConversionSummary;
use crate::model::elements::ElementTable;

/// Text printed after a conversion finishes
pub fn conversion_summary(summary: &ConversionSummary) -> String {
    let formula_str: String = summary
        .element_counts
        .iter()
        .map(|(el, count)| format!("{}{}", el, count))
        .collect::<Vec<_>>()
        .join(" ");

    let mut out = String::new();
    out.push_str(&format!("File: {}\n", summary.input.display()));
    out.push_str(&format!("Output: {}\n", summary.output.display()));
    out.push_str(&format!("Formula: {}\n", formula_str));
    out.push_str(&format!(
        "Atoms: {} rendered, {} skipped, {} materials\n",
        summary.atoms_rendered,
        summary.skipped.len(),
        summary.materials
    ));

    if summary.skipped.is_empty() {
        return out;
    }

    out.push_str("--------------------------------------------------\n");
    out.push_str(&format!("{:<8} {:<8} {}\n", "Line", "Serial", "Reason"));
    out.push_str("--------------------------------------------------\n");

    for rec in summary.skipped.iter().take(20) {
        out.push_str(&format!("{:<8} {:<8} {}\n", rec.line_number, rec.serial, rec.reason));
    }

    if summary.skipped.len() > 20 {
        out.push_str(&format!("... and {} more records.\n", summary.skipped.len() - 20));
    }

    out
}

/// Tabulates the loaded reference data
pub fn element_table(table: &ElementTable) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<4} {:<14} {:<6} {:<8} {:<8} {}\n",
        "Sym", "Name", "Z", "R used", "R cov", "Color"
    ));
    out.push_str("--------------------------------------------------\n");

    for sym in table.symbols() {
        if let Ok(props) = table.get(sym) {
            let [r, g, b, a] = props.color;
            out.push_str(&format!(
                "{:<4} {:<14} {:<6} {:<8.2} {:<8.2} {:.2},{:.2},{:.2},{:.2}\n",
                sym, props.name, props.atomic_number, props.radius_used, props.radius_covalent, r, g, b, a
            ));
        }
    }
    out
}
