//! Rendering of analysis reports for the terminal.

use tone_core::ToneReport;

/// Decimal places printed for each harmonic ratio.
const RATIO_PRECISION: usize = 4;

/// One line per file: path, fundamental, note (or `-`) and the harmonic ratios.
pub fn format_text(report: &ToneReport) -> String {
    let ratios = report
        .harmonic_ratios
        .iter()
        .map(|ratio| format!("{ratio:.RATIO_PRECISION$}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "{} {} {} [{}]",
        report.path.as_deref().unwrap_or("-"),
        report.fundamental_frequency,
        report.note.as_deref().unwrap_or("-"),
        ratios
    )
}

pub fn format_json(report: &ToneReport) -> serde_json::Result<String> {
    serde_json::to_string(report)
}
