//! Plain-text rendering of API results.

use std::io::{self, Write};

use aprendices_core::{
    ChartPoint, DashboardPayload, FilterKey, FilterSet, CHART_MODALIDAD, CHART_NIVEL,
    CHART_PROGRAMAS,
};

/// Width of the longest bar in a chart.
const BAR_WIDTH: u64 = 30;

const CHARTS: [(&str, &str); 3] = [
    (CHART_NIVEL, "Trainees by level"),
    (CHART_MODALIDAD, "Groups by modality"),
    (CHART_PROGRAMAS, "Trainees by program"),
];

/// Write the dashboard cards, charts and filter choices.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_dashboard(
    out: &mut impl Write,
    payload: &DashboardPayload,
    filters: &FilterSet,
) -> io::Result<()> {
    if filters.is_empty() {
        writeln!(out, "Dashboard (no filters)")?;
    } else {
        let active: Vec<String> = filters
            .active()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        writeln!(out, "Dashboard ({})", active.join(", "))?;
    }
    writeln!(out)?;

    let metrics = payload.cards.metrics();
    let name_width = metrics.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, value) in metrics {
        writeln!(out, "  {name:<name_width$}  {value:>8}")?;
    }

    for (key, title) in CHARTS {
        writeln!(out)?;
        writeln!(out, "{title}")?;
        write_chart(out, payload.chart(key))?;
    }

    let options = payload.filter_options();
    writeln!(out)?;
    writeln!(out, "Available filters")?;
    for (key, values) in [
        (FilterKey::Modalidad, &options.modalidades),
        (FilterKey::Programa, &options.programas),
        (FilterKey::Nivel, &options.niveles),
    ] {
        writeln!(out, "  --{key}: {}", values.join(" | "))?;
    }

    Ok(())
}

fn write_chart(out: &mut impl Write, points: &[ChartPoint]) -> io::Result<()> {
    if points.is_empty() {
        return writeln!(out, "  (no data)");
    }

    let label_width = points.iter().map(|p| p.label.chars().count()).max().unwrap_or(0);
    let max = points.iter().map(|p| p.value).max().unwrap_or(0);

    for point in points {
        let bar = "#".repeat(bar_len(point.value, max));
        writeln!(
            out,
            "  {:<label_width$}  {:>6}  {bar}",
            point.label, point.value
        )?;
    }
    Ok(())
}

fn bar_len(value: u64, max: u64) -> usize {
    if max == 0 {
        return 0;
    }
    let len = value.saturating_mul(BAR_WIDTH) / max;
    // Non-zero values always get at least one mark.
    let len = if value > 0 { len.max(1) } else { len };
    usize::try_from(len).unwrap_or(usize::MAX)
}

/// Write a user list, one record per line.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_users(out: &mut impl Write, users: &[serde_json::Value]) -> io::Result<()> {
    if users.is_empty() {
        return writeln!(out, "No users found for this center.");
    }
    for user in users {
        writeln!(out, "{user}")?;
    }
    writeln!(out, "{} user(s)", users.len())
}

/// Write a value as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(out: &mut impl Write, value: &impl serde::Serialize) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}
