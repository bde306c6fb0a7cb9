//! Export of calculation results
//!
//! CSV for spreadsheet import, JSON for storage and API handoff.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use archfee_types::{CalculationResult, FeeLine, HoursDistribution};

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Export fee lines to CSV
///
/// CSV columns: Scope, In-house, % of Cost, $/ft², Market Fee, In-house Fee,
/// Consultant Fee, Coordination Fee, Hours. Rows keep pipeline order (scans
/// first, then disciplines).
///
/// # Errors
/// Returns error if file creation or write operations fail
///
/// # Examples
///
/// ```no_run
/// use archfee_core::export::export_fee_lines_to_csv;
/// use archfee_core::{Calculator, ResolvedData};
/// use archfee_types::ProjectInput;
/// use std::path::Path;
///
/// let input = ProjectInput::new("Custom Houses", 5000.0);
/// let result = Calculator::default().calculate(&input, &ResolvedData::embedded(&input));
/// export_fee_lines_to_csv(&result.top_down.lines, Path::new("fees.csv")).unwrap();
/// ```
pub fn export_fee_lines_to_csv(lines: &[FeeLine], path: &Path) -> Result<()> {
    create_parent_dir(path)?;

    let file = File::create(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    writeln!(
        writer,
        "Scope,In-house,% of Cost,$/ft²,Market Fee,In-house Fee,Consultant Fee,Coordination Fee,Hours"
    )
    .context("Failed to write CSV header")?;

    for line in lines {
        writeln!(
            writer,
            "\"{}\",{},{:.4},{:.2},{:.2},{:.2},{:.2},{:.2},{:.1}",
            line.scope.label(),
            if line.is_in_house { "yes" } else { "no" },
            line.percent_of_cost * 100.0,
            line.rate_per_sq_ft,
            line.market_fee,
            line.in_house_fee,
            line.consultant_fee,
            line.coordination_fee,
            line.hours
        )
        .with_context(|| format!("Failed to write row for {}", line.scope.label()))?;
    }

    writer.flush().context("Failed to flush CSV writer")?;
    Ok(())
}

/// Export phase × role hours to CSV
///
/// One row per phase, one column per role, then a planned and a rounded
/// totals row.
pub fn export_hours_to_csv(hours: &HoursDistribution, path: &Path) -> Result<()> {
    create_parent_dir(path)?;

    let file = File::create(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    let roles: Vec<&str> = hours.roles.totals.iter().map(|t| t.role.label()).collect();
    writeln!(writer, "Phase,Percent,Hours,{}", roles.join(","))
        .context("Failed to write CSV header")?;

    for (phase, split) in hours.phases.iter().zip(&hours.roles.by_phase) {
        let cells: Vec<String> = hours
            .roles
            .totals
            .iter()
            .map(|t| format!("{:.2}", split.hours.get(&t.role).copied().unwrap_or(0.0)))
            .collect();
        writeln!(
            writer,
            "\"{}\",{:.0}%,{:.0},{}",
            phase.phase.label(),
            phase.percent_of_total * 100.0,
            phase.hours,
            cells.join(",")
        )
        .with_context(|| format!("Failed to write row for {}", phase.phase.label()))?;
    }

    let planned: Vec<String> = hours
        .roles
        .totals
        .iter()
        .map(|t| format!("{:.2}", t.planned_hours))
        .collect();
    let rounded: Vec<String> = hours
        .roles
        .totals
        .iter()
        .map(|t| format!("{:.0}", t.rounded_hours))
        .collect();
    writeln!(
        writer,
        "\"Planned\",,{:.2},{}",
        hours.roles.planned_total,
        planned.join(",")
    )
    .context("Failed to write planned totals")?;
    writeln!(
        writer,
        "\"Rounded\",,{:.0},{}",
        hours.roles.rounded_total,
        rounded.join(",")
    )
    .context("Failed to write rounded totals")?;

    writer.flush().context("Failed to flush CSV writer")?;
    Ok(())
}

/// Export the full calculation result as pretty JSON
///
/// Identical results produce identical files.
pub fn export_result_to_json(result: &CalculationResult, path: &Path) -> Result<()> {
    create_parent_dir(path)?;

    let json =
        serde_json::to_string_pretty(result).context("Failed to serialize result to JSON")?;

    std::fs::write(path, json)
        .with_context(|| format!("Failed to write JSON file: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Calculator, ResolvedData};
    use archfee_types::ProjectInput;
    use tempfile::TempDir;

    fn result() -> CalculationResult {
        let mut input = ProjectInput::new("Custom Houses", 5000.0);
        input.scan.building = true;
        input.existing_area_ft2 = 800.0;
        Calculator::default().calculate(&input, &ResolvedData::embedded(&input))
    }

    #[test]
    fn test_export_fee_lines_csv() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("fees.csv");
        let result = result();

        export_fee_lines_to_csv(&result.top_down.lines, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let rows: Vec<&str> = contents.lines().collect();
        assert!(rows[0].starts_with("Scope,In-house"));
        assert_eq!(rows.len(), result.top_down.lines.len() + 1);
        assert!(rows[1].starts_with("\"Building Scan\",yes"));
    }

    #[test]
    fn test_export_hours_csv() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("hours.csv");
        let result = result();

        export_hours_to_csv(&result.hours, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        // Header + 6 phases + planned + rounded
        assert_eq!(contents.lines().count(), 9);
        assert!(contents.contains("\"Discovery\",8%"));
    }

    #[test]
    fn test_export_result_json_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("result.json");
        let result = result();

        export_result_to_json(&result, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: CalculationResult = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.top_down.lines.len(), result.top_down.lines.len());
        assert!(contents.contains("louisAmyFee"));
    }
}
