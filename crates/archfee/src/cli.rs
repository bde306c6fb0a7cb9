//! CLI helpers: input loading and output formatting
//!
//! Every formatter renders either a comfy-table view or pretty JSON.

use anyhow::{bail, Context, Result};
use archfee_core::config::FeeConfig;
use archfee_types::{
    BudgetBreakdown, CalcNote, CalculationResult, DisciplineBudget, HoursDistribution,
    NoteSeverity, ProjectInput, ScenarioSet, TopDownFees, VarianceLevel, VarianceReport,
};
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};
use serde::Serialize;
use std::path::Path;

// ============================================================================
// Output Format
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Rendering options shared by all formatters
#[derive(Debug, Clone, Copy, Default)]
pub struct Style {
    pub format: OutputFormat,
    pub no_color: bool,
}

// ============================================================================
// Loading
// ============================================================================

/// Load a project input from JSON or TOML (by extension)
pub fn load_input(path: &Path) -> Result<ProjectInput> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;

    let is_toml = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false);

    if is_toml {
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML input: {}", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON input: {}", path.display()))
    }
}

/// Explicit config path must load; otherwise the default location may be absent
pub fn load_config(path: Option<&Path>) -> Result<FeeConfig> {
    match path {
        Some(p) => FeeConfig::load(p)
            .with_context(|| format!("Failed to load config: {}", p.display())),
        None => Ok(FeeConfig::load_or_default(None)),
    }
}

/// Parse "json" or "table"
pub fn parse_format(s: &str) -> Result<OutputFormat> {
    match s {
        "json" => Ok(OutputFormat::Json),
        "table" => Ok(OutputFormat::Table),
        other => bail!("Unknown format '{}' (expected json|table)", other),
    }
}

// ============================================================================
// Formatters
// ============================================================================

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

fn new_table(headers: &[&str], no_color: bool) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    if no_color {
        table.set_header(headers.to_vec());
    } else {
        table.set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
    }
    table
}

/// Budget breakdown and discipline split
pub fn format_budget(budget: &BudgetBreakdown, disciplines: &DisciplineBudget, style: Style) -> String {
    if style.format == OutputFormat::Json {
        return to_json(&serde_json::json!({
            "budget": budget,
            "disciplines": disciplines,
        }));
    }

    let mut lines = vec![];
    lines.push(format!(
        "New cost:         ${:.2}/ft² (range {:.2}-{:.2})",
        budget.new_cost.target, budget.new_cost.min, budget.new_cost.max
    ));
    lines.push(format!(
        "Remodel cost:     ${:.2}/ft² (range {:.2}-{:.2})",
        budget.remodel_cost.target, budget.remodel_cost.min, budget.remodel_cost.max
    ));
    lines.push(format!("New budget:       {}", format_money(budget.new_budget)));
    lines.push(format!("Remodel budget:   {}", format_money(budget.remodel_budget)));
    lines.push(format!("Total budget:     {}", format_money(budget.total_budget)));
    lines.push(String::new());

    let mut categories = new_table(&["Category", "Share", "New", "Remodel", "Total"], style.no_color);
    for (name, share, split) in [
        ("Shell", budget.shares.shell, budget.shell),
        ("Interior", budget.shares.interior, budget.interior),
        ("Landscape", budget.shares.landscape, budget.landscape),
    ] {
        categories.add_row(Row::from(vec![
            name.to_string(),
            format_pct(share),
            format_money(split.new),
            format_money(split.remodel),
            format_money(split.total),
        ]));
    }
    lines.push(categories.to_string());
    lines.push(String::new());

    let mut split = new_table(&["Discipline", "% of Shell", "Budget"], style.no_color);
    for allocation in &disciplines.allocations {
        split.add_row(Row::from(vec![
            allocation.discipline.label().to_string(),
            format_pct(allocation.percentage),
            format_money(allocation.budget.total),
        ]));
    }
    lines.push(split.to_string());
    if disciplines.scale_factor < 1.0 {
        lines.push(format!(
            "Engineering shares scaled by {:.4} to keep the architecture floor",
            disciplines.scale_factor
        ));
    }

    lines.join("\n")
}

/// Top-down fee lines with totals
pub fn format_fees(fees: &TopDownFees, style: Style) -> String {
    if style.format == OutputFormat::Json {
        return to_json(fees);
    }

    let mut table = new_table(
        &[
            "Scope", "Who", "% Cost", "$/ft²", "Market", "In-house", "Consultant", "Coord.", "Hours",
        ],
        style.no_color,
    );

    for line in &fees.lines {
        let who = if line.is_in_house { "in-house" } else { "consultant" };
        table.add_row(Row::from(vec![
            line.scope.label().to_string(),
            who.to_string(),
            format_pct(line.percent_of_cost),
            format!("{:.2}", line.rate_per_sq_ft),
            format_money(line.market_fee),
            format_money(line.in_house_fee),
            format_money(line.consultant_fee),
            format_money(line.coordination_fee),
            format!("{:.1}", line.hours),
        ]));
    }

    let t = &fees.totals;
    table.add_row(Row::from(vec![
        "Total".to_string(),
        String::new(),
        String::new(),
        String::new(),
        format_money(t.market_fee),
        format_money(t.in_house_fee),
        format_money(t.consultant_fee),
        format_money(t.coordination_fee),
        format!("{:.1}", t.in_house_hours),
    ]));

    format!("{}\nTotal fee:        {}", table, format_money(t.total_fee))
}

/// Phase table and role totals
pub fn format_hours(hours: &HoursDistribution, style: Style) -> String {
    if style.format == OutputFormat::Json {
        return to_json(hours);
    }

    let mut phases = new_table(&["Phase", "%", "Months", "Hours"], style.no_color);
    for phase in &hours.phases {
        phases.add_row(Row::from(vec![
            phase.phase.label().to_string(),
            format_pct(phase.percent_of_total),
            phase
                .months
                .map(|m| format!("{:.1}", m))
                .unwrap_or_else(|| "-".to_string()),
            format!("{:.0}", phase.hours),
        ]));
    }

    let mut roles = new_table(&["Role", "Planned", "Rounded"], style.no_color);
    for total in &hours.roles.totals {
        roles.add_row(Row::from(vec![
            total.role.label().to_string(),
            format!("{:.2}", total.planned_hours),
            format!("{:.0}", total.rounded_hours),
        ]));
    }
    roles.add_row(Row::from(vec![
        "Total".to_string(),
        format!("{:.2}", hours.roles.planned_total),
        format!("{:.0}", hours.roles.rounded_total),
    ]));

    format!(
        "Planned hours:    {:.0}\n\n{}\n\n{}\nRounding difference: {:+.2} h",
        hours.total_hours_planned, phases, roles, hours.roles.difference
    )
}

pub fn format_scenarios(scenarios: &ScenarioSet, style: Style) -> String {
    if style.format == OutputFormat::Json {
        return to_json(scenarios);
    }

    let mut table = new_table(&["Scenario", "Total", "% of Budget"], style.no_color);
    for scenario in &scenarios.scenarios {
        table.add_row(Row::from(vec![
            scenario.name.clone(),
            format_money(scenario.total),
            format_pct(scenario.pct_of_project_budget),
        ]));
    }

    format!(
        "Reference budget: {}\n{}",
        format_money(scenarios.reference_project_budget),
        table
    )
}

/// Variance report, notes and optional validation error
pub fn format_check(
    variance: &VarianceReport,
    notes: &[CalcNote],
    validation_error: Option<&str>,
    style: Style,
) -> String {
    if style.format == OutputFormat::Json {
        return to_json(&serde_json::json!({
            "valid": validation_error.is_none(),
            "validationError": validation_error,
            "variance": variance,
            "notes": notes,
        }));
    }

    let mut lines = vec![];
    match validation_error {
        Some(err) => lines.push(format!("Input:            INVALID ({})", err)),
        None => lines.push("Input:            valid".to_string()),
    }
    lines.push(format!(
        "Top-down fee:     {} in-house, {} market",
        format_money(variance.in_house_top_down_fee),
        format_money(variance.top_down_market_fee)
    ));
    lines.push(format!(
        "Bottom-up fee:    {}",
        format_money(variance.bottom_up_fee)
    ));
    lines.push(format!(
        "Variance:         {} ({}), {} vs market",
        format_pct(variance.variance),
        level_label(variance.level),
        format_pct(variance.market_variance)
    ));
    lines.push(format!(
        "Hours/ft²:        {:.3} ({:?})",
        variance.hours_per_ft2, variance.hours_density
    ));

    let warnings: Vec<&CalcNote> = notes
        .iter()
        .filter(|n| n.severity == NoteSeverity::Warning)
        .collect();
    if !warnings.is_empty() || !variance.messages.is_empty() {
        lines.push(String::new());
        for note in warnings {
            lines.push(format!("  ⚠ [{}] {}", note.source, note.message));
        }
        for message in &variance.messages {
            lines.push(format!("  • {}", message));
        }
    }

    lines.join("\n")
}

/// Everything, in pipeline order
pub fn format_report(result: &CalculationResult, style: Style) -> String {
    if style.format == OutputFormat::Json {
        return to_json(result);
    }

    let mut sections = vec![];
    sections.push(format!(
        "archfee - Budget & Fee Report\n=============================\nCost data:        {} ({:?})\nCategory mult.:   {:.2}",
        result.cost_label, result.cost_origin, result.category_multiplier
    ));
    sections.push(format_budget(&result.budget, &result.disciplines, style));
    sections.push(format_fees(&result.top_down, style));
    sections.push(format!(
        "Bottom-up:        {:.0} h × ${:.2}/h = {} (avg ${:.0}/h)",
        result.bottom_up.hours.total_hours_planned,
        result.bottom_up.rates.discounted_rate(),
        format_money(result.bottom_up.bottom_up_fee),
        result.bottom_up.average_pricing_per_hour
    ));
    sections.push(format_hours(&result.hours, style));
    sections.push(format_scenarios(&result.scenarios, style));
    sections.push(format_check(&result.variance, &result.notes, None, style));
    sections.join("\n\n")
}

// ============================================================================
// Utilities
// ============================================================================

fn level_label(level: VarianceLevel) -> &'static str {
    match level {
        VarianceLevel::Normal => "normal",
        VarianceLevel::Moderate => "moderate",
        VarianceLevel::High => "high",
    }
}

/// "$1,234,567" (rounded to whole dollars)
pub fn format_money(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}${}", sign, grouped)
}

fn format_pct(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use archfee_core::{Calculator, ResolvedData};
    use std::io::Write;

    fn result() -> CalculationResult {
        let input = ProjectInput::new("Custom Houses", 5000.0);
        Calculator::default().calculate(&input, &ResolvedData::embedded(&input))
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "$0");
        assert_eq!(format_money(999.4), "$999");
        assert_eq!(format_money(1000.0), "$1,000");
        assert_eq!(format_money(2_237_500.0), "$2,237,500");
        assert_eq!(format_money(-12_345.6), "-$12,346");
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(parse_format("json").unwrap(), OutputFormat::Json);
        assert_eq!(parse_format("table").unwrap(), OutputFormat::Table);
        assert!(parse_format("xml").is_err());
    }

    #[test]
    fn test_load_input_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"buildingType": "Custom Houses", "newAreaFt2": 5000, "overrides": {{"hoursFactor": 0.22}}}}"#
        )
        .unwrap();

        let input = load_input(file.path()).unwrap();
        assert_eq!(input.building_type, "Custom Houses");
        assert_eq!(input.category, 3);
        assert_eq!(input.overrides.hours_factor, Some(0.22));
    }

    #[test]
    fn test_load_input_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "buildingType = \"Office\"\nnewAreaFt2 = 12000.0\ncategory = 4\n\n[overrides]\nshellShare = 0.7"
        )
        .unwrap();

        let input = load_input(file.path()).unwrap();
        assert_eq!(input.building_type, "Office");
        assert_eq!(input.category, 4);
        assert_eq!(input.overrides.shell_share, Some(0.7));
    }

    #[test]
    fn test_demo_inputs_load() {
        let demos = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");

        let house = load_input(&demos.join("custom-house.json")).unwrap();
        assert_eq!(house.overrides.engineering.structural, Some(0.35));
        assert!(house.scan.site);

        let office = load_input(&demos.join("office-remodel.toml")).unwrap();
        assert_eq!(office.existing_area_ft2, 14000.0);
        assert_eq!(office.in_house.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn test_load_input_missing_file() {
        let err = load_input(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read input file"));
    }

    #[test]
    fn test_table_report_mentions_every_section() {
        let style = Style {
            format: OutputFormat::Table,
            no_color: true,
        };
        let report = format_report(&result(), style);
        assert!(report.contains("Total budget"));
        assert!(report.contains("Architecture"));
        assert!(report.contains("Creative - Schematic"));
        assert!(report.contains("Market (discounted)"));
        assert!(report.contains("Variance"));
    }

    #[test]
    fn test_json_fees_parse_back() {
        let style = Style {
            format: OutputFormat::Json,
            no_color: true,
        };
        let result = result();
        let json = format_fees(&result.top_down, style);
        let parsed: TopDownFees = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.lines.len(), result.top_down.lines.len());
    }
}
