//! Formatted terminal output.
//!
//! We keep formatting code in one place so the engine stays free of any
//! presentation concerns and output changes are localized.

use crate::context::LookupContext;
use crate::domain::{
    CalculationResult, DomainKey, GoalPlan, ParsedNumeric, ProvenanceStep, SubtestKey,
    ValueWithProvenance,
};

const PLACEHOLDER: &str = "-";

/// Score summary for one child: one line per subtest, then the domains.
pub fn format_calculation(result: &CalculationResult, show_trail: bool) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Scores (age {} months) ===\n", result.age_months));
    out.push_str(&format!(
        "{:<22} {:>5} {:>9} {:>10} {:>9}\n",
        "subtest", "raw", "standard", "percentile", "age eq."
    ));
    out.push_str(&format!("{:-<22} {:-<5} {:-<9} {:-<10} {:-<9}\n", "", "", "", "", ""));

    for key in SubtestKey::ALL {
        let Some(r) = result.subtest(key) else { continue };
        out.push_str(
            format!(
                "{:<22} {:>5} {:>9} {:>10} {:>9}",
                key.label(),
                r.raw_score.map(|v| v.to_string()).unwrap_or_else(|| PLACEHOLDER.to_string()),
                fmt_cell(&r.standard_score),
                fmt_cell(&r.percentile),
                fmt_cell(&r.age_equivalent),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&format!(
        "{:<22} {:>7} {:>9} {:>10}\n",
        "domain", "sum", "composite", "percentile"
    ));
    out.push_str(&format!("{:-<22} {:-<7} {:-<9} {:-<10}\n", "", "", "", ""));
    for key in DomainKey::ALL {
        let d = match key {
            DomainKey::Communication => &result.domains.communication,
            DomainKey::Physical => &result.domains.physical,
        };
        out.push_str(&format!(
            "{:<22} {:>7} {:>9} {:>10}\n",
            key.label(),
            d.sum.map(|s| s.to_string()).unwrap_or_else(|| PLACEHOLDER.to_string()),
            fmt_cell(&d.standard_score),
            fmt_cell(&d.percentile),
        ));
    }

    let notes = collect_notes(result);
    if !notes.is_empty() {
        out.push_str("\nNotes:\n");
        for note in notes {
            out.push_str(&format!("- {note}\n"));
        }
    }

    if show_trail {
        out.push_str("\nProvenance:\n");
        for key in SubtestKey::ALL {
            let Some(r) = result.subtest(key) else { continue };
            if r.raw_score.is_none() {
                continue;
            }
            out.push_str(&format!("{} percentile:\n", key.label()));
            out.push_str(&format_trail(&r.percentile.steps));
            out.push_str(&format!("{} age equivalent:\n", key.label()));
            out.push_str(&format_trail(&r.age_equivalent.steps));
        }
        for key in DomainKey::ALL {
            let d = match key {
                DomainKey::Communication => &result.domains.communication,
                DomainKey::Physical => &result.domains.physical,
            };
            if d.sum.is_some() {
                out.push_str(&format!("{} percentile:\n", key.label()));
                out.push_str(&format_trail(&d.percentile.steps));
            }
        }
    }

    out
}

/// Goal plan: target standard score, then the raw score each subtest needs.
pub fn format_goal_plan(plan: &GoalPlan, show_trail: bool) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== Goal: percentile {} (age {} months) ===\n",
        plan.target_percentile, plan.age_months
    ));
    out.push_str(&format!("Standard score: {}\n\n", fmt_cell(&plan.standard_score)));

    out.push_str(&format!("{:<22} {:>8}  {}\n", "subtest", "min raw", "note"));
    out.push_str(&format!("{:-<22} {:-<8}  {:-<4}\n", "", "", ""));
    for (key, r) in &plan.raw_scores {
        out.push_str(
            format!(
                "{:<22} {:>8}  {}",
                key.label(),
                r.value.map(|v| v.to_string()).unwrap_or_else(|| PLACEHOLDER.to_string()),
                r.note.as_deref().unwrap_or(""),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    if show_trail {
        out.push_str("\nProvenance:\n");
        for (key, r) in &plan.raw_scores {
            out.push_str(&format!("{}:\n", key.label()));
            out.push_str(&format_trail(&r.steps));
        }
    }

    out
}

/// Loaded age bands, one per line.
pub fn format_bands(ctx: &LookupContext) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<6} {:>5} {:>5}  {}\n", "table", "from", "to", "label"));
    out.push_str(&format!("{:-<6} {:-<5} {:-<5}  {:-<5}\n", "", "", "", ""));
    for (band, id) in ctx.bands() {
        out.push_str(&format!(
            "{:<6} {:>5} {:>5}  {}\n",
            id, band.min_months, band.max_months, band.label
        ));
    }
    out
}

/// One indented line per step: table, row, description, source.
pub fn format_trail(steps: &[ProvenanceStep]) -> String {
    if steps.is_empty() {
        return "  (no lookups)\n".to_string();
    }
    let mut out = String::new();
    for step in steps {
        let row = step
            .csv_row
            .map(|r| format!("row {r}"))
            .unwrap_or_else(|| "no match".to_string());
        let page = step.source.page.map(|p| format!(", p. {p}")).unwrap_or_default();
        out.push_str(&format!(
            "  [{} {row}] {} ({}{page})\n",
            step.table_id,
            step.description.as_deref().unwrap_or(""),
            step.source.source_file,
        ));
    }
    out
}

fn fmt_cell(v: &ValueWithProvenance<ParsedNumeric>) -> String {
    match &v.value {
        Some(value) => {
            let flag = if v.note.is_some() { "*" } else { "" };
            format!("{value}{flag}")
        }
        None => PLACEHOLDER.to_string(),
    }
}

fn collect_notes(result: &CalculationResult) -> Vec<String> {
    let mut notes = Vec::new();
    for key in SubtestKey::ALL {
        let Some(r) = result.subtest(key) else { continue };
        if r.raw_score.is_none() {
            continue;
        }
        for note in [&r.standard_score.note, &r.age_equivalent.note].into_iter().flatten() {
            notes.push(format!("{}: {note}", key.label()));
        }
    }
    for key in DomainKey::ALL {
        let d = match key {
            DomainKey::Communication => &result.domains.communication,
            DomainKey::Physical => &result.domains.physical,
        };
        if let Some(note) = &d.standard_score.note {
            notes.push(format!("{}: {note}", key.label()));
        }
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixture;
    use crate::domain::ScoreInput;
    use crate::goals::{ReverseStrategy, plan_goals};
    use crate::scoring::calculate_all_scores;

    #[test]
    fn calculation_table_has_placeholders() {
        let ctx = fixture::fixture_context().unwrap();
        let input = ScoreInput::new(12).with_raw(SubtestKey::Cognitive, 20);
        let text = format_calculation(&calculate_all_scores(&input, &ctx), false);
        assert!(text.contains("age 12 months"));
        let cog = text.lines().find(|l| l.starts_with("Cognitive")).unwrap();
        assert!(cog.contains("100"));
        assert!(cog.contains("50"));
        let fm = text.lines().find(|l| l.starts_with("Fine Motor")).unwrap();
        assert!(fm.ends_with('-'));
    }

    #[test]
    fn clamped_values_are_flagged() {
        let ctx = fixture::fixture_context().unwrap();
        let input = ScoreInput::new(12).with_raw(SubtestKey::Cognitive, 90);
        let text = format_calculation(&calculate_all_scores(&input, &ctx), false);
        assert!(text.contains(">150*"));
        assert!(text.contains("exceeds table max"));
    }

    #[test]
    fn trail_lists_each_table() {
        let ctx = fixture::fixture_context().unwrap();
        let input = ScoreInput::new(12).with_raw(SubtestKey::Cognitive, 20);
        let text = format_calculation(&calculate_all_scores(&input, &ctx), true);
        assert!(text.contains("[B13 row 22]"));
        assert!(text.contains("[C1 row"));
        assert!(text.contains("[A1 row"));
    }

    #[test]
    fn goal_plan_lists_subtests() {
        let ctx = fixture::fixture_context().unwrap();
        let plan = plan_goals(50.0, 12, &SubtestKey::ALL, ReverseStrategy::ClosestAtOrBelow, &ctx);
        let text = format_goal_plan(&plan, false);
        assert!(text.contains("Standard score: 100"));
        let cog = text.lines().find(|l| l.starts_with("Cognitive")).unwrap();
        assert!(cog.contains("20"));
    }

    #[test]
    fn bands_table_lists_all_bands() {
        let ctx = fixture::fixture_context().unwrap();
        let text = format_bands(&ctx);
        assert_eq!(text.lines().count(), 2 + 17);
        assert!(text.contains("B29"));
    }
}
