use crate::aggregate::summary::GroupMean;
use crate::report::{SummaryDocument, format_f64_6, format_opt_6, format_range};

const CALIBRATION_SLACK: f64 = 0.05;

pub fn render_report_text(doc: &SummaryDocument<'_>) -> String {
    let s = doc.summary;
    let mut out = String::new();

    out.push_str("Forecast Interval Scoring Report\n");
    out.push_str("================================\n\n");

    out.push_str("1. Overview\n");
    out.push_str(&format!("Tool: {} {}\n", doc.tool.name, doc.tool.version));
    out.push_str(&format!("Observations: {}\n", doc.inputs.observations));
    out.push_str(&format!("Predictions: {}\n", doc.inputs.predictions.join(", ")));
    out.push_str(&format!("Scored forecasts: {}\n", s.n_matched));
    if doc.n_skipped > 0 {
        out.push_str(&format!("Skipped (missing values): {}\n", doc.n_skipped));
    }
    if doc.n_unmatched > 0 {
        out.push_str(&format!("Unmatched predictions: {}\n", doc.n_unmatched));
    }
    out.push('\n');

    out.push_str("2. Weighted interval score\n");
    out.push_str(&format!("WIS mean: {}\n", format_f64_6(s.wis_mean)));
    out.push_str(&format!("WIS total: {}\n", format_f64_6(s.wis_total)));
    out.push_str(&format!(
        "Median absolute error (mean): {}\n",
        format_opt_6(s.median_absolute_error_mean)
    ));
    if s.point_absolute_error_mean.is_some() {
        out.push_str(&format!(
            "Point absolute error (mean): {}\n",
            format_opt_6(s.point_absolute_error_mean)
        ));
    }
    out.push('\n');

    out.push_str("3. Coverage\n");
    for c in &s.coverage {
        let nominal = c.range / 100.0;
        out.push_str(&format!(
            "{}% interval: {} ({})\n",
            format_range(c.range),
            format_f64_6(c.coverage),
            coverage_statement(nominal, c.coverage)
        ));
    }
    out.push('\n');

    out.push_str("4. WIS decomposition\n");
    match &s.decomposition {
        Some(d) => {
            out.push_str(&format!(
                "dispersion={}, lower_penalty={}, upper_penalty={}\n",
                format_f64_6(d.dispersion),
                format_f64_6(d.lower_penalty),
                format_f64_6(d.upper_penalty)
            ));
            out.push_str(&format!("{}\n", decomposition_statement(d.dispersion, d.lower_penalty, d.upper_penalty)));
        }
        None => out.push_str("WIS total is zero; decomposition undefined.\n"),
    }
    out.push('\n');

    out.push_str("5. Models\n");
    for (rank, g) in ranked(&s.by_model).iter().enumerate() {
        out.push_str(&format!(
            "{}. {} wis_mean={} n={}\n",
            rank + 1,
            g.group,
            format_f64_6(g.wis_mean),
            g.n
        ));
    }
    if !s.by_horizon.is_empty() {
        out.push_str("\nBy horizon:\n");
        for g in &s.by_horizon {
            out.push_str(&format!(
                "h={} wis_mean={} n={}\n",
                g.group,
                format_f64_6(g.wis_mean),
                g.n
            ));
        }
    }

    out
}

fn ranked(groups: &[GroupMean]) -> Vec<GroupMean> {
    let mut sorted = groups.to_vec();
    sorted.sort_by(|a, b| match a.wis_mean.total_cmp(&b.wis_mean) {
        std::cmp::Ordering::Equal => a.group.cmp(&b.group),
        other => other,
    });
    sorted
}

fn coverage_statement(nominal: f64, empirical: f64) -> &'static str {
    if empirical > nominal + CALIBRATION_SLACK {
        "over-covers; intervals wider than needed"
    } else if empirical < nominal - CALIBRATION_SLACK {
        "under-covers; intervals too narrow"
    } else {
        "close to nominal"
    }
}

fn decomposition_statement(dispersion: f64, lower: f64, upper: f64) -> &'static str {
    if dispersion >= lower && dispersion >= upper {
        "Score is dominated by interval width."
    } else if lower > upper {
        "Score is dominated by observations falling below the intervals (over-prediction)."
    } else {
        "Score is dominated by observations falling above the intervals (under-prediction)."
    }
}
