//! Console report rendering.

use guardrail_analysis::{AnalysisReport, MethodCall, RuleResult};

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const DIM: &str = "\x1b[90m";
const RESET: &str = "\x1b[0m";

struct Palette {
    red: &'static str,
    green: &'static str,
    yellow: &'static str,
    dim: &'static str,
    reset: &'static str,
}

impl Palette {
    fn new(use_color: bool) -> Self {
        if use_color {
            Self {
                red: RED,
                green: GREEN,
                yellow: YELLOW,
                dim: DIM,
                reset: RESET,
            }
        } else {
            Self {
                red: "",
                green: "",
                yellow: "",
                dim: "",
                reset: "",
            }
        }
    }
}

/// Render a human-readable report.
pub fn render_console(report: &AnalysisReport, use_color: bool) -> String {
    let p = Palette::new(use_color);
    let mut out = String::new();

    out.push_str("╔══════════════════════════════════════════╗\n");
    out.push_str("║            Guardrail Report              ║\n");
    out.push_str("╚══════════════════════════════════════════╝\n\n");

    for result in &report.results {
        render_rule(&mut out, result, &p);
    }

    let total_entries: usize = report.results.iter().map(|r| r.results.len()).sum();
    let passed: usize = report
        .results
        .iter()
        .map(|r| r.results.iter().filter(|e| e.found).count())
        .sum();
    out.push_str(&format!(
        "─── Summary: {}/{} entry points passed, {} violations ───\n",
        passed,
        total_entries,
        report.violation_count()
    ));
    out.push_str(&format!(
        "{}{} files analyzed, {} skipped, {} edges ({} unresolved), {}ms{}\n",
        p.dim,
        report.stats.files_analyzed,
        report.stats.files_skipped,
        report.stats.edges,
        report.stats.unresolved_calls,
        report.stats.duration_ms,
        p.reset
    ));

    if report.has_violations() {
        out.push_str(&format!("Result: {}FAILED ✗{}\n", p.red, p.reset));
    } else {
        out.push_str(&format!("Result: {}PASSED ✓{}\n", p.green, p.reset));
    }

    out
}

fn render_rule(out: &mut String, result: &RuleResult, p: &Palette) {
    out.push_str(&format!("rule: {}\n", result.rule));

    for entry in &result.results {
        let id = entry.entry_point.id();
        if entry.found {
            let hops = entry.path.as_ref().map(Vec::len).unwrap_or(0);
            out.push_str(&format!(
                "  {}✓{} {} reaches {} ({} hop{})\n",
                p.green,
                p.reset,
                id,
                entry.required_call,
                hops,
                if hops == 1 { "" } else { "s" }
            ));
        } else {
            let location = entry
                .entry_point
                .file
                .as_deref()
                .map(|f| format!(" ({})", f))
                .unwrap_or_default();
            out.push_str(&format!(
                "  {}✗{} {} never reaches {}{}\n",
                p.red, p.reset, id, entry.required_call, location
            ));
            if let Some(message) = &entry.message {
                out.push_str(&format!("    {}{}{}\n", p.yellow, message, p.reset));
            }
        }
    }

    for violation in &result.paired_violations {
        let obligation = &violation.obligation;
        let completions: Vec<String> = obligation
            .completions
            .iter()
            .map(ToString::to_string)
            .collect();
        out.push_str(&format!(
            "  {}✗{} {} calls {} without reaching {}\n",
            p.red,
            p.reset,
            violation.entry_point.id(),
            obligation.trigger,
            completions.join(" or ")
        ));
        if let Some(message) = &obligation.message {
            out.push_str(&format!("    {}{}{}\n", p.yellow, message, p.reset));
        }
        out.push_str(&format!("    {}trigger reached via:{}\n", p.dim, p.reset));
        for edge in &violation.trigger_path {
            out.push_str(&format!("      {}\n", render_edge(edge, p)));
        }
    }

    out.push('\n');
}

fn render_edge(edge: &MethodCall, p: &Palette) -> String {
    if edge.line == 0 {
        format!("{} {}(dispatch){}", edge, p.dim, p.reset)
    } else {
        format!("{} {}(line {}){}", edge, p.dim, edge.line, p.reset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardrail_analysis::{AnalysisResult, AnalysisStats, EntryPoint};
    use guardrail_core::MethodRef;

    fn sample_report() -> AnalysisReport {
        AnalysisReport {
            results: vec![RuleResult {
                rule: "must-authorize".to_string(),
                condition: Default::default(),
                message: None,
                results: vec![
                    AnalysisResult {
                        entry_point: EntryPoint::new("App\\A", "run"),
                        required_call: MethodRef::new("App\\B", "auth"),
                        found: true,
                        path: Some(vec![MethodCall {
                            caller_class: "App\\A".to_string(),
                            caller_method: "run".to_string(),
                            callee_class: Some("App\\B".to_string()),
                            callee_method: "auth".to_string(),
                            line: 7,
                            is_static: false,
                            receiver: None,
                        }]),
                        message: None,
                    },
                    AnalysisResult {
                        entry_point: EntryPoint::new("App\\C", "run"),
                        required_call: MethodRef::new("App\\B", "auth"),
                        found: false,
                        path: None,
                        message: Some("must authorize".to_string()),
                    },
                ],
                paired_violations: Vec::new(),
            }],
            stats: AnalysisStats::default(),
        }
    }

    #[test]
    fn renders_passes_failures_and_summary() {
        let output = render_console(&sample_report(), false);
        assert!(output.contains("✓ App\\A::run reaches App\\B::auth (1 hop)"));
        assert!(output.contains("✗ App\\C::run never reaches App\\B::auth"));
        assert!(output.contains("must authorize"));
        assert!(output.contains("Summary: 1/2 entry points passed, 1 violations"));
        assert!(output.contains("Result: FAILED ✗"));
    }

    #[test]
    fn color_codes_only_when_requested() {
        let plain = render_console(&sample_report(), false);
        assert!(!plain.contains("\x1b["));
        let colored = render_console(&sample_report(), true);
        assert!(colored.contains("\x1b[31m"));
    }
}
