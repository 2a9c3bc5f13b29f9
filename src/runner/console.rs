//! Human-readable pass/fail stream on stdout

use colored::Colorize;

use super::state::{TestResult, TestRun};

const RULE_WIDTH: usize = 60;

pub fn print_banner(run: &TestRun) {
    println!(
        "\n{} Starting SocialFlow Pro Backend API Tests",
        "▶".green().bold()
    );
    println!("  Base URL: {}", run.base_url.cyan());
    println!("  Run ID: {}", run.run_id.cyan());
    println!("  Test started at: {}", run.started_at.to_rfc3339());
    println!("{}", "=".repeat(RULE_WIDTH));
}

pub fn result_line(result: &TestResult) -> String {
    if result.passed {
        format!("✅ {}: PASSED - {}", result.name, result.detail)
    } else {
        format!("❌ {}: FAILED - {}", result.name, result.detail)
    }
}

pub fn print_result(result: &TestResult) {
    let line = result_line(result);
    if result.passed {
        println!("{}", line.green());
    } else {
        println!("{}", line.red());
    }
}

/// Summary block printed after all scenarios ran
pub fn summary_lines(run: &TestRun) -> Vec<String> {
    let summary = run.summary();
    let mut lines = vec![
        String::new(),
        "=".repeat(RULE_WIDTH),
        "📊 TEST SUMMARY".to_string(),
        format!("Total Tests: {}", summary.total),
        format!("Passed: {}", summary.passed),
        format!("Failed: {}", summary.failed),
        format!("Success Rate: {:.1}%", summary.success_rate()),
    ];

    if !run.all_passed() {
        lines.push(String::new());
        lines.push("❌ FAILED TESTS:".to_string());
        for failed in run.failures() {
            lines.push(format!("  - {}: {}", failed.name, failed.detail));
        }
    }

    if let Some(finished) = run.finished_at {
        lines.push(String::new());
        lines.push(format!("Test completed at: {}", finished.to_rfc3339()));
    }
    if let Some(duration) = summary.duration_ms {
        lines.push(format!("Duration: {}ms", duration));
    }

    lines
}

pub fn print_summary(run: &TestRun) {
    for line in summary_lines(run) {
        if line.starts_with("Passed:") {
            println!("{}", line.green());
        } else if line.starts_with("Failed:") && !run.all_passed() {
            println!("{}", line.red());
        } else if line == "📊 TEST SUMMARY" {
            println!("{}", line.blue().bold());
        } else {
            println!("{}", line);
        }
    }
}
