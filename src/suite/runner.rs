// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::time::Instant;

use tracing::debug;

use crate::{
    cfg::config::Config,
    suite::{Registry, TestOutcome, TestReport, TestStats},
};

const RESET: &str = "\x1b[0m";

/// Run every registered test in order and print results as they land.
pub fn run_all(registry: &Registry, cfg: &Config) -> (Vec<TestReport>, TestStats) {
    let mut reports = Vec::with_capacity(registry.len());
    let mut stats = TestStats::default();
    let mut current_category: Option<String> = None;

    println!("\niSCSI Target Conformance Suite");
    println!("==============================");
    println!("Target: {}", cfg.target.portal);
    if !cfg.target.target_name.is_empty() {
        println!("IQN: {}", cfg.target.target_name);
    }

    for case in registry.cases() {
        if current_category.as_deref() != Some(case.category()) {
            current_category = Some(case.category().to_string());
            println!("\n[{}]", case.category());
        }

        debug!(id = case.id(), "running test");
        let started = Instant::now();
        let (outcome, message) = case.run(cfg);
        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;

        let report = TestReport {
            id: case.id().to_string(),
            name: case.name().to_string(),
            category: case.category().to_string(),
            outcome,
            message,
            duration_ms,
        };

        print_result(&report, cfg.report.verbosity);
        stats.record(&report);
        reports.push(report);

        if cfg.report.stop_on_fail && outcome == TestOutcome::Fail {
            println!("\nStopping on first failure (stop_on_fail=true)");
            break;
        }
    }

    print_summary(&stats);
    (reports, stats)
}

fn print_result(report: &TestReport, verbosity: u8) {
    if verbosity == 0 && !matches!(report.outcome, TestOutcome::Fail | TestOutcome::Error) {
        return;
    }

    println!(
        "  {}: {:<40} [{}{}{}]  ({:.3}s)",
        report.id,
        report.name,
        report.outcome.color(),
        report.outcome.as_str(),
        RESET,
        report.duration_ms / 1000.0
    );

    if let Some(message) = &report.message {
        let always = matches!(report.outcome, TestOutcome::Fail | TestOutcome::Error);
        if verbosity > 0 || always {
            println!("    └─ {message}");
        }
    }
}

fn print_summary(stats: &TestStats) {
    println!("\n==============================");
    println!(
        "Results: {} passed, {} failed, {} skipped, {} errors",
        stats.passed, stats.failed, stats.skipped, stats.errors
    );
    println!("Duration: {:.1} seconds", stats.total_duration_ms / 1000.0);
}
